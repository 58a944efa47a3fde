use crate::database::MongoDB;
use crate::services::db_err;
use crate::utils::error::AppError;
use mongodb::bson::{doc, Document};
use serde::Serialize;

/// Document counts per collection, for operational dashboards
#[derive(Debug, Serialize)]
pub struct CollectionStats {
    pub users: u64,
    pub medications: u64,
    pub reminders: u64,
    pub medication_logs: u64,
    pub prescription_uploads: u64,
}

/// Count every collection, or fail as a whole — partial counts would read
/// as a consistent snapshot when they are not.
pub async fn collection_stats(db: &MongoDB) -> Result<CollectionStats, AppError> {
    Ok(CollectionStats {
        users: count(db, "users").await?,
        medications: count(db, "medications").await?,
        reminders: count(db, "reminders").await?,
        medication_logs: count(db, "medication_logs").await?,
        prescription_uploads: count(db, "prescription_uploads").await?,
    })
}

async fn count(db: &MongoDB, collection: &str) -> Result<u64, AppError> {
    db.collection::<Document>(collection)
        .count_documents(doc! {})
        .await
        .map_err(db_err("count documents"))
}
