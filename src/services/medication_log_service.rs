use crate::database::MongoDB;
use crate::models::MedicationLog;
use crate::services::{db_err, parse_object_id};
use crate::utils::error::AppError;
use futures::stream::StreamExt;
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};

const COLLECTION: &str = "medication_logs";

/// Append an intake log. Logs are immutable history — there is no update
/// or rewrite path, insert only.
pub async fn record_log(db: &MongoDB, log_entry: &mut MedicationLog) -> Result<String, AppError> {
    log_entry.validate().map_err(|e| {
        log::warn!("⚠️  Medication log validation failed: {}", e);
        e
    })?;

    let result = db
        .collection::<MedicationLog>(COLLECTION)
        .insert_one(&*log_entry)
        .await
        .map_err(db_err("insert medication log"))?;
    let id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::Database("insert returned no ObjectId".to_string()))?;
    log_entry.id = Some(id);
    Ok(id.to_hex())
}

pub async fn list_logs_for_user(
    db: &MongoDB,
    user_id: &str,
    status: Option<&str>,
) -> Result<Vec<MedicationLog>, AppError> {
    let user_id = parse_object_id(user_id)?;

    let mut filter = doc! { "user_id": user_id };
    if let Some(status) = status {
        filter.insert("status", status);
    }

    collect_logs(db, filter).await
}

pub async fn list_logs_for_medication(
    db: &MongoDB,
    medication_id: &str,
) -> Result<Vec<MedicationLog>, AppError> {
    let medication_id = parse_object_id(medication_id)?;
    collect_logs(db, doc! { "medication_id": medication_id }).await
}

/// Intake history for one user inside [from, to], newest first
pub async fn list_logs_between(
    db: &MongoDB,
    user_id: &str,
    from: BsonDateTime,
    to: BsonDateTime,
) -> Result<Vec<MedicationLog>, AppError> {
    let user_id = parse_object_id(user_id)?;
    let filter = doc! {
        "user_id": user_id,
        "taken_at": { "$gte": from, "$lte": to },
    };
    collect_logs(db, filter).await
}

async fn collect_logs(db: &MongoDB, filter: Document) -> Result<Vec<MedicationLog>, AppError> {
    let mut cursor = db
        .collection::<MedicationLog>(COLLECTION)
        .find(filter)
        .sort(doc! { "taken_at": -1 })
        .await
        .map_err(db_err("list medication logs"))?;

    let mut logs = Vec::new();
    while let Some(entry) = cursor.next().await {
        logs.push(entry.map_err(db_err("read medication log"))?);
    }
    Ok(logs)
}
