use crate::database::MongoDB;
use crate::models::Medication;
use crate::services::{db_err, parse_object_id};
use crate::utils::error::AppError;
use futures::stream::StreamExt;
use mongodb::bson::doc;

const COLLECTION: &str = "medications";

/// Insert or rewrite a medication document. `updated_at` is refreshed on
/// every save whether or not the caller changed anything — the touch is
/// part of the save, not optional.
pub async fn save_medication(db: &MongoDB, medication: &mut Medication) -> Result<String, AppError> {
    medication.validate().map_err(|e| {
        log::warn!("⚠️  Medication validation failed: {}", e);
        e
    })?;
    medication.touch();

    let collection = db.collection::<Medication>(COLLECTION);
    match medication.id {
        Some(id) => {
            collection
                .replace_one(doc! { "_id": id }, &*medication)
                .await
                .map_err(db_err("replace medication"))?;
            Ok(id.to_hex())
        }
        None => {
            let result = collection
                .insert_one(&*medication)
                .await
                .map_err(db_err("insert medication"))?;
            let id = result
                .inserted_id
                .as_object_id()
                .ok_or_else(|| AppError::Database("insert returned no ObjectId".to_string()))?;
            medication.id = Some(id);
            log::info!(
                "✅ Created medication '{}' for {}",
                medication.name,
                medication.user_username
            );
            Ok(id.to_hex())
        }
    }
}

pub async fn find_medication_by_id(
    db: &MongoDB,
    id: &str,
) -> Result<Option<Medication>, AppError> {
    let id = parse_object_id(id)?;
    db.collection::<Medication>(COLLECTION)
        .find_one(doc! { "_id": id })
        .await
        .map_err(db_err("find medication by id"))
}

/// Exact-name lookup within one user's medications; the OCR pipeline uses
/// this to avoid inserting duplicates.
pub async fn find_medication_by_name(
    db: &MongoDB,
    user_id: &str,
    name: &str,
) -> Result<Option<Medication>, AppError> {
    let user_id = parse_object_id(user_id)?;
    db.collection::<Medication>(COLLECTION)
        .find_one(doc! { "user_id": user_id, "name": name })
        .await
        .map_err(db_err("find medication by name"))
}

pub async fn list_medications_for_user(
    db: &MongoDB,
    user_id: &str,
    active_only: bool,
) -> Result<Vec<Medication>, AppError> {
    let user_id = parse_object_id(user_id)?;

    let mut filter = doc! { "user_id": user_id };
    if active_only {
        filter.insert("is_active", true);
    }

    let mut cursor = db
        .collection::<Medication>(COLLECTION)
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .await
        .map_err(db_err("list medications"))?;

    let mut medications = Vec::new();
    while let Some(medication) = cursor.next().await {
        medications.push(medication.map_err(db_err("read medication"))?);
    }
    Ok(medications)
}
