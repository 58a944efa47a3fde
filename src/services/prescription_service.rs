use crate::database::MongoDB;
use crate::models::PrescriptionUpload;
use crate::services::{db_err, parse_object_id};
use crate::utils::error::AppError;
use futures::stream::StreamExt;
use mongodb::bson::doc;

const COLLECTION: &str = "prescription_uploads";

/// Insert or rewrite an upload document. The OCR pipeline calls this after
/// each status transition (pending -> processing -> completed|failed),
/// rewriting the whole document with its results.
pub async fn save_upload(
    db: &MongoDB,
    upload: &mut PrescriptionUpload,
) -> Result<String, AppError> {
    upload.validate().map_err(|e| {
        log::warn!("⚠️  Prescription upload validation failed: {}", e);
        e
    })?;

    let collection = db.collection::<PrescriptionUpload>(COLLECTION);
    match upload.id {
        Some(id) => {
            collection
                .replace_one(doc! { "_id": id }, &*upload)
                .await
                .map_err(db_err("replace prescription upload"))?;
            Ok(id.to_hex())
        }
        None => {
            let result = collection
                .insert_one(&*upload)
                .await
                .map_err(db_err("insert prescription upload"))?;
            let id = result
                .inserted_id
                .as_object_id()
                .ok_or_else(|| AppError::Database("insert returned no ObjectId".to_string()))?;
            upload.id = Some(id);
            log::info!("✅ Stored prescription upload: {}", upload.filename);
            Ok(id.to_hex())
        }
    }
}

pub async fn find_upload_by_id(
    db: &MongoDB,
    id: &str,
) -> Result<Option<PrescriptionUpload>, AppError> {
    let id = parse_object_id(id)?;
    db.collection::<PrescriptionUpload>(COLLECTION)
        .find_one(doc! { "_id": id })
        .await
        .map_err(db_err("find prescription upload by id"))
}

/// One user's uploads, newest first, optionally filtered by
/// processing status.
pub async fn list_uploads_for_user(
    db: &MongoDB,
    user_id: &str,
    status: Option<&str>,
) -> Result<Vec<PrescriptionUpload>, AppError> {
    let user_id = parse_object_id(user_id)?;

    let mut filter = doc! { "user_id": user_id };
    if let Some(status) = status {
        filter.insert("processing_status", status);
    }

    let mut cursor = db
        .collection::<PrescriptionUpload>(COLLECTION)
        .find(filter)
        .sort(doc! { "uploaded_at": -1 })
        .await
        .map_err(db_err("list prescription uploads"))?;

    let mut uploads = Vec::new();
    while let Some(upload) = cursor.next().await {
        uploads.push(upload.map_err(db_err("read prescription upload"))?);
    }
    Ok(uploads)
}
