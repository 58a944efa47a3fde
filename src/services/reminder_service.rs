use crate::database::MongoDB;
use crate::models::Reminder;
use crate::services::{db_err, parse_object_id};
use crate::utils::error::AppError;
use futures::stream::StreamExt;
use mongodb::bson::{doc, DateTime as BsonDateTime};

const COLLECTION: &str = "reminders";

/// Insert or rewrite a reminder document; `updated_at` is refreshed
/// unconditionally as part of the save.
pub async fn save_reminder(db: &MongoDB, reminder: &mut Reminder) -> Result<String, AppError> {
    reminder.validate().map_err(|e| {
        log::warn!("⚠️  Reminder validation failed: {}", e);
        e
    })?;
    reminder.touch();

    let collection = db.collection::<Reminder>(COLLECTION);
    match reminder.id {
        Some(id) => {
            collection
                .replace_one(doc! { "_id": id }, &*reminder)
                .await
                .map_err(db_err("replace reminder"))?;
            Ok(id.to_hex())
        }
        None => {
            let result = collection
                .insert_one(&*reminder)
                .await
                .map_err(db_err("insert reminder"))?;
            let id = result
                .inserted_id
                .as_object_id()
                .ok_or_else(|| AppError::Database("insert returned no ObjectId".to_string()))?;
            reminder.id = Some(id);
            Ok(id.to_hex())
        }
    }
}

pub async fn find_reminder_by_id(db: &MongoDB, id: &str) -> Result<Option<Reminder>, AppError> {
    let id = parse_object_id(id)?;
    db.collection::<Reminder>(COLLECTION)
        .find_one(doc! { "_id": id })
        .await
        .map_err(db_err("find reminder by id"))
}

pub async fn list_reminders_for_user(
    db: &MongoDB,
    user_id: &str,
    active_only: bool,
) -> Result<Vec<Reminder>, AppError> {
    let user_id = parse_object_id(user_id)?;

    let mut filter = doc! { "user_id": user_id };
    if active_only {
        filter.insert("is_active", true);
    }

    collect_reminders(db, filter, doc! { "time": 1 }).await
}

pub async fn list_reminders_for_medication(
    db: &MongoDB,
    medication_id: &str,
) -> Result<Vec<Reminder>, AppError> {
    let medication_id = parse_object_id(medication_id)?;
    collect_reminders(db, doc! { "medication_id": medication_id }, doc! { "time": 1 }).await
}

/// Active reminders whose next_due is at or before `cutoff`, soonest
/// first. The scheduler collaborator polls this and writes back
/// last_sent/next_due; due-time computation happens there.
pub async fn list_due_reminders(
    db: &MongoDB,
    cutoff: BsonDateTime,
) -> Result<Vec<Reminder>, AppError> {
    let filter = doc! {
        "is_active": true,
        "next_due": { "$lte": cutoff },
    };
    collect_reminders(db, filter, doc! { "next_due": 1 }).await
}

async fn collect_reminders(
    db: &MongoDB,
    filter: mongodb::bson::Document,
    sort: mongodb::bson::Document,
) -> Result<Vec<Reminder>, AppError> {
    let mut cursor = db
        .collection::<Reminder>(COLLECTION)
        .find(filter)
        .sort(sort)
        .await
        .map_err(db_err("list reminders"))?;

    let mut reminders = Vec::new();
    while let Some(reminder) = cursor.next().await {
        reminders.push(reminder.map_err(db_err("read reminder"))?);
    }
    Ok(reminders)
}
