use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

use crate::models::iso;
use crate::models::validation::{max_length_opt, one_of};
use crate::utils::error::AppError;

/// Valid intake outcomes
pub const LOG_STATUSES: [&str; 3] = ["taken", "missed", "delayed"];

/// Intake-log document in the `medication_logs` collection.
/// Append-only: logs are a historical record and are never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub user_id: ObjectId,
    pub medication_id: ObjectId,

    #[serde(default)]
    pub taken_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dosage_taken: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,

    #[serde(default = "default_status")]
    pub status: String,
    /// Reminder that triggered this intake, when there was one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reminder_id: Option<ObjectId>,

    #[serde(default)]
    pub created_at: Option<BsonDateTime>,
}

fn default_status() -> String {
    "taken".to_string()
}

impl MedicationLog {
    pub fn new(user_id: ObjectId, medication_id: ObjectId) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: None,
            user_id,
            medication_id,
            taken_at: Some(now),
            dosage_taken: None,
            notes: None,
            status: default_status(),
            reminder_id: None,
            created_at: Some(now),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        one_of("status", &self.status, &LOG_STATUSES)?;
        max_length_opt("dosage_taken", &self.dosage_taken, 50)?;
        max_length_opt("notes", &self.notes, 500)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MedicationLogResponse {
    pub id: String,
    pub user_id: String,
    pub medication_id: String,
    pub taken_at: Option<String>,
    pub dosage_taken: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub reminder_id: Option<String>,
    pub created_at: Option<String>,
}

impl From<&MedicationLog> for MedicationLogResponse {
    fn from(log: &MedicationLog) -> Self {
        MedicationLogResponse {
            id: log.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: log.user_id.to_hex(),
            medication_id: log.medication_id.to_hex(),
            taken_at: iso(log.taken_at),
            dosage_taken: log.dosage_taken.clone(),
            notes: log.notes.clone(),
            status: log.status.clone(),
            reminder_id: log.reminder_id.map(|id| id.to_hex()),
            created_at: iso(log.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_limited_to_the_three_outcomes() {
        let mut log = MedicationLog::new(ObjectId::new(), ObjectId::new());
        assert_eq!(log.status, "taken");
        assert!(log.validate().is_ok());

        for status in ["missed", "delayed"] {
            log.status = status.to_string();
            assert!(log.validate().is_ok());
        }

        log.status = "skipped".to_string();
        let err = log.validate().unwrap_err();
        assert_eq!(err.field(), Some("status"));

        log.status = "TAKEN".to_string();
        assert!(log.validate().is_err());
    }

    #[test]
    fn note_length_is_bounded() {
        let mut log = MedicationLog::new(ObjectId::new(), ObjectId::new());
        log.notes = Some("x".repeat(501));
        assert_eq!(log.validate().unwrap_err().field(), Some("notes"));
    }

    #[test]
    fn response_renders_missing_reminder_as_null() {
        let log = MedicationLog::new(ObjectId::new(), ObjectId::new());
        let json = serde_json::to_value(MedicationLogResponse::from(&log)).unwrap();
        assert!(json.get("reminder_id").unwrap().is_null());
        assert_eq!(json["status"], "taken");
    }
}
