use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

use crate::models::iso;
use crate::models::validation::require;
use crate::utils::error::AppError;

/// Lowercase day names, Monday first — the storage format for schedules.
pub const ALL_DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Reminder document in the `reminders` collection. The scheduler
/// collaborator reads these by is_active/next_due and writes back
/// last_sent/next_due; the due-time computation happens there, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub medication_id: ObjectId,
    pub user_id: ObjectId,

    /// Time of day as "HH:MM" (24-hour)
    pub time: String,
    #[serde(default = "default_days")]
    pub days_of_week: Vec<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_sent: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_due: Option<BsonDateTime>,

    #[serde(default)]
    pub created_at: Option<BsonDateTime>,
    #[serde(default)]
    pub updated_at: Option<BsonDateTime>,
}

fn default_true() -> bool {
    true
}

fn default_days() -> Vec<String> {
    ALL_DAYS.iter().map(|day| day.to_string()).collect()
}

impl Reminder {
    /// New daily reminder: every weekday, active.
    pub fn new(medication_id: ObjectId, user_id: ObjectId, time: impl Into<String>) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: None,
            medication_id,
            user_id,
            time: time.into(),
            days_of_week: default_days(),
            is_active: true,
            last_sent: None,
            next_due: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Refresh `updated_at`. Called unconditionally by save_reminder.
    pub fn touch(&mut self) {
        self.updated_at = Some(BsonDateTime::now());
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require("time", &self.time)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ReminderResponse {
    pub id: String,
    pub medication_id: String,
    pub user_id: String,
    pub time: String,
    pub days_of_week: Vec<String>,
    pub is_active: bool,
    pub last_sent: Option<String>,
    pub next_due: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<&Reminder> for ReminderResponse {
    fn from(reminder: &Reminder) -> Self {
        ReminderResponse {
            id: reminder.id.map(|id| id.to_hex()).unwrap_or_default(),
            medication_id: reminder.medication_id.to_hex(),
            user_id: reminder.user_id.to_hex(),
            time: reminder.time.clone(),
            days_of_week: reminder.days_of_week.clone(),
            is_active: reminder.is_active,
            last_sent: iso(reminder.last_sent),
            next_due: iso(reminder.next_due),
            created_at: iso(reminder.created_at),
            updated_at: iso(reminder.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_every_day() {
        let reminder = Reminder::new(ObjectId::new(), ObjectId::new(), "08:00");
        assert_eq!(reminder.days_of_week.len(), 7);
        assert_eq!(reminder.days_of_week[0], "monday");
        assert_eq!(reminder.days_of_week[6], "sunday");
        assert!(reminder.is_active);
    }

    #[test]
    fn missing_days_deserialize_to_every_day() {
        // Documents written before days_of_week existed have no such field
        let json = format!(
            r#"{{"medication_id":{{"$oid":"{}"}},"user_id":{{"$oid":"{}"}},"time":"08:00"}}"#,
            ObjectId::new(),
            ObjectId::new()
        );
        let reminder: Reminder = serde_json::from_str(&json).unwrap();
        assert_eq!(reminder.days_of_week.len(), 7);
        assert!(reminder.is_active);
    }

    #[test]
    fn validate_requires_a_time() {
        let mut reminder = Reminder::new(ObjectId::new(), ObjectId::new(), "08:00");
        assert!(reminder.validate().is_ok());
        reminder.time = String::new();
        assert_eq!(reminder.validate().unwrap_err().field(), Some("time"));
    }

    #[test]
    fn response_renders_unsent_reminder_with_null_timestamps() {
        let reminder = Reminder::new(ObjectId::new(), ObjectId::new(), "21:30");
        let json = serde_json::to_value(ReminderResponse::from(&reminder)).unwrap();
        assert!(json.get("last_sent").unwrap().is_null());
        assert!(json.get("next_due").unwrap().is_null());
        assert_eq!(json["time"], "21:30");
    }
}
