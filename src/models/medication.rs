use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

use crate::models::iso;
use crate::models::validation::{max_length, max_length_opt, require};
use crate::utils::error::AppError;

/// Medication document in the `medications` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub user_id: ObjectId,
    /// Denormalized copy of User.username for by-owner queries.
    /// Not re-synced if the username later changes.
    pub user_username: String,

    pub name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration: Option<String>,

    #[serde(default)]
    pub start_date: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_date: Option<BsonDateTime>,

    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<BsonDateTime>,
    #[serde(default)]
    pub updated_at: Option<BsonDateTime>,

    /// "manual", "ocr" or "prescription" — written by the intake path
    #[serde(default = "default_source")]
    pub source: String,
    /// [0, 1] from the OCR pipeline; 1.0 for manual entries. Not enforced.
    #[serde(default = "default_confidence")]
    pub confidence_score: f64,
}

fn default_true() -> bool {
    true
}

fn default_source() -> String {
    "manual".to_string()
}

fn default_confidence() -> f64 {
    1.0
}

impl Medication {
    pub fn new(
        user_id: ObjectId,
        user_username: impl Into<String>,
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: impl Into<String>,
    ) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: None,
            user_id,
            user_username: user_username.into(),
            name: name.into(),
            dosage: dosage.into(),
            frequency: frequency.into(),
            instructions: None,
            duration: None,
            start_date: Some(now),
            end_date: None,
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
            source: default_source(),
            confidence_score: default_confidence(),
        }
    }

    /// Refresh `updated_at`. Called unconditionally by save_medication.
    pub fn touch(&mut self) {
        self.updated_at = Some(BsonDateTime::now());
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require("name", &self.name)?;
        max_length("name", &self.name, 100)?;
        require("dosage", &self.dosage)?;
        max_length("dosage", &self.dosage, 50)?;
        require("frequency", &self.frequency)?;
        max_length("frequency", &self.frequency, 50)?;
        max_length_opt("instructions", &self.instructions, 500)?;
        max_length_opt("duration", &self.duration, 100)?;
        Ok(())
    }
}

/// Transport shape of a medication. The denormalized owner username is a
/// query aid and stays server-side.
#[derive(Debug, Serialize)]
pub struct MedicationResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub instructions: Option<String>,
    pub duration: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub source: String,
    pub confidence_score: f64,
}

impl From<&Medication> for MedicationResponse {
    fn from(medication: &Medication) -> Self {
        MedicationResponse {
            id: medication.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: medication.user_id.to_hex(),
            name: medication.name.clone(),
            dosage: medication.dosage.clone(),
            frequency: medication.frequency.clone(),
            instructions: medication.instructions.clone(),
            duration: medication.duration.clone(),
            start_date: iso(medication.start_date),
            end_date: iso(medication.end_date),
            is_active: medication.is_active,
            created_at: iso(medication.created_at),
            updated_at: iso(medication.updated_at),
            source: medication.source.clone(),
            confidence_score: medication.confidence_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Medication {
        Medication::new(ObjectId::new(), "alice", "Aspirin", "100mg", "daily")
    }

    #[test]
    fn new_defaults() {
        let medication = sample();
        assert!(medication.is_active);
        assert_eq!(medication.source, "manual");
        assert_eq!(medication.confidence_score, 1.0);
        assert!(medication.start_date.is_some());
    }

    #[test]
    fn touch_never_moves_updated_at_backwards() {
        let mut medication = sample();
        let before = medication.updated_at.unwrap();
        medication.touch();
        assert!(medication.updated_at.unwrap() >= before);
    }

    #[test]
    fn validate_checks_required_and_lengths() {
        let mut medication = sample();
        medication.name = String::new();
        assert_eq!(medication.validate().unwrap_err().field(), Some("name"));

        let mut medication = sample();
        medication.dosage = "x".repeat(51);
        assert_eq!(medication.validate().unwrap_err().field(), Some("dosage"));

        let mut medication = sample();
        medication.instructions = Some("x".repeat(501));
        assert_eq!(
            medication.validate().unwrap_err().field(),
            Some("instructions")
        );
    }

    #[test]
    fn response_hides_denormalized_username_and_renders_null_end_date() {
        let medication = sample();
        let json = serde_json::to_value(MedicationResponse::from(&medication)).unwrap();
        assert!(json.get("user_username").is_none());
        assert!(json.get("end_date").unwrap().is_null());
        assert_eq!(json["source"], "manual");
        assert!(
            chrono::DateTime::parse_from_rfc3339(json["updated_at"].as_str().unwrap()).is_ok()
        );
    }
}
