use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

use crate::models::iso;
use crate::models::validation::{one_of, require};
use crate::utils::error::AppError;

/// Lifecycle of an upload through the OCR pipeline
pub const PROCESSING_STATUSES: [&str; 4] = ["pending", "processing", "completed", "failed"];

/// Upload document in the `prescription_uploads` collection. The OCR
/// collaborator fills in the extraction fields and moves processing_status
/// pending -> processing -> completed|failed; this layer only stores the
/// shape, it does not validate OCR content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionUpload {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub user_id: ObjectId,

    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mime_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extracted_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ocr_confidence: Option<f64>,
    /// Seconds spent in the OCR pipeline
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub processing_time: Option<f64>,

    #[serde(default)]
    pub medications_found: i32,
    #[serde(default)]
    pub medications_added: i32,

    #[serde(default = "default_status")]
    pub processing_status: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,

    #[serde(default)]
    pub uploaded_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub processed_at: Option<BsonDateTime>,
}

fn default_status() -> String {
    "pending".to_string()
}

impl PrescriptionUpload {
    pub fn new(
        user_id: ObjectId,
        filename: impl Into<String>,
        original_filename: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            user_id,
            filename: filename.into(),
            original_filename: original_filename.into(),
            file_path: file_path.into(),
            file_size: None,
            mime_type: None,
            extracted_text: None,
            ocr_confidence: None,
            processing_time: None,
            medications_found: 0,
            medications_added: 0,
            processing_status: default_status(),
            error_message: None,
            uploaded_at: Some(BsonDateTime::now()),
            processed_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require("filename", &self.filename)?;
        require("original_filename", &self.original_filename)?;
        require("file_path", &self.file_path)?;
        one_of("processing_status", &self.processing_status, &PROCESSING_STATUSES)?;
        Ok(())
    }
}

/// Transport shape of an upload. The server-side storage path is not
/// exposed.
#[derive(Debug, Serialize)]
pub struct PrescriptionUploadResponse {
    pub id: String,
    pub user_id: String,
    pub filename: String,
    pub original_filename: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub extracted_text: Option<String>,
    pub ocr_confidence: Option<f64>,
    pub processing_time: Option<f64>,
    pub medications_found: i32,
    pub medications_added: i32,
    pub processing_status: String,
    pub error_message: Option<String>,
    pub uploaded_at: Option<String>,
    pub processed_at: Option<String>,
}

impl From<&PrescriptionUpload> for PrescriptionUploadResponse {
    fn from(upload: &PrescriptionUpload) -> Self {
        PrescriptionUploadResponse {
            id: upload.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: upload.user_id.to_hex(),
            filename: upload.filename.clone(),
            original_filename: upload.original_filename.clone(),
            file_size: upload.file_size,
            mime_type: upload.mime_type.clone(),
            extracted_text: upload.extracted_text.clone(),
            ocr_confidence: upload.ocr_confidence,
            processing_time: upload.processing_time,
            medications_found: upload.medications_found,
            medications_added: upload.medications_added,
            processing_status: upload.processing_status.clone(),
            error_message: upload.error_message.clone(),
            uploaded_at: iso(upload.uploaded_at),
            processed_at: iso(upload.processed_at),
        }
    }
}
