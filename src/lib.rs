//! Persistent data model and connection lifecycle for the medication
//! tracker: MongoDB connection management, the five record collections
//! (users, medications, reminders, medication_logs, prescription_uploads)
//! with their validation rules and transport shapes, and a couple of
//! maintenance utilities.
//!
//! Everything else — web routing, sessions, OCR, reminder scheduling —
//! lives in collaborators that consume this crate through the service
//! functions and the `*Response` serialization contract.

pub mod config;
pub mod database;
pub mod models;
#[cfg(feature = "dev-seed")]
pub mod seeds;
pub mod services;
pub mod utils;

pub use config::DatabaseConfig;
pub use database::MongoDB;
pub use utils::error::AppError;
