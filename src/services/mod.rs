pub mod user_service;
pub mod medication_service;
pub mod reminder_service;
pub mod medication_log_service;
pub mod prescription_service;
pub mod stats_service;

pub use user_service::*;
pub use medication_service::*;
pub use reminder_service::*;
pub use medication_log_service::*;
pub use prescription_service::*;
pub use stats_service::*;

use crate::utils::error::AppError;
use mongodb::bson::oid::ObjectId;

/// Identifiers cross the boundary as opaque strings; anything that does
/// not parse back into an ObjectId is rejected before hitting the driver.
pub(crate) fn parse_object_id(value: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(value).map_err(|_| {
        log::warn!("⚠️  Rejected malformed id: {}", value);
        AppError::InvalidId(value.to_string())
    })
}

/// Logs the driver error before mapping it, so every failure leaves a trace
pub(crate) fn db_err(context: &'static str) -> impl Fn(mongodb::error::Error) -> AppError {
    move |e| {
        log::error!("❌ Failed to {}: {}", context, e);
        AppError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_id_round_trips() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn parse_object_id_rejects_garbage() {
        assert!(matches!(
            parse_object_id("not-an-id"),
            Err(AppError::InvalidId(_))
        ));
    }
}
