pub mod user;
pub mod medication;
pub mod reminder;
pub mod medication_log;
pub mod prescription_upload;
pub(crate) mod validation;

pub use user::*;
pub use medication::*;
pub use reminder::*;
pub use medication_log::*;
pub use prescription_upload::*;

use mongodb::bson::DateTime as BsonDateTime;

/// Transport rendering for timestamps: RFC 3339 string, or None (-> JSON
/// null) when unset. Raw BSON datetimes never cross the system boundary.
pub(crate) fn iso(dt: Option<BsonDateTime>) -> Option<String> {
    dt.and_then(|d| d.try_to_rfc3339_string().ok())
}
