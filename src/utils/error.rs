use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Driver-level failure while talking to MongoDB
    Database(String),
    /// Connection could not be established (init or diagnostic probe)
    Connection(String),
    /// A field constraint was violated at save time; `field` names the offender
    Validation { field: &'static str, message: String },
    /// Caller passed a string that is not a valid ObjectId
    InvalidId(String),
    NotFound(String),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Name of the offending field for validation errors
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AppError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Connection(msg) => write!(f, "Connection error: {}", msg),
            AppError::Validation { field, message } => {
                write!(f, "Validation error on '{}': {}", field, message)
            }
            AppError::InvalidId(msg) => write!(f, "Invalid id: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_the_field() {
        let err = AppError::validation("username", "cannot be empty");
        assert_eq!(err.field(), Some("username"));
        assert_eq!(
            err.to_string(),
            "Validation error on 'username': cannot be empty"
        );
    }

    #[test]
    fn non_validation_errors_have_no_field() {
        assert_eq!(AppError::Database("boom".into()).field(), None);
    }
}
