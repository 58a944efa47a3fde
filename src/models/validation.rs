//! Field-level checks shared by the record schemas. Each returns a
//! Validation error naming the offending field, so the web layer can
//! surface it verbatim.

use crate::utils::error::AppError;

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(field, "is required"));
    }
    Ok(())
}

pub(crate) fn max_length(field: &'static str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::validation(
            field,
            format!("exceeds maximum length of {} characters", max),
        ));
    }
    Ok(())
}

pub(crate) fn max_length_opt(
    field: &'static str,
    value: &Option<String>,
    max: usize,
) -> Result<(), AppError> {
    match value {
        Some(value) => max_length(field, value, max),
        None => Ok(()),
    }
}

pub(crate) fn one_of(
    field: &'static str,
    value: &str,
    choices: &[&str],
) -> Result<(), AppError> {
    if !choices.contains(&value) {
        return Err(AppError::validation(
            field,
            format!("'{}' is not one of {:?}", value, choices),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_blank() {
        assert!(require("name", "Aspirin").is_ok());
        assert_eq!(require("name", "   ").unwrap_err().field(), Some("name"));
    }

    #[test]
    fn max_length_counts_chars() {
        assert!(max_length("notes", "short", 10).is_ok());
        assert!(max_length("notes", "exactly-10", 10).is_ok());
        assert_eq!(
            max_length("notes", "one past maximum", 10).unwrap_err().field(),
            Some("notes")
        );
    }

    #[test]
    fn one_of_rejects_unknown_choice() {
        let choices = ["taken", "missed", "delayed"];
        assert!(one_of("status", "missed", &choices).is_ok());
        let err = one_of("status", "skipped", &choices).unwrap_err();
        assert_eq!(err.field(), Some("status"));
    }
}
