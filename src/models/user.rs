use bcrypt::{hash, verify, DEFAULT_COST};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

use crate::models::iso;
use crate::models::validation::{max_length, max_length_opt, require};
use crate::utils::error::AppError;

/// Account document in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub username: String,
    pub email: String,
    /// bcrypt hash — the plaintext is never stored, logged or serialized
    pub password_hash: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_of_birth: Option<BsonDateTime>,

    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_login: Option<BsonDateTime>,
}

fn default_true() -> bool {
    true
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            phone: None,
            date_of_birth: None,
            is_active: true,
            created_at: Some(BsonDateTime::now()),
            last_login: None,
        }
    }

    /// Identifier as an opaque string, for the session layer
    pub fn id_hex(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }

    /// Replaces the stored hash with a salted one-way hash of `plaintext`.
    /// The plaintext never leaves this call.
    pub fn set_password(&mut self, plaintext: &str) -> Result<(), AppError> {
        self.password_hash = hash(plaintext, DEFAULT_COST)
            .map_err(|e| AppError::validation("password_hash", format!("hashing failed: {}", e)))?;
        Ok(())
    }

    /// Constant-time comparison against the stored hash. A missing or
    /// malformed hash is a non-match, not an error.
    pub fn check_password(&self, candidate: &str) -> bool {
        verify(candidate, &self.password_hash).unwrap_or(false)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require("username", &self.username)?;
        max_length("username", &self.username, 80)?;
        require("email", &self.email)?;
        max_length("email", &self.email, 120)?;
        if !self.email.contains('@') {
            return Err(AppError::validation("email", "is not a valid email address"));
        }
        require("password_hash", &self.password_hash)?;
        max_length("password_hash", &self.password_hash, 200)?;
        max_length_opt("first_name", &self.first_name, 50)?;
        max_length_opt("last_name", &self.last_name, 50)?;
        max_length_opt("phone", &self.phone, 20)?;
        Ok(())
    }
}

/// Transport shape of a user. The password hash stays server-side.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub last_login: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            date_of_birth: iso(user.date_of_birth),
            is_active: user.is_active,
            created_at: iso(user.created_at),
            last_login: iso(user.last_login),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let mut user = User::new("alice", "alice@x.com");
        user.set_password("secret1").unwrap();

        assert!(user.check_password("secret1"));
        assert!(!user.check_password("wrong"));
        // plaintext must not end up in the stored hash
        assert!(!user.password_hash.contains("secret1"));
    }

    #[test]
    fn check_password_with_no_hash_is_a_non_match() {
        let user = User::new("alice", "alice@x.com");
        assert!(!user.check_password("anything"));
    }

    #[test]
    fn validate_flags_the_offending_field() {
        let mut user = User::new("", "alice@x.com");
        user.password_hash = "x".into();
        assert_eq!(user.validate().unwrap_err().field(), Some("username"));

        let mut user = User::new("alice", "not-an-email");
        user.password_hash = "x".into();
        assert_eq!(user.validate().unwrap_err().field(), Some("email"));

        let mut user = User::new("a".repeat(81), "alice@x.com");
        user.password_hash = "x".into();
        assert_eq!(user.validate().unwrap_err().field(), Some("username"));
    }

    #[test]
    fn response_hides_password_and_renders_unset_timestamps_as_null() {
        let mut user = User::new("alice", "alice@x.com");
        user.set_password("secret1").unwrap();

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("last_login").unwrap().is_null());
        assert!(json["is_active"].as_bool().unwrap());

        // created_at was set by the constructor and renders as RFC 3339
        let created_at = json["created_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
    }

    #[test]
    fn serialization_is_a_pure_function_of_state() {
        let user = User::new("alice", "alice@x.com");
        let first = serde_json::to_value(UserResponse::from(&user)).unwrap();
        let second = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert_eq!(first, second);
    }
}
