use crate::database::MongoDB;
use crate::models::User;
use crate::services::{db_err, parse_object_id};
use crate::utils::error::AppError;
use mongodb::bson::{doc, DateTime as BsonDateTime};

const COLLECTION: &str = "users";

/// Insert or rewrite a user document. Validates field constraints and
/// username/email uniqueness first; on insert the assigned id is written
/// back into `user`. Returns the id as a hex string.
pub async fn save_user(db: &MongoDB, user: &mut User) -> Result<String, AppError> {
    user.validate().map_err(|e| {
        log::warn!("⚠️  User validation failed: {}", e);
        e
    })?;
    ensure_unique(db, user).await?;

    let collection = db.collection::<User>(COLLECTION);
    match user.id {
        Some(id) => {
            collection
                .replace_one(doc! { "_id": id }, &*user)
                .await
                .map_err(db_err("replace user"))?;
            Ok(id.to_hex())
        }
        None => {
            let result = collection
                .insert_one(&*user)
                .await
                .map_err(db_err("insert user"))?;
            let id = result
                .inserted_id
                .as_object_id()
                .ok_or_else(|| AppError::Database("insert returned no ObjectId".to_string()))?;
            user.id = Some(id);
            log::info!("✅ Created user: {}", user.username);
            Ok(id.to_hex())
        }
    }
}

/// Uniqueness is also backed by indexes; checking here turns the race-free
/// common case into a Validation error that names the field.
async fn ensure_unique(db: &MongoDB, user: &User) -> Result<(), AppError> {
    let collection = db.collection::<User>(COLLECTION);

    let mut filter = doc! {
        "$or": [
            { "username": &user.username },
            { "email": &user.email },
        ]
    };
    if let Some(id) = user.id {
        filter.insert("_id", doc! { "$ne": id });
    }

    if let Some(existing) = collection
        .find_one(filter)
        .await
        .map_err(db_err("check user uniqueness"))?
    {
        let field = if existing.username == user.username {
            "username"
        } else {
            "email"
        };
        log::warn!("⚠️  Duplicate user rejected ({} already taken)", field);
        return Err(AppError::validation(field, "is already taken"));
    }

    Ok(())
}

pub async fn find_user_by_id(db: &MongoDB, id: &str) -> Result<Option<User>, AppError> {
    let id = parse_object_id(id)?;
    db.collection::<User>(COLLECTION)
        .find_one(doc! { "_id": id })
        .await
        .map_err(db_err("find user by id"))
}

pub async fn find_user_by_username(
    db: &MongoDB,
    username: &str,
) -> Result<Option<User>, AppError> {
    db.collection::<User>(COLLECTION)
        .find_one(doc! { "username": username })
        .await
        .map_err(db_err("find user by username"))
}

pub async fn find_user_by_email(db: &MongoDB, email: &str) -> Result<Option<User>, AppError> {
    db.collection::<User>(COLLECTION)
        .find_one(doc! { "email": email })
        .await
        .map_err(db_err("find user by email"))
}

/// Stamp last_login and rewrite the document. For the session layer.
pub async fn record_login(db: &MongoDB, user: &mut User) -> Result<(), AppError> {
    user.last_login = Some(BsonDateTime::now());
    save_user(db, user).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn duplicate_username_is_rejected_and_original_kept() {
        dotenv::dotenv().ok();
        let _ = env_logger::builder().is_test(true).try_init();

        let db = MongoDB::connect(&DatabaseConfig::from_env()).await.unwrap();
        let suffix = mongodb::bson::oid::ObjectId::new().to_hex();
        let username = format!("alice_{}", suffix);

        let mut alice = User::new(&username, format!("{}@x.com", username));
        alice.set_password("secret1").unwrap();
        save_user(&db, &mut alice).await.unwrap();

        let mut imposter = User::new(&username, format!("other_{}@x.com", suffix));
        imposter.set_password("secret2").unwrap();
        let err = save_user(&db, &mut imposter).await.unwrap_err();
        assert_eq!(err.field(), Some("username"));

        // original record unchanged
        let stored = find_user_by_username(&db, &username).await.unwrap().unwrap();
        assert_eq!(stored.id, alice.id);
        assert!(stored.check_password("secret1"));
    }
}
