use crate::database::MongoDB;
use crate::models::User;
use crate::services::user_service;
use crate::utils::error::AppError;

/// (username, email, password, first name, last name)
///
/// Known weak credentials, for local development and testing only. This
/// whole module is behind the `dev-seed` feature and must not ship in a
/// production build.
const DEFAULT_USERS: [(&str, &str, &str, &str, &str); 2] = [
    ("testuser", "testuser@example.com", "testpass123", "Test", "User"),
    ("demo", "demo@example.com", "123456", "Demo", "User"),
];

/// Create any default accounts that do not exist yet (looked up by
/// username) and return how many were created. Idempotent: a second run
/// creates nothing.
pub async fn seed_default_users(db: &MongoDB) -> Result<usize, AppError> {
    let mut created = 0;

    for (username, email, password, first_name, last_name) in DEFAULT_USERS {
        if user_service::find_user_by_username(db, username)
            .await?
            .is_some()
        {
            continue;
        }

        let mut user = User::new(username, email);
        user.first_name = Some(first_name.to_string());
        user.last_name = Some(last_name.to_string());
        user.set_password(password)?;
        user_service::save_user(db, &mut user).await?;

        log::info!("✅ Created default user: {}", username);
        created += 1;
    }

    if created == 0 {
        log::info!("ℹ️  All default users already exist");
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn seeding_twice_creates_nothing_the_second_time() {
        dotenv::dotenv().ok();
        let _ = env_logger::builder().is_test(true).try_init();

        let db = MongoDB::connect(&DatabaseConfig::from_env()).await.unwrap();

        let first = seed_default_users(&db).await.unwrap();
        assert!(first <= DEFAULT_USERS.len());

        let second = seed_default_users(&db).await.unwrap();
        assert_eq!(second, 0);

        let seeded = user_service::find_user_by_username(&db, "testuser")
            .await
            .unwrap()
            .expect("seed user should exist");
        assert!(seeded.is_active);
        assert!(seeded.check_password("testpass123"));
    }
}
