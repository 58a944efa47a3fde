use crate::config::DatabaseConfig;
use crate::utils::error::AppError;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

/// Singly-owned handle to the MongoDB connection pool.
///
/// Constructed once at process startup and passed by reference to every
/// schema operation. Re-initialization is construct-new-then-replace:
/// dropping the previous handle releases its pool. Not safe to do while
/// operations are in flight — startup only, single-threaded.
#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    /// Open a pooled connection with the configured timeouts, verify
    /// liveness, and declare the collection indexes.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(config.uri.as_str())
            .await
            .map_err(connect_failed)?;

        client_options.connect_timeout = Some(config.connect_timeout);
        client_options.server_selection_timeout = Some(config.server_selection_timeout);
        client_options.max_pool_size = Some(config.max_pool_size);
        client_options.retry_writes = Some(config.retry_writes);
        // The Rust driver has no socketTimeoutMS equivalent;
        // config.socket_timeout is carried for deployment parity only.

        let client = Client::with_options(client_options).map_err(connect_failed)?;
        let db = client.database(&config.database);

        // Fail init here rather than on the first query
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(connect_failed)?;

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await;

        log::info!("✅ Connected to MongoDB: {}/{}", config.uri, config.database);

        Ok(mongodb)
    }

    /// Declares the per-collection indexes. Uniqueness is carried only by
    /// username and email; everything else exists to keep the by-user and
    /// by-status queries cheap. Failures are logged, not fatal — saves
    /// re-check uniqueness themselves.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let unique = IndexOptions::builder().unique(true).build();
        self.create_collection_indexes(
            "users",
            vec![
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(unique.clone())
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique)
                    .build(),
            ],
        )
        .await;

        self.create_collection_indexes(
            "medications",
            field_indexes(&["user_id", "user_username", "name", "is_active"]),
        )
        .await;

        self.create_collection_indexes(
            "reminders",
            field_indexes(&["user_id", "medication_id", "is_active", "next_due"]),
        )
        .await;

        self.create_collection_indexes(
            "medication_logs",
            field_indexes(&["user_id", "medication_id", "taken_at", "status"]),
        )
        .await;

        self.create_collection_indexes(
            "prescription_uploads",
            field_indexes(&["user_id", "uploaded_at", "processing_status"]),
        )
        .await;

        log::info!("✅ Database indexes ready");
    }

    async fn create_collection_indexes(&self, name: &str, indexes: Vec<IndexModel>) {
        let collection = self.db.collection::<Document>(name);
        match collection.create_indexes(indexes).await {
            Ok(result) => {
                log::info!("   ✅ Indexes ready: {} ({})", name, result.index_names.len())
            }
            Err(e) => log::debug!("   ℹ️  Index creation skipped for {}: {}", name, e),
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Independent diagnostic probe: short-lived client, ping, enumerate
/// databases and collections, release the connection. Not for the request
/// hot path — a probe failure is non-fatal to a running service.
pub async fn test_connection(config: &DatabaseConfig) -> Result<(), AppError> {
    fn probe_failed<E: std::fmt::Display>(e: E) -> AppError {
        log::error!("❌ MongoDB connection test failed: {}", e);
        AppError::Connection(e.to_string())
    }

    let mut client_options = ClientOptions::parse(config.uri.as_str())
        .await
        .map_err(probe_failed)?;
    client_options.server_selection_timeout = Some(config.server_selection_timeout);

    let client = Client::with_options(client_options).map_err(probe_failed)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(probe_failed)?;

    let databases = client.list_database_names().await.map_err(probe_failed)?;
    log::info!("📊 Available databases: {:?}", databases);

    let collections = client
        .database(&config.database)
        .list_collection_names()
        .await
        .map_err(probe_failed)?;
    log::info!("📁 Collections in {}: {:?}", config.database, collections);

    client.shutdown().await;
    Ok(())
}

fn connect_failed(e: mongodb::error::Error) -> AppError {
    log::error!("❌ MongoDB connection failed: {}", e);
    AppError::Connection(e.to_string())
}

fn field_indexes(fields: &[&str]) -> Vec<IndexModel> {
    fields
        .iter()
        .map(|field| {
            let mut keys = Document::new();
            keys.insert(*field, 1);
            IndexModel::builder().keys(keys).build()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_connect_and_probe() {
        dotenv::dotenv().ok();
        let _ = env_logger::builder().is_test(true).try_init();

        let config = DatabaseConfig::from_env();
        let db = MongoDB::connect(&config).await;
        assert!(db.is_ok());

        assert!(test_connection(&config).await.is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_reconnect_is_idempotent() {
        dotenv::dotenv().ok();

        let config = DatabaseConfig::from_env();
        let first = MongoDB::connect(&config).await.unwrap();
        // Replacing the handle drops the previous pool
        let second = MongoDB::connect(&config).await.unwrap();
        drop(first);

        assert!(second
            .database()
            .run_command(doc! { "ping": 1 })
            .await
            .is_ok());
    }
}
