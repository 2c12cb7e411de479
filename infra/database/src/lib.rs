//! # Database Infrastructure
//!
//! This crate provides a unified interface for initializing and managing [SurrealDB](https://surrealdb.com)
//! connections across the workspace.
//!
//! ## Key Features
//! - **Engine Agnostic**: Supports `mem://`, `rocksdb://`, `ws://`, and `http://` via the `any` engine.
//! - **Resilient Connectivity**: Built-in retry logic for health checks during engine startup.
//! - **Schema Migrations**: Applies the account schema (including the UNIQUE email index) at init.
//!
//! ## Example
//!
//! ```rust
//! use cpark_database::{Database, DatabaseError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder()
//!         .url("mem://")
//!         .session("cpark", "core")
//!         .init()
//!         .await?;
//!
//!     let _version = db.version().await?;
//!
//!     Ok(())
//! }
//! ```

mod error;
mod migrations;

pub use error::{DatabaseError, is_index_conflict};
use migrations::MigrationRunner;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::{info, instrument, trace, warn};

/// Inner state of the [`Database`] wrapper.
#[derive(Debug)]
pub struct DatabaseInner {
    instance: Surreal<Any>,
    ns: String,
    db: String,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        info!(ns = %self.ns, db = %self.db, "SurrealDB session handle dropped");
    }
}

/// `SurrealDB` client wrapper that provides thread-safety and contextual error handling.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Creates a new [`DatabaseBuilder`].
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner.instance
    }
}

/// A fluent builder for configuring and establishing a `SurrealDB` connection.
///
/// This builder ensures that fundamental parameters like the connection URL,
/// namespace, and database name are provided upfront.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    auth: Option<(String, String)>,
}

impl DatabaseBuilder {
    /// Creates a new [`DatabaseBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the namespace and database name.
    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Add root credentials to the connection.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Consumes the builder and attempts to establish a connection to the database.
    ///
    /// # Process
    /// 1. **Validation**: Ensures URL, Namespace, and Database name are provided.
    /// 2. **Engine Initialization**: Connects to the underlying `SurrealDB` engine (Any).
    /// 3. **Resilience**: Performs up to 3 health checks. If the first check fails,
    ///    it retries with exponential backoff (starting at 500ms).
    /// 4. **Authentication**: If credentials were provided via [`auth`], signs in as a Root user.
    /// 5. **Session Activation**: Sets the global namespace and database for the connection.
    /// 6. **Migrations**: Applies any pending schema migrations.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] if required parameters are missing.
    /// * [`DatabaseError::Connection`] if the engine fails to start or remains unhealthy.
    /// * [`DatabaseError::Auth`] if the provided credentials are rejected.
    /// * [`DatabaseError::Surreal`] if the session activation (`use_ns`/`use_db`) fails.
    /// * [`DatabaseError::Migration`] if a schema migration cannot be applied.
    #[instrument(skip(self), fields(url = self.url, ns = self.ns, db = self.db))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let url =
            self.url.ok_or(DatabaseError::Validation { message: "URL is required".into() })?;
        let ns =
            self.ns.ok_or(DatabaseError::Validation { message: "Namespace is required".into() })?;
        let db =
            self.db.ok_or(DatabaseError::Validation { message: "Database is required".into() })?;

        let instance = connect(&url)
            .await
            .map_err(|e| DatabaseError::Connection { message: e.to_string().into() })?;

        // 1. Connectivity & Health Check with Retries
        let mut delay = Duration::from_millis(500);
        for attempt in 1..=3 {
            if instance.health().await.is_ok() {
                break;
            }
            if attempt == 3 {
                return Err(DatabaseError::Connection {
                    message: format!("Unhealthy after retries: {url}").into(),
                });
            }
            warn!(attempt, ?delay, "Database not ready, retrying...");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        // 2. Authentication
        if let Some((u, p)) = self.auth {
            instance
                .signin(Root { username: u, password: p })
                .await
                .map_err(|e| DatabaseError::Auth { message: e.to_string().into() })?;
        }

        // 3. Session Initialization
        instance.use_ns(&ns).use_db(&db).await?;

        let version =
            instance.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %ns, database = %db, %version, "SurrealDB connection established");

        info!("Applying database migrations...");
        let report = MigrationRunner::new(instance.clone()).run().await?;
        for skipped in report.skipped {
            trace!(key = skipped.key, version = skipped.version, "Skipping migration");
        }
        for applied in report.applied {
            info!(key = applied.key, version = applied.version, "Applied migration");
        }
        info!("Database migrations applied successfully");

        Ok(Database { inner: Arc::new(DatabaseInner { instance, ns, db }) })
    }
}
