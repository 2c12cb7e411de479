use crate::error::DatabaseError;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// A single versioned schema script. Scripts are embedded in the binary and
/// applied exactly once per (key, version) pair.
#[derive(Debug)]
struct Migration {
    key: &'static str,
    version: &'static str,
    script: &'static str,
}

/// Schema for the account table. The UNIQUE index on `email` is the
/// authoritative cross-request uniqueness guarantee; application-level
/// duplicate checks are only a fast path.
const ACCOUNT_SCHEMA: &str = "
    DEFINE TABLE OVERWRITE account SCHEMAFULL;
    DEFINE FIELD OVERWRITE email ON account TYPE string;
    DEFINE FIELD OVERWRITE password_hash ON account TYPE string;
    DEFINE FIELD OVERWRITE name ON account TYPE string;
    DEFINE FIELD OVERWRITE role ON account TYPE string;
    DEFINE FIELD OVERWRITE contact_id ON account TYPE string;
    DEFINE FIELD OVERWRITE department ON account TYPE option<string>;
    DEFINE FIELD OVERWRITE email_verified ON account TYPE bool;
    DEFINE FIELD OVERWRITE verification_token ON account TYPE string;
    DEFINE FIELD OVERWRITE is_active ON account TYPE bool;
    DEFINE FIELD OVERWRITE created_at ON account TYPE datetime;
    DEFINE INDEX OVERWRITE account_email_unique ON account FIELDS email UNIQUE;
";

/// Bookkeeping table recording applied migrations.
const MIGRATION_SCHEMA: &str = "
    DEFINE TABLE OVERWRITE migration SCHEMAFULL;
    DEFINE FIELD OVERWRITE key ON migration TYPE string;
    DEFINE FIELD OVERWRITE version ON migration TYPE string;
    DEFINE FIELD OVERWRITE applied_at ON migration TYPE datetime;
";

const MIGRATIONS: &[Migration] =
    &[Migration { key: "accounts", version: "0001", script: ACCOUNT_SCHEMA }];

#[derive(Debug, SurrealValue)]
pub(crate) struct AppliedMigration {
    pub key: String,
    pub version: String,
}

#[derive(Debug, Default)]
pub(crate) struct MigrationReport {
    pub applied: Vec<AppliedMigration>,
    pub skipped: Vec<AppliedMigration>,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner {
    db: Surreal<Any>,
}

impl MigrationRunner {
    #[must_use]
    pub(crate) const fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        self.bootstrap().await?;

        let mut report = MigrationReport::default();
        let applied = self.applied_versions().await?;

        for migration in MIGRATIONS {
            let marker = format!("{}:{}", migration.key, migration.version);
            if applied.contains(&marker) {
                report.skipped.push(AppliedMigration {
                    key: migration.key.to_owned(),
                    version: migration.version.to_owned(),
                });
                continue;
            }

            self.apply(migration).await?;
            report.applied.push(AppliedMigration {
                key: migration.key.to_owned(),
                version: migration.version.to_owned(),
            });
        }

        Ok(report)
    }

    async fn bootstrap(&self) -> Result<(), DatabaseError> {
        self.db
            .query(MIGRATION_SCHEMA)
            .await?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(|e| DatabaseError::Migration {
                message: format!("Bootstrapping migration table: {e}").into(),
            })?;
        Ok(())
    }

    async fn applied_versions(&self) -> Result<Vec<String>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT key, version FROM migration")
            .await?
            .take::<Vec<AppliedMigration>>(0)?;

        Ok(entries.into_iter().map(|e| format!("{}:{}", e.key, e.version)).collect())
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ key: $key, version: $version, applied_at: time::now() }};
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("key", migration.key))
            .bind(("version", migration.version))
            .await?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(|e| DatabaseError::Migration {
                message: format!("SQL execution failed at {}:{}: {e}", migration.key, migration.version)
                    .into(),
            })?;

        Ok(())
    }
}
