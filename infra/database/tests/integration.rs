use cpark_database::*;

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://");

    // Health should be OK for mem://
    db.health().await.expect("health check");
    db.use_ns("test_ns").use_db("test_db").await.expect("session switch");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn account_email_index_rejects_duplicates() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "unique_db")
        .init()
        .await
        .expect("connect to mem://");

    let insert = "CREATE account CONTENT {
        email: $email, password_hash: 'x', name: 'Test User', role: 'student',
        contact_id: '00-0000-0000', department: NONE, email_verified: false,
        verification_token: 'tok', is_active: true, created_at: time::now()
    }";

    db.query(insert)
        .bind(("email", "dup@example.com"))
        .await
        .expect("first insert transport")
        .check()
        .expect("first insert succeeds");

    let err = db
        .query(insert)
        .bind(("email", "dup@example.com"))
        .await
        .expect("second insert transport")
        .check()
        .map(|_| ())
        .map_err(surrealdb::Error::from)
        .expect_err("second insert must violate the unique index");

    assert!(is_index_conflict(&err), "unexpected error shape: {err}");
}

#[tokio::test]
async fn init_records_applied_migrations() {
    use surrealdb::types::SurrealValue;

    #[derive(Debug, SurrealValue)]
    struct AppliedRow {
        key: String,
        version: String,
    }

    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "migrate_db")
        .init()
        .await
        .expect("init");

    let applied = db
        .query("SELECT key, version FROM migration")
        .await
        .expect("query migrations")
        .take::<Vec<AppliedRow>>(0)
        .expect("take migrations");

    assert!(
        applied.iter().any(|row| row.key == "accounts" && row.version == "0001"),
        "accounts schema migration should be recorded, got {applied:?}"
    );
}
