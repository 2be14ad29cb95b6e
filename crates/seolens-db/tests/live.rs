//! Live integration tests for seolens-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated `SQLite` database created by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/seolens-db/`), so `"../../migrations"` resolves to the
//! workspace migration directory.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use seolens_db::{
    complete_report, create_report, delete_expired_reports, fail_report, get_report,
    insert_audit_event, list_audit_events, start_report, DbError, NewReport, STATUS_COMPLETED,
    STATUS_FAILED, STATUS_PENDING, STATUS_PROCESSING,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_report() -> NewReport<'static> {
    NewReport {
        url: "https://example.com/widgets",
        email: "lead@example.com",
        first_name: Some("Ada"),
        last_name: Some("Lovelace"),
        report_type: None,
    }
}

// ---------------------------------------------------------------------------
// Creation and lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn create_report_starts_pending_with_future_expiry(pool: SqlitePool) {
    let row = create_report(&pool, &sample_report(), 3)
        .await
        .expect("create should succeed");

    assert_eq!(row.status, STATUS_PENDING);
    assert_eq!(row.report_type, "free");
    assert_eq!(row.url, "https://example.com/widgets");
    assert_eq!(row.email, "lead@example.com");
    assert_eq!(row.first_name.as_deref(), Some("Ada"));
    assert!(row.audit_json.is_none());
    assert!(row.total_score.is_none());
    assert_eq!(row.expires_at - row.created_at, Duration::days(3));

    let fetched = get_report(&pool, &row.public_id)
        .await
        .expect("fetch should succeed");
    assert_eq!(fetched.id, row.id);
    assert_eq!(fetched.public_id, row.public_id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_report_unknown_id_is_not_found(pool: SqlitePool) {
    let result = get_report(&pool, "no-such-report").await;

    assert!(
        matches!(result, Err(DbError::NotFound)),
        "expected NotFound, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Status lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn full_lifecycle_pending_processing_completed(pool: SqlitePool) {
    let row = create_report(&pool, &sample_report(), 3)
        .await
        .expect("create should succeed");

    start_report(&pool, &row.public_id)
        .await
        .expect("start should succeed");
    let processing = get_report(&pool, &row.public_id).await.expect("fetch");
    assert_eq!(processing.status, STATUS_PROCESSING);

    complete_report(
        &pool,
        &row.public_id,
        r#"{"url":"https://example.com/widgets"}"#,
        r#"{"total_score":87}"#,
        87,
    )
    .await
    .expect("complete should succeed");

    let completed = get_report(&pool, &row.public_id).await.expect("fetch");
    assert_eq!(completed.status, STATUS_COMPLETED);
    assert_eq!(completed.total_score, Some(87));
    assert!(completed.completed_at.is_some());
    assert!(completed
        .audit_json
        .as_deref()
        .is_some_and(|json| json.contains("example.com")));
    assert!(completed.score_json.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_audits_record_the_error_message(pool: SqlitePool) {
    let row = create_report(&pool, &sample_report(), 3)
        .await
        .expect("create should succeed");
    start_report(&pool, &row.public_id).await.expect("start");

    fail_report(&pool, &row.public_id, "failed to load https://example.com/widgets")
        .await
        .expect("fail should succeed");

    let failed = get_report(&pool, &row.public_id).await.expect("fetch");
    assert_eq!(failed.status, STATUS_FAILED);
    assert!(failed
        .error_message
        .as_deref()
        .is_some_and(|msg| msg.contains("failed to load")));
    assert!(failed.completed_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn transitions_from_the_wrong_status_are_rejected(pool: SqlitePool) {
    let row = create_report(&pool, &sample_report(), 3)
        .await
        .expect("create should succeed");

    // Completing a report that never started must fail.
    let premature = complete_report(&pool, &row.public_id, "{}", "{}", 50).await;
    assert!(
        matches!(premature, Err(DbError::InvalidReportTransition { .. })),
        "expected InvalidReportTransition, got: {premature:?}"
    );

    start_report(&pool, &row.public_id).await.expect("start");

    // Starting twice must fail.
    let restarted = start_report(&pool, &row.public_id).await;
    assert!(
        matches!(restarted, Err(DbError::InvalidReportTransition { .. })),
        "expected InvalidReportTransition, got: {restarted:?}"
    );
}

// ---------------------------------------------------------------------------
// Audit events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn events_list_in_insertion_order(pool: SqlitePool) {
    let row = create_report(&pool, &sample_report(), 3)
        .await
        .expect("create should succeed");

    insert_audit_event(&pool, &row.public_id, "submitted", None)
        .await
        .expect("insert");
    insert_audit_event(&pool, &row.public_id, "processing", Some("audit started"))
        .await
        .expect("insert");
    insert_audit_event(&pool, &row.public_id, "completed", Some("scored 87"))
        .await
        .expect("insert");

    let events = list_audit_events(&pool, &row.public_id)
        .await
        .expect("list should succeed");

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].event_type, "submitted");
    assert!(events[0].message.is_none());
    assert_eq!(events[1].event_type, "processing");
    assert_eq!(events[2].message.as_deref(), Some("scored 87"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn events_require_an_existing_report(pool: SqlitePool) {
    let result = insert_audit_event(&pool, "no-such-report", "submitted", None).await;

    assert!(
        result.is_err(),
        "expected foreign key violation, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Expiry cleanup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn cleanup_removes_expired_reports_and_their_events(pool: SqlitePool) {
    let keep = create_report(&pool, &sample_report(), 3)
        .await
        .expect("create should succeed");
    let expire = create_report(
        &pool,
        &NewReport {
            url: "https://old.example.com/",
            email: "old@example.com",
            first_name: None,
            last_name: None,
            report_type: None,
        },
        3,
    )
    .await
    .expect("create should succeed");

    insert_audit_event(&pool, &expire.public_id, "submitted", None)
        .await
        .expect("insert");

    // Backdate the second report past its TTL.
    sqlx::query("UPDATE reports SET expires_at = ? WHERE public_id = ?")
        .bind(Utc::now() - Duration::days(1))
        .bind(&expire.public_id)
        .execute(&pool)
        .await
        .expect("backdate");

    let deleted = delete_expired_reports(&pool, Utc::now())
        .await
        .expect("cleanup should succeed");
    assert_eq!(deleted, 1);

    assert!(get_report(&pool, &keep.public_id).await.is_ok());
    assert!(matches!(
        get_report(&pool, &expire.public_id).await,
        Err(DbError::NotFound)
    ));

    let orphaned = list_audit_events(&pool, &expire.public_id)
        .await
        .expect("list should succeed");
    assert!(orphaned.is_empty(), "cascade should remove events");
}
