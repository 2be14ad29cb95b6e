//! Database operations for the `audit_events` table.
//!
//! Events form an append-only trail of what happened to a report, keyed by
//! the report's public id so the API can serve them without a join.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `audit_events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditEventRow {
    pub id: i64,
    pub report_public_id: String,
    pub event_type: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Appends one event to a report's trail.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including when the
/// report does not exist (foreign key violation).
pub async fn insert_audit_event(
    pool: &SqlitePool,
    report_public_id: &str,
    event_type: &str,
    message: Option<&str>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO audit_events (report_public_id, event_type, message, created_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(report_public_id)
    .bind(event_type)
    .bind(message)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Lists a report's events oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_audit_events(
    pool: &SqlitePool,
    report_public_id: &str,
) -> Result<Vec<AuditEventRow>, DbError> {
    let rows = sqlx::query_as::<_, AuditEventRow>(
        "SELECT id, report_public_id, event_type, message, created_at \
         FROM audit_events WHERE report_public_id = ? ORDER BY id",
    )
    .bind(report_public_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
