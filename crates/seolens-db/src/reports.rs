//! Database operations for the `reports` table.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::DbError;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_PROCESSING: &str = "processing";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `reports` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub id: i64,
    /// Hyphenated UUID; the identifier clients see.
    pub public_id: String,
    pub url: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub report_type: String,
    pub status: String,
    /// Serialized audit record, set on completion.
    pub audit_json: Option<String>,
    /// Serialized score result, set on completion.
    pub score_json: Option<String>,
    pub total_score: Option<i64>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

impl ReportRow {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Caller-supplied fields for a new report.
#[derive(Debug, Clone, Copy)]
pub struct NewReport<'a> {
    pub url: &'a str,
    pub email: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    /// Defaults to `"free"` when not supplied.
    pub report_type: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// reports operations
// ---------------------------------------------------------------------------

/// Creates a new report in `pending` status with an expiry `ttl_days` from
/// now.
///
/// Generates a UUID in Rust and binds it to `public_id`. Returns the full
/// newly-created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert or fetch fails.
pub async fn create_report(
    pool: &SqlitePool,
    new: &NewReport<'_>,
    ttl_days: i64,
) -> Result<ReportRow, DbError> {
    let public_id = Uuid::new_v4().to_string();
    let created_at = Utc::now();
    let expires_at = created_at + Duration::days(ttl_days);

    let row = sqlx::query_as::<_, ReportRow>(
        "INSERT INTO reports (public_id, url, email, first_name, last_name, report_type, \
                              status, created_at, expires_at) \
         VALUES (?, ?, ?, ?, ?, ?, 'pending', ?, ?) \
         RETURNING id, public_id, url, email, first_name, last_name, report_type, \
                   status, audit_json, score_json, total_score, error_message, \
                   created_at, completed_at, expires_at",
    )
    .bind(&public_id)
    .bind(new.url)
    .bind(new.email)
    .bind(new.first_name)
    .bind(new.last_name)
    .bind(new.report_type.unwrap_or("free"))
    .bind(created_at)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a report as `processing`.
///
/// # Errors
///
/// Returns [`DbError::InvalidReportTransition`] if the report is not in
/// `pending` status, or [`DbError::Sqlx`] if the update fails.
pub async fn start_report(pool: &SqlitePool, public_id: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE reports SET status = 'processing' \
         WHERE public_id = ? AND status = 'pending'",
    )
    .bind(public_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidReportTransition {
            public_id: public_id.to_string(),
            expected_status: STATUS_PENDING,
        });
    }

    Ok(())
}

/// Marks a report as `completed` and stores the serialized audit record,
/// score result, and total score.
///
/// # Errors
///
/// Returns [`DbError::InvalidReportTransition`] if the report is not in
/// `processing` status, or [`DbError::Sqlx`] if the update fails.
pub async fn complete_report(
    pool: &SqlitePool,
    public_id: &str,
    audit_json: &str,
    score_json: &str,
    total_score: i64,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE reports \
         SET status = 'completed', audit_json = ?, score_json = ?, total_score = ?, \
             completed_at = ? \
         WHERE public_id = ? AND status = 'processing'",
    )
    .bind(audit_json)
    .bind(score_json)
    .bind(total_score)
    .bind(Utc::now())
    .bind(public_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidReportTransition {
            public_id: public_id.to_string(),
            expected_status: STATUS_PROCESSING,
        });
    }

    Ok(())
}

/// Marks a report as `failed` with an error message.
///
/// # Errors
///
/// Returns [`DbError::InvalidReportTransition`] if the report is not in
/// `processing` status, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_report(
    pool: &SqlitePool,
    public_id: &str,
    error_message: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE reports \
         SET status = 'failed', error_message = ?, completed_at = ? \
         WHERE public_id = ? AND status = 'processing'",
    )
    .bind(error_message)
    .bind(Utc::now())
    .bind(public_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidReportTransition {
            public_id: public_id.to_string(),
            expected_status: STATUS_PROCESSING,
        });
    }

    Ok(())
}

/// Fetches a report by its public id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no such report exists, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_report(pool: &SqlitePool, public_id: &str) -> Result<ReportRow, DbError> {
    sqlx::query_as::<_, ReportRow>(
        "SELECT id, public_id, url, email, first_name, last_name, report_type, \
                status, audit_json, score_json, total_score, error_message, \
                created_at, completed_at, expires_at \
         FROM reports WHERE public_id = ?",
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Deletes every report whose expiry has passed. Associated audit events
/// go with them via the foreign-key cascade.
///
/// Returns the number of reports deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_expired_reports(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM reports WHERE expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
