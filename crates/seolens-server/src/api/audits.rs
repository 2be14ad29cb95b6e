//! Audit submission and report retrieval handlers.
//!
//! - `POST /api/v1/audits`: submit a page for auditing
//! - `GET  /api/v1/audits/{id}`: poll processing status
//! - `GET  /api/v1/audits/{id}/report`: full record + score once completed
//! - `GET  /api/v1/audits/{id}/events`: processing event trail

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::sync::Semaphore;

use seolens_audit::AuditConfig;
use seolens_core::{AppConfig, AuditRecord, ScoreResult};
use seolens_db::{NewReport, ReportRow, STATUS_COMPLETED, STATUS_FAILED};

use crate::leads;
use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Request and response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct SubmitAuditRequest {
    pub url: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub report_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SubmitAuditResponse {
    report_id: String,
    status: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AuditStatusItem {
    report_id: String,
    status: String,
    total_score: Option<i64>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(super) struct AuditReportResponse {
    report_id: String,
    url: String,
    record: AuditRecord,
    score: ScoreResult,
    completed_at: Option<DateTime<Utc>>,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct AuditEventItem {
    event_type: String,
    message: Option<String>,
    created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_url(req_id: &str, raw: &str) -> Result<(), ApiError> {
    match seolens_audit::urls::normalize_audit_url(raw) {
        Ok(_) => Ok(()),
        Err(e) => Err(ApiError::new(req_id, "validation_error", e.to_string())),
    }
}

fn validate_email(req_id: &str, email: &str) -> Result<(), ApiError> {
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if well_formed {
        Ok(())
    } else {
        Err(ApiError::new(
            req_id,
            "validation_error",
            format!("'{email}' is not a valid email address"),
        ))
    }
}

/// Fetch a report by public id, turning an unknown id into a 404.
async fn resolve_report(
    pool: &SqlitePool,
    public_id: &str,
    request_id: &str,
) -> Result<ReportRow, ApiError> {
    seolens_db::get_report(pool, public_id)
        .await
        .map_err(|e| match e {
            seolens_db::DbError::NotFound => ApiError::new(
                request_id,
                "not_found",
                format!("report '{public_id}' not found"),
            ),
            other => map_db_error(request_id.to_owned(), &other),
        })
}

fn parse_stored_json<T: serde::de::DeserializeOwned>(
    req_id: &str,
    report_id: &str,
    json: &str,
) -> Result<T, ApiError> {
    serde_json::from_str(json).map_err(|e| {
        tracing::error!(report = %report_id, error = %e, "stored report payload failed to parse");
        ApiError::new(req_id, "internal_error", "stored report payload is corrupt")
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/audits: accept a page for auditing.
///
/// Creates the report in `pending`, detaches the processing task, and
/// fires the lead webhook. Returns 202 immediately; clients poll.
pub(super) async fn submit_audit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SubmitAuditRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitAuditResponse>>), ApiError> {
    let rid = &req_id.0;

    let url = body.url.trim();
    let email = body.email.trim();
    validate_url(rid, url)?;
    validate_email(rid, email)?;

    let new = NewReport {
        url,
        email,
        first_name: body.first_name.as_deref(),
        last_name: body.last_name.as_deref(),
        report_type: body.report_type.as_deref(),
    };
    let row = seolens_db::create_report(&state.pool, &new, state.config.report_ttl_days)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    record_event(&state.pool, &row.public_id, "submitted", None).await;
    tracing::info!(report = %row.public_id, url = %row.url, "audit submitted");

    tokio::spawn(process_audit(
        state.pool.clone(),
        Arc::clone(&state.config),
        Arc::clone(&state.audit_limiter),
        row.public_id.clone(),
        row.url.clone(),
    ));
    tokio::spawn(leads::send_lead_webhook(
        Arc::clone(&state.config),
        leads::Lead {
            email: row.email.clone(),
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            website: row.url.clone(),
            report_type: row.report_type.clone(),
        },
    ));

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: SubmitAuditResponse {
                report_id: row.public_id,
                status: row.status,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/audits/:id: processing status for polling clients.
pub(super) async fn get_audit_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(report_id): Path<String>,
) -> Result<Json<ApiResponse<AuditStatusItem>>, ApiError> {
    let row = resolve_report(&state.pool, &report_id, &req_id.0).await?;

    Ok(Json(ApiResponse {
        data: AuditStatusItem {
            report_id: row.public_id,
            status: row.status,
            total_score: row.total_score,
            error_message: row.error_message,
            created_at: row.created_at,
            completed_at: row.completed_at,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/audits/:id/report: the stored record and score.
///
/// Expired reports are gone even if cleanup has not swept them yet.
pub(super) async fn get_audit_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(report_id): Path<String>,
) -> Result<Json<ApiResponse<AuditReportResponse>>, ApiError> {
    let rid = &req_id.0;
    let row = resolve_report(&state.pool, &report_id, rid).await?;

    if row.is_expired(Utc::now()) {
        return Err(ApiError::new(
            rid,
            "gone",
            format!("report '{report_id}' has expired"),
        ));
    }

    match row.status.as_str() {
        STATUS_COMPLETED => {}
        STATUS_FAILED => {
            let reason = row
                .error_message
                .clone()
                .unwrap_or_else(|| "audit failed".to_string());
            return Err(ApiError::new(
                rid,
                "conflict",
                format!("report '{report_id}' failed: {reason}"),
            ));
        }
        other => {
            return Err(ApiError::new(
                rid,
                "conflict",
                format!("report '{report_id}' is not completed yet (status: {other})"),
            ));
        }
    }

    let (Some(audit_json), Some(score_json)) =
        (row.audit_json.as_deref(), row.score_json.as_deref())
    else {
        tracing::error!(report = %report_id, "completed report is missing stored results");
        return Err(ApiError::new(
            rid,
            "internal_error",
            "stored report payload is missing",
        ));
    };
    let record: AuditRecord = parse_stored_json(rid, &report_id, audit_json)?;
    let score: ScoreResult = parse_stored_json(rid, &report_id, score_json)?;

    Ok(Json(ApiResponse {
        data: AuditReportResponse {
            report_id: row.public_id,
            url: row.url,
            record,
            score,
            completed_at: row.completed_at,
            expires_at: row.expires_at,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/audits/:id/events: the report's processing trail.
pub(super) async fn list_audit_events(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(report_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<AuditEventItem>>>, ApiError> {
    let rid = &req_id.0;
    resolve_report(&state.pool, &report_id, rid).await?;

    let rows = seolens_db::list_audit_events(&state.pool, &report_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| AuditEventItem {
            event_type: row.event_type,
            message: row.message,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

// ---------------------------------------------------------------------------
// Background processing
// ---------------------------------------------------------------------------

/// Drives one report from `pending` to `completed` or `failed`.
///
/// Runs detached from the submitting request. The semaphore bounds how many
/// audits are in flight at once; reports past the cap sit in `pending` until
/// a permit frees up. Every failure path logs and returns; nothing here can
/// take the server down.
pub(super) async fn process_audit(
    pool: SqlitePool,
    config: Arc<AppConfig>,
    limiter: Arc<Semaphore>,
    public_id: String,
    url: String,
) {
    let Ok(_permit) = limiter.acquire_owned().await else {
        // Closed only at shutdown; the report stays pending.
        return;
    };

    if let Err(e) = seolens_db::start_report(&pool, &public_id).await {
        tracing::error!(report = %public_id, error = %e, "failed to mark report processing");
        return;
    }
    record_event(&pool, &public_id, "processing", None).await;

    let audit_config = AuditConfig::from_app(&config);
    let record = match seolens_audit::run_audit(&audit_config, &url).await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(report = %public_id, url = %url, error = %e, "audit failed");
            let message = e.to_string();
            mark_failed(&pool, &public_id, &message).await;
            return;
        }
    };
    record_event(&pool, &public_id, "data_collected", None).await;

    let score = seolens_scoring::calculate_score(&record);
    let score_note = format!("total score {}", score.total_score);
    record_event(&pool, &public_id, "scored", Some(&score_note)).await;

    let (audit_json, score_json) =
        match (serde_json::to_string(&record), serde_json::to_string(&score)) {
            (Ok(a), Ok(s)) => (a, s),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(report = %public_id, error = %e, "failed to serialize audit result");
                mark_failed(&pool, &public_id, "internal serialization error").await;
                return;
            }
        };

    if let Err(e) = seolens_db::complete_report(
        &pool,
        &public_id,
        &audit_json,
        &score_json,
        i64::from(score.total_score),
    )
    .await
    {
        tracing::error!(report = %public_id, error = %e, "failed to mark report completed");
        return;
    }
    record_event(&pool, &public_id, "completed", None).await;
    tracing::info!(
        report = %public_id,
        url = %url,
        score = score.total_score,
        "audit report completed"
    );
}

/// Move the report to `failed` and record the event, logging db trouble.
async fn mark_failed(pool: &SqlitePool, public_id: &str, message: &str) {
    if let Err(e) = seolens_db::fail_report(pool, public_id, message).await {
        tracing::error!(report = %public_id, error = %e, "failed to mark report failed");
    }
    record_event(pool, public_id, "failed", Some(message)).await;
}

/// Append an event to the report's trail, logging instead of failing.
async fn record_event(pool: &SqlitePool, public_id: &str, event_type: &str, message: Option<&str>) {
    if let Err(e) = seolens_db::insert_audit_event(pool, public_id, event_type, message).await {
        tracing::warn!(report = %public_id, event_type, error = %e, "failed to record audit event");
    }
}
