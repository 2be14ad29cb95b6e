//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring report-cleanup job.

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process; dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: SqlitePool,
    config: Arc<seolens_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_cleanup_job(&scheduler, pool, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the hourly expired-report sweep.
///
/// Runs at the top of every hour (`0 0 * * * *`). Reports past their
/// `expires_at` are deleted; their audit events go with them through the
/// foreign-key cascade.
async fn register_cleanup_job(
    scheduler: &JobScheduler,
    pool: SqlitePool,
    config: Arc<seolens_core::AppConfig>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            run_cleanup_job(&pool, &config).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Delete expired reports and log how many went.
async fn run_cleanup_job(pool: &SqlitePool, config: &seolens_core::AppConfig) {
    match seolens_db::delete_expired_reports(pool, Utc::now()).await {
        Ok(0) => {
            tracing::debug!("cleanup: no expired reports");
        }
        Ok(deleted) => {
            tracing::info!(
                deleted,
                ttl_days = config.report_ttl_days,
                "cleanup: removed expired reports"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "cleanup: failed to delete expired reports");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seolens_db::NewReport;

    #[sqlx::test(migrations = "../../migrations")]
    async fn cleanup_job_removes_only_expired_reports(pool: SqlitePool) {
        let keep = seolens_db::create_report(
            &pool,
            &NewReport {
                url: "https://fresh.example.com/",
                email: "fresh@example.com",
                first_name: None,
                last_name: None,
                report_type: None,
            },
            3,
        )
        .await
        .expect("create fresh report");
        let gone = seolens_db::create_report(
            &pool,
            &NewReport {
                url: "https://old.example.com/",
                email: "old@example.com",
                first_name: None,
                last_name: None,
                report_type: None,
            },
            0,
        )
        .await
        .expect("create expired report");

        let config = seolens_core::load_app_config_from_env().expect("config");
        run_cleanup_job(&pool, &config).await;

        assert!(
            seolens_db::get_report(&pool, &keep.public_id).await.is_ok(),
            "fresh report should survive cleanup"
        );
        let missing = seolens_db::get_report(&pool, &gone.public_id).await;
        assert!(
            matches!(missing, Err(seolens_db::DbError::NotFound)),
            "expected NotFound, got: {missing:?}"
        );
    }
}
