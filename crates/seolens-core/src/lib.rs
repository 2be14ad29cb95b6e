//! Shared domain types and configuration for the seolens workspace.
//!
//! The audit pipeline (`seolens-audit`) produces an [`AuditRecord`]; the
//! scoring engine (`seolens-scoring`) consumes it and produces a
//! [`ScoreResult`]. Both types live here because every other crate (db,
//! server, cli) exchanges them.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod record;
pub mod score;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use record::{
    AuditRecord, BrokenLinkSample, BrokenLinks, CompetitiveSignals, CompetitorEntry,
    HeadingStructure, ImageSignals, LinkProfile, LinkStatus, OnPageSignals, PerformanceSignals,
    SchemaMarkup, TechnicalSignals, UrlStructure,
};
pub use score::{CategoryScore, Grade, Priority, Recommendation, ScoreResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
