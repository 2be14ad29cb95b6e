//! Page audit pipeline for Seolens.
//!
//! Loads a target page over plain HTTP, reads technical, on-page and
//! performance signals from its markup and fetch timing, detects a primary
//! keyword, and compares the page against search results for that keyword.
//! Produces the [`AuditRecord`](seolens_core::record::AuditRecord) consumed
//! by the scoring engine.

pub mod error;
pub mod pipeline;
pub mod session;
pub mod urls;

mod keyword;
mod onpage;
mod performance;
mod serp;
mod technical;

pub use error::AuditError;
pub use pipeline::run_audit;
pub use session::{AuditConfig, AuditSession, FetchedPage, PageTiming, ProbeOutcome};
