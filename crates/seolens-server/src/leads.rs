//! Lead-capture webhook delivery.
//!
//! Audit submissions double as lead capture. When a webhook URL is
//! configured, each submission is forwarded to it. Delivery is
//! fire-and-forget: failures only log and never touch the audit flow.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use seolens_core::AppConfig;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Contact details captured with an audit submission.
#[derive(Debug, Clone)]
pub struct Lead {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub website: String,
    pub report_type: String,
}

#[derive(Debug, Serialize)]
struct LeadPayload<'a> {
    email: &'a str,
    first_name: Option<&'a str>,
    last_name: Option<&'a str>,
    website: &'a str,
    report_type: &'a str,
    source: &'static str,
    timestamp: DateTime<Utc>,
}

/// Forward one lead to the configured webhook, if any.
pub async fn send_lead_webhook(config: Arc<AppConfig>, lead: Lead) {
    let Some(webhook_url) = config.lead_webhook_url.as_deref() else {
        return;
    };
    deliver_lead(webhook_url, &lead).await;
}

async fn deliver_lead(webhook_url: &str, lead: &Lead) {
    let client = match reqwest::Client::builder().timeout(WEBHOOK_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "lead webhook client failed to build");
            return;
        }
    };

    let payload = LeadPayload {
        email: &lead.email,
        first_name: lead.first_name.as_deref(),
        last_name: lead.last_name.as_deref(),
        website: &lead.website,
        report_type: &lead.report_type,
        source: "seo-audit-tool",
        timestamp: Utc::now(),
    };

    match client.post(webhook_url).json(&payload).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::debug!(email = %lead.email, "lead webhook delivered");
        }
        Ok(response) => {
            tracing::warn!(status = %response.status(), "lead webhook rejected the payload");
        }
        Err(e) => {
            tracing::warn!(error = %e, "lead webhook delivery failed");
        }
    }
}
