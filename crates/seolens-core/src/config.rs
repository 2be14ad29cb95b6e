use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup, no `set_var`/`remove_var` needed.
///
/// Every variable has a default; a single-file SQLite database and a
/// three-audit admission cap match the original deployment footprint.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = or_default("DATABASE_URL", "sqlite://seolens.db?mode=rwc");
    let env = parse_environment(&or_default("SEOLENS_ENV", "development"));

    let bind_addr = parse_addr("SEOLENS_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("SEOLENS_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("SEOLENS_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("SEOLENS_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SEOLENS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let max_concurrent_audits = parse_usize("SEOLENS_MAX_CONCURRENT_AUDITS", "3")?;
    let page_timeout_secs = parse_u64("SEOLENS_PAGE_TIMEOUT_SECS", "30")?;
    let probe_timeout_secs = parse_u64("SEOLENS_PROBE_TIMEOUT_SECS", "10")?;
    let link_check_limit = parse_usize("SEOLENS_LINK_CHECK_LIMIT", "20")?;
    let search_base_url = or_default(
        "SEOLENS_SEARCH_BASE_URL",
        "https://www.google.com/search",
    );
    let user_agent = or_default("SEOLENS_USER_AGENT", "seolens/0.1 (site-audit)");
    let report_ttl_days = parse_i64("SEOLENS_REPORT_TTL_DAYS", "3")?;
    let lead_webhook_url = lookup("SEOLENS_LEAD_WEBHOOK_URL").ok();

    let rate_limit_max = parse_usize("SEOLENS_RATE_LIMIT_MAX", "60")?;
    let rate_limit_window_secs = parse_u64("SEOLENS_RATE_LIMIT_WINDOW_SECS", "60")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        max_concurrent_audits,
        page_timeout_secs,
        probe_timeout_secs,
        link_check_limit,
        search_base_url,
        user_agent,
        report_ttl_days,
        lead_webhook_url,
        rate_limit_max,
        rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_development() {
        assert_eq!(parse_environment("development"), Environment::Development);
    }

    #[test]
    fn parse_environment_test() {
        assert_eq!(parse_environment("test"), Environment::Test);
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.database_url, "sqlite://seolens.db?mode=rwc");
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.db_max_connections, 5);
        assert_eq!(cfg.db_min_connections, 1);
        assert_eq!(cfg.db_acquire_timeout_secs, 10);
        assert_eq!(cfg.max_concurrent_audits, 3);
        assert_eq!(cfg.page_timeout_secs, 30);
        assert_eq!(cfg.probe_timeout_secs, 10);
        assert_eq!(cfg.link_check_limit, 20);
        assert_eq!(cfg.search_base_url, "https://www.google.com/search");
        assert_eq!(cfg.user_agent, "seolens/0.1 (site-audit)");
        assert_eq!(cfg.report_ttl_days, 3);
        assert!(cfg.lead_webhook_url.is_none());
        assert_eq!(cfg.rate_limit_max, 60);
        assert_eq!(cfg.rate_limit_window_secs, 60);
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("SEOLENS_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SEOLENS_BIND_ADDR"),
            "expected InvalidEnvVar(SEOLENS_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_max_concurrent_audits() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("SEOLENS_MAX_CONCURRENT_AUDITS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SEOLENS_MAX_CONCURRENT_AUDITS"),
            "expected InvalidEnvVar(SEOLENS_MAX_CONCURRENT_AUDITS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_report_ttl() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("SEOLENS_REPORT_TTL_DAYS", "three");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SEOLENS_REPORT_TTL_DAYS"),
            "expected InvalidEnvVar(SEOLENS_REPORT_TTL_DAYS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_overrides_audit_settings() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("SEOLENS_MAX_CONCURRENT_AUDITS", "8");
        map.insert("SEOLENS_PAGE_TIMEOUT_SECS", "45");
        map.insert("SEOLENS_LINK_CHECK_LIMIT", "10");
        map.insert("SEOLENS_SEARCH_BASE_URL", "http://127.0.0.1:9999/search");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.max_concurrent_audits, 8);
        assert_eq!(cfg.page_timeout_secs, 45);
        assert_eq!(cfg.link_check_limit, 10);
        assert_eq!(cfg.search_base_url, "http://127.0.0.1:9999/search");
    }

    #[test]
    fn build_app_config_reads_lead_webhook_url() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("SEOLENS_LEAD_WEBHOOK_URL", "https://hooks.example.com/abc");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.lead_webhook_url.as_deref(),
            Some("https://hooks.example.com/abc")
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("DATABASE_URL", "sqlite:///var/lib/seolens/prod.db");
        map.insert("SEOLENS_LEAD_WEBHOOK_URL", "https://hooks.example.com/secret-token");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("prod.db"), "database url leaked: {debug}");
        assert!(!debug.contains("secret-token"), "webhook url leaked: {debug}");
    }
}
