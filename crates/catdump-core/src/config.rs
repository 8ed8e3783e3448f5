use crate::app_config::{AppConfig, BackoffKind};
use crate::{ConfigError, DEFAULT_USER_AGENT};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so a missing variable is never an error; an
/// unparsable one is.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    // Unset or empty means "not configured".
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let products_url = or_default(
        "CATDUMP_PRODUCTS_URL",
        "https://5ka.ru/api/v2/special_offers/",
    );
    let categories_url = or_default(
        "CATDUMP_CATEGORIES_URL",
        "https://5ka.ru/api/v2/categories/",
    );
    let output_dir = PathBuf::from(or_default("CATDUMP_OUTPUT_DIR", "categories"));
    let log_level = or_default("CATDUMP_LOG_LEVEL", "info");
    let user_agent = or_default("CATDUMP_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = optional("CATDUMP_REQUEST_TIMEOUT_SECS")
        .map(|raw| parse_num::<u64>("CATDUMP_REQUEST_TIMEOUT_SECS", &raw))
        .transpose()?;

    // 0 is accepted as an explicit spelling of "unbounded".
    let retry_max_attempts = optional("CATDUMP_RETRY_MAX_ATTEMPTS")
        .map(|raw| parse_num::<u32>("CATDUMP_RETRY_MAX_ATTEMPTS", &raw))
        .transpose()?
        .filter(|n| *n > 0);

    let retry_delay_ms = parse_num(
        "CATDUMP_RETRY_DELAY_MS",
        &or_default("CATDUMP_RETRY_DELAY_MS", "500"),
    )?;
    let retry_backoff = parse_backoff(&or_default("CATDUMP_RETRY_BACKOFF", "fixed"))
        .ok_or_else(|| {
            invalid(
                "CATDUMP_RETRY_BACKOFF",
                "expected \"fixed\" or \"exponential\"".to_string(),
            )
        })?;
    let retry_max_delay_ms = parse_num(
        "CATDUMP_RETRY_MAX_DELAY_MS",
        &or_default("CATDUMP_RETRY_MAX_DELAY_MS", "60000"),
    )?;

    let records_per_page: u32 = parse_num(
        "CATDUMP_RECORDS_PER_PAGE",
        &or_default("CATDUMP_RECORDS_PER_PAGE", "20"),
    )?;
    if records_per_page == 0 {
        return Err(invalid(
            "CATDUMP_RECORDS_PER_PAGE",
            "must be greater than zero".to_string(),
        ));
    }

    let max_pages: usize = parse_num(
        "CATDUMP_MAX_PAGES",
        &or_default("CATDUMP_MAX_PAGES", "10000"),
    )?;
    if max_pages == 0 {
        return Err(invalid(
            "CATDUMP_MAX_PAGES",
            "must be greater than zero".to_string(),
        ));
    }

    let max_concurrent_categories: usize = parse_num(
        "CATDUMP_MAX_CONCURRENT_CATEGORIES",
        &or_default("CATDUMP_MAX_CONCURRENT_CATEGORIES", "1"),
    )?;

    Ok(AppConfig {
        products_url,
        categories_url,
        output_dir,
        log_level,
        user_agent,
        request_timeout_secs,
        retry_max_attempts,
        retry_delay_ms,
        retry_backoff,
        retry_max_delay_ms,
        records_per_page,
        max_pages,
        max_concurrent_categories: max_concurrent_categories.max(1),
    })
}

fn parse_num<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a backoff name, case-insensitively.
fn parse_backoff(s: &str) -> Option<BackoffKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "fixed" => Some(BackoffKind::Fixed),
        "exponential" => Some(BackoffKind::Exponential),
        _ => None,
    }
}
