use std::env;
use std::str::FromStr;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Backend base URL used outside production.
pub const DEFAULT_LOCAL_API_URL: &str = "http://localhost:8000/api";
/// Backend base URL used when `APP_ENV=production`.
pub const DEFAULT_PRODUCTION_API_URL: &str = "https://api.hr-console.example/api";
/// Fallback session secret. Only used when `SESSION_SECRET` is missing.
pub const INSECURE_FALLBACK_SECRET: &str = "hr-console-insecure-default-secret";

/// The console's configuration.
#[derive(Clone)]
pub struct Config {
    /// The base URL of the REST backend.
    pub api_base_url: String,
    /// The passphrase the session cipher key is derived from.
    pub session_secret: Zeroizing<String>,
    /// Sliding session timeout in hours.
    pub session_timeout_hours: i64,
    /// Quiet period before a search-triggered refetch fires.
    pub search_debounce_ms: u64,
    /// Rows per table page.
    pub page_size: usize,
}

impl Config {
    /// Creates a `Config` with the given backend and secret and default tuning.
    pub fn new(api_base_url: impl Into<String>, session_secret: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            session_secret: Zeroizing::new(session_secret.into()),
            session_timeout_hours: 8,
            search_debounce_ms: 500,
            page_size: 5,
        }
    }

    /// Creates a new `Config` from environment variables, loading `.env`
    /// first when present.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let is_production = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string()) == "production";

        let api_base_url = if is_production {
            env::var("API_BASE_URL_PRODUCTION")
                .unwrap_or_else(|_| DEFAULT_PRODUCTION_API_URL.to_string())
        } else {
            env::var("API_BASE_URL_LOCAL")
                .unwrap_or_else(|_| DEFAULT_LOCAL_API_URL.to_string())
        };

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!(
                    "⚠️ SESSION_SECRET not set, falling back to the built-in secret (insecure)"
                );
                INSECURE_FALLBACK_SECRET.to_string()
            }
        };

        Ok(Self {
            api_base_url,
            session_secret: Zeroizing::new(session_secret),
            session_timeout_hours: parse_at_least_one(
                "SESSION_TIMEOUT_HOURS",
                &env::var("SESSION_TIMEOUT_HOURS").unwrap_or_else(|_| "8".to_string()),
            )?,
            search_debounce_ms: env::var("SEARCH_DEBOUNCE_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .context("Invalid SEARCH_DEBOUNCE_MS")?,
            page_size: parse_at_least_one(
                "PAGE_SIZE",
                &env::var("PAGE_SIZE").unwrap_or_else(|_| "5".to_string()),
            )?,
        })
    }

    /// The session timeout in milliseconds, saturating at `i64::MAX`.
    pub fn session_timeout_ms(&self) -> i64 {
        self.session_timeout_hours
            .checked_mul(60 * 60 * 1000)
            .unwrap_or(i64::MAX)
    }
}

/// Parses a numeric setting that must be 1 or more.
fn parse_at_least_one<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr + PartialOrd + From<u8>,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: T = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid {}", name))?;

    if value < T::from(1) {
        anyhow::bail!("{} must be at least 1", name);
    }

    Ok(value)
}
