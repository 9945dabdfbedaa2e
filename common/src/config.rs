//! Environment variable parsing helpers
//!
//! Reads tool configuration from the process environment, after an optional
//! `.env` file has been merged in.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Once;
use tracing::debug;

/// Extension trait for parsing environment variables.
///
/// Provides convenient methods for reading env vars with defaults, required values,
/// and type parsing.
pub trait ConfigExt {
    /// Get an environment variable with a default value.
    ///
    /// # Example
    /// ```ignore
    /// let dir = String::env_or("SUPABASE_SQL_DIR", "sql");
    /// ```
    fn env_or(name: &str, default: &str) -> String {
        env::var(name).unwrap_or_else(|_| default.to_string())
    }

    /// Get an environment variable, treating unset and blank values alike.
    fn env_opt(name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get an environment variable as a boolean.
    ///
    /// Accepts `true`/`1`/`yes` (case-insensitive), otherwise `default`.
    fn env_bool(name: &str, default: bool) -> bool {
        env::var(name)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(default)
    }

    /// Get an environment variable parsed as a specific type.
    ///
    /// Returns `default` if the variable is not set or fails to parse.
    fn env_parse<T: FromStr>(name: &str, default: T) -> T {
        env::var(name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a path from the environment, falling back to `default`.
    fn env_path(name: &str, default: impl Into<PathBuf>) -> PathBuf {
        Self::env_opt(name)
            .map(PathBuf::from)
            .unwrap_or_else(|| default.into())
    }
}

// Blanket implementation for all types
impl<T> ConfigExt for T {}

static DOTENV: Once = Once::new();

/// Merge a `.env` file from the working directory into the environment.
///
/// Variables already present in the environment win. Safe to call repeatedly.
pub fn load_dotenv() {
    DOTENV.call_once(|| match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => debug!(error = %e, "Ignoring unreadable .env file"),
    });
}

/// Supabase-specific environment helpers.
///
/// Missing values come back empty; nothing here validates them.
pub struct SupabaseEnv;

impl SupabaseEnv {
    pub const URL: &'static str = "SUPABASE_URL";
    pub const ANON_KEY: &'static str = "SUPABASE_ANON_KEY";
    pub const SERVICE_KEY: &'static str = "SUPABASE_SERVICE_KEY";

    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub fn url() -> String {
        env::var(Self::URL).unwrap_or_default()
    }

    /// Anonymous (public) API key.
    pub fn anon_key() -> String {
        env::var(Self::ANON_KEY).unwrap_or_default()
    }

    /// Service role API key.
    pub fn service_key() -> String {
        env::var(Self::SERVICE_KEY).unwrap_or_default()
    }
}
