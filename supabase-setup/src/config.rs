//! Setup configuration from environment variables

use crate::client::Credentials;
use crate::function::DEFAULT_SQL_ENDPOINT;
use crate::scripts::{function_sql_path, schema_sql_path};
use crate::sql::SplitMode;
use anyhow::{Context, Result};
use common::{load_dotenv, ConfigExt};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration shared by the setup binaries
#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub credentials: Credentials,
    pub schema_sql: PathBuf,
    pub function_sql: PathBuf,
    pub split_mode: SplitMode,
    /// Path of the generic SQL endpoint, relative to the project URL
    pub sql_endpoint: String,
    /// `None` means requests may block indefinitely.
    pub http_timeout: Option<Duration>,
    /// Exit with status 1 when a run reports failure.
    pub strict_exit: bool,
}

impl SetupConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        load_dotenv();

        let split_mode = match String::env_opt("SUPABASE_SQL_SPLIT") {
            Some(mode) => mode.parse::<SplitMode>().context("Invalid SUPABASE_SQL_SPLIT")?,
            None => SplitMode::default(),
        };

        Ok(Self {
            credentials: Credentials::from_env(),
            schema_sql: schema_sql_path(),
            function_sql: function_sql_path(),
            split_mode,
            sql_endpoint: String::env_or("SUPABASE_SQL_ENDPOINT", DEFAULT_SQL_ENDPOINT),
            http_timeout: match u64::env_parse("SUPABASE_HTTP_TIMEOUT_SECS", 0) {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            strict_exit: bool::env_bool("SUPABASE_SETUP_STRICT_EXIT", false),
        })
    }
}
