//! exec_sql function installer
//!
//! The procedure cannot be created through itself, so its definition goes
//! through the generic request path as a single query.

use crate::client::{ClientError, SupabaseClient};
use crate::error::SetupError;
use crate::scripts::read_script;
use common::{EventLog, SetupEvent};
use reqwest::Method;
use serde_json::json;
use std::path::Path;
use std::time::{Duration, Instant};

/// postgres-meta query endpoint, relative to the project URL
pub const DEFAULT_SQL_ENDPOINT: &str = "pg/query";

/// Something that accepts a whole SQL script in one request.
pub trait SqlSubmitter {
    fn submit_sql(&self, sql: &str) -> Result<(), ClientError>;
}

/// A generic SQL endpoint reached through a client handle.
pub struct QueryEndpoint<'a> {
    client: &'a SupabaseClient,
    path: String,
}

impl<'a> QueryEndpoint<'a> {
    pub fn new(client: &'a SupabaseClient, path: &str) -> Self {
        Self {
            client,
            path: path.to_string(),
        }
    }
}

impl SqlSubmitter for QueryEndpoint<'_> {
    fn submit_sql(&self, sql: &str) -> Result<(), ClientError> {
        self.client
            .request(Method::POST, &self.path, Some(&json!({ "query": sql })))
            .map(|_| ())
    }
}

/// Submit the procedure definition once and return how long it took.
pub fn try_setup_exec_function<S>(
    submitter: &S,
    path: &Path,
    events: &EventLog,
) -> Result<Duration, SetupError>
where
    S: SqlSubmitter + ?Sized,
{
    let start = Instant::now();
    let sql = read_script(path)?;
    if sql.trim().is_empty() {
        return Err(SetupError::EmptyScript {
            path: path.to_path_buf(),
        });
    }

    events.emit(SetupEvent::FunctionInstallStarted {
        path: path.display().to_string(),
        bytes: sql.len(),
    });

    submitter.submit_sql(&sql)?;
    Ok(start.elapsed())
}

/// Set up the exec_sql function in Supabase.
///
/// Returns `false` on any error, after logging it.
pub fn setup_exec_function<S>(submitter: &S, path: &Path, events: &EventLog) -> bool
where
    S: SqlSubmitter + ?Sized,
{
    let shown = path.display().to_string();
    match try_setup_exec_function(submitter, path, events) {
        Ok(duration) => {
            events.emit(SetupEvent::FunctionInstalled {
                path: shown,
                duration_ms: duration.as_millis() as u64,
            });
            true
        }
        Err(e) => {
            events.emit(SetupEvent::FunctionInstallFailed {
                path: shown,
                error: e.to_string(),
            });
            false
        }
    }
}
