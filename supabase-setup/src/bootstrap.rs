//! Database bootstrapper
//!
//! Reads the bootstrap script, splits it into statements and runs each one
//! through the remote `exec_sql` procedure, in order, stopping at the first
//! failure. Statements applied before a failure stay applied.

use crate::client::{ClientError, SupabaseClient};
use crate::error::SetupError;
use crate::scripts::read_script;
use crate::sql::{split_statements, SplitMode};
use chrono::{DateTime, Utc};
use common::{EventLog, SetupEvent};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// Name of the remote procedure that executes one SQL string
pub const EXEC_SQL_FUNCTION: &str = "exec_sql";

/// Something that can run one SQL statement remotely.
pub trait SqlExecutor {
    fn exec_sql(&self, query: &str) -> Result<(), ClientError>;
}

impl SqlExecutor for SupabaseClient {
    fn exec_sql(&self, query: &str) -> Result<(), ClientError> {
        self.rpc(EXEC_SQL_FUNCTION, &json!({ "query": query }))
            .map(|_| ())
    }
}

/// Outcome of a successful bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub path: PathBuf,
    pub mode: SplitMode,
    pub executed: usize,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

/// Run the bootstrap script and report what happened.
///
/// The script is read before anything is sent, so a missing file means no
/// remote calls at all.
pub fn try_setup_database<E>(
    executor: &E,
    path: &Path,
    mode: SplitMode,
    events: &EventLog,
) -> Result<BootstrapReport, SetupError>
where
    E: SqlExecutor + ?Sized,
{
    let started_at = Utc::now();
    let start = Instant::now();

    let sql = read_script(path)?;
    let statements = split_statements(&sql, mode);
    let total = statements.len();

    events.emit(SetupEvent::BootstrapStarted {
        path: path.display().to_string(),
        statements: total,
        mode: mode.to_string(),
    });

    for statement in &statements {
        debug!(ordinal = statement.ordinal, line = statement.line, sql = %statement.sql, "Executing statement");

        executor
            .exec_sql(&statement.sql)
            .map_err(|source| SetupError::Statement {
                ordinal: statement.ordinal,
                line: statement.line,
                source,
            })?;

        events.emit(SetupEvent::StatementExecuted {
            ordinal: statement.ordinal,
            total,
            line: statement.line,
        });
    }

    Ok(BootstrapReport {
        path: path.to_path_buf(),
        mode,
        executed: total,
        started_at,
        duration: start.elapsed(),
    })
}

/// Set up the database tables and initial data.
///
/// Returns `false` on any error, after logging it.
pub fn setup_database<E>(executor: &E, path: &Path, mode: SplitMode, events: &EventLog) -> bool
where
    E: SqlExecutor + ?Sized,
{
    match try_setup_database(executor, path, mode, events) {
        Ok(report) => {
            events.emit(SetupEvent::BootstrapCompleted {
                executed: report.executed,
                duration_ms: report.duration.as_millis() as u64,
            });
            true
        }
        Err(e) => {
            events.emit(SetupEvent::BootstrapFailed {
                error: e.to_string(),
                phase: e.phase().to_string(),
                executed: e.executed_before(),
            });
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{local_client, serve_once, ClientRole};
    use reqwest::StatusCode;
    use std::cell::RefCell;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Records every query and fails on the given call number.
    #[derive(Default)]
    struct RecordingExecutor {
        calls: RefCell<Vec<String>>,
        fail_on: Option<usize>,
    }

    impl SqlExecutor for RecordingExecutor {
        fn exec_sql(&self, query: &str) -> Result<(), ClientError> {
            let mut calls = self.calls.borrow_mut();
            calls.push(query.to_string());
            if Some(calls.len()) == self.fail_on {
                return Err(ClientError::Api {
                    status: StatusCode::BAD_REQUEST,
                    message: "syntax error".to_string(),
                });
            }
            Ok(())
        }
    }

    fn script(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn events() -> EventLog {
        EventLog::new("setup-database-test")
    }

    #[test]
    fn test_one_call_per_statement_in_order() {
        let file = script("create table a (id int);\ncreate table b (id int);\ninsert into a values (1);");
        let executor = RecordingExecutor::default();

        assert!(setup_database(&executor, file.path(), SplitMode::Naive, &events()));
        assert_eq!(
            *executor.calls.borrow(),
            vec![
                "create table a (id int)",
                "create table b (id int)",
                "insert into a values (1)",
            ]
        );
    }

    #[test]
    fn test_blank_segments_are_not_sent() {
        let file = script(";\n  ;select 1;;\n\t;select 2;   ");
        let executor = RecordingExecutor::default();

        let report =
            try_setup_database(&executor, file.path(), SplitMode::Naive, &events()).unwrap();
        assert_eq!(report.executed, 2);
        assert_eq!(*executor.calls.borrow(), vec!["select 1", "select 2"]);
    }

    #[test]
    fn test_failure_stops_remaining_statements() {
        let file = script("select 1;\nselect 2;\nselect 3;\nselect 4;");
        let executor = RecordingExecutor {
            fail_on: Some(2),
            ..Default::default()
        };

        assert!(!setup_database(&executor, file.path(), SplitMode::Aware, &events()));
        assert_eq!(*executor.calls.borrow(), vec!["select 1", "select 2"]);

        executor.calls.borrow_mut().clear();
        let err =
            try_setup_database(&executor, file.path(), SplitMode::Aware, &events()).unwrap_err();
        match &err {
            SetupError::Statement { ordinal, line, .. } => {
                assert_eq!(*ordinal, 2);
                assert_eq!(*line, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.executed_before(), 1);
        assert_eq!(err.phase(), "execute");
    }

    #[test]
    fn test_missing_script_makes_no_calls() {
        let executor = RecordingExecutor::default();
        let path = Path::new("/nonexistent/dir/create_pharmacy.sql");

        assert!(!setup_database(&executor, path, SplitMode::Aware, &events()));
        assert!(executor.calls.borrow().is_empty());
    }

    #[test]
    fn test_empty_script_succeeds_without_calls() {
        let file = script("\n  \n");
        let executor = RecordingExecutor::default();

        assert!(setup_database(&executor, file.path(), SplitMode::Aware, &events()));
        assert!(executor.calls.borrow().is_empty());
    }

    #[test]
    fn test_batch_mode_sends_whole_script_once() {
        let file = script("select 1;\nselect 2;\n");
        let executor = RecordingExecutor::default();

        assert!(setup_database(&executor, file.path(), SplitMode::Batch, &events()));
        assert_eq!(*executor.calls.borrow(), vec!["select 1;\nselect 2;"]);
    }

    #[test]
    fn test_supabase_client_calls_exec_sql_rpc() {
        let (url, server) = serve_once("200 OK", "");
        let client = local_client(&url, "service-key", ClientRole::Admin);

        client.exec_sql("create table t (id int)").unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /rest/v1/rpc/exec_sql HTTP/1.1"));
        assert!(request.ends_with(r#"{"query":"create table t (id int)"}"#));
    }
}
