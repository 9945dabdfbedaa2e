//! Setup lifecycle events
//!
//! Every notable step of the setup tools is described by a [`SetupEvent`] and
//! emitted through `tracing`, stamped with a per-process run id so the lines of
//! one invocation can be grouped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

/// All events the setup tools report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SetupEvent {
    // === Client factory ===
    /// Anonymous and admin handles were built
    ClientsCreated { url: String, missing: Vec<String> },

    // === Function installer ===
    /// exec_sql definition is about to be submitted
    FunctionInstallStarted { path: String, bytes: usize },

    /// exec_sql definition was accepted
    FunctionInstalled { path: String, duration_ms: u64 },

    /// Installing exec_sql failed
    FunctionInstallFailed { path: String, error: String },

    // === Database bootstrapper ===
    /// Bootstrap script was read and split
    BootstrapStarted {
        path: String,
        statements: usize,
        mode: String,
    },

    /// One statement was executed remotely
    StatementExecuted {
        ordinal: usize,
        total: usize,
        line: usize,
    },

    /// All statements were executed
    BootstrapCompleted { executed: usize, duration_ms: u64 },

    /// Bootstrap aborted
    BootstrapFailed {
        error: String,
        phase: String,
        executed: usize,
    },
}

impl SetupEvent {
    /// Get the event type name for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ClientsCreated { .. } => "SUPABASE_CLIENTS_CREATED",
            Self::FunctionInstallStarted { .. } => "EXEC_FUNCTION_INSTALL_STARTED",
            Self::FunctionInstalled { .. } => "EXEC_FUNCTION_INSTALLED",
            Self::FunctionInstallFailed { .. } => "EXEC_FUNCTION_INSTALL_FAILED",
            Self::BootstrapStarted { .. } => "DATABASE_BOOTSTRAP_STARTED",
            Self::StatementExecuted { .. } => "DATABASE_STATEMENT_EXECUTED",
            Self::BootstrapCompleted { .. } => "DATABASE_BOOTSTRAP_COMPLETED",
            Self::BootstrapFailed { .. } => "DATABASE_BOOTSTRAP_FAILED",
        }
    }

    /// Whether this event reports a failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::FunctionInstallFailed { .. } | Self::BootstrapFailed { .. }
        )
    }

    /// Convert event to a human-readable message.
    pub fn message(&self) -> String {
        match self {
            Self::ClientsCreated { url, missing } => {
                if missing.is_empty() {
                    format!("Supabase clients created for {}", url)
                } else {
                    format!(
                        "Supabase clients created for {:?} with unset {}",
                        url,
                        missing.join(", ")
                    )
                }
            }
            Self::FunctionInstallStarted { path, bytes } => {
                format!("Installing exec function from {} ({} bytes)", path, bytes)
            }
            Self::FunctionInstalled { path, duration_ms } => {
                format!("Exec function created from {} in {}ms", path, duration_ms)
            }
            Self::FunctionInstallFailed { path, error } => {
                format!("Error creating exec function from {}: {}", path, error)
            }
            Self::BootstrapStarted {
                path,
                statements,
                mode,
            } => {
                format!(
                    "Setting up database from {} ({} statements, {} split)",
                    path, statements, mode
                )
            }
            Self::StatementExecuted {
                ordinal,
                total,
                line,
            } => {
                format!(
                    "Executed statement {}/{} (line {}) successfully",
                    ordinal, total, line
                )
            }
            Self::BootstrapCompleted {
                executed,
                duration_ms,
            } => {
                format!(
                    "Database setup completed successfully! ({} statements in {}ms)",
                    executed, duration_ms
                )
            }
            Self::BootstrapFailed {
                error,
                phase,
                executed,
            } => {
                format!(
                    "Error setting up database during {} after {} statements: {}",
                    phase, executed, error
                )
            }
        }
    }
}

/// One emitted event together with its run metadata.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord<'a> {
    pub run_id: Uuid,
    pub component: &'a str,
    pub at: DateTime<Utc>,
    pub event: &'a SetupEvent,
}

/// Event sink for one tool invocation.
#[derive(Debug, Clone)]
pub struct EventLog {
    run_id: Uuid,
    component: String,
}

impl EventLog {
    /// Create an event log with a fresh run id.
    pub fn new(component: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            component: component.to_string(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Stamp an event without emitting it.
    pub fn record<'a>(&'a self, event: &'a SetupEvent) -> EventRecord<'a> {
        EventRecord {
            run_id: self.run_id,
            component: &self.component,
            at: Utc::now(),
            event,
        }
    }

    /// Emit an event. Failures go out at error level, everything else at info.
    pub fn emit(&self, event: SetupEvent) {
        let event_type = event.event_type();
        let message = event.message();
        let details = serde_json::to_string(&self.record(&event)).unwrap_or_default();

        if event.is_failure() {
            error!(event = %event_type, run_id = %self.run_id, details = %details, "{}", message);
        } else {
            info!(event = %event_type, run_id = %self.run_id, details = %details, "{}", message);
        }
    }
}
