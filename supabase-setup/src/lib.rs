//! Supabase database setup tools
//!
//! This crate provides the pieces behind the setup binaries:
//! - Client factory for the anonymous and administrative handles
//! - SQL script splitting
//! - Database bootstrapper running statements through `exec_sql`
//! - Installer for the `exec_sql` procedure itself

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod error;
pub mod function;
pub mod scripts;
pub mod sql;

pub use bootstrap::{setup_database, try_setup_database, BootstrapReport, SqlExecutor};
pub use client::{create_clients, create_clients_with_timeout, Clients, Credentials, SupabaseClient};
pub use config::SetupConfig;
pub use error::SetupError;
pub use function::{setup_exec_function, try_setup_exec_function, QueryEndpoint, SqlSubmitter};
pub use sql::{split_statements, SplitMode, Statement};

pub use common::{EventLog, SetupEvent};
