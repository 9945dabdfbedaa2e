//! Shared utilities for the Supabase setup tools
//!
//! This crate provides common functionality used across the setup binaries:
//! - Structured logging initialization
//! - Environment variable parsing helpers and `.env` loading
//! - Setup lifecycle events

pub mod config;
pub mod events;
pub mod logging;

pub use config::{load_dotenv, ConfigExt, SupabaseEnv};
pub use events::{EventLog, SetupEvent};
pub use logging::init_logging;
