//! Database bootstrapper
//!
//! Runs sql/create_pharmacy.sql statement by statement through the exec_sql
//! procedure using the service role key. Run setup-function first.

use anyhow::Result;
use common::{init_logging, EventLog};
use supabase_setup::{create_clients_with_timeout, setup_database, SetupConfig};
use tracing::{error, info};

fn main() -> Result<()> {
    let _guard = init_logging("setup-database");

    let config = SetupConfig::from_env()?;
    let events = EventLog::new("setup-database");

    info!(
        script = %config.schema_sql.display(),
        split = %config.split_mode,
        "=== Database Setup ==="
    );

    let clients = create_clients_with_timeout(&config.credentials, config.http_timeout);
    let ok = setup_database(&clients.admin, &config.schema_sql, config.split_mode, &events);

    if !ok && config.strict_exit {
        error!("Database setup failed");
        std::process::exit(1);
    }

    Ok(())
}
