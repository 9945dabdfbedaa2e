//! exec_sql installer
//!
//! Creates the exec_sql procedure from sql/create_exec_function.sql with a
//! single request to the generic SQL endpoint. Run once, before
//! setup-database.

use anyhow::Result;
use common::{init_logging, EventLog};
use supabase_setup::{create_clients_with_timeout, setup_exec_function, QueryEndpoint, SetupConfig};
use tracing::{error, info};

fn main() -> Result<()> {
    let _guard = init_logging("setup-function");

    let config = SetupConfig::from_env()?;
    let events = EventLog::new("setup-function");

    let clients = create_clients_with_timeout(&config.credentials, config.http_timeout);
    let endpoint = QueryEndpoint::new(&clients.admin, &config.sql_endpoint);

    info!(
        script = %config.function_sql.display(),
        endpoint = %clients.admin.endpoint(&config.sql_endpoint),
        "=== Exec Function Setup ==="
    );

    let ok = setup_exec_function(&endpoint, &config.function_sql, &events);

    if !ok && config.strict_exit {
        error!("Exec function setup failed");
        std::process::exit(1);
    }

    Ok(())
}
