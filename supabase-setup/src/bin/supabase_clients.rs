//! Supabase client factory
//!
//! Builds the anonymous and administrative handles from SUPABASE_URL,
//! SUPABASE_ANON_KEY and SUPABASE_SERVICE_KEY. Nothing is sent over the
//! network; bad credentials only show up once a handle is used.

use anyhow::Result;
use common::{init_logging, EventLog, SetupEvent};
use supabase_setup::{create_clients_with_timeout, SetupConfig};
use tracing::{info, warn};

fn main() -> Result<()> {
    let _guard = init_logging("supabase-clients");

    let config = SetupConfig::from_env()?;
    let events = EventLog::new("supabase-clients");

    let clients = create_clients_with_timeout(&config.credentials, config.http_timeout);

    let missing = config.credentials.missing();
    if !missing.is_empty() {
        warn!(missing = ?missing, "Credentials incomplete, requests will fail");
    }

    info!(anon = ?clients.anon, admin = ?clients.admin, "Handles ready");

    events.emit(SetupEvent::ClientsCreated {
        url: config.credentials.url.clone(),
        missing: missing.iter().map(|name| name.to_string()).collect(),
    });

    Ok(())
}
