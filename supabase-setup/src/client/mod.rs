//! Supabase client factory
//!
//! Builds the anonymous and administrative handles from a credential set:
//! - Reading credentials from the environment
//! - Blocking HTTP handles for PostgREST and the generic request path

mod credentials;
mod handle;

pub use credentials::{redact, Credentials};
pub use handle::{ClientError, ClientRole, SupabaseClient};

#[cfg(test)]
pub(crate) use handle::tests::{local_client, serve_once};

use std::time::Duration;

/// The restricted and the administrative handle of one project.
#[derive(Debug, Clone)]
pub struct Clients {
    pub anon: SupabaseClient,
    pub admin: SupabaseClient,
}

/// Build both handles with no request timeout.
pub fn create_clients(credentials: &Credentials) -> Clients {
    create_clients_with_timeout(credentials, None)
}

/// Build both handles. Keys are not compared or deduplicated.
pub fn create_clients_with_timeout(credentials: &Credentials, timeout: Option<Duration>) -> Clients {
    Clients {
        anon: SupabaseClient::new(
            &credentials.url,
            &credentials.anon_key,
            ClientRole::Anon,
            timeout,
        ),
        admin: SupabaseClient::new(
            &credentials.url,
            &credentials.service_key,
            ClientRole::Admin,
            timeout,
        ),
    }
}
