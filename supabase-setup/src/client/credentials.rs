//! Supabase credentials from environment variables

use common::{load_dotenv, SupabaseEnv};

/// Base URL plus the two API keys of a project.
///
/// Values are taken as-is. An empty or malformed value only shows up as an
/// error once a request is made.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub anon_key: String,
    pub service_key: String,
}

impl Credentials {
    /// Load credentials from the environment, merging `.env` first.
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            url: SupabaseEnv::url(),
            anon_key: SupabaseEnv::anon_key(),
            service_key: SupabaseEnv::service_key(),
        }
    }

    /// Build credentials from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            url: lookup(SupabaseEnv::URL).unwrap_or_default(),
            anon_key: lookup(SupabaseEnv::ANON_KEY).unwrap_or_default(),
            service_key: lookup(SupabaseEnv::SERVICE_KEY).unwrap_or_default(),
        }
    }

    /// Variable names whose values are blank.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (SupabaseEnv::URL, &self.url),
            (SupabaseEnv::ANON_KEY, &self.anon_key),
            (SupabaseEnv::SERVICE_KEY, &self.service_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("anon_key", &redact(&self.anon_key))
            .field("service_key", &redact(&self.service_key))
            .finish()
    }
}

/// Show only the tail of a key.
pub fn redact(key: &str) -> String {
    if key.is_empty() {
        return "<unset>".to_string();
    }
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_values_become_empty() {
        let vars: HashMap<&str, &str> = [("SUPABASE_URL", "https://demo.supabase.co")].into();
        let creds = Credentials::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(creds.url, "https://demo.supabase.co");
        assert_eq!(creds.anon_key, "");
        assert_eq!(creds.missing(), vec!["SUPABASE_ANON_KEY", "SUPABASE_SERVICE_KEY"]);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let creds = Credentials {
            url: "https://demo.supabase.co".to_string(),
            anon_key: "anon-secret-1234".to_string(),
            service_key: String::new(),
        };
        let shown = format!("{:?}", creds);
        assert!(shown.contains("***1234"));
        assert!(shown.contains("<unset>"));
        assert!(!shown.contains("anon-secret"));
    }
}
