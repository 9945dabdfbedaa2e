//! Location and loading of the SQL scripts
//!
//! Both scripts live in one directory (`SUPABASE_SQL_DIR`, default `sql`)
//! unless a full path is given for either of them.

use crate::error::SetupError;
use common::ConfigExt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory holding the SQL scripts, relative to the working directory
pub const DEFAULT_SQL_DIR: &str = "sql";

/// Schema and seed data for the bootstrapper
pub const SCHEMA_SQL_FILE: &str = "create_pharmacy.sql";

/// Definition of the exec_sql procedure for the installer
pub const FUNCTION_SQL_FILE: &str = "create_exec_function.sql";

/// Get the SQL directory from environment or default
pub fn sql_dir() -> PathBuf {
    PathBuf::env_path("SUPABASE_SQL_DIR", DEFAULT_SQL_DIR)
}

/// Get the bootstrap script path
pub fn schema_sql_path() -> PathBuf {
    PathBuf::env_path("SUPABASE_SCHEMA_SQL", sql_dir().join(SCHEMA_SQL_FILE))
}

/// Get the procedure definition path
pub fn function_sql_path() -> PathBuf {
    PathBuf::env_path("SUPABASE_FUNCTION_SQL", sql_dir().join(FUNCTION_SQL_FILE))
}

/// Read a script as text.
pub fn read_script(path: &Path) -> Result<String, SetupError> {
    fs::read_to_string(path).map_err(|source| SetupError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Environment-mutating tests across the crate take this lock.
#[cfg(test)]
pub(crate) mod test_env {
    use std::env;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Every variable the setup configuration reads.
    const SETUP_VARS: &[&str] = &[
        "SUPABASE_SQL_DIR",
        "SUPABASE_SCHEMA_SQL",
        "SUPABASE_FUNCTION_SQL",
        "SUPABASE_SQL_SPLIT",
        "SUPABASE_SQL_ENDPOINT",
        "SUPABASE_HTTP_TIMEOUT_SECS",
        "SUPABASE_SETUP_STRICT_EXIT",
    ];

    /// Run `f` with exactly `vars` set among the setup variables.
    pub(crate) fn with_vars<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard: MutexGuard<'_, ()> = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for name in SETUP_VARS {
            env::remove_var(name);
        }
        for (name, value) in vars {
            env::set_var(name, value);
        }

        let result = f();

        for name in SETUP_VARS {
            env::remove_var(name);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::test_env::with_vars;
    use super::*;

    #[test]
    fn test_missing_script_is_read_error() {
        let err = read_script(Path::new("/nonexistent/create_pharmacy.sql")).unwrap_err();
        assert!(matches!(err, SetupError::Read { .. }));
        assert_eq!(err.phase(), "read_script");
        assert!(err.to_string().contains("/nonexistent/create_pharmacy.sql"));
    }

    #[test]
    fn test_shipped_scripts_are_where_defaults_point() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(DEFAULT_SQL_DIR);
        assert!(root.join(SCHEMA_SQL_FILE).is_file());
        assert!(root.join(FUNCTION_SQL_FILE).is_file());
    }

    #[test]
    fn test_default_paths_live_in_sql_dir() {
        with_vars(&[], || {
            assert_eq!(schema_sql_path(), Path::new("sql").join(SCHEMA_SQL_FILE));
            assert_eq!(function_sql_path(), Path::new("sql").join(FUNCTION_SQL_FILE));
        });
    }

    #[test]
    fn test_sql_dir_moves_both_scripts() {
        with_vars(&[("SUPABASE_SQL_DIR", "/opt/pharmacy/sql")], || {
            assert_eq!(
                schema_sql_path(),
                PathBuf::from("/opt/pharmacy/sql/create_pharmacy.sql")
            );
            assert_eq!(
                function_sql_path(),
                PathBuf::from("/opt/pharmacy/sql/create_exec_function.sql")
            );
        });
    }

    #[test]
    fn test_explicit_script_path_wins_over_dir() {
        with_vars(
            &[
                ("SUPABASE_SQL_DIR", "/opt/pharmacy/sql"),
                ("SUPABASE_SCHEMA_SQL", "/tmp/seed.sql"),
            ],
            || {
                assert_eq!(schema_sql_path(), PathBuf::from("/tmp/seed.sql"));
                assert_eq!(
                    function_sql_path(),
                    PathBuf::from("/opt/pharmacy/sql/create_exec_function.sql")
                );
            },
        );
    }
}
