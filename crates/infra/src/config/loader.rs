//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `STUDYFLOW_DB_PATH`: Database file path
//! - `STUDYFLOW_DB_POOL_SIZE`: Connection pool size
//! - `STUDYFLOW_GOOGLE_CLIENT_ID` / `STUDYFLOW_GOOGLE_CLIENT_SECRET`
//! - `STUDYFLOW_MICROSOFT_CLIENT_ID` / `STUDYFLOW_MICROSOFT_CLIENT_SECRET`
//! - `STUDYFLOW_GENERATION_WEEKS`: Weeks of sessions per regeneration (optional)
//! - `STUDYFLOW_REQUEST_TIMEOUT`: Per-call HTTP timeout in seconds (optional)

use std::path::{Path, PathBuf};

use studyflow_domain::{
    Config, DatabaseConfig, OAuthClientConfig, Result, StudyflowError, SyncConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `StudyflowError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    dotenvy::dotenv().ok();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `StudyflowError::Config` if required variables are missing or
/// have invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("STUDYFLOW_DB_PATH")?;
    let db_pool_size = env_var("STUDYFLOW_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>().map_err(|e| StudyflowError::Config(format!("Invalid pool size: {e}")))
    })?;

    let oauth = OAuthClientConfig {
        google_client_id: env_var("STUDYFLOW_GOOGLE_CLIENT_ID")?,
        google_client_secret: env_var("STUDYFLOW_GOOGLE_CLIENT_SECRET")?,
        microsoft_client_id: env_var("STUDYFLOW_MICROSOFT_CLIENT_ID")?,
        microsoft_client_secret: env_var("STUDYFLOW_MICROSOFT_CLIENT_SECRET")?,
    };

    let mut sync = SyncConfig::default();
    if let Ok(weeks) = std::env::var("STUDYFLOW_GENERATION_WEEKS") {
        sync.generation_weeks = weeks
            .parse::<u32>()
            .map_err(|e| StudyflowError::Config(format!("Invalid generation weeks: {e}")))?;
    }
    if let Ok(timeout) = std::env::var("STUDYFLOW_REQUEST_TIMEOUT") {
        sync.request_timeout_seconds = timeout
            .parse::<u64>()
            .map_err(|e| StudyflowError::Config(format!("Invalid request timeout: {e}")))?;
    }

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        oauth,
        sync,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `StudyflowError::Config` if no file is found or parsing fails.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(StudyflowError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            StudyflowError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| StudyflowError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| StudyflowError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| StudyflowError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(StudyflowError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe standard locations for a config file
///
/// Searches the working directory and up to two parents for
/// `config.{json,toml}` / `studyflow.{json,toml}`, then next to the
/// executable.
#[must_use]
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for base in [cwd.clone(), cwd.join(".."), cwd.join("../..")] {
            candidates.push(base.join("config.json"));
            candidates.push(base.join("config.toml"));
            candidates.push(base.join("studyflow.json"));
            candidates.push(base.join("studyflow.toml"));
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.json"));
            candidates.push(exe_dir.join("config.toml"));
            candidates.push(exe_dir.join("studyflow.json"));
            candidates.push(exe_dir.join("studyflow.toml"));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        StudyflowError::Config(format!("Missing required environment variable: {key}"))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[database]
path = "test.db"
pool_size = 6

[oauth]
google_client_id = "g-id"
google_client_secret = "g-secret"
microsoft_client_id = "m-id"
microsoft_client_secret = "m-secret"

[sync]
generation_weeks = 2
request_timeout_seconds = 10
refresh_buffer_seconds = 300
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.database.pool_size, 6);
        assert_eq!(config.oauth.google_client_id, "g-id");
        assert_eq!(config.sync.generation_weeks, 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_json_with_default_sync() {
        let json_content = r#"{
            "database": { "path": "test.db", "pool_size": 4 },
            "oauth": {
                "google_client_id": "g-id",
                "google_client_secret": "g-secret",
                "microsoft_client_id": "m-id",
                "microsoft_client_secret": "m-secret"
            }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.sync.generation_weeks, 4);
        assert_eq!(config.sync.refresh_buffer_seconds, 300);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(StudyflowError::Config(_))));
    }

    #[test]
    fn test_unsupported_format() {
        let path = PathBuf::from("test.yaml");
        let result = parse_config("content", &path);
        assert!(matches!(result, Err(StudyflowError::Config(_))));
    }
}
