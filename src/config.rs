use crate::error::{DroidProxError, Result};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiServerConfig,
    /// Persistent storage configuration
    pub storage: StorageConfig,
    /// Device bridge configuration
    pub bridge: BridgeConfig,
    /// Logging configuration
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Port for the API server (default: 8700)
    pub port: u16,
    /// Host to bind to (default: 127.0.0.1)
    pub host: String,
    /// Allowed CORS origins (comma-separated, empty = localhost only)
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding proxy.json and assignments.json
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Explicit path to the adb executable, overriding discovery
    pub adb_path: Option<PathBuf>,
    /// Per-invocation timeout in seconds
    pub command_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: String,
    /// Capacity of the in-memory log ring buffer
    pub buffer_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            api: ApiServerConfig {
                port: get_env_or("API_PORT", "8700").parse().map_err(|_| {
                    DroidProxError::InvalidConfig("API_PORT must be a valid port number".into())
                })?,
                host: get_env_or("API_HOST", "127.0.0.1"),
                cors_origins: get_env_or("CORS_ORIGINS", "")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            storage: StorageConfig {
                data_dir: PathBuf::from(get_env_or("DROIDPROX_DATA_DIR", ".")),
            },
            bridge: BridgeConfig {
                adb_path: env::var("DROIDPROX_ADB_PATH").ok().map(PathBuf::from),
                command_timeout: get_env_or("DROIDPROX_BRIDGE_TIMEOUT", "30")
                    .parse()
                    .map_err(|_| {
                        DroidProxError::InvalidConfig(
                            "DROIDPROX_BRIDGE_TIMEOUT must be a number of seconds".into(),
                        )
                    })?,
            },
            log: LogConfig {
                level: get_env_or("LOG_LEVEL", "info"),
                format: get_env_or("LOG_FORMAT", "pretty"),
                buffer_capacity: get_env_or("DROIDPROX_LOG_CAPACITY", "100")
                    .parse()
                    .map_err(|_| {
                        DroidProxError::InvalidConfig(
                            "DROIDPROX_LOG_CAPACITY must be a valid number".into(),
                        )
                    })?,
            },
        })
    }

    /// Get the API server address
    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Get environment variable with a default value
fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const CONFIG_ENV_KEYS: &[&str] = &[
        "API_PORT",
        "API_HOST",
        "CORS_ORIGINS",
        "DROIDPROX_DATA_DIR",
        "DROIDPROX_ADB_PATH",
        "DROIDPROX_BRIDGE_TIMEOUT",
        "LOG_LEVEL",
        "LOG_FORMAT",
        "DROIDPROX_LOG_CAPACITY",
    ];

    struct EnvGuard {
        saved: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new(keys: &[&str]) -> Self {
            let saved = keys
                .iter()
                .map(|&key| {
                    let old = env::var(key).ok();
                    env::remove_var(key);
                    (key.to_string(), old)
                })
                .collect();

            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.saved.drain(..) {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);

        let config = Config::from_env().unwrap();

        assert_eq!(config.api.port, 8700);
        assert_eq!(config.api.host, "127.0.0.1");
        assert!(config.api.cors_origins.is_empty());

        assert_eq!(config.storage.data_dir, PathBuf::from("."));
        assert!(config.bridge.adb_path.is_none());
        assert_eq!(config.bridge.command_timeout, 30);

        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.buffer_capacity, 100);
    }

    #[test]
    fn test_config_from_env_overrides() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);

        env::set_var("API_PORT", "9100");
        env::set_var("API_HOST", "0.0.0.0");
        env::set_var("CORS_ORIGINS", "http://a.example, http://b.example");
        env::set_var("DROIDPROX_DATA_DIR", "/var/lib/droidprox");
        env::set_var("DROIDPROX_ADB_PATH", "/opt/platform-tools/adb");
        env::set_var("DROIDPROX_BRIDGE_TIMEOUT", "5");
        env::set_var("DROIDPROX_LOG_CAPACITY", "250");

        let config = Config::from_env().unwrap();

        assert_eq!(config.api.port, 9100);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(
            config.api.cors_origins,
            vec![
                "http://a.example".to_string(),
                "http://b.example".to_string()
            ]
        );
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/droidprox"));
        assert_eq!(
            config.bridge.adb_path,
            Some(PathBuf::from("/opt/platform-tools/adb"))
        );
        assert_eq!(config.bridge.command_timeout, 5);
        assert_eq!(config.log.buffer_capacity, 250);
    }

    #[test]
    fn test_config_from_env_invalid_port() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);

        env::set_var("API_PORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, DroidProxError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_from_env_invalid_timeout() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);

        env::set_var("DROIDPROX_BRIDGE_TIMEOUT", "soon");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, DroidProxError::InvalidConfig(_)));
    }

    #[test]
    fn test_api_addr_formatter() {
        let config = Config {
            api: ApiServerConfig {
                port: 8700,
                host: "127.0.0.1".to_string(),
                cors_origins: vec![],
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("."),
            },
            bridge: BridgeConfig {
                adb_path: None,
                command_timeout: 30,
            },
            log: LogConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                buffer_capacity: 100,
            },
        };

        assert_eq!(config.api_addr(), "127.0.0.1:8700");
    }
}
