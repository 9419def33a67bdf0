use crate::auth::Identity;
use crate::errors::{AppError, AppResult};
use crate::store::ReadPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const ENV_REMOTE_URL: &str = "DEOSIL_REMOTE_URL";
pub const ENV_REMOTE_ANON_KEY: &str = "DEOSIL_REMOTE_ANON_KEY";
pub const ENV_CONFIG: &str = "DEOSIL_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub read_policy: ReadPolicy,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

/// Connection settings for the remote session table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            identity: Identity::default(),
            read_policy: ReadPolicy::default(),
            remote: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.deosil`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".deosil")
    }

    /// Return the full path of the config file.
    /// `DEOSIL_CONFIG` points to an alternative file.
    pub fn config_file() -> PathBuf {
        match env::var(ENV_CONFIG) {
            Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => Self::config_dir().join("deosil.conf"),
        }
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("deosil.sqlite")
    }

    /// Load configuration from `path` (or the default file), falling back
    /// to defaults when the file does not exist. Environment overrides are
    /// applied last.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_file);

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            Config::default()
        };

        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        let url = env::var(ENV_REMOTE_URL).ok().filter(|s| !s.trim().is_empty());
        let key = env::var(ENV_REMOTE_ANON_KEY)
            .ok()
            .filter(|s| !s.trim().is_empty());

        match (url, key, self.remote.as_mut()) {
            (Some(url), Some(anon_key), None) => {
                self.remote = Some(RemoteConfig {
                    url,
                    anon_key,
                    timeout_secs: default_timeout_secs(),
                });
            }
            (url, key, Some(remote)) => {
                if let Some(u) = url {
                    remote.url = u;
                }
                if let Some(k) = key {
                    remote.anon_key = k;
                }
            }
            _ => {}
        }
    }

    /// Initialize configuration file and database file.
    ///
    /// In test mode the configuration file is left untouched.
    pub fn init_all(custom_db: Option<String>, is_test: bool, path: Option<&Path>) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // keep the rest of an existing configuration
        let mut config = Self::load(path)?;

        // DB name: user provided, or the one already configured
        if let Some(name) = custom_db {
            let p = Path::new(&name);
            let db_path = if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            };
            config.database = db_path.to_string_lossy().to_string();
        }
        let db_path = PathBuf::from(&config.database);

        if !is_test {
            let target = path
                .map(Path::to_path_buf)
                .unwrap_or_else(Self::config_file);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| AppError::Config(e.to_string()))?;
            let mut file = fs::File::create(&target)?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }

    /// Remote settings, if configured with a non-empty URL.
    pub fn remote(&self) -> Option<&RemoteConfig> {
        self.remote.as_ref().filter(|r| !r.url.trim().is_empty())
    }
}
