use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top level for environment overrides, e.g. `MUSICVAULT_DATABASE_PATH`.
pub const ENV_TOP_LEVEL: &str = "musicvault";

/// Access code used when nothing else is configured.
pub const DEFAULT_ACCESS_CODE: &str = "swaragandharva";

/// Configuration for musicvault.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (MUSICVAULT_* prefix)
/// 3. Config file (~/.config/musicvault/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: MUSICVAULT_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/musicvault/musicvault.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Shared secret checked by `musicvault login`.
    ///
    /// Can be set via:
    /// - ENV: MUSICVAULT_ACCESS_CODE
    /// - Config: access_code = "..."
    #[serde(default = "default_access_code")]
    pub access_code: String,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            access_code: default_access_code(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration with custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }

    /// Load from an explicit config file, then `MUSICVAULT_*` variables.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level(ENV_TOP_LEVEL);
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Directory that holds the database and the session file.
    pub fn data_dir(&self) -> PathBuf {
        self.database_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    /// Look up a key by its config file name.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "database_path" => Some(self.database_path.display().to_string()),
            "access_code" => Some(self.access_code.clone()),
            "log_level" => Some(self.log_level.clone()),
            _ => None,
        }
    }
}

/// Keys accepted in the config file.
pub const CONFIG_KEYS: &[&str] = &["database_path", "access_code", "log_level"];

/// Get the default database path.
///
/// Returns: ~/.local/share/musicvault/musicvault.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("musicvault")
        .join("musicvault.db")
}

fn default_access_code() -> String {
    DEFAULT_ACCESS_CODE.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/musicvault/config.toml
/// - macOS: ~/Library/Application Support/musicvault/config.toml
/// - Windows: %APPDATA%\musicvault\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("musicvault")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Musicvault Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (MUSICVAULT_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Shared access code for `musicvault login`
#
# Can also be set via:
# - Environment: MUSICVAULT_ACCESS_CODE=your-code
access_code = "swaragandharva"

# Default log filter, overridden by RUST_LOG
log_level = "warn"

# Path to the SQLite database
#
# Stores ragas, bandishes, diary entries, karyakrams and their setlists
#
# Can also be set via:
# - CLI: musicvault --db /custom/path.db raga list
# - Environment: MUSICVAULT_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/musicvault.db"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
