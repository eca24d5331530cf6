use anyhow::{Context, Result};
use musicvault_core::config::{self, CONFIG_KEYS};
use musicvault_core::Config;
use toml_edit::{value, DocumentMut};

#[derive(Debug, clap::Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
    /// Print one value, or the whole file when no key is given
    Get { key: Option<String> },
    /// Set a value in the config file
    Set { key: String, value: String },
}

pub fn run(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(),
        ConfigAction::Path => show_path(),
        ConfigAction::Example => show_example(),
        ConfigAction::Init => init_config(),
        ConfigAction::Get { key } => get_config(key),
        ConfigAction::Set { key, value } => set_config(&key, &value),
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown config key: {}\n\nValid keys: {}",
        key,
        CONFIG_KEYS.join(", ")
    )
}

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  access_code: {}", "*".repeat(config.access_code.chars().count()));
    println!("  log_level: {}", config.log_level);

    println!("\nPriority: CLI args > ENV vars (MUSICVAULT_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;
        let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
        println!("{}", value);
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'musicvault config init' to create it.");
        }
    }

    Ok(())
}

/// Set a config value, keeping the file's comments and layout.
pub fn set_config(key: &str, new_value: &str) -> Result<()> {
    if !CONFIG_KEYS.contains(&key) {
        return Err(unknown_key(key));
    }

    let config_path = config::config_file_path();
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = set_key(&contents, key, new_value)?;

    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, new_value);
    println!("  in {}", config_path.display());

    Ok(())
}

fn set_key(contents: &str, key: &str, new_value: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Failed to parse config file")?;
    doc[key] = value(new_value);
    Ok(doc.to_string())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure musicvault.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_key_keeps_comments() {
        let updated = set_key(config::example_config(), "log_level", "debug").unwrap();
        assert!(updated.contains("# Musicvault Configuration File"));
        assert!(updated.contains("log_level = \"debug\""));

        let doc: DocumentMut = updated.parse().unwrap();
        assert_eq!(doc["log_level"].as_str(), Some("debug"));
        assert_eq!(doc["access_code"].as_str(), Some("swaragandharva"));
    }

    #[test]
    fn test_set_key_adds_missing_key() {
        let updated = set_key("# empty\n", "database_path", "/tmp/mv.db").unwrap();
        assert!(updated.contains("database_path = \"/tmp/mv.db\""));
    }
}
