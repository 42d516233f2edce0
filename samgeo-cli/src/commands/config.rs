//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`
//! for viewing and modifying settings from the command line.

use clap::Subcommand;
use samgeo::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., embedding.url)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., embedding.url)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'samgeo config list' to see available keys.",
            key
        ))
    })
}

fn run_get(key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load()?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let mut config = ConfigFile::load()?;
    config_key.set(&mut config, value)?;
    config.save()?;

    println!("Set {} = {}", config_key.name(), config_key.get(&config));
    Ok(())
}

fn run_list() -> Result<(), CliError> {
    let path = config_file_path();
    let config = ConfigFile::load_from(&path)?;

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not created yet, showing defaults)", path.display());
    }
    for line in settings_lines(&config) {
        println!("{}", line);
    }
    Ok(())
}

/// Renders every setting in INI layout, noting values that differ from
/// the defaults.
fn settings_lines(config: &ConfigFile) -> Vec<String> {
    let defaults = ConfigFile::default();
    let mut lines = Vec::new();

    let mut current_section = "";
    for key in ConfigKey::all() {
        if key.section() != current_section {
            current_section = key.section();
            lines.push(String::new());
            lines.push(format!("[{}]", current_section));
        }

        let value = key.get(config);
        let default = key.get(&defaults);
        let shown = if value.is_empty() { "(not set)" } else { value.as_str() };
        if value == default {
            lines.push(format!("{} = {}", key.key_name(), shown));
        } else if default.is_empty() {
            lines.push(format!("{} = {}  ; default: not set", key.key_name(), shown));
        } else {
            lines.push(format!("{} = {}  ; default: {}", key.key_name(), shown, default));
        }
    }

    lines.push(String::new());
    lines.push("[locations]".to_string());
    if config.locations.is_empty() {
        lines.push("; none".to_string());
    }
    for location in &config.locations {
        lines.push(format!("{} = {}", location.name, location.to_config_value()));
    }
    lines
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use samgeo::config::Location;

    #[test]
    fn test_parse_key_suggests_list() {
        match parse_key("map.altitude") {
            Err(CliError::Config(msg)) => assert!(msg.contains("samgeo config list")),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(parse_key("map.zoom").unwrap(), ConfigKey::MapZoom);
    }

    #[test]
    fn test_default_settings_have_no_overrides() {
        let lines = settings_lines(&ConfigFile::default());
        assert!(lines.iter().all(|l| !l.contains("; default")));
        assert!(lines.contains(&"[embedding]".to_string()));
        assert!(lines.contains(&"file = (not set)".to_string()));
    }

    #[test]
    fn test_changed_settings_show_default() {
        let mut config = ConfigFile::default();
        ConfigKey::MosaicDuplicatePolicy
            .set(&mut config, "reject")
            .unwrap();
        ConfigKey::LoggingFile.set(&mut config, "samgeo.log").unwrap();

        let lines = settings_lines(&config);
        assert!(lines.contains(&"duplicate_policy = reject  ; default: last_writer_wins".to_string()));
        assert!(lines.contains(&"file = samgeo.log  ; default: not set".to_string()));
    }

    #[test]
    fn test_locations_include_zoom() {
        let mut config = ConfigFile::default();
        config.locations = vec![
            Location::parse("reef", "-16.9,146,12").unwrap(),
            Location::parse("delta", "22.5,113.9").unwrap(),
        ];

        let lines = settings_lines(&config);
        assert!(lines.contains(&"reef = -16.9,146,12".to_string()));
        assert!(lines.contains(&"delta = 22.5,113.9".to_string()));
    }
}
