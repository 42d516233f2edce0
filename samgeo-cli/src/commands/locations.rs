//! Locations command - list the named map positions.

use samgeo::config::ConfigFile;

use crate::error::CliError;

/// Run the locations command.
pub fn run(config: &ConfigFile) -> Result<(), CliError> {
    if config.locations.is_empty() {
        println!("No locations configured.");
        println!("Add entries as 'name = lat,lon[,zoom]' under [locations] in the config file.");
        return Ok(());
    }

    let width = config
        .locations
        .iter()
        .map(|l| l.name.len())
        .max()
        .unwrap_or(0);

    for location in &config.locations {
        let zoom = location
            .zoom
            .map(|z| format!("  zoom {}", z))
            .unwrap_or_default();
        println!(
            "{:width$}  {:>12.6}, {:>12.6}{}",
            location.name,
            location.lat,
            location.lon,
            zoom,
            width = width
        );
    }
    Ok(())
}
