//! INI-backed configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use tracing::debug;

use super::keys::ConfigKey;
use super::ConfigError;
use crate::mosaic::{DuplicatePolicy, DEFAULT_TILE_SIZE};
use crate::provider::{DEFAULT_TIMEOUT_SECS, GOOGLE_SATELLITE_URL};
use crate::viewport::Viewport;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "SAMGEO_CONFIG";

const LOCATIONS_SECTION: &str = "locations";

/// Default map center (lng, lat) and zoom.
pub const DEFAULT_CENTER: (f64, f64) = (120.10533489408249, 30.261061158180482);
pub const DEFAULT_ZOOM: f64 = 17.0;

/// Path of the user configuration file.
///
/// `$SAMGEO_CONFIG` when set, otherwise `<config dir>/samgeo/config.ini`.
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("samgeo")
        .join("config.ini")
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub zoom: f64,
    pub center_lat: f64,
    pub center_lon: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// XYZ template with `{x}`, `{y}`, `{z}` and optional `{s}`/`{q}`
    pub tile_url: String,
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSettings {
    pub url: String,
    /// 0 disables the timeout
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MosaicSettings {
    pub duplicate_policy: DuplicatePolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `info` or `samgeo=debug`
    pub level: String,
    pub file: Option<PathBuf>,
}

/// A named map position.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub zoom: Option<f64>,
}

impl Location {
    /// Parses `lat,lon[,zoom]`.
    pub fn parse(name: &str, value: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: format!("{}.{}", LOCATIONS_SECTION, name),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(invalid("expected 'lat,lon' or 'lat,lon,zoom'"));
        }

        let number = |s: &str| s.parse::<f64>().map_err(|e| invalid(&e.to_string()));
        let lat = number(parts[0])?;
        let lon = number(parts[1])?;
        let zoom = parts.get(2).map(|z| number(z)).transpose()?;

        Ok(Self {
            name: name.to_string(),
            lat,
            lon,
            zoom,
        })
    }

    /// Value as written under `[locations]`: `lat,lon[,zoom]`.
    pub fn to_config_value(&self) -> String {
        match self.zoom {
            Some(zoom) => format!("{},{},{}", self.lat, self.lon, zoom),
            None => format!("{},{}", self.lat, self.lon),
        }
    }
}

/// Full user configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub map: MapSettings,
    pub provider: ProviderSettings,
    pub embedding: EmbeddingSettings,
    pub mosaic: MosaicSettings,
    pub logging: LoggingSettings,
    pub locations: Vec<Location>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            map: MapSettings {
                zoom: DEFAULT_ZOOM,
                center_lat: DEFAULT_CENTER.1,
                center_lon: DEFAULT_CENTER.0,
                viewport_width: Viewport::DEFAULT_WIDTH,
                viewport_height: Viewport::DEFAULT_HEIGHT,
            },
            provider: ProviderSettings {
                tile_url: GOOGLE_SATELLITE_URL.to_string(),
                tile_size: DEFAULT_TILE_SIZE,
                min_zoom: 0,
                max_zoom: 22,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            embedding: EmbeddingSettings {
                url: "http://localhost:8000/embedding".to_string(),
                timeout_secs: 0,
            },
            mosaic: MosaicSettings::default(),
            logging: LoggingSettings {
                level: "info".to_string(),
                file: None,
            },
            locations: vec![Location {
                name: "hangzhou".to_string(),
                lat: DEFAULT_CENTER.1,
                lon: DEFAULT_CENTER.0,
                zoom: Some(DEFAULT_ZOOM),
            }],
        }
    }
}

impl ConfigFile {
    /// Loads from [`config_file_path`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads from `path`; a missing file yields the defaults.
    ///
    /// Keys absent from the file keep their default values. A file with a
    /// `[locations]` section replaces the default locations.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(config);
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }

        if let Some(section) = ini.section(Some(LOCATIONS_SECTION)) {
            config.locations = section
                .iter()
                .map(|(name, value)| Location::parse(name, value))
                .collect::<Result<_, _>>()?;
        }

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Saves to [`config_file_path`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Writes every setting to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        for location in &self.locations {
            ini.with_section(Some(LOCATIONS_SECTION))
                .set(location.name.as_str(), location.to_config_value());
        }

        ini.write_to_file(path)?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Looks up a location by name, ignoring case.
    pub fn location(&self, name: &str) -> Result<&Location, ConfigError> {
        self.locations
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownLocation(name.to_string()))
    }

    /// Viewport at the configured center, zoom and size.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.map.center_lon, self.map.center_lat, self.map.zoom)
            .with_size(self.map.viewport_width, self.map.viewport_height)
            .with_tile_size(self.provider.tile_size)
    }

    pub fn provider_timeout(&self) -> Option<Duration> {
        timeout(self.provider.timeout_secs)
    }

    pub fn embedding_timeout(&self) -> Option<Duration> {
        timeout(self.embedding.timeout_secs)
    }
}

fn timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.map.zoom = 15.5;
        config.embedding.url = "http://gpu-box:9000/embedding".to_string();
        config.mosaic.duplicate_policy = DuplicatePolicy::Reject;
        config.logging.file = Some(PathBuf::from("/var/log/samgeo.log"));
        config.locations.push(Location {
            name: "delta".to_string(),
            lat: 22.5,
            lon: 113.9,
            zoom: None,
        });
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[provider]\ntile_size = 512\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.provider.tile_size, 512);
        assert_eq!(config.map.zoom, DEFAULT_ZOOM);
        assert_eq!(config.locations.len(), 1);
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[map]\nzoom = close\n").unwrap();

        let result = ConfigFile::load_from(&path);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_location_parse() {
        let loc = Location::parse("home", "30.26, 120.10, 18").unwrap();
        assert_eq!((loc.lat, loc.lon, loc.zoom), (30.26, 120.10, Some(18.0)));

        let loc = Location::parse("home", "30.26,120.10").unwrap();
        assert_eq!(loc.zoom, None);

        assert!(Location::parse("home", "30.26").is_err());
        assert!(Location::parse("home", "a,b").is_err());
    }

    #[test]
    fn test_location_config_value() {
        let loc = Location::parse("home", "30.26,120.1,18").unwrap();
        assert_eq!(loc.to_config_value(), "30.26,120.1,18");

        let loc = Location::parse("home", "30.26,120.1").unwrap();
        assert_eq!(loc.to_config_value(), "30.26,120.1");
    }

    #[test]
    fn test_location_lookup_ignores_case() {
        let config = ConfigFile::default();
        assert_eq!(config.location("HangZhou").unwrap().name, "hangzhou");
        assert!(matches!(
            config.location("atlantis"),
            Err(ConfigError::UnknownLocation(_))
        ));
    }

    #[test]
    fn test_timeouts() {
        let mut config = ConfigFile::default();
        assert_eq!(config.embedding_timeout(), None);
        assert_eq!(
            config.provider_timeout(),
            Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        );
        config.embedding.timeout_secs = 120;
        assert_eq!(config.embedding_timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_viewport_from_config() {
        let config = ConfigFile::default();
        let viewport = config.viewport();
        assert_eq!(viewport.zoom, DEFAULT_ZOOM);
        assert_eq!(viewport.width_px, Viewport::DEFAULT_WIDTH);
    }
}
