//! Typed access to individual configuration settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};
use crate::mosaic::DuplicatePolicy;

/// A single `section.key` setting in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    MapZoom,
    MapCenterLat,
    MapCenterLon,
    MapViewportWidth,
    MapViewportHeight,
    ProviderTileUrl,
    ProviderTileSize,
    ProviderMinZoom,
    ProviderMaxZoom,
    ProviderTimeoutSecs,
    EmbeddingUrl,
    EmbeddingTimeoutSecs,
    MosaicDuplicatePolicy,
    LoggingLevel,
    LoggingFile,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::MapZoom,
    ConfigKey::MapCenterLat,
    ConfigKey::MapCenterLon,
    ConfigKey::MapViewportWidth,
    ConfigKey::MapViewportHeight,
    ConfigKey::ProviderTileUrl,
    ConfigKey::ProviderTileSize,
    ConfigKey::ProviderMinZoom,
    ConfigKey::ProviderMaxZoom,
    ConfigKey::ProviderTimeoutSecs,
    ConfigKey::EmbeddingUrl,
    ConfigKey::EmbeddingTimeoutSecs,
    ConfigKey::MosaicDuplicatePolicy,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingFile,
];

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    /// INI section holding this key.
    pub fn section(&self) -> &'static str {
        match self {
            Self::MapZoom
            | Self::MapCenterLat
            | Self::MapCenterLon
            | Self::MapViewportWidth
            | Self::MapViewportHeight => "map",
            Self::ProviderTileUrl
            | Self::ProviderTileSize
            | Self::ProviderMinZoom
            | Self::ProviderMaxZoom
            | Self::ProviderTimeoutSecs => "provider",
            Self::EmbeddingUrl | Self::EmbeddingTimeoutSecs => "embedding",
            Self::MosaicDuplicatePolicy => "mosaic",
            Self::LoggingLevel | Self::LoggingFile => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            Self::MapZoom => "zoom",
            Self::MapCenterLat => "center_lat",
            Self::MapCenterLon => "center_lon",
            Self::MapViewportWidth => "viewport_width",
            Self::MapViewportHeight => "viewport_height",
            Self::ProviderTileUrl => "tile_url",
            Self::ProviderTileSize => "tile_size",
            Self::ProviderMinZoom => "min_zoom",
            Self::ProviderMaxZoom => "max_zoom",
            Self::ProviderTimeoutSecs => "timeout_secs",
            Self::EmbeddingUrl => "url",
            Self::EmbeddingTimeoutSecs => "timeout_secs",
            Self::MosaicDuplicatePolicy => "duplicate_policy",
            Self::LoggingLevel => "level",
            Self::LoggingFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Reads the current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            Self::MapZoom => config.map.zoom.to_string(),
            Self::MapCenterLat => config.map.center_lat.to_string(),
            Self::MapCenterLon => config.map.center_lon.to_string(),
            Self::MapViewportWidth => config.map.viewport_width.to_string(),
            Self::MapViewportHeight => config.map.viewport_height.to_string(),
            Self::ProviderTileUrl => config.provider.tile_url.clone(),
            Self::ProviderTileSize => config.provider.tile_size.to_string(),
            Self::ProviderMinZoom => config.provider.min_zoom.to_string(),
            Self::ProviderMaxZoom => config.provider.max_zoom.to_string(),
            Self::ProviderTimeoutSecs => config.provider.timeout_secs.to_string(),
            Self::EmbeddingUrl => config.embedding.url.clone(),
            Self::EmbeddingTimeoutSecs => config.embedding.timeout_secs.to_string(),
            Self::MosaicDuplicatePolicy => config.mosaic.duplicate_policy.to_string(),
            Self::LoggingLevel => config.logging.level.clone(),
            Self::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parses `value` and stores it.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            Self::MapZoom => config.map.zoom = self.parse(value)?,
            Self::MapCenterLat => config.map.center_lat = self.parse(value)?,
            Self::MapCenterLon => config.map.center_lon = self.parse(value)?,
            Self::MapViewportWidth => config.map.viewport_width = self.parse(value)?,
            Self::MapViewportHeight => config.map.viewport_height = self.parse(value)?,
            Self::ProviderTileUrl => config.provider.tile_url = self.non_empty(value)?,
            Self::ProviderTileSize => config.provider.tile_size = self.parse(value)?,
            Self::ProviderMinZoom => config.provider.min_zoom = self.parse(value)?,
            Self::ProviderMaxZoom => config.provider.max_zoom = self.parse(value)?,
            Self::ProviderTimeoutSecs => config.provider.timeout_secs = self.parse(value)?,
            Self::EmbeddingUrl => config.embedding.url = self.non_empty(value)?,
            Self::EmbeddingTimeoutSecs => config.embedding.timeout_secs = self.parse(value)?,
            Self::MosaicDuplicatePolicy => {
                config.mosaic.duplicate_policy = DuplicatePolicy::from_config_str(value)
                    .ok_or_else(|| {
                        self.invalid(value, "expected 'last_writer_wins' or 'reject'")
                    })?
            }
            Self::LoggingLevel => config.logging.level = self.non_empty(value)?,
            Self::LoggingFile => {
                config.logging.file = (!value.is_empty()).then(|| PathBuf::from(value))
            }
        }
        Ok(())
    }

    fn parse<T>(&self, value: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        value
            .parse()
            .map_err(|e: T::Err| self.invalid(value, &e.to_string()))
    }

    fn non_empty(&self, value: &str) -> Result<String, ConfigError> {
        if value.is_empty() {
            return Err(self.invalid(value, "must not be empty"));
        }
        Ok(value.to_string())
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_KEYS
            .iter()
            .copied()
            .find(|k| k.name() == s.trim())
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!(
            "embedding.url".parse::<ConfigKey>().unwrap(),
            ConfigKey::EmbeddingUrl
        );
        assert_eq!(
            "provider.timeout_secs".parse::<ConfigKey>().unwrap(),
            ConfigKey::ProviderTimeoutSecs
        );
        assert!(matches!(
            "map.nope".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<String> = ConfigKey::all().iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ConfigKey::all().len());
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();
        ConfigKey::MapZoom.set(&mut config, "16.5").unwrap();
        ConfigKey::MosaicDuplicatePolicy
            .set(&mut config, "reject")
            .unwrap();

        assert_eq!(ConfigKey::MapZoom.get(&config), "16.5");
        assert_eq!(config.mosaic.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_set_invalid_number() {
        let mut config = ConfigFile::default();
        let result = ConfigKey::ProviderTileSize.set(&mut config, "big");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_logging_file_unset() {
        let mut config = ConfigFile::default();
        ConfigKey::LoggingFile
            .set(&mut config, "/tmp/samgeo.log")
            .unwrap();
        assert_eq!(ConfigKey::LoggingFile.get(&config), "/tmp/samgeo.log");

        ConfigKey::LoggingFile.set(&mut config, "").unwrap();
        assert!(config.logging.file.is_none());
        assert_eq!(ConfigKey::LoggingFile.get(&config), "");
    }
}
