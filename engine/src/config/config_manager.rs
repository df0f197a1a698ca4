use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use super::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

/// Loads a config once, validates it and caches the result. A missing source
/// yields `TConfig::default()`.
pub struct ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_serializer: TConfigSerializer,
    config_content_provider: TConfigContentProvider,
    config: Mutex<Option<TConfig>>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(
            FileContentConfigProvider::new(file_path),
            YamlConfigSerializer::new(),
        )
    }
}

impl<TConfigContentProvider, TConfig, TConfigSerializer>
    ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(
        config_content_provider: TConfigContentProvider,
        config_serializer: TConfigSerializer,
    ) -> Self {
        Self {
            config: Mutex::new(None),
            config_content_provider,
            config_serializer,
        }
    }

    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config cache lock poisoned".to_string())?;

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        let Some(config_data) = self.config_content_provider.get_config_content()? else {
            return Ok(TConfig::default());
        };

        let config = self.config_serializer.deserialize(&config_data)?;
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        *current = Some(config.clone());
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let serialized_config = self.config_serializer.serialize(config)?;
        self.config_content_provider
            .set_config_content(&serialized_config)?;

        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config cache lock poisoned".to_string())?;
        *current = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::SnakeSessionSettings;

    fn get_temp_file_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_snake_engine_config_{}.yaml", random_number));
        path
    }

    #[test]
    fn test_missing_file_returns_default() {
        let manager: ConfigManager<_, SnakeSessionSettings, _> =
            ConfigManager::from_yaml_file("this_file_does_not_exist.yaml");
        let loaded = manager.get_config().unwrap();
        assert_eq!(loaded, SnakeSessionSettings::default());
    }

    #[test]
    fn test_set_then_get_round_trips_through_file() {
        let file_path = get_temp_file_path();
        let settings = SnakeSessionSettings {
            grid_size: 12,
            ..SnakeSessionSettings::default()
        };

        let writer = ConfigManager::from_yaml_file(file_path.clone());
        writer.set_config(&settings).unwrap();

        let reader: ConfigManager<_, SnakeSessionSettings, _> =
            ConfigManager::from_yaml_file(file_path.clone());
        assert_eq!(reader.get_config().unwrap(), settings);

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_invalid_config_is_rejected_on_load() {
        let file_path = get_temp_file_path();
        std::fs::write(&file_path, "grid_size: 2\n").unwrap();

        let manager: ConfigManager<_, SnakeSessionSettings, _> =
            ConfigManager::from_yaml_file(file_path.clone());
        let result = manager.get_config();
        assert!(result.unwrap_err().contains("Config validation error"));

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_invalid_config_is_not_written() {
        let file_path = get_temp_file_path();
        let settings = SnakeSessionSettings {
            grid_size: 0,
            ..SnakeSessionSettings::default()
        };

        let manager = ConfigManager::from_yaml_file(file_path.clone());
        assert!(manager.set_config(&settings).is_err());
        assert!(!file_path.exists());
    }
}
