use serde::{Deserialize, Serialize};
use snake_engine::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use snake_engine::snake::{GameMode, SnakeSessionSettings};

pub const DEFAULT_CONFIG_FILE: &str = "spectator.yaml";

pub fn get_config_manager(
    file_path: &str,
) -> ConfigManager<FileContentConfigProvider, SpectatorConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(file_path)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectatorConfig {
    pub session: SnakeSessionSettings,
    /// Autoplay games running side by side.
    pub live_games: usize,
    /// Games played by each slot before it stops; 0 keeps playing until Ctrl+C.
    pub rounds: u32,
    /// Modes handed out to slots in turn.
    pub modes: Vec<GameMode>,
    /// Fixed base seed for reproducible runs.
    pub seed: Option<u64>,
    pub report_interval_ms: u64,
}

impl Default for SpectatorConfig {
    fn default() -> Self {
        Self {
            session: SnakeSessionSettings::default(),
            live_games: 4,
            rounds: 1,
            modes: vec![GameMode::Walls, GameMode::PassThrough],
            seed: None,
            report_interval_ms: 2000,
        }
    }
}

impl SpectatorConfig {
    pub fn mode_for_slot(&self, slot: usize) -> GameMode {
        self.modes
            .get(slot % self.modes.len().max(1))
            .copied()
            .unwrap_or(GameMode::Walls)
    }
}

impl Validate for SpectatorConfig {
    fn validate(&self) -> Result<(), String> {
        self.session.validate()?;
        if self.live_games == 0 || self.live_games > 64 {
            return Err("live_games must be between 1 and 64".to_string());
        }
        if self.modes.is_empty() {
            return Err("modes must list at least one game mode".to_string());
        }
        if self.report_interval_ms < 100 {
            return Err("report_interval_ms must be at least 100".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_engine::config::{ConfigContentProvider, ConfigSerializer};

    fn get_temp_file_path() -> String {
        let mut path = std::env::temp_dir();
        let random_number = std::process::id() ^ (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0));
        path.push(format!("temp_snake_spectator_config_{}.yaml", random_number));
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SpectatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_file() {
        let config = SpectatorConfig {
            seed: Some(7),
            ..SpectatorConfig::default()
        };
        let serializer = YamlConfigSerializer::new();
        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(file_path.clone());

        let serialized = serializer.serialize(&config).unwrap();
        assert!(serialized.contains("pass-through"));
        content_provider.set_config_content(&serialized).unwrap();

        let loaded = get_config_manager(&file_path).get_config().unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_config_file_does_not_exist_returns_default_config() {
        let loaded = get_config_manager("this_file_does_not_exist.yaml").get_config().unwrap();
        assert_eq!(loaded, SpectatorConfig::default());
    }

    #[test]
    fn test_empty_modes_are_rejected() {
        let config = SpectatorConfig {
            modes: vec![],
            ..SpectatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_modes_rotate_over_slots() {
        let config = SpectatorConfig::default();
        assert_eq!(config.mode_for_slot(0), GameMode::Walls);
        assert_eq!(config.mode_for_slot(1), GameMode::PassThrough);
        assert_eq!(config.mode_for_slot(2), GameMode::Walls);
    }
}
