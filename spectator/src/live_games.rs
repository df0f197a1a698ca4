use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snake_engine::SessionRng;
use snake_engine::snake::GameMode;

const ADJECTIVES: &[&str] = &[
    "Pixel", "Shadow", "Neon", "Cyber", "Retro", "Arcade", "Glow", "Void",
    "Phosphor", "Echo", "Ice", "Nova", "Hex", "Frost", "Thunder", "Crimson",
];

const NOUNS: &[&str] = &[
    "Viper", "Master", "Byte", "Snake", "Glitch", "King", "Worm", "Runner",
    "Knight", "Venom", "Strike", "Engineer", "Wave", "Echo", "Path", "Crusher",
];

pub fn generate_username(rng: &mut SessionRng) -> String {
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    format!("{}{}", adjective, noun)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiveGameId(String);

impl LiveGameId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LiveGameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a spectator listing shows for one running game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveGameSummary {
    pub id: LiveGameId,
    pub username: String,
    pub score: u32,
    pub mode: GameMode,
    #[serde(rename = "startedAt")]
    pub started_at: DateTime<Utc>,
}

/// Games currently in progress. Only the listing is shared; every game keeps
/// its own session state.
#[derive(Clone, Default)]
pub struct LiveGameBoard {
    games: Arc<Mutex<HashMap<LiveGameId, LiveGameSummary>>>,
}

impl LiveGameBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<LiveGameId, LiveGameSummary>> {
        self.games.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, summary: LiveGameSummary) {
        self.lock().insert(summary.id.clone(), summary);
    }

    pub fn update_score(&self, id: &LiveGameId, score: u32) {
        if let Some(summary) = self.lock().get_mut(id) {
            summary.score = score;
        }
    }

    pub fn remove(&self, id: &LiveGameId) -> Option<LiveGameSummary> {
        self.lock().remove(id)
    }

    #[cfg(test)]
    pub fn get(&self, id: &LiveGameId) -> Option<LiveGameSummary> {
        self.lock().get(id).cloned()
    }

    /// Highest score first, ties broken by id.
    pub fn list(&self) -> Vec<LiveGameSummary> {
        let mut games: Vec<LiveGameSummary> = self.lock().values().cloned().collect();
        games.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.as_str().cmp(b.id.as_str())));
        games
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, score: u32) -> LiveGameSummary {
        LiveGameSummary {
            id: LiveGameId::new(id.to_string()),
            username: "PixelViper".to_string(),
            score,
            mode: GameMode::Walls,
            started_at: Utc::now(),
        }
    }

    #[test]
    fn test_list_is_sorted_by_score() {
        let board = LiveGameBoard::new();
        board.insert(summary("game_001", 890));
        board.insert(summary("game_002", 1240));
        board.insert(summary("game_003", 520));

        let ids: Vec<String> = board.list().iter().map(|g| g.id.to_string()).collect();
        assert_eq!(ids, vec!["game_002", "game_001", "game_003"]);
    }

    #[test]
    fn test_update_and_remove() {
        let board = LiveGameBoard::new();
        let id = LiveGameId::new("game_001".to_string());
        board.insert(summary("game_001", 0));
        board.update_score(&id, 30);
        assert_eq!(board.get(&id).unwrap().score, 30);

        let removed = board.remove(&id).unwrap();
        assert_eq!(removed.score, 30);
        assert!(board.is_empty());
        board.update_score(&id, 40);
        assert!(board.get(&id).is_none());
    }

    #[test]
    fn test_summary_uses_listing_field_names() {
        let yaml = serde_yaml_ng::to_string(&summary("game_001", 10)).unwrap();
        assert!(yaml.contains("startedAt:"));
        assert!(yaml.contains("mode: walls"));
    }

    #[test]
    fn test_generated_usernames_are_reproducible() {
        let mut a = SessionRng::new(3);
        let mut b = SessionRng::new(3);
        assert_eq!(generate_username(&mut a), generate_username(&mut b));
    }
}
