#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No free cell is left for food; the game cannot produce a next state.
    BoardFull { grid_size: usize },
    InvalidSettings(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::BoardFull { grid_size } => {
                write!(f, "No free cell left for food on a {0}x{0} board", grid_size)
            }
            EngineError::InvalidSettings(reason) => write!(f, "Invalid settings: {}", reason),
        }
    }
}

impl std::error::Error for EngineError {}
