use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{BlockColor, DEFAULT_COLORS},
};

/// Construction-time settings of a [`GameEngine`](crate::GameEngine).
///
/// Missing fields fall back to their defaults when deserializing, so a
/// partial JSON file such as `{"cols": 12}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    /// Colors dealt to new blocks, in bag order before shuffling.
    pub colors: Vec<BlockColor>,
}

impl EngineConfig {
    pub const DEFAULT_ROWS: usize = 20;
    pub const DEFAULT_COLS: usize = 10;

    /// Checks that the board has room and that blocks can be colored.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::NoRows);
        }
        if self.cols == 0 {
            return Err(ConfigError::NoColumns);
        }
        if self.colors.is_empty() {
            return Err(ConfigError::NoColors);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: Self::DEFAULT_ROWS,
            cols: Self::DEFAULT_COLS,
            colors: DEFAULT_COLORS.map(BlockColor::from).to_vec(),
        }
    }
}
