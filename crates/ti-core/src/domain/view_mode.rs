//! # View Mode
//!
//! Which projection is on screen. Switching never touches the data.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Flat textual dump.
    #[default]
    Text,
    /// Decorated hierarchical diagram.
    Tree,
}

impl ViewMode {
    pub fn other(self) -> Self {
        match self {
            ViewMode::Text => ViewMode::Tree,
            ViewMode::Tree => ViewMode::Text,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Text => f.write_str("text"),
            ViewMode::Tree => f.write_str("tree"),
        }
    }
}

/// Two-state switch, initially [`ViewMode::Text`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewModeController {
    mode: ViewMode,
}

impl ViewModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> ViewMode {
        self.mode
    }

    /// Idempotent. Returns whether the mode changed.
    pub fn switch_to(&mut self, mode: ViewMode) -> bool {
        if self.mode == mode {
            return false;
        }
        debug!(from = %self.mode, to = %mode, "View mode switched");
        self.mode = mode;
        true
    }

    pub fn toggle(&mut self) -> ViewMode {
        self.switch_to(self.mode.other());
        self.mode
    }
}
