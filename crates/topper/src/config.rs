use std::path::Path;

use anyhow::{Context, Result};
use hotkey_registry::Key;
use serde::{Deserialize, Serialize};

const DEFAULT_HOTKEY: &str = "ctrl+shift+enter";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Combinations that toggle the window
    pub hotkeys: Vec<Key>,
    /// Show the window at startup instead of waiting for the first press
    pub start_visible: bool,
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Statically known to parse.
            hotkeys: Key::parse(DEFAULT_HOTKEY).into_iter().collect(),
            start_visible: false,
            title: "Topper".to_string(),
        }
    }
}

impl Config {
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).context("Invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        Self::from_ron(&text)
    }

    /// Replace the configured hotkeys if any were given on the command line
    pub fn with_hotkeys(mut self, keys: Vec<Key>) -> Self {
        if !keys.is_empty() {
            self.hotkeys = keys;
        }
        self
    }
}
