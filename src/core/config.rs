/// Per-NPC tuning, loaded from RON alongside the dialogue content.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Named sound cues. Each is optional; a missing cue is simply not played.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundSet {
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub close: Option<String>,
    #[serde(default)]
    pub pop: Option<String>,
    #[serde(default)]
    pub typing: Option<String>,
}

/// Interaction and presentation settings for one NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "Npc", default)]
pub struct NpcConfig {
    /// Overrides the speaker name stored with the dialogue content.
    pub npc_name: Option<String>,
    /// Maximum player distance for the interact trigger, in world units.
    pub interact_distance: f32,
    /// Leaving interaction range closes an open conversation.
    pub end_on_exit: bool,
    /// Seconds per revealed character.
    pub typing_speed: f32,
    pub use_typing_effect: bool,
    /// Peak portrait scale of the pop effect.
    pub pop_scale: f32,
    /// Seconds for the full pop, up and back down.
    pub pop_duration: f32,
    pub sounds: SoundSet,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            npc_name: None,
            interact_distance: 2.0,
            end_on_exit: true,
            typing_speed: 0.05,
            use_typing_effect: true,
            pop_scale: 1.2,
            pop_duration: 0.2,
            sounds: SoundSet::default(),
        }
    }
}

impl NpcConfig {
    /// Load settings from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<NpcConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse settings from a RON string. Omitted fields take their defaults.
    pub fn parse_ron(input: &str) -> Result<NpcConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    /// The speaker name to show, preferring the configured override.
    pub fn speaker<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.npc_name.as_deref().unwrap_or(fallback)
    }
}
