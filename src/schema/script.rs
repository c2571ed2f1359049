use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A single line of a flat, non-branching script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub text: String,
    #[serde(default)]
    pub portrait: Option<String>,
    /// Sound cue played when the line is shown.
    #[serde(default)]
    pub voice_over: Option<String>,
}

impl DialogueLine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            portrait: None,
            voice_over: None,
        }
    }
}

/// A flat script read line by line on each interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "Script")]
pub struct DialogueScript {
    pub npc_name: String,
    pub lines: Vec<DialogueLine>,
}

impl DialogueScript {
    /// Load a script from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<DialogueScript, ScriptError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a script from a RON string.
    pub fn parse_ron(input: &str) -> Result<DialogueScript, ScriptError> {
        Ok(ron::from_str(input)?)
    }
}
