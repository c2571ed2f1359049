use serde::{Deserialize, Serialize};

/// Newtype wrapper for node IDs. Dense index into a graph's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A player-selectable response.
///
/// An option can lead to another node, carry a score delta, or both.
/// An option without a `next` node closes the conversation (or hands off
/// to the owning node's `next_scene`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueOption {
    pub text: String,
    pub score: i32,
    pub next: Option<NodeId>,
}

/// One beat of dialogue: what the NPC says and how the player may reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: NodeId,
    /// Authoring key, unique within a graph.
    pub key: String,
    pub text: String,
    /// Sprite key for the speaker portrait. `None` keeps whatever is shown.
    pub portrait: Option<String>,
    pub options: Vec<DialogueOption>,
    /// Scene to request when the conversation leaves this node without
    /// a follow-up node.
    pub next_scene: Option<String>,
}

impl DialogueNode {
    /// A node with no options cannot be advanced by the player.
    pub fn is_terminal(&self) -> bool {
        self.options.is_empty()
    }

    /// The scene this node hands off to, ignoring empty names.
    pub fn scene(&self) -> Option<&str> {
        self.next_scene.as_deref().filter(|s| !s.is_empty())
    }
}
