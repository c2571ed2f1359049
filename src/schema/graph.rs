/// Dialogue graph — authoring types, RON loading, and structural queries.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use thiserror::Error;

use super::node::{DialogueNode, DialogueOption, NodeId};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("duplicate node key '{0}'")]
    DuplicateNode(String),
    #[error("node '{from}' has an option leading to unknown node '{target}'")]
    UnknownNode { from: String, target: String },
    #[error("start node '{0}' does not exist")]
    UnknownStart(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Authoring description of an option. `next` names a node by key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionSpec {
    pub text: String,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub next: Option<String>,
}

impl OptionSpec {
    /// An option that leads to the node with the given key.
    pub fn to(text: &str, next: &str) -> Self {
        Self {
            text: text.to_string(),
            score: 0,
            next: Some(next.to_string()),
        }
    }

    /// An option that closes the conversation.
    pub fn end(text: &str) -> Self {
        Self {
            text: text.to_string(),
            score: 0,
            next: None,
        }
    }

    pub fn score(mut self, delta: i32) -> Self {
        self.score = delta;
        self
    }
}

/// Authoring description of a node, keyed by a unique string.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub key: String,
    pub text: String,
    pub portrait: Option<String>,
    pub options: Vec<OptionSpec>,
    pub next_scene: Option<String>,
}

impl NodeSpec {
    pub fn new(key: &str, text: &str) -> Self {
        Self {
            key: key.to_string(),
            text: text.to_string(),
            portrait: None,
            options: Vec::new(),
            next_scene: None,
        }
    }

    pub fn portrait(mut self, sprite: &str) -> Self {
        self.portrait = Some(sprite.to_string());
        self
    }

    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn next_scene(mut self, scene: &str) -> Self {
        self.next_scene = Some(scene.to_string());
        self
    }
}

// The RON file keys nodes by name, so the node body carries no key of its own.

#[derive(Debug, Deserialize)]
struct RonNode {
    text: String,
    #[serde(default)]
    portrait: Option<String>,
    #[serde(default)]
    options: Vec<OptionSpec>,
    #[serde(default)]
    next_scene: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "DialogueFile")]
struct RonDialogueFile {
    npc_name: String,
    #[serde(default)]
    start: Option<String>,
    nodes: BTreeMap<String, RonNode>,
}

/// An immutable graph of dialogue nodes. Cycles are allowed.
#[derive(Debug, Clone)]
pub struct DialogueGraph {
    npc_name: String,
    nodes: Vec<DialogueNode>,
    index: FxHashMap<String, NodeId>,
    start: Option<NodeId>,
}

/// Builder for constructing a `DialogueGraph` in code.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    npc_name: String,
    start: Option<String>,
    nodes: Vec<NodeSpec>,
}

impl DialogueGraph {
    pub fn builder(npc_name: &str) -> GraphBuilder {
        GraphBuilder {
            npc_name: npc_name.to_string(),
            start: None,
            nodes: Vec::new(),
        }
    }

    /// Load a dialogue graph from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<DialogueGraph, GraphError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a dialogue graph from a RON string.
    ///
    /// Node ids are assigned in key order, so the same file always
    /// produces the same ids.
    pub fn parse_ron(input: &str) -> Result<DialogueGraph, GraphError> {
        let raw: RonDialogueFile = ron::from_str(input)?;
        let mut builder = DialogueGraph::builder(&raw.npc_name);
        builder.start = raw.start;
        for (key, node) in raw.nodes {
            builder.nodes.push(NodeSpec {
                key,
                text: node.text,
                portrait: node.portrait,
                options: node.options,
                next_scene: node.next_scene,
            });
        }
        builder.build()
    }

    pub fn npc_name(&self) -> &str {
        &self.npc_name
    }

    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    pub fn node(&self, id: NodeId) -> Option<&DialogueNode> {
        self.nodes.get(id.index())
    }

    /// Look up a node id by its authoring key.
    pub fn find(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn nodes(&self) -> &[DialogueNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes reachable from the start node by following options.
    pub fn reachable(&self) -> FxHashSet<NodeId> {
        let mut seen = FxHashSet::default();
        let mut queue: VecDeque<NodeId> = self.start.into_iter().collect();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.node(id) {
                queue.extend(node.options.iter().filter_map(|o| o.next));
            }
        }
        seen
    }

    /// Nodes that can never be shown, in id order.
    pub fn unreachable(&self) -> Vec<NodeId> {
        let reachable = self.reachable();
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|id| !reachable.contains(id))
            .collect()
    }

    /// Nodes from which no sequence of choices ever closes the
    /// conversation, in id order. A node is an exit if it is terminal or
    /// has at least one option without a follow-up node.
    pub fn trapped(&self) -> Vec<NodeId> {
        let mut incoming: Vec<Vec<NodeId>> = vec![Vec::new(); self.nodes.len()];
        let mut queue = VecDeque::new();
        for node in &self.nodes {
            if node.is_terminal() || node.options.iter().any(|o| o.next.is_none()) {
                queue.push_back(node.id);
            }
            for next in node.options.iter().filter_map(|o| o.next) {
                incoming[next.index()].push(node.id);
            }
        }

        let mut escapes = FxHashSet::default();
        while let Some(id) = queue.pop_front() {
            if !escapes.insert(id) {
                continue;
            }
            queue.extend(incoming[id.index()].iter().copied());
        }

        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|id| !escapes.contains(id))
            .collect()
    }
}

impl GraphBuilder {
    /// Set the node the conversation opens on. Without a start node the
    /// graph is inert and sessions over it never activate.
    pub fn start(mut self, key: &str) -> Self {
        self.start = Some(key.to_string());
        self
    }

    pub fn node(mut self, node: NodeSpec) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn build(self) -> Result<DialogueGraph, GraphError> {
        let mut index = FxHashMap::default();
        for (i, spec) in self.nodes.iter().enumerate() {
            if index.insert(spec.key.clone(), NodeId(i as u32)).is_some() {
                return Err(GraphError::DuplicateNode(spec.key.clone()));
            }
        }

        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (i, spec) in self.nodes.into_iter().enumerate() {
            let mut options = Vec::with_capacity(spec.options.len());
            for opt in spec.options {
                let next = match opt.next {
                    Some(target) => match index.get(&target) {
                        Some(id) => Some(*id),
                        None => {
                            return Err(GraphError::UnknownNode {
                                from: spec.key,
                                target,
                            })
                        }
                    },
                    None => None,
                };
                options.push(DialogueOption {
                    text: opt.text,
                    score: opt.score,
                    next,
                });
            }
            nodes.push(DialogueNode {
                id: NodeId(i as u32),
                key: spec.key,
                text: spec.text,
                portrait: spec.portrait,
                options,
                next_scene: spec.next_scene,
            });
        }

        let start = match self.start {
            Some(key) => Some(
                index
                    .get(&key)
                    .copied()
                    .ok_or(GraphError::UnknownStart(key))?,
            ),
            None => None,
        };

        Ok(DialogueGraph {
            npc_name: self.npc_name,
            nodes,
            index,
            start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_cycle() -> DialogueGraph {
        DialogueGraph::builder("Myung-gil")
            .start("a")
            .node(NodeSpec::new("a", "Ping?").option(OptionSpec::to("Pong", "b")))
            .node(NodeSpec::new("b", "Pong?").option(OptionSpec::to("Ping", "a")))
            .build()
            .unwrap()
    }

    #[test]
    fn builder_assigns_ids_in_order() {
        let graph = two_node_cycle();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.find("a"), Some(NodeId(0)));
        assert_eq!(graph.find("b"), Some(NodeId(1)));
        assert_eq!(graph.start(), Some(NodeId(0)));
        assert_eq!(graph.npc_name(), "Myung-gil");
    }

    #[test]
    fn builder_resolves_option_targets() {
        let graph = two_node_cycle();
        let a = graph.node(NodeId(0)).unwrap();
        assert_eq!(a.options[0].next, Some(NodeId(1)));
        let b = graph.node(NodeId(1)).unwrap();
        assert_eq!(b.options[0].next, Some(NodeId(0)));
    }

    #[test]
    fn duplicate_key_rejected() {
        let result = DialogueGraph::builder("npc")
            .node(NodeSpec::new("a", "one"))
            .node(NodeSpec::new("a", "two"))
            .build();
        assert!(matches!(result, Err(GraphError::DuplicateNode(k)) if k == "a"));
    }

    #[test]
    fn unknown_target_rejected() {
        let result = DialogueGraph::builder("npc")
            .node(NodeSpec::new("a", "one").option(OptionSpec::to("go", "nowhere")))
            .build();
        assert!(matches!(
            result,
            Err(GraphError::UnknownNode { from, target }) if from == "a" && target == "nowhere"
        ));
    }

    #[test]
    fn unknown_start_rejected() {
        let result = DialogueGraph::builder("npc")
            .start("missing")
            .node(NodeSpec::new("a", "one"))
            .build();
        assert!(matches!(result, Err(GraphError::UnknownStart(k)) if k == "missing"));
    }

    #[test]
    fn graph_without_start_is_inert() {
        let graph = DialogueGraph::builder("npc").build().unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.start(), None);
        assert!(graph.reachable().is_empty());
    }

    #[test]
    fn parse_ron_with_defaults() {
        let input = r#"DialogueFile(
            npc_name: "Myung-gil",
            start: Some("greeting"),
            nodes: {
                "greeting": (
                    text: "Hello.",
                    portrait: Some("smile"),
                    options: [
                        (text: "Who are you?", next: Some("intro")),
                        (text: "Bye.", score: -1),
                    ],
                ),
                "intro": (text: "I keep the gate.", next_scene: Some("Town")),
            },
        )"#;
        let graph = DialogueGraph::parse_ron(input).unwrap();
        let greeting = graph.node(graph.find("greeting").unwrap()).unwrap();
        assert_eq!(greeting.portrait.as_deref(), Some("smile"));
        assert_eq!(greeting.options.len(), 2);
        assert_eq!(greeting.options[0].score, 0);
        assert_eq!(greeting.options[1].score, -1);
        assert_eq!(greeting.options[1].next, None);

        let intro = graph.node(graph.find("intro").unwrap()).unwrap();
        assert!(intro.is_terminal());
        assert_eq!(intro.scene(), Some("Town"));
    }

    #[test]
    fn parse_ron_syntax_error() {
        assert!(matches!(
            DialogueGraph::parse_ron("DialogueFile(npc_name: "),
            Err(GraphError::Ron(_))
        ));
    }

    #[test]
    fn unreachable_nodes_listed() {
        let graph = DialogueGraph::builder("npc")
            .start("a")
            .node(NodeSpec::new("a", "hi").option(OptionSpec::end("bye")))
            .node(NodeSpec::new("orphan", "never shown"))
            .build()
            .unwrap();
        assert_eq!(graph.unreachable(), vec![NodeId(1)]);
    }

    #[test]
    fn cycle_without_exit_is_trapped() {
        let graph = two_node_cycle();
        assert_eq!(graph.trapped(), vec![NodeId(0), NodeId(1)]);
    }

    #[test]
    fn cycle_with_exit_is_not_trapped() {
        let graph = DialogueGraph::builder("npc")
            .start("a")
            .node(
                NodeSpec::new("a", "Ping?")
                    .option(OptionSpec::to("Pong", "b"))
                    .option(OptionSpec::end("Leave")),
            )
            .node(NodeSpec::new("b", "Pong?").option(OptionSpec::to("Ping", "a")))
            .build()
            .unwrap();
        assert!(graph.trapped().is_empty());
    }
}
