/// Branching dialogue session — traversal of a `DialogueGraph`.
///
/// A session is either inactive or sitting on one node of the graph. The
/// player moves through the graph by picking options; a session never
/// stays active on a node that offers no options.

use crate::core::config::NpcConfig;
use crate::core::display::{DialogueDisplay, OptionSlots};
use crate::core::effects::PopTween;
use crate::core::proximity::{ActorKind, Proximity, ProximityOracle, RangeChange};
use crate::core::scene::SceneRequester;
use crate::core::score::ScoreKeeper;
use crate::schema::graph::DialogueGraph;
use crate::schema::node::{DialogueNode, NodeId};

/// Game-side collaborators handed to every session call.
pub struct Host<'a> {
    pub display: &'a mut dyn DialogueDisplay,
    pub score: &'a mut dyn ScoreKeeper,
    pub scenes: &'a mut dyn SceneRequester,
}

impl<'a> Host<'a> {
    pub fn new(
        display: &'a mut dyn DialogueDisplay,
        score: &'a mut dyn ScoreKeeper,
        scenes: &'a mut dyn SceneRequester,
    ) -> Self {
        Self {
            display,
            score,
            scenes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Inactive,
    Active(NodeId),
}

/// What a session call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The call was not applicable and changed nothing.
    Ignored,
    /// The session is now showing this node.
    Advanced(NodeId),
    /// The session closed.
    Ended,
    /// The session closed and handed off to a scene.
    SceneRequested(String),
}

pub struct DialogueSession<'g> {
    graph: &'g DialogueGraph,
    config: NpcConfig,
    state: SessionState,
    proximity: Proximity,
    slots: OptionSlots,
    pop: Option<PopTween>,
}

impl<'g> DialogueSession<'g> {
    pub fn new(graph: &'g DialogueGraph) -> Self {
        Self::with_config(graph, NpcConfig::default())
    }

    pub fn with_config(graph: &'g DialogueGraph, config: NpcConfig) -> Self {
        Self {
            graph,
            config,
            state: SessionState::Inactive,
            proximity: Proximity::default(),
            slots: OptionSlots::new(),
            pop: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn current_node(&self) -> Option<&'g DialogueNode> {
        let graph = self.graph;
        match self.state {
            SessionState::Active(id) => graph.node(id),
            SessionState::Inactive => None,
        }
    }

    pub fn player_in_range(&self) -> bool {
        self.proximity.in_range()
    }

    pub fn slots(&self) -> &OptionSlots {
        &self.slots
    }

    pub fn config(&self) -> &NpcConfig {
        &self.config
    }

    /// Open the conversation on the graph's start node. Ignores range, so
    /// scripted events can call it directly.
    pub fn start(&mut self, host: &mut Host<'_>) -> Step {
        if self.is_active() {
            log::debug!("start ignored: conversation already open");
            return Step::Ignored;
        }
        let Some(start) = self.graph.start() else {
            log::debug!("start ignored: '{}' has no start node", self.graph.npc_name());
            return Step::Ignored;
        };

        host.display.set_panel_visible(true);
        if let Some(cue) = &self.config.sounds.open {
            host.display.play_cue(cue);
        }
        self.enter_node(start, host)
    }

    /// Pick option `index` of the current node.
    pub fn select_option(&mut self, index: usize, host: &mut Host<'_>) -> Step {
        let graph = self.graph;
        let SessionState::Active(current) = self.state else {
            log::debug!("option {} ignored: no conversation open", index);
            return Step::Ignored;
        };
        let Some(node) = graph.node(current) else {
            return self.end(host);
        };
        let Some(option) = node.options.get(index) else {
            log::debug!(
                "option {} ignored: node '{}' has {} options",
                index,
                node.key,
                node.options.len()
            );
            return Step::Ignored;
        };

        if option.score != 0 {
            host.score.add(option.score);
        }

        match (option.next, node.scene()) {
            (Some(next), _) => self.enter_node(next, host),
            (None, Some(scene)) => self.hand_off(scene, host),
            (None, None) => self.end(host),
        }
    }

    /// Route a click on a display slot to the option bound to it.
    pub fn click_slot(&mut self, slot: usize, host: &mut Host<'_>) -> Step {
        match self.slots.option_for(slot) {
            Some(index) => self.select_option(index, host),
            None => {
                log::debug!("click on unbound slot {}", slot);
                Step::Ignored
            }
        }
    }

    /// Close the conversation. Closing an inactive session does nothing.
    pub fn end(&mut self, host: &mut Host<'_>) -> Step {
        if !self.is_active() {
            return Step::Ignored;
        }
        self.state = SessionState::Inactive;
        self.slots.unbind(&mut *host.display);
        if self.pop.take().is_some() {
            host.display.set_portrait_scale(1.0);
        }
        host.display.set_panel_visible(false);
        if let Some(cue) = &self.config.sounds.close {
            host.display.play_cue(cue);
        }
        log::debug!("conversation with '{}' closed", self.graph.npc_name());
        Step::Ended
    }

    /// The interact trigger: opens the conversation, or closes an open
    /// one. Requires the player to be in range.
    pub fn interact(&mut self, host: &mut Host<'_>) -> Step {
        if !self.proximity.in_range() {
            log::debug!("interact ignored: player out of range");
            return Step::Ignored;
        }
        match self.state {
            SessionState::Inactive => self.start(host),
            SessionState::Active(_) => self.end(host),
        }
    }

    pub fn on_trigger_enter(&mut self, actor: ActorKind) {
        self.proximity.enter(actor);
    }

    pub fn on_trigger_exit(&mut self, actor: ActorKind, host: &mut Host<'_>) -> Step {
        let change = self.proximity.exit(actor);
        self.apply_range_change(change, host)
    }

    /// Per-frame update. Polls `oracle` for the player's distance when the
    /// game tracks range by distance, and advances the portrait pop.
    pub fn tick(
        &mut self,
        dt: f32,
        oracle: Option<&dyn ProximityOracle>,
        host: &mut Host<'_>,
    ) -> Step {
        if let Some(pop) = self.pop.as_mut() {
            host.display.set_portrait_scale(pop.tick(dt));
            if pop.is_finished() {
                self.pop = None;
            }
        }

        match oracle {
            Some(oracle) => {
                let change = self.proximity.poll(oracle, self.config.interact_distance);
                self.apply_range_change(change, host)
            }
            None => Step::Ignored,
        }
    }

    fn apply_range_change(&mut self, change: RangeChange, host: &mut Host<'_>) -> Step {
        if change == RangeChange::Left && self.config.end_on_exit {
            self.end(host)
        } else {
            Step::Ignored
        }
    }

    fn enter_node(&mut self, id: NodeId, host: &mut Host<'_>) -> Step {
        let graph = self.graph;
        let Some(node) = graph.node(id) else {
            return self.end(host);
        };

        self.state = SessionState::Active(id);
        self.render(node, host);
        log::debug!("'{}' -> node '{}'", graph.npc_name(), node.key);

        if !node.is_terminal() {
            return Step::Advanced(id);
        }
        match node.scene() {
            Some(scene) => self.hand_off(scene, host),
            None => self.end(host),
        }
    }

    fn hand_off(&mut self, scene: &str, host: &mut Host<'_>) -> Step {
        host.scenes.request_scene(scene);
        self.end(host);
        Step::SceneRequested(scene.to_string())
    }

    fn render(&mut self, node: &DialogueNode, host: &mut Host<'_>) {
        let display = &mut *host.display;
        display.set_speaker(self.config.speaker(self.graph.npc_name()));
        display.set_text(&node.text);
        if let Some(portrait) = &node.portrait {
            display.set_portrait(portrait);
            if self.config.pop_duration > 0.0 {
                display.set_portrait_scale(1.0);
                if let Some(cue) = &self.config.sounds.pop {
                    display.play_cue(cue);
                }
                self.pop = Some(PopTween::new(
                    self.config.pop_scale,
                    self.config.pop_duration,
                ));
            }
        }
        self.slots.rebind(node, display);
    }
}
