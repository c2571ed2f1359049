/// Display surface seam and the slot → option binding table.

use crate::schema::node::DialogueNode;

/// The game-side widgets a conversation writes to: a panel with speaker
/// name, text and portrait, plus a fixed row of option slots.
pub trait DialogueDisplay {
    fn set_panel_visible(&mut self, visible: bool);
    fn set_speaker(&mut self, name: &str);
    fn set_text(&mut self, text: &str);
    fn set_portrait(&mut self, sprite: &str);

    /// Uniform scale applied on top of the portrait's resting size.
    fn set_portrait_scale(&mut self, _scale: f32) {}

    /// Number of option slots the surface provides.
    fn slot_count(&self) -> usize;
    fn show_slot(&mut self, slot: usize, label: &str);
    fn hide_slot(&mut self, slot: usize);

    fn play_cue(&mut self, _cue: &str) {}
}

/// Maps visible slots to option indices of the node on screen.
///
/// The table is rebuilt from scratch on every render, so a slot is only
/// ever bound to one option of the current node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSlots {
    bindings: Vec<usize>,
}

impl OptionSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide every slot, then bind and label one slot per option. Options
    /// past the last slot are left unbound.
    pub fn rebind(&mut self, node: &DialogueNode, display: &mut dyn DialogueDisplay) {
        let slot_count = display.slot_count();
        for slot in 0..slot_count {
            display.hide_slot(slot);
        }

        self.bindings.clear();
        for (index, option) in node.options.iter().take(slot_count).enumerate() {
            display.show_slot(index, &option.text);
            self.bindings.push(index);
        }
    }

    /// Hide every slot and drop all bindings.
    pub fn unbind(&mut self, display: &mut dyn DialogueDisplay) {
        for slot in 0..display.slot_count() {
            display.hide_slot(slot);
        }
        self.bindings.clear();
    }

    pub fn option_for(&self, slot: usize) -> Option<usize> {
        self.bindings.get(slot).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A display that just keeps the current screen state in memory. Useful
/// for terminal front ends and for inspecting a conversation in tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessDisplay {
    pub panel_visible: bool,
    pub speaker: String,
    pub text: String,
    pub portrait: Option<String>,
    pub portrait_scale: f32,
    pub slots: Vec<Option<String>>,
    /// Every cue played, oldest first.
    pub cues: Vec<String>,
}

impl HeadlessDisplay {
    pub fn new(slot_count: usize) -> Self {
        Self {
            portrait_scale: 1.0,
            slots: vec![None; slot_count],
            ..Self::default()
        }
    }

    /// Labels of the visible slots, paired with their slot index.
    pub fn visible_slots(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_deref().map(|label| (i, label)))
    }
}

impl DialogueDisplay for HeadlessDisplay {
    fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
    }

    fn set_speaker(&mut self, name: &str) {
        self.speaker = name.to_string();
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_portrait(&mut self, sprite: &str) {
        self.portrait = Some(sprite.to_string());
    }

    fn set_portrait_scale(&mut self, scale: f32) {
        self.portrait_scale = scale;
    }

    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn show_slot(&mut self, slot: usize, label: &str) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = Some(label.to_string());
        }
    }

    fn hide_slot(&mut self, slot: usize) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = None;
        }
    }

    fn play_cue(&mut self, cue: &str) {
        self.cues.push(cue.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::node::{DialogueOption, NodeId};

    fn node_with(options: &[&str]) -> DialogueNode {
        DialogueNode {
            id: NodeId(0),
            key: "n".to_string(),
            text: "text".to_string(),
            portrait: None,
            options: options
                .iter()
                .map(|t| DialogueOption {
                    text: t.to_string(),
                    score: 0,
                    next: None,
                })
                .collect(),
            next_scene: None,
        }
    }

    #[test]
    fn rebind_shows_one_slot_per_option() {
        let mut display = HeadlessDisplay::new(3);
        let mut slots = OptionSlots::new();
        slots.rebind(&node_with(&["Yes", "No"]), &mut display);

        assert_eq!(
            display.slots,
            vec![Some("Yes".to_string()), Some("No".to_string()), None]
        );
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.option_for(1), Some(1));
        assert_eq!(slots.option_for(2), None);
    }

    #[test]
    fn rebind_hides_stale_slots() {
        let mut display = HeadlessDisplay::new(3);
        let mut slots = OptionSlots::new();
        slots.rebind(&node_with(&["a", "b", "c"]), &mut display);
        slots.rebind(&node_with(&["only"]), &mut display);

        assert_eq!(display.visible_slots().count(), 1);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.option_for(2), None);
    }

    #[test]
    fn options_beyond_slots_stay_unbound() {
        let mut display = HeadlessDisplay::new(2);
        let mut slots = OptionSlots::new();
        slots.rebind(&node_with(&["a", "b", "c"]), &mut display);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.option_for(2), None);
    }

    #[test]
    fn repeated_rebinds_do_not_accumulate() {
        let mut display = HeadlessDisplay::new(3);
        let mut slots = OptionSlots::new();
        let node = node_with(&["a", "b"]);
        for _ in 0..10 {
            slots.rebind(&node, &mut display);
        }
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn unbind_clears_everything() {
        let mut display = HeadlessDisplay::new(3);
        let mut slots = OptionSlots::new();
        slots.rebind(&node_with(&["a"]), &mut display);
        slots.unbind(&mut display);
        assert!(slots.is_empty());
        assert_eq!(display.visible_slots().count(), 0);
    }

    #[test]
    fn headless_out_of_range_slot_ignored() {
        let mut display = HeadlessDisplay::new(1);
        display.show_slot(5, "nope");
        assert_eq!(display.slots, vec![None]);
    }
}
