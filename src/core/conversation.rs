/// Scripted conversation — a flat list of lines read one per interaction,
/// with a typewriter reveal and a portrait pop.

use crate::core::config::NpcConfig;
use crate::core::display::DialogueDisplay;
use crate::core::effects::{PopTween, Typewriter};
use crate::core::proximity::{ActorKind, Proximity, ProximityOracle, RangeChange};
use crate::schema::script::{DialogueLine, DialogueScript};

/// What a conversation call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStep {
    Ignored,
    /// Line at this index is now being shown.
    Shown(usize),
    /// The typewriter was skipped; the full line is on screen.
    Completed,
    Ended,
}

pub struct ScriptedConversation<'s> {
    script: &'s DialogueScript,
    config: NpcConfig,
    active: bool,
    line: usize,
    proximity: Proximity,
    typewriter: Option<Typewriter>,
    pop: Option<PopTween>,
}

impl<'s> ScriptedConversation<'s> {
    pub fn new(script: &'s DialogueScript) -> Self {
        Self::with_config(script, NpcConfig::default())
    }

    pub fn with_config(script: &'s DialogueScript, config: NpcConfig) -> Self {
        Self {
            script,
            config,
            active: false,
            line: 0,
            proximity: Proximity::default(),
            typewriter: None,
            pop: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True while the current line is still being revealed.
    pub fn is_typing(&self) -> bool {
        self.typewriter.as_ref().is_some_and(|tw| !tw.is_finished())
    }

    pub fn line_index(&self) -> Option<usize> {
        self.active.then_some(self.line)
    }

    pub fn current_line(&self) -> Option<&'s DialogueLine> {
        let script = self.script;
        self.line_index().and_then(|i| script.lines.get(i))
    }

    pub fn player_in_range(&self) -> bool {
        self.proximity.in_range()
    }

    /// Open the conversation on the first line. An empty script never opens.
    pub fn start(&mut self, display: &mut dyn DialogueDisplay) -> LineStep {
        if self.active {
            return LineStep::Ignored;
        }
        if self.script.lines.is_empty() {
            log::debug!("start ignored: '{}' has no lines", self.script.npc_name);
            return LineStep::Ignored;
        }

        self.active = true;
        self.line = 0;
        display.set_panel_visible(true);
        display.set_speaker(self.config.speaker(&self.script.npc_name));
        if let Some(cue) = &self.config.sounds.open {
            display.play_cue(cue);
        }
        self.show_line(display);
        LineStep::Shown(0)
    }

    /// The interact trigger: open, finish the line being typed, or move on.
    pub fn interact(&mut self, display: &mut dyn DialogueDisplay) -> LineStep {
        if !self.proximity.in_range() {
            log::debug!("interact ignored: player out of range");
            return LineStep::Ignored;
        }
        if !self.active {
            self.start(display)
        } else if self.is_typing() {
            self.complete_line(display)
        } else {
            self.advance(display)
        }
    }

    /// Skip running effects and put the whole current line on screen.
    pub fn complete_line(&mut self, display: &mut dyn DialogueDisplay) -> LineStep {
        if self.current_line().is_none() {
            return LineStep::Ignored;
        }
        if let Some(mut tw) = self.typewriter.take() {
            tw.skip();
            display.set_text(&tw.visible());
        }
        if let Some(mut pop) = self.pop.take() {
            pop.skip();
            display.set_portrait_scale(pop.scale());
        }
        LineStep::Completed
    }

    /// Move to the next line, closing the conversation after the last.
    pub fn advance(&mut self, display: &mut dyn DialogueDisplay) -> LineStep {
        if !self.active {
            return LineStep::Ignored;
        }
        self.line += 1;
        if self.line < self.script.lines.len() {
            self.show_line(display);
            LineStep::Shown(self.line)
        } else {
            self.end(display)
        }
    }

    pub fn end(&mut self, display: &mut dyn DialogueDisplay) -> LineStep {
        if !self.active {
            return LineStep::Ignored;
        }
        self.active = false;
        self.cancel_effects(display);
        display.set_panel_visible(false);
        if let Some(cue) = &self.config.sounds.close {
            display.play_cue(cue);
        }
        LineStep::Ended
    }

    pub fn on_trigger_enter(&mut self, actor: ActorKind) {
        self.proximity.enter(actor);
    }

    pub fn on_trigger_exit(
        &mut self,
        actor: ActorKind,
        display: &mut dyn DialogueDisplay,
    ) -> LineStep {
        let change = self.proximity.exit(actor);
        self.apply_range_change(change, display)
    }

    /// Per-frame update: range polling, typewriter and portrait pop.
    pub fn tick(
        &mut self,
        dt: f32,
        oracle: Option<&dyn ProximityOracle>,
        display: &mut dyn DialogueDisplay,
    ) -> LineStep {
        if let Some(pop) = self.pop.as_mut() {
            display.set_portrait_scale(pop.tick(dt));
            if pop.is_finished() {
                self.pop = None;
            }
        }

        if let Some(tw) = self.typewriter.as_mut() {
            let letters = tw.tick(dt).iter().filter(|c| c.is_alphanumeric()).count();
            display.set_text(&tw.visible());
            if let Some(cue) = &self.config.sounds.typing {
                for _ in 0..letters {
                    display.play_cue(cue);
                }
            }
            if tw.is_finished() {
                self.typewriter = None;
            }
        }

        match oracle {
            Some(oracle) => {
                let change = self.proximity.poll(oracle, self.config.interact_distance);
                self.apply_range_change(change, display)
            }
            None => LineStep::Ignored,
        }
    }

    fn apply_range_change(
        &mut self,
        change: RangeChange,
        display: &mut dyn DialogueDisplay,
    ) -> LineStep {
        if change == RangeChange::Left && self.config.end_on_exit {
            self.end(display)
        } else {
            LineStep::Ignored
        }
    }

    fn show_line(&mut self, display: &mut dyn DialogueDisplay) {
        let Some(line) = self.current_line() else {
            return;
        };
        self.cancel_effects(display);

        if let Some(portrait) = &line.portrait {
            display.set_portrait(portrait);
            if let Some(cue) = &self.config.sounds.pop {
                display.play_cue(cue);
            }
            self.pop = Some(PopTween::new(
                self.config.pop_scale,
                self.config.pop_duration,
            ));
        }

        if let Some(voice) = &line.voice_over {
            display.play_cue(voice);
        }

        if self.config.use_typing_effect {
            display.set_text("");
            self.typewriter = Some(Typewriter::new(&line.text, self.config.typing_speed));
            // Reveal the first character now rather than on the next frame.
            self.tick(0.0, None, display);
        } else {
            display.set_text(&line.text);
        }
    }

    fn cancel_effects(&mut self, display: &mut dyn DialogueDisplay) {
        self.typewriter = None;
        if self.pop.take().is_some() {
            display.set_portrait_scale(1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SoundSet;
    use crate::core::display::HeadlessDisplay;

    fn script() -> DialogueScript {
        DialogueScript {
            npc_name: "Hyung-gil".to_string(),
            lines: vec![
                DialogueLine {
                    text: "Hi".to_string(),
                    portrait: Some("wave".to_string()),
                    voice_over: Some("vo_hi".to_string()),
                },
                DialogueLine::new("Bye"),
            ],
        }
    }

    fn config() -> NpcConfig {
        NpcConfig {
            typing_speed: 0.5,
            pop_scale: 1.5,
            pop_duration: 1.0,
            sounds: SoundSet {
                open: Some("open".to_string()),
                close: Some("close".to_string()),
                pop: Some("pop".to_string()),
                typing: Some("tick".to_string()),
            },
            ..NpcConfig::default()
        }
    }

    #[test]
    fn start_shows_first_character() {
        let script = script();
        let mut display = HeadlessDisplay::new(0);
        let mut convo = ScriptedConversation::with_config(&script, config());

        assert_eq!(convo.start(&mut display), LineStep::Shown(0));
        assert!(display.panel_visible);
        assert_eq!(display.speaker, "Hyung-gil");
        assert_eq!(display.text, "H");
        assert_eq!(display.portrait.as_deref(), Some("wave"));
        assert_eq!(display.cues, vec!["open", "pop", "vo_hi", "tick"]);
        assert!(convo.is_typing());
    }

    #[test]
    fn tick_reveals_and_finishes() {
        let script = script();
        let mut display = HeadlessDisplay::new(0);
        let mut convo = ScriptedConversation::with_config(&script, config());
        convo.start(&mut display);

        convo.tick(0.5, None, &mut display);
        assert_eq!(display.text, "Hi");
        assert!(convo.is_typing());
        convo.tick(0.5, None, &mut display);
        assert!(!convo.is_typing());
        assert_eq!(display.portrait_scale, 1.0);
    }

    #[test]
    fn interact_while_typing_completes_line() {
        let script = script();
        let mut display = HeadlessDisplay::new(0);
        let mut convo = ScriptedConversation::with_config(&script, config());
        convo.on_trigger_enter(ActorKind::Player);
        convo.interact(&mut display);
        convo.tick(0.25, None, &mut display);

        assert_eq!(convo.interact(&mut display), LineStep::Completed);
        assert_eq!(display.text, "Hi");
        assert_eq!(display.portrait_scale, 1.0);
        assert_eq!(convo.line_index(), Some(0));
        assert!(!convo.is_typing());
    }

    #[test]
    fn complete_line_snaps_pop_and_text() {
        let script = script();
        let mut display = HeadlessDisplay::new(0);
        let mut convo = ScriptedConversation::with_config(&script, config());
        convo.start(&mut display);
        convo.tick(0.25, None, &mut display);
        assert_eq!(display.portrait_scale, 1.25);

        assert_eq!(convo.complete_line(&mut display), LineStep::Completed);
        assert_eq!(display.text, "Hi");
        assert_eq!(display.portrait_scale, 1.0);
        assert!(!convo.is_typing());
        // Nothing left to animate.
        convo.tick(0.25, None, &mut display);
        assert_eq!(display.portrait_scale, 1.0);
    }

    #[test]
    fn tiny_typing_speed_from_config_shows_line() {
        let script = script();
        let mut display = HeadlessDisplay::new(0);
        let config = NpcConfig::parse_ron("Npc(typing_speed: 1e-30)").unwrap();
        let mut convo = ScriptedConversation::with_config(&script, config);

        assert_eq!(convo.start(&mut display), LineStep::Shown(0));
        convo.tick(0.016, None, &mut display);
        assert_eq!(display.text, "Hi");
        assert!(!convo.is_typing());
    }

    #[test]
    fn interact_walks_to_the_end() {
        let script = script();
        let mut display = HeadlessDisplay::new(0);
        let config = NpcConfig {
            use_typing_effect: false,
            ..config()
        };
        let mut convo = ScriptedConversation::with_config(&script, config);
        convo.on_trigger_enter(ActorKind::Player);

        assert_eq!(convo.interact(&mut display), LineStep::Shown(0));
        assert_eq!(display.text, "Hi");
        assert_eq!(convo.interact(&mut display), LineStep::Shown(1));
        assert_eq!(display.text, "Bye");
        // The second line names no portrait; the first one stays.
        assert_eq!(display.portrait.as_deref(), Some("wave"));
        assert_eq!(convo.interact(&mut display), LineStep::Ended);
        assert!(!display.panel_visible);
        assert_eq!(display.cues.last().map(String::as_str), Some("close"));
    }

    #[test]
    fn new_line_cancels_running_effects() {
        let script = script();
        let mut display = HeadlessDisplay::new(0);
        let mut convo = ScriptedConversation::with_config(&script, config());
        convo.start(&mut display);
        convo.tick(0.25, None, &mut display);
        assert_eq!(display.portrait_scale, 1.25);

        convo.advance(&mut display);
        assert_eq!(display.portrait_scale, 1.0);
        assert_eq!(display.text, "B");
    }

    #[test]
    fn empty_script_never_opens() {
        let script = DialogueScript {
            npc_name: "Mute".to_string(),
            lines: Vec::new(),
        };
        let mut display = HeadlessDisplay::new(0);
        let mut convo = ScriptedConversation::new(&script);
        assert_eq!(convo.start(&mut display), LineStep::Ignored);
        assert!(!convo.is_active());
    }

    #[test]
    fn out_of_range_interact_is_ignored() {
        let script = script();
        let mut display = HeadlessDisplay::new(0);
        let mut convo = ScriptedConversation::new(&script);
        assert_eq!(convo.interact(&mut display), LineStep::Ignored);
        assert!(!display.panel_visible);
    }
}
