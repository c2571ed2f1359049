/// Interaction range tracking, fed either by distance polling or by
/// trigger-volume enter/exit signals.

/// Who crossed a trigger volume. Only the player opens conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    Other,
}

/// Answers "how far is the player from this NPC right now?".
/// `None` means there is no player to talk to.
pub trait ProximityOracle {
    fn player_distance(&self) -> Option<f32>;
}

/// Straight-line distance between an NPC and an optional player position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerTracker {
    pub npc: (f32, f32),
    pub player: Option<(f32, f32)>,
}

impl PlayerTracker {
    pub fn new(npc: (f32, f32)) -> Self {
        Self { npc, player: None }
    }

    pub fn with_player(mut self, player: (f32, f32)) -> Self {
        self.player = Some(player);
        self
    }
}

impl ProximityOracle for PlayerTracker {
    fn player_distance(&self) -> Option<f32> {
        let (px, py) = self.player?;
        let (nx, ny) = self.npc;
        Some(((px - nx).powi(2) + (py - ny).powi(2)).sqrt())
    }
}

/// How an in-range flag update changed things.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeChange {
    Unchanged,
    Entered,
    Left,
}

/// The in-range flag shared by both conversation flavours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Proximity {
    in_range: bool,
}

impl Proximity {
    pub fn in_range(&self) -> bool {
        self.in_range
    }

    fn set(&mut self, in_range: bool) -> RangeChange {
        let change = match (self.in_range, in_range) {
            (false, true) => RangeChange::Entered,
            (true, false) => RangeChange::Left,
            _ => RangeChange::Unchanged,
        };
        self.in_range = in_range;
        change
    }

    /// Poll the oracle. The player counts as in range at exactly `radius`.
    pub fn poll(&mut self, oracle: &dyn ProximityOracle, radius: f32) -> RangeChange {
        let in_range = oracle.player_distance().is_some_and(|d| d <= radius);
        self.set(in_range)
    }

    pub fn enter(&mut self, actor: ActorKind) -> RangeChange {
        match actor {
            ActorKind::Player => self.set(true),
            ActorKind::Other => RangeChange::Unchanged,
        }
    }

    pub fn exit(&mut self, actor: ActorKind) -> RangeChange {
        match actor {
            ActorKind::Player => self.set(false),
            ActorKind::Other => RangeChange::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_distance() {
        let tracker = PlayerTracker::new((0.0, 0.0)).with_player((3.0, 4.0));
        assert_eq!(tracker.player_distance(), Some(5.0));
        assert_eq!(PlayerTracker::new((1.0, 1.0)).player_distance(), None);
    }

    #[test]
    fn poll_boundary_is_inclusive() {
        let mut proximity = Proximity::default();
        let tracker = PlayerTracker::new((0.0, 0.0)).with_player((2.0, 0.0));
        assert_eq!(proximity.poll(&tracker, 2.0), RangeChange::Entered);
        assert!(proximity.in_range());
        assert_eq!(proximity.poll(&tracker, 2.0), RangeChange::Unchanged);
    }

    #[test]
    fn missing_player_is_out_of_range() {
        let mut proximity = Proximity::default();
        proximity.enter(ActorKind::Player);
        assert_eq!(
            proximity.poll(&PlayerTracker::new((0.0, 0.0)), 10.0),
            RangeChange::Left
        );
        assert!(!proximity.in_range());
    }

    #[test]
    fn other_actors_are_ignored() {
        let mut proximity = Proximity::default();
        assert_eq!(proximity.enter(ActorKind::Other), RangeChange::Unchanged);
        assert!(!proximity.in_range());
        proximity.enter(ActorKind::Player);
        assert_eq!(proximity.exit(ActorKind::Other), RangeChange::Unchanged);
        assert!(proximity.in_range());
    }

    #[test]
    fn exit_twice_is_unchanged() {
        let mut proximity = Proximity::default();
        proximity.enter(ActorKind::Player);
        assert_eq!(proximity.exit(ActorKind::Player), RangeChange::Left);
        assert_eq!(proximity.exit(ActorKind::Player), RangeChange::Unchanged);
    }
}
