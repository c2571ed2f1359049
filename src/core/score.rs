/// Score accumulation. The game creates one `Scoreboard` at startup and
/// passes it into each dialogue call.

pub trait ScoreKeeper {
    fn add(&mut self, delta: i32);
    fn get(&self) -> i32;
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    score: i32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreKeeper for Scoreboard {
    fn add(&mut self, delta: i32) {
        self.score = self.score.saturating_add(delta);
        log::info!("score {:+} -> {}", delta, self.score);
    }

    fn get(&self) -> i32 {
        self.score
    }

    fn reset(&mut self) {
        self.score = 0;
    }
}
