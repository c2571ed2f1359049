/// Frame-spread presentation effects as explicit step machines.
///
/// Each effect is advanced by `tick(dt)` from the game loop. Cancelling an
/// effect means dropping or replacing it; `skip` snaps it to its end state.

/// Reveals text one character at a time.
///
/// The first character shows on the first tick, then one more every
/// `interval` seconds. The effect counts as running until a full
/// `interval` has passed after the last character.
#[derive(Debug, Clone, PartialEq)]
pub struct Typewriter {
    chars: Vec<char>,
    revealed: usize,
    elapsed: f32,
    interval: f32,
}

impl Typewriter {
    pub fn new(text: &str, interval: f32) -> Self {
        Self {
            chars: text.chars().collect(),
            revealed: 0,
            elapsed: 0.0,
            interval,
        }
    }

    /// Advance by `dt` seconds and return the characters revealed by
    /// this step.
    pub fn tick(&mut self, dt: f32) -> &[char] {
        let before = self.revealed;
        self.elapsed += dt.max(0.0);
        let target = if self.interval <= 0.0 {
            self.chars.len()
        } else {
            // The cast saturates for tiny intervals.
            ((self.elapsed / self.interval).floor() as usize).saturating_add(1)
        };
        self.revealed = target.min(self.chars.len()).max(self.revealed);
        &self.chars[before..self.revealed]
    }

    /// Show everything at once.
    pub fn skip(&mut self) {
        self.revealed = self.chars.len();
        self.elapsed = self.elapsed.max(self.total_time());
    }

    pub fn visible(&self) -> String {
        self.chars[..self.revealed].iter().collect()
    }

    pub fn is_finished(&self) -> bool {
        self.revealed == self.chars.len() && self.elapsed >= self.total_time()
    }

    fn total_time(&self) -> f32 {
        self.interval.max(0.0) * self.chars.len() as f32
    }
}

/// Scales the portrait up to `peak` and back to rest over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopTween {
    elapsed: f32,
    duration: f32,
    peak: f32,
}

impl PopTween {
    pub fn new(peak: f32, duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            peak,
        }
    }

    /// Advance by `dt` seconds and return the scale to apply.
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.max(0.0);
        self.scale()
    }

    pub fn scale(&self) -> f32 {
        if self.is_finished() {
            return 1.0;
        }
        let half = self.duration / 2.0;
        if self.elapsed < half {
            1.0 + (self.peak - 1.0) * (self.elapsed / half)
        } else {
            self.peak + (1.0 - self.peak) * ((self.elapsed - half) / half)
        }
    }

    pub fn skip(&mut self) {
        self.elapsed = self.duration;
    }

    pub fn is_finished(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }
}
