//! Player progress: the draining meter and the score.

/// Vitality fraction, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meter(f32);

impl Meter {
    pub const EMPTY: Meter = Meter(0.0);

    /// Clamps `value` into range. NaN counts as empty.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::EMPTY;
        }
        Meter(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 <= 0.0
    }

    /// Add `amount`, capped at full.
    pub fn fill(&mut self, amount: f32) {
        *self = Meter::new(self.0 + amount.max(0.0));
    }

    /// Remove `amount`, floored at empty.
    pub fn drain(&mut self, amount: f32) {
        *self = Meter::new(self.0 - amount.max(0.0));
    }
}

/// Points earned this session. Only ever goes up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score(u32);

impl Score {
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn add(&mut self, points: u32) {
        self.0 = self.0.saturating_add(points);
    }
}

impl From<u32> for Score {
    fn from(value: u32) -> Self {
        Score(value)
    }
}
