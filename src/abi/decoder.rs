//! Quadrature phase tracking
//!
//! The two input lines form a 2-bit Gray code:
//!
//! | A | B | phase |
//! |---|---|-------|
//! | 0 | 0 | 0     |
//! | 1 | 0 | 1     |
//! | 1 | 1 | 2     |
//! | 0 | 1 | 3     |
//!
//! `0 -> 1 -> 2 -> 3 -> 0` is forward, the opposite order is reverse, and a
//! jump between diagonal phases (`0 <-> 2`, `1 <-> 3`) means both lines
//! changed between two samples.

/// Decoded Gray-code phase of the A/B lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    /// A low, B low
    Zero = 0,
    /// A high, B low
    One = 1,
    /// A high, B high
    Two = 2,
    /// A low, B high
    Three = 3,
}

impl Phase {
    /// Map a pair of line levels to its phase
    #[must_use]
    pub const fn from_levels(a: bool, b: bool) -> Self {
        match (a, b) {
            (false, false) => Phase::Zero,
            (true, false) => Phase::One,
            (true, true) => Phase::Two,
            (false, true) => Phase::Three,
        }
    }

    /// Position of the phase in the forward cycle
    #[must_use]
    pub const fn index(self) -> i8 {
        self as i8
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> u8 {
        phase as u8
    }
}

/// Classification of a phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Phase did not change (duplicate or spurious notification)
    NoMovement,
    /// One step in the forward direction
    Forward,
    /// One step in the reverse direction
    Reverse,
    /// Both lines changed between samples; the direction is unknown
    Invalid,
}

impl Transition {
    /// Classify the move from `previous` to `current`
    ///
    /// Uses the raw signed difference `previous - current`: `-1` and the
    /// wrap-around `3` are forward, `1` and `-3` are reverse, `±2` is an
    /// impossible double edge.
    #[must_use]
    pub const fn classify(previous: Phase, current: Phase) -> Self {
        match previous.index() - current.index() {
            0 => Transition::NoMovement,
            -1 | 3 => Transition::Forward,
            1 | -3 => Transition::Reverse,
            // |delta| == 2; nothing else is reachable with four phases
            _ => Transition::Invalid,
        }
    }

    /// Count adjustment for this transition
    #[must_use]
    pub const fn step(self) -> i64 {
        match self {
            Transition::Forward => 1,
            Transition::Reverse => -1,
            Transition::NoMovement | Transition::Invalid => 0,
        }
    }
}

/// Last sampled line levels and the phases derived from them
///
/// Holds no count; the owner applies [`Transition::step`] to its counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PhaseTracker {
    line_a: bool,
    line_b: bool,
    phase: Phase,
    previous: Phase,
}

impl PhaseTracker {
    /// Start tracking from the given levels with no pending transition
    pub(crate) const fn new(a: bool, b: bool) -> Self {
        let phase = Phase::from_levels(a, b);
        Self {
            line_a: a,
            line_b: b,
            phase,
            previous: phase,
        }
    }

    /// Replace the stored levels with a fresh sample of both lines
    pub(crate) fn reseed(&mut self, a: bool, b: bool) {
        *self = Self::new(a, b);
    }

    /// Store a new level for line A and decode
    pub(crate) fn set_a(&mut self, level: bool) -> Transition {
        self.line_a = level;
        self.update()
    }

    /// Store a new level for line B and decode
    pub(crate) fn set_b(&mut self, level: bool) -> Transition {
        self.line_b = level;
        self.update()
    }

    /// Store a fresh sample of both lines and decode
    pub(crate) fn set_levels(&mut self, a: bool, b: bool) -> Transition {
        self.line_a = a;
        self.line_b = b;
        self.update()
    }

    pub(crate) const fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub(crate) const fn previous(&self) -> Phase {
        self.previous
    }

    pub(crate) const fn levels(&self) -> (bool, bool) {
        (self.line_a, self.line_b)
    }

    fn update(&mut self) -> Transition {
        self.previous = self.phase;
        self.phase = Phase::from_levels(self.line_a, self.line_b);
        Transition::classify(self.previous, self.phase)
    }
}
