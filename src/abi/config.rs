/// Default number of counted steps per mechanical revolution
pub const DEFAULT_STEPS_PER_REVOLUTION: u16 = 4000;

/// Electrical sense of the A/B lines
///
/// Pull-down wiring idles low and drives the line high when active;
/// pull-up wiring is the inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// A high pin level is a logical one (pull-down wiring)
    #[default]
    ActiveHigh,
    /// A low pin level is a logical one (pull-up wiring)
    ActiveLow,
}

impl Polarity {
    /// Convert a pin level into the logical line level
    #[must_use]
    pub const fn apply(self, is_high: bool) -> bool {
        match self {
            Polarity::ActiveHigh => is_high,
            Polarity::ActiveLow => !is_high,
        }
    }
}

/// ABI encoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub steps_per_revolution: u16,
    pub polarity: Polarity,
}

impl Config {
    #[must_use]
    pub fn steps_per_revolution(mut self, steps: u16) -> Self {
        self.steps_per_revolution = steps;
        self
    }

    #[must_use]
    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            steps_per_revolution: DEFAULT_STEPS_PER_REVOLUTION,
            polarity: Polarity::ActiveHigh,
        }
    }
}
