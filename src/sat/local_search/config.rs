use std::{error, fmt};

/// Engine configuration, built from CLI flags or set directly by a library caller.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub seed: u64,
    pub cutoff_time: f64,
    pub strategy_id: u32,
    pub best_known_value: i64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            seed: 1,
            cutoff_time: 60.0,
            strategy_id: 0,
            best_known_value: i64::min_value(),
        }
    }
}

impl Config {
    /// Fatal, pre-search configuration errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy_id != 0 {
            return Err(ConfigError::UnsupportedStrategy(self.strategy_id));
        }
        if self.cutoff_time < 0.0 {
            return Err(ConfigError::NegativeCutoff(self.cutoff_time.into()));
        }
        Ok(())
    }

    /// `max_steps` per restart under strategy 0; only strategy 0 exists.
    pub fn max_steps(&self, num_vars: usize) -> u64 {
        2 * (num_vars as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedStrategy(u32),
    NegativeCutoff(OrderedF64),
    NegativeBound { constraint: usize, k: i64 },
}

/// `f64` wrapper solely so `ConfigError` can derive `PartialEq`/`Eq` for tests;
/// cutoff values are never compared for anything but equality here.
#[derive(Debug, Clone, Copy)]
pub struct OrderedF64(pub f64);

impl PartialEq for OrderedF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for OrderedF64 {}

impl From<f64> for OrderedF64 {
    fn from(v: f64) -> Self {
        OrderedF64(v)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::UnsupportedStrategy(id) => {
                write!(f, "unsupported strategy id {} (only 0 is accepted)", id)
            }
            ConfigError::NegativeCutoff(t) => write!(f, "negative cutoff_time {}", t.0),
            ConfigError::NegativeBound { constraint, k } => {
                write!(f, "constraint {} has negative bound k={}", constraint, k)
            }
        }
    }
}

impl error::Error for ConfigError {}
