//! Threshold and discovery parameter resolution
//!
//! Raw configuration arrives as JSON-shaped dictionaries. Resolution runs
//! once, before discovery or evaluation, and produces fully-resolved
//! parameter structs with all defaults applied - call sites never merge
//! defaults ad hoc. A malformed threshold pair resolves to "no grading"
//! for that sub-check (the historic device-profile behavior) but is logged
//! so the misconfiguration does not stay invisible.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::state::State;

/// An ordered `(warn, crit)` pair of numeric bounds. By configuration
/// convention `warn <= crit`; this is not enforced structurally.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "(f64, f64)")]
pub struct Levels {
    pub warn: f64,
    pub crit: f64,
}

impl From<(f64, f64)> for Levels {
    fn from((warn, crit): (f64, f64)) -> Self {
        Self { warn, crit }
    }
}

impl Levels {
    pub const fn new(warn: f64, crit: f64) -> Self {
        Self { warn, crit }
    }

    /// Inclusive grading: a value exactly on a bound trips that level.
    pub fn grade(&self, value: f64) -> State {
        if value >= self.crit {
            State::Crit
        } else if value >= self.warn {
            State::Warn
        } else {
            State::Ok
        }
    }
}

/// Grade against optional levels; absent levels never alert.
pub fn grade_opt(levels: Option<Levels>, value: f64) -> State {
    levels.map(|l| l.grade(value)).unwrap_or(State::Ok)
}

const DEFAULT_LEVELS: Levels = Levels::new(80.0, 90.0);

fn resolve_levels(raw: Option<&Value>, default: Option<Levels>) -> Option<Levels> {
    let Some(raw) = raw else {
        return default;
    };
    match serde_json::from_value::<Levels>(raw.clone()) {
        Ok(levels) => Some(levels),
        Err(_) => {
            warn!("Malformed threshold levels {}, grading disabled", raw);
            None
        }
    }
}

/// Parameters for checks graded by a single `levels` pair
/// (HDD aggregate, memory, disk filesystems). Default: (80, 90).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelsParam {
    pub levels: Option<Levels>,
}

impl Default for LevelsParam {
    fn default() -> Self {
        Self {
            levels: Some(DEFAULT_LEVELS),
        }
    }
}

impl LevelsParam {
    pub fn resolve(config: &Value) -> Self {
        Self {
            levels: resolve_levels(config.get("levels"), Some(DEFAULT_LEVELS)),
        }
    }
}

/// Processor check parameters: utilization levels (default (80, 90)) plus
/// an optional independent I/O-wait pair, off unless configured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessorParams {
    pub util: Option<Levels>,
    pub iowait: Option<Levels>,
}

impl Default for ProcessorParams {
    fn default() -> Self {
        Self {
            util: Some(DEFAULT_LEVELS),
            iowait: None,
        }
    }
}

impl ProcessorParams {
    pub fn resolve(config: &Value) -> Self {
        Self {
            util: resolve_levels(config.get("util"), Some(DEFAULT_LEVELS)),
            iowait: resolve_levels(config.get("iowait"), None),
        }
    }
}

/// Processor discovery switches: whether to expose the aggregate
/// ("all cores combined") service and/or one service per core.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProcessorDiscovery {
    pub aggregate: bool,
    pub individual: bool,
}

impl Default for ProcessorDiscovery {
    fn default() -> Self {
        Self {
            aggregate: true,
            individual: false,
        }
    }
}

impl ProcessorDiscovery {
    pub fn resolve(config: &Value) -> Self {
        match serde_json::from_value(config.clone()) {
            Ok(params) => params,
            Err(_) => {
                warn!("Malformed processor discovery config {}, using defaults", config);
                Self::default()
            }
        }
    }
}
