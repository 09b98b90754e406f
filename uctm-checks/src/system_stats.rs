//! System statistics section: device-wide memory, CPU and license state
//!
//! The wire form is a list of `{type, value}` records which is folded into a
//! flat string map keyed by `type`. Memory and CPU grading use thresholds
//! fixed by the device profile; the license expiry is informational only.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::agent_output::json_block;
use crate::fields::{leading_int, percent_value, scalar_text};
use crate::params::Levels;
use crate::state::{render_bytes, Service, State, Verdict, VerdictBuilder};

pub const SERVICE_NAME: &str = "System Stats";

const MEMORY_LEVELS: Levels = Levels::new(90.0, 95.0);
const CPU_LEVELS: Levels = Levels::new(80.0, 90.0);

/// Flat view of the statistics feed, keyed by the record `type`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemStats {
    values: BTreeMap<String, String>,
}

impl SystemStats {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fold the `{type, value}` record list into a map, last write wins.
/// A payload already shaped as a map passes through; scalars are no data.
pub fn parse(lines: &[String]) -> Option<SystemStats> {
    let mut values = BTreeMap::new();

    match json_block(lines)? {
        Value::Array(records) => {
            for record in records {
                let Value::Object(map) = record else { continue };
                let (Some(key), Some(value)) = (map.get("type"), map.get("value")) else {
                    continue;
                };
                if let (Some(key), Some(value)) = (scalar_text(key), scalar_text(value)) {
                    values.insert(key, value);
                }
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                if let Some(value) = scalar_text(&value) {
                    values.insert(key, value);
                }
            }
        }
        _ => return None,
    }

    Some(SystemStats { values })
}

pub fn discover(section: &SystemStats) -> Vec<Service> {
    if section.is_empty() {
        Vec::new()
    } else {
        vec![Service::singleton()]
    }
}

pub fn check(section: Option<&SystemStats>) -> Option<Verdict> {
    let Some(section) = section.filter(|s| !s.is_empty()) else {
        return Some(Verdict::new(State::Unknown, "No data received"));
    };

    let mut out = VerdictBuilder::new();

    if let (Some(total_raw), Some(used_raw)) =
        (section.get("Total Memory"), section.get("Used Memory"))
    {
        match (leading_int(total_raw), leading_int(used_raw)) {
            (Some(total_kb), Some(used_kb)) => {
                let total_bytes = total_kb as f64 * 1024.0;
                let used_bytes = used_kb as f64 * 1024.0;
                let used_percent = if total_kb > 0 {
                    used_kb as f64 / total_kb as f64 * 100.0
                } else {
                    0.0
                };

                out.metric("memory_used", used_bytes);
                out.metric("memory_total", total_bytes);
                out.metric("memory_used_percent", used_percent);

                out.result(
                    MEMORY_LEVELS.grade(used_percent),
                    format!(
                        "Memory: {} of {} ({:.1}%)",
                        render_bytes(used_bytes),
                        render_bytes(total_bytes),
                        used_percent
                    ),
                );
            }
            _ => out.result(State::Unknown, "Memory: unparsable values"),
        }
    }

    if let Some(cpu_raw) = section.get("CPU Usage") {
        match percent_value(cpu_raw) {
            Some(cpu) => {
                out.metric("cpu_percent", cpu);
                out.result(CPU_LEVELS.grade(cpu), format!("CPU: {:.1}%", cpu));
            }
            None => out.result(State::Unknown, "CPU: unparsable value"),
        }
    }

    if let Some(license) = section.get("Days To Expire") {
        out.result(State::Ok, format!("License: {}", license));
    }

    out.build()
}
