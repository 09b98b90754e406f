//! Uptime section
//!
//! Informational only. Firmware spells the payload key as either `value`
//! or `Value` depending on version.

use serde_json::{Map, Value};

use crate::agent_output::json_block;
use crate::fields::text_field;
use crate::state::{Service, State, Verdict};

pub const SERVICE_NAME: &str = "Uptime";

#[derive(Debug, Clone, PartialEq)]
pub struct Uptime {
    map: Map<String, Value>,
}

impl Uptime {
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

pub fn parse(lines: &[String]) -> Option<Uptime> {
    match json_block(lines)? {
        Value::Object(map) => Some(Uptime { map }),
        _ => None,
    }
}

pub fn discover(section: &Uptime) -> Vec<Service> {
    if section.is_empty() {
        Vec::new()
    } else {
        vec![Service::singleton()]
    }
}

pub fn check(section: Option<&Uptime>) -> Option<Verdict> {
    let uptime = section.and_then(|s| {
        text_field(&s.map, "value").or_else(|| text_field(&s.map, "Value"))
    });

    match uptime {
        Some(value) => Some(Verdict::new(State::Ok, format!("Uptime: {}", value))),
        None => Some(Verdict::new(State::Unknown, "No uptime data")),
    }
}
