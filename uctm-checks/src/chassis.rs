//! Chassis information section
//!
//! Not threshold-numeric: a handful of categorical status fields are each
//! compared against their expected safe literal, and any mismatch forces
//! CRIT with the offending field named in the summary. Absent fields are
//! not errors - older firmware omits several of them.

use serde_json::{Map, Value};

use crate::agent_output::json_block;
use crate::fields::text_field;
use crate::state::{Service, State, Verdict};

pub const SERVICE_NAME: &str = "Chassis Info";

const STATUS_EXPECTATIONS: [(&str, &str); 4] = [
    ("boot_upState", "Safe"),
    ("powerSupplyState", "Safe"),
    ("thermalState", "Safe"),
    ("securityStatus", "None"),
];

/// Display labels for the details text, in reporting order.
const DETAIL_LABELS: [(&str, &str); 18] = [
    ("info", "Info"),
    ("smbios", "SMBIOS"),
    ("DMI", "DMI"),
    ("handle", "Handle"),
    ("manufacturer", "Manufacturer"),
    ("type", "Type"),
    ("lock", "Lock"),
    ("version", "Version"),
    ("serialNumber", "Serial Number"),
    ("assetTag", "Asset Tag"),
    ("boot_upState", "Boot-up State"),
    ("powerSupplyState", "Power Supply State"),
    ("thermalState", "Thermal State"),
    ("securityStatus", "Security Status"),
    ("OEMInformation", "OEM Information"),
    ("height", "Height"),
    ("numberOfPowerCords", "Number of Power Cords"),
    ("containedElements", "Contained Elements"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Chassis {
    map: Map<String, Value>,
}

impl Chassis {
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn value(&self, key: &str) -> Option<String> {
        text_field(&self.map, key)
    }
}

pub fn parse(lines: &[String]) -> Option<Chassis> {
    match json_block(lines)? {
        Value::Object(map) => Some(Chassis { map }),
        _ => None,
    }
}

pub fn discover(section: &Chassis) -> Vec<Service> {
    if section.is_empty() {
        Vec::new()
    } else {
        vec![Service::singleton()]
    }
}

pub fn check(section: Option<&Chassis>) -> Option<Verdict> {
    let Some(section) = section.filter(|s| !s.is_empty()) else {
        return Some(Verdict::new(State::Unknown, "No chassis data"));
    };

    let mut state = State::Ok;
    let mut issues = Vec::new();
    for (key, expected) in STATUS_EXPECTATIONS {
        if let Some(actual) = section.value(key) {
            if actual != expected {
                state = State::Crit;
                issues.push(format!("{}: {}", key, actual));
            }
        }
    }

    let mut summary_parts = Vec::new();
    if let Some(chassis_type) = section.value("type") {
        summary_parts.push(format!("Type: {}", chassis_type));
    }
    if let Some(manufacturer) = section.value("manufacturer") {
        summary_parts.push(format!("Manufacturer: {}", manufacturer));
    }
    if let Some(serial) = section.value("serialNumber") {
        summary_parts.push(format!("S/N: {}", serial));
    }
    if !issues.is_empty() {
        summary_parts.push(format!("Issues: {}", issues.join(", ")));
    }

    let summary = if summary_parts.is_empty() {
        "Chassis info available".to_string()
    } else {
        summary_parts.join(", ")
    };

    let detail_parts: Vec<String> = DETAIL_LABELS
        .iter()
        .filter_map(|&(key, label)| {
            section
                .value(key)
                .map(|value| format!("{}: {}", label, value))
        })
        .collect();
    let details = if detail_parts.is_empty() {
        "No details available".to_string()
    } else {
        detail_parts.join("\n")
    };

    Some(Verdict::new(state, summary).with_details(details))
}
