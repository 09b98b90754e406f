//! HDD aggregate usage and per-interface network statistics
//!
//! One device feed serves two services: the aggregate disk usage under
//! `HDD Usage Details` (threshold-graded, with the percentage taken from the
//! device rather than recomputed) and one informational service per entry of
//! the `Ethernet usage` record list.

use serde_json::{Map, Value};

use crate::agent_output::json_block;
use crate::fields::{leading_float, percent_value, text_field};
use crate::params::{grade_opt, LevelsParam};
use crate::state::{render_bytes, Service, State, Verdict};

pub const HDD_SERVICE_NAME: &str = "HDD Total";
pub const INTERFACE_SERVICE_NAME: &str = "Interface %s";

const HDD_KEY: &str = "HDD Usage Details";
const INTERFACES_KEY: &str = "Ethernet usage";

/// Interface traffic counters and the metric names they map to.
const COUNTER_METRICS: [(&str, &str); 6] = [
    ("RX-OK", "if_in_pkts"),
    ("TX-OK", "if_out_pkts"),
    ("RX-ERR", "if_in_errors"),
    ("TX-ERR", "if_out_errors"),
    ("RX-DRP", "if_in_discards"),
    ("TX-DRP", "if_out_discards"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct HddEthernet {
    map: Map<String, Value>,
}

impl HddEthernet {
    fn hdd_details(&self) -> Option<&Map<String, Value>> {
        self.map.get(HDD_KEY)?.as_object()
    }

    fn interfaces(&self) -> Option<&Vec<Value>> {
        self.map.get(INTERFACES_KEY)?.as_array()
    }
}

pub fn parse(lines: &[String]) -> Option<HddEthernet> {
    match json_block(lines)? {
        Value::Object(map) => Some(HddEthernet { map }),
        _ => None,
    }
}

pub fn discover_hdd(section: &HddEthernet) -> Vec<Service> {
    if section.map.contains_key(HDD_KEY) {
        vec![Service::singleton()]
    } else {
        Vec::new()
    }
}

pub fn check_hdd(params: &LevelsParam, section: Option<&HddEthernet>) -> Option<Verdict> {
    let Some(hdd) = section.and_then(HddEthernet::hdd_details) else {
        return Some(Verdict::new(State::Unknown, "No HDD data"));
    };

    let (Some(total_raw), Some(used_raw), Some(percent_raw)) = (
        text_field(hdd, "Total Space"),
        text_field(hdd, "Used Space"),
        text_field(hdd, "Used Percentage"),
    ) else {
        return None;
    };

    let (Some(total_mb), Some(used_mb), Some(used_percent)) = (
        leading_float(&total_raw),
        leading_float(&used_raw),
        percent_value(&percent_raw),
    ) else {
        return Some(Verdict::new(State::Unknown, "Unable to parse HDD data"));
    };

    let total_bytes = total_mb * 1024.0 * 1024.0;
    let used_bytes = used_mb * 1024.0 * 1024.0;

    let verdict = Verdict::new(
        grade_opt(params.levels, used_percent),
        format!(
            "{:.1}% used ({} of {})",
            used_percent,
            render_bytes(used_bytes),
            render_bytes(total_bytes)
        ),
    )
    .with_metric("fs_used", used_bytes)
    .with_metric("fs_size", total_bytes)
    .with_metric("fs_used_percent", used_percent);

    Some(verdict)
}

pub fn discover_interfaces(section: &HddEthernet) -> Vec<Service> {
    let Some(records) = section.interfaces() else {
        return Vec::new();
    };

    records
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|record| text_field(record, "Iface"))
        .map(Service::with_item)
        .collect()
}

/// Informational interface report. An item absent from the data yields no
/// result at all - "unknown item", not an UNKNOWN state.
pub fn check_interface(item: &str, section: Option<&HddEthernet>) -> Option<Verdict> {
    let records = section?.interfaces()?;

    let iface = records
        .iter()
        .filter_map(Value::as_object)
        .find(|record| text_field(record, "Iface").as_deref() == Some(item))?;

    let met = text_field(iface, "Met").unwrap_or_else(|| "unknown".to_string());
    let ip = text_field(iface, "IPAddress").unwrap_or_else(|| "n/a".to_string());

    let mut verdict = Verdict::new(State::Ok, format!("Status: {}, IP: {}", met, ip));

    for (key, metric) in COUNTER_METRICS {
        if let Some(raw) = text_field(iface, key) {
            if let Ok(count) = raw.parse::<i64>() {
                verdict = verdict.with_metric(metric, count as f64);
            }
        }
    }

    Some(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(value: Value) -> Vec<String> {
        vec![serde_json::to_string(&value).unwrap()]
    }

    fn sample_json() -> Value {
        json!({
            "HDD Usage Details": {
                "Total Space": "1238542 MB",
                "Used Space": "523456 MB",
                "Used Percentage": "42.3%"
            },
            "Ethernet usage": [
                {
                    "Iface": "eth0",
                    "Met": "1500",
                    "IPAddress": "192.168.1.100",
                    "RX-OK": "1234567",
                    "TX-OK": "9876543",
                    "RX-ERR": "0",
                    "TX-ERR": "0",
                    "RX-DRP": "0",
                    "TX-DRP": "0"
                },
                {
                    "Iface": "eth1",
                    "Met": "1500",
                    "IPAddress": "10.0.0.1",
                    "RX-OK": "987654",
                    "TX-OK": "654321",
                    "RX-ERR": "2",
                    "TX-ERR": "1",
                    "RX-DRP": "0",
                    "TX-DRP": "0"
                }
            ]
        })
    }

    fn sample() -> HddEthernet {
        parse(&lines(sample_json())).unwrap()
    }

    fn hdd_section(total: &str, used: &str, percent: &str) -> HddEthernet {
        parse(&lines(json!({
            "HDD Usage Details": {
                "Total Space": total,
                "Used Space": used,
                "Used Percentage": percent
            }
        })))
        .unwrap()
    }

    #[test]
    fn test_parse_requires_mapping() {
        assert!(parse(&lines(sample_json())).is_some());
        assert!(parse(&lines(json!(["not", "a", "mapping"]))).is_none());
        assert!(parse(&["garbage".to_string()]).is_none());
        assert!(parse(&[]).is_none());
    }

    #[test]
    fn test_parse_round_trip() {
        let section = sample();
        let reserialized = lines(Value::Object(section.map.clone()));
        assert_eq!(parse(&reserialized).unwrap(), section);
    }

    #[test]
    fn test_discover_hdd() {
        assert_eq!(discover_hdd(&sample()), vec![Service::singleton()]);

        let without = parse(&lines(json!({"Ethernet usage": []}))).unwrap();
        assert!(discover_hdd(&without).is_empty());
    }

    #[test]
    fn test_check_hdd_ok() {
        let verdict = check_hdd(&LevelsParam::default(), Some(&sample())).unwrap();
        assert_eq!(verdict.state, State::Ok);
        assert!(verdict.summary.starts_with("42.3% used"));

        let names: Vec<&str> = verdict.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["fs_used", "fs_size", "fs_used_percent"]);

        let size = verdict.metrics.iter().find(|m| m.name == "fs_size").unwrap();
        assert_eq!(size.value, 1238542.0 * 1024.0 * 1024.0);
    }

    #[test]
    fn test_check_hdd_warn_boundary_inclusive() {
        let section = hdd_section("1000000 MB", "800000 MB", "80.0%");
        let verdict = check_hdd(&LevelsParam::default(), Some(&section)).unwrap();
        assert_eq!(verdict.state, State::Warn);
    }

    #[test]
    fn test_check_hdd_crit() {
        let section = hdd_section("1000000 MB", "950000 MB", "95.0%");
        let verdict = check_hdd(&LevelsParam::default(), Some(&section)).unwrap();
        assert_eq!(verdict.state, State::Crit);
    }

    #[test]
    fn test_check_hdd_without_levels_stays_ok() {
        let section = hdd_section("1000000 MB", "990000 MB", "99.0%");
        let params = LevelsParam { levels: None };
        assert_eq!(check_hdd(&params, Some(&section)).unwrap().state, State::Ok);
    }

    #[test]
    fn test_check_hdd_no_data() {
        let verdict = check_hdd(&LevelsParam::default(), None).unwrap();
        assert_eq!(verdict.state, State::Unknown);
        assert_eq!(verdict.summary, "No HDD data");
    }

    #[test]
    fn test_check_hdd_missing_fields_yields_nothing() {
        let section = parse(&lines(json!({
            "HDD Usage Details": {"Total Space": "1000000 MB"}
        })))
        .unwrap();
        assert!(check_hdd(&LevelsParam::default(), Some(&section)).is_none());
    }

    #[test]
    fn test_check_hdd_unparsable_is_unknown() {
        let section = hdd_section("lots", "some", "most");
        let verdict = check_hdd(&LevelsParam::default(), Some(&section)).unwrap();
        assert_eq!(verdict.state, State::Unknown);
    }

    #[test]
    fn test_discover_interfaces() {
        let services = discover_interfaces(&sample());
        let items: Vec<&str> = services
            .iter()
            .filter_map(|s| s.item.as_deref())
            .collect();
        assert_eq!(items, ["eth0", "eth1"]);
    }

    #[test]
    fn test_discover_interfaces_skips_unnamed_records() {
        let section = parse(&lines(json!({
            "Ethernet usage": [{"Met": "1500"}, {"Iface": "eth0"}]
        })))
        .unwrap();
        assert_eq!(discover_interfaces(&section).len(), 1);
    }

    #[test]
    fn test_check_interface() {
        let verdict = check_interface("eth0", Some(&sample())).unwrap();
        assert_eq!(verdict.state, State::Ok);
        assert_eq!(verdict.summary, "Status: 1500, IP: 192.168.1.100");

        let rx = verdict
            .metrics
            .iter()
            .find(|m| m.name == "if_in_pkts")
            .unwrap();
        assert_eq!(rx.value, 1234567.0);
        assert!(verdict.metrics.iter().any(|m| m.name == "if_out_pkts"));
    }

    #[test]
    fn test_check_interface_unknown_item_yields_nothing() {
        assert!(check_interface("eth99", Some(&sample())).is_none());
        assert!(check_interface("eth0", None).is_none());
    }
}
