//! Memory section
//!
//! The device reports `free`-style rows; the one of interest carries
//! `type == "Mem:"`. Total and free arrive in kilobytes. A zero total is
//! invalid data (UNKNOWN), deliberately stricter than the
//! divide-by-zero-as-zero policy of the system statistics feed.

use serde_json::{Map, Value};

use crate::agent_output::json_block;
use crate::fields::{int_field, text_field};
use crate::params::{grade_opt, LevelsParam};
use crate::state::{render_bytes, Service, State, Verdict};

pub const SERVICE_NAME: &str = "Memory";

const MEM_RECORD_TYPE: &str = "Mem:";

#[derive(Debug, Clone, PartialEq)]
pub struct Memory {
    records: Vec<Map<String, Value>>,
}

impl Memory {
    fn mem_record(&self) -> Option<&Map<String, Value>> {
        self.records
            .iter()
            .find(|record| text_field(record, "type").as_deref() == Some(MEM_RECORD_TYPE))
    }
}

pub fn parse(lines: &[String]) -> Option<Memory> {
    match json_block(lines)? {
        Value::Array(entries) => Some(Memory {
            records: entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
        }),
        _ => None,
    }
}

pub fn discover(section: &Memory) -> Vec<Service> {
    if section.mem_record().is_some() {
        vec![Service::singleton()]
    } else {
        Vec::new()
    }
}

pub fn check(params: &LevelsParam, section: Option<&Memory>) -> Option<Verdict> {
    let Some(record) = section.and_then(Memory::mem_record) else {
        return Some(Verdict::new(State::Unknown, "No memory data"));
    };

    let (Some(total_kb), Some(free_kb)) = (int_field(record, "total"), int_field(record, "free"))
    else {
        return Some(Verdict::new(State::Unknown, "Unable to parse memory data"));
    };

    let total_bytes = total_kb as f64 * 1024.0;
    let free_bytes = free_kb as f64 * 1024.0;

    if total_bytes == 0.0 {
        return Some(Verdict::new(State::Unknown, "Invalid memory data"));
    }

    let used_bytes = total_bytes - free_bytes;
    let used_percent = used_bytes / total_bytes * 100.0;

    let verdict = Verdict::new(
        grade_opt(params.levels, used_percent),
        format!(
            "Usage: {:.1}% - {} of {}",
            used_percent,
            render_bytes(used_bytes),
            render_bytes(total_bytes)
        ),
    )
    .with_metric("mem_used", used_bytes)
    .with_metric("mem_total", total_bytes)
    .with_metric("mem_used_percent", used_percent);

    Some(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(value: Value) -> Vec<String> {
        vec![serde_json::to_string(&value).unwrap()]
    }

    fn sample() -> Memory {
        parse(&lines(json!([
            {
                "type": "Mem:",
                "total": "16173828",
                "used": "3747460",
                "free": "12426368",
                "shared": "123456",
                "buffers": "234567",
                "cached": "345678"
            }
        ])))
        .unwrap()
    }

    fn mem(total: &str, free: &str) -> Memory {
        parse(&lines(json!([{"type": "Mem:", "total": total, "free": free}]))).unwrap()
    }

    #[test]
    fn test_parse_requires_record_list() {
        assert_eq!(sample().records.len(), 1);
        assert!(parse(&lines(json!({"total": "1"}))).is_none());
        assert!(parse(&[]).is_none());
    }

    #[test]
    fn test_parse_round_trip() {
        let section = sample();
        let reserialized = lines(Value::Array(
            section.records.iter().cloned().map(Value::Object).collect(),
        ));
        assert_eq!(parse(&reserialized).unwrap(), section);
    }

    #[test]
    fn test_discover_needs_mem_record() {
        assert_eq!(discover(&sample()).len(), 1);

        let other = parse(&lines(json!([{"type": "Swap:", "total": "0"}]))).unwrap();
        assert!(discover(&other).is_empty());
    }

    #[test]
    fn test_check_ok() {
        let verdict = check(&LevelsParam::default(), Some(&sample())).unwrap();
        assert_eq!(verdict.state, State::Ok);
        assert!(verdict.summary.starts_with("Usage: 23.2%"));

        let percent = verdict
            .metrics
            .iter()
            .find(|m| m.name == "mem_used_percent")
            .unwrap();
        assert!((percent.value - 23.17).abs() < 0.01);

        let total = verdict.metrics.iter().find(|m| m.name == "mem_total").unwrap();
        assert_eq!(total.value, 16173828.0 * 1024.0);
    }

    #[test]
    fn test_check_warn_and_crit() {
        // 14556446 of 16173828 kB used, right on the 90% bound
        let verdict = check(&LevelsParam::default(), Some(&mem("16173828", "1617382"))).unwrap();
        assert_eq!(verdict.state, State::Crit);

        let warn = check(&LevelsParam::default(), Some(&mem("100", "15"))).unwrap();
        assert_eq!(warn.state, State::Warn);
    }

    #[test]
    fn test_check_zero_total_is_invalid() {
        let verdict = check(&LevelsParam::default(), Some(&mem("0", "0"))).unwrap();
        assert_eq!(verdict.state, State::Unknown);
        assert_eq!(verdict.summary, "Invalid memory data");
    }

    #[test]
    fn test_check_missing_record() {
        let other = parse(&lines(json!([{"type": "Swap:"}]))).unwrap();
        let verdict = check(&LevelsParam::default(), Some(&other)).unwrap();
        assert_eq!(verdict.state, State::Unknown);
        assert_eq!(verdict.summary, "No memory data");

        assert_eq!(
            check(&LevelsParam::default(), None).unwrap().summary,
            "No memory data"
        );
    }

    #[test]
    fn test_check_unparsable_values() {
        let verdict = check(&LevelsParam::default(), Some(&mem("lots", "some"))).unwrap();
        assert_eq!(verdict.state, State::Unknown);
        assert_eq!(verdict.summary, "Unable to parse memory data");
    }
}
