//! Disk space section: one service per mounted filesystem
//!
//! Sizes arrive as 1K-block counts; the used percentage is computed here,
//! unlike the HDD aggregate where the device supplies it.

use serde_json::{Map, Value};

use crate::agent_output::json_block;
use crate::fields::{int_field, text_field};
use crate::params::{grade_opt, LevelsParam};
use crate::state::{render_bytes, Service, State, Verdict};

pub const SERVICE_NAME: &str = "Filesystem %s";

#[derive(Debug, Clone, PartialEq)]
pub struct Disk {
    records: Vec<Map<String, Value>>,
}

impl Disk {
    fn mount_record(&self, item: &str) -> Option<&Map<String, Value>> {
        self.records
            .iter()
            .find(|record| text_field(record, "mountedOn").as_deref() == Some(item))
    }
}

pub fn parse(lines: &[String]) -> Option<Disk> {
    match json_block(lines)? {
        Value::Array(entries) => Some(Disk {
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

pub fn discover(section: &Disk) -> Vec<Service> {
    section
        .records
        .iter()
        .filter(|record| record.contains_key("filesystem"))
        .filter_map(|record| text_field(record, "mountedOn"))
        .map(Service::with_item)
        .collect()
}

/// Filesystem usage for one mount point. An unknown mount yields no result.
pub fn check(item: &str, params: &LevelsParam, section: Option<&Disk>) -> Option<Verdict> {
    let record = section?.mount_record(item)?;

    let (Some(blocks_1k), Some(used), Some(available)) = (
        int_field(record, "blocks_1k"),
        int_field(record, "used"),
        int_field(record, "available"),
    ) else {
        return Some(Verdict::new(State::Unknown, "Unable to parse disk data"));
    };

    let size_bytes = blocks_1k as f64 * 1024.0;
    let used_bytes = used as f64 * 1024.0;
    let avail_bytes = available as f64 * 1024.0;

    let used_percent = if size_bytes > 0.0 {
        used_bytes / size_bytes * 100.0
    } else {
        0.0
    };

    let verdict = Verdict::new(
        grade_opt(params.levels, used_percent),
        format!(
            "{:.1}% used ({} of {})",
            used_percent,
            render_bytes(used_bytes),
            render_bytes(size_bytes)
        ),
    )
    .with_metric("fs_used", used_bytes)
    .with_metric("fs_free", avail_bytes)
    .with_metric("fs_size", size_bytes)
    .with_metric("fs_used_percent", used_percent);

    Some(verdict)
}
