//! Section collection and agent output emission
//!
//! Fetches the configured sections concurrently, then emits one
//! self-delimited block per section that returned data:
//!
//! ```text
//! <<<section_<name>:sep(0)>>>
//! <json payload on a single line>
//! ```
//!
//! Sections without data are silently omitted; partial success is success.
//! Emission follows the fixed registry order, never arrival order.

use std::collections::HashSet;
use std::io::Write;

use anyhow::{Context, Result};
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::UctmClient;

/// One collectable section: its block name and the device endpoint serving it.
pub struct SectionSpec {
    pub name: &'static str,
    pub endpoint: &'static str,
}

/// Canonical section registry. Order here is emission order.
pub const SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        name: "system_stats",
        endpoint: "systemstatusandstatistics/statsandstatus",
    },
    SectionSpec {
        name: "hdd_ethernet",
        endpoint: "ethernet/ethernetUsage",
    },
    SectionSpec {
        name: "chassis",
        endpoint: "systemdevicestats/chassisInfo",
    },
    SectionSpec {
        name: "processor",
        endpoint: "systemdevicestats/mpstat",
    },
    SectionSpec {
        name: "memory",
        endpoint: "systemdevicestats/freespace",
    },
    SectionSpec {
        name: "disk",
        endpoint: "systemdevicestats/diskspace",
    },
    SectionSpec {
        name: "uptime",
        endpoint: "systemdevicestats/uptime",
    },
];

/// Resolve a comma-separated allow-list against the registry. `None` selects
/// everything; names matching no known section are ignored with a warning.
pub fn select_sections(filter: Option<&str>) -> Vec<&'static SectionSpec> {
    let Some(filter) = filter else {
        return SECTIONS.iter().collect();
    };

    let wanted: HashSet<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    for name in &wanted {
        if !SECTIONS.iter().any(|spec| spec.name == *name) {
            warn!("Unknown section requested: {}", name);
        }
    }

    SECTIONS
        .iter()
        .filter(|spec| wanted.contains(spec.name))
        .collect()
}

/// Run one collection pass: fetch every selected endpoint concurrently and
/// emit the successful sections in registry order.
pub async fn collect(
    client: &UctmClient,
    specs: &[&'static SectionSpec],
    out: &mut impl Write,
) -> Result<()> {
    let payloads = join_all(specs.iter().map(|spec| client.request(spec.endpoint))).await;

    let results: Vec<(&SectionSpec, Option<Value>)> =
        specs.iter().copied().zip(payloads).collect();

    emit_sections(&results, out)
}

/// Write the section blocks for every fetched payload. Pure emission, split
/// out from the network side so the wire format is testable without a device.
pub fn emit_sections(
    results: &[(&SectionSpec, Option<Value>)],
    out: &mut impl Write,
) -> Result<()> {
    for (spec, payload) in results {
        match payload {
            Some(value) => {
                let line = serde_json::to_string(value)
                    .with_context(|| format!("Failed to serialize section {}", spec.name))?;
                writeln!(out, "<<<section_{}:sep(0)>>>", spec.name)?;
                writeln!(out, "{}", line)?;
            }
            None => debug!("No data for section {}, omitted", spec.name),
        }
    }
    Ok(())
}
