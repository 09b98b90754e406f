//! Splitting of the sectioned agent output stream
//!
//! The agent emits one block per collected section:
//!
//! ```text
//! <<<section_<name>:sep(0)>>>
//! <json payload on a single line>
//! ```
//!
//! Splitting groups raw payload lines by section name. Blocks with an
//! unrecognized header are skipped; a section that was not collected is
//! simply absent from the result.

use std::collections::BTreeMap;

use serde_json::Value;

pub const SECTION_PREFIX: &str = "section_";

/// Group the raw payload lines of an agent output stream by section name.
pub fn split_sections(output: &str) -> BTreeMap<String, Vec<String>> {
    let mut sections: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in output.lines() {
        if line.starts_with("<<<") && line.ends_with(">>>") {
            current = header_name(line).map(str::to_string);
            if let Some(name) = &current {
                sections.entry(name.clone()).or_default();
            }
        } else if let Some(name) = &current {
            sections
                .entry(name.clone())
                .or_default()
                .push(line.to_string());
        }
    }

    sections
}

fn header_name(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("<<<")?.strip_suffix(">>>")?;
    let inner = inner.strip_suffix(":sep(0)").unwrap_or(inner);
    inner.strip_prefix(SECTION_PREFIX)
}

/// Decode the first payload line of a section block as JSON.
/// `None` on an absent or undecodable payload.
pub fn json_block(lines: &[String]) -> Option<Value> {
    serde_json::from_str(lines.first()?).ok()
}
