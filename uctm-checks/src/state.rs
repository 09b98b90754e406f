//! Check result vocabulary: monitoring states, metrics, verdicts and services
//!
//! A section evaluation produces at most one [`Verdict`]: a graded state, a
//! human-readable summary, optional detail text and zero or more numeric
//! metrics. Sections with several independent sub-checks fold them through
//! [`VerdictBuilder`] - worst state wins, summaries are joined, metrics from
//! every sub-check are kept regardless of state.

use serde::Serialize;
use std::fmt;

/// Monitoring state of one evaluated service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    Ok,
    Warn,
    Crit,
    Unknown,
}

impl State {
    /// Fold two sub-states into the one to report. This is an explicit
    /// combinator, not a numeric max: CRIT dominates everything, UNKNOWN
    /// outranks WARN and OK ("could not determine" must not be hidden by a
    /// mere warning), WARN outranks OK.
    pub fn worst(self, other: State) -> State {
        match (self, other) {
            (State::Crit, _) | (_, State::Crit) => State::Crit,
            (State::Unknown, _) | (_, State::Unknown) => State::Unknown,
            (State::Warn, _) | (_, State::Warn) => State::Warn,
            _ => State::Ok,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            State::Ok => "OK",
            State::Warn => "WARN",
            State::Crit => "CRIT",
            State::Unknown => "UNKNOWN",
        };
        f.write_str(text)
    }
}

/// One named numeric metric attached to a verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Graded result of evaluating one service. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub state: State,
    pub summary: String,
    pub details: Option<String>,
    pub metrics: Vec<Metric>,
}

impl Verdict {
    pub fn new(state: State, summary: impl Into<String>) -> Self {
        Self {
            state,
            summary: summary.into(),
            details: None,
            metrics: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.push(Metric::new(name, value));
        self
    }
}

/// Accumulates independent sub-checks of one section into a single verdict.
#[derive(Debug, Default)]
pub struct VerdictBuilder {
    results: Vec<(State, String)>,
    metrics: Vec<Metric>,
}

impl VerdictBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&mut self, state: State, summary: impl Into<String>) {
        self.results.push((state, summary.into()));
    }

    pub fn metric(&mut self, name: &str, value: f64) {
        self.metrics.push(Metric::new(name, value));
    }

    /// Fold into one verdict, or `None` if no sub-check produced a result.
    pub fn build(self) -> Option<Verdict> {
        if self.results.is_empty() {
            return None;
        }

        let state = self
            .results
            .iter()
            .fold(State::Ok, |acc, (s, _)| acc.worst(*s));
        let summary = self
            .results
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Some(Verdict {
            state,
            summary,
            details: None,
            metrics: self.metrics,
        })
    }
}

/// One discoverable checkable item within a section. Singleton services
/// carry no item key; multi-item services identify their sub-resource
/// (mount point, interface name, CPU core index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub item: Option<String>,
}

impl Service {
    pub fn singleton() -> Self {
        Self { item: None }
    }

    pub fn with_item(item: impl Into<String>) -> Self {
        Self {
            item: Some(item.into()),
        }
    }

    /// Render the display name from a section template like `Filesystem %s`.
    pub fn label(&self, template: &str) -> String {
        match &self.item {
            Some(item) => template.replace("%s", item),
            None => template.to_string(),
        }
    }
}

/// Human-readable byte quantity for summaries.
pub fn render_bytes(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes;
    let mut unit = 0;
    while value.abs() >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{:.0} B", value)
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_crit_dominates() {
        assert_eq!(State::Crit.worst(State::Unknown), State::Crit);
        assert_eq!(State::Unknown.worst(State::Crit), State::Crit);
        assert_eq!(State::Ok.worst(State::Crit), State::Crit);
    }

    #[test]
    fn test_worst_unknown_outranks_warn() {
        assert_eq!(State::Unknown.worst(State::Warn), State::Unknown);
        assert_eq!(State::Warn.worst(State::Unknown), State::Unknown);
    }

    #[test]
    fn test_worst_warn_outranks_ok() {
        assert_eq!(State::Ok.worst(State::Warn), State::Warn);
        assert_eq!(State::Ok.worst(State::Ok), State::Ok);
    }

    #[test]
    fn test_builder_folds_state_and_summary() {
        let mut builder = VerdictBuilder::new();
        builder.result(State::Ok, "Memory: fine");
        builder.result(State::Warn, "CPU: 85.0%");
        builder.metric("cpu_percent", 85.0);

        let verdict = builder.build().unwrap();
        assert_eq!(verdict.state, State::Warn);
        assert_eq!(verdict.summary, "Memory: fine, CPU: 85.0%");
        assert_eq!(verdict.metrics, vec![Metric::new("cpu_percent", 85.0)]);
    }

    #[test]
    fn test_builder_empty_yields_nothing() {
        assert!(VerdictBuilder::new().build().is_none());
    }

    #[test]
    fn test_service_labels() {
        assert_eq!(Service::singleton().label("Memory"), "Memory");
        assert_eq!(
            Service::with_item("/var").label("Filesystem %s"),
            "Filesystem /var"
        );
    }

    #[test]
    fn test_render_bytes() {
        assert_eq!(render_bytes(512.0), "512 B");
        assert_eq!(render_bytes(2048.0), "2.00 KiB");
        assert_eq!(render_bytes(3.5 * 1024.0 * 1024.0 * 1024.0), "3.50 GiB");
    }
}
