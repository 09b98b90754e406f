//! Processor statistics section: aggregate and per-core CPU utilization
//!
//! The device reports one mpstat record per CPU plus an aggregate record
//! whose `cpu` field is the literal `"all"`. Utilization is `100 - idle`.
//! Discovery of the aggregate service and of the per-core services is
//! independently switchable; I/O-wait carries its own optional threshold
//! pair combined with the utilization state via worst-of.

use serde_json::{Map, Value};

use crate::agent_output::json_block;
use crate::fields::{float_field, text_field};
use crate::params::{grade_opt, ProcessorDiscovery, ProcessorParams};
use crate::state::{Service, State, Verdict};

pub const SERVICE_NAME: &str = "CPU utilization";
pub const CORE_SERVICE_NAME: &str = "CPU Core %s";

const AGGREGATE_CPU: &str = "all";

#[derive(Debug, Clone, PartialEq)]
pub struct Processor {
    records: Vec<Map<String, Value>>,
}

impl Processor {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn find_cpu(&self, cpu: &str) -> Option<&Map<String, Value>> {
        self.records
            .iter()
            .find(|record| is_mpstat(record) && cpu_id(record).as_deref() == Some(cpu))
    }
}

fn is_mpstat(record: &Map<String, Value>) -> bool {
    text_field(record, "type").as_deref() == Some("mpstat")
}

fn cpu_id(record: &Map<String, Value>) -> Option<String> {
    text_field(record, "cpu")
}

pub fn parse(lines: &[String]) -> Option<Processor> {
    match json_block(lines)? {
        Value::Array(entries) => Some(Processor {
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

pub fn discover(params: &ProcessorDiscovery, section: &Processor) -> Vec<Service> {
    let mut has_aggregate = false;
    let mut cores = Vec::new();

    for record in &section.records {
        if !is_mpstat(record) {
            continue;
        }
        match cpu_id(record) {
            Some(id) if id == AGGREGATE_CPU => has_aggregate = true,
            Some(id) => cores.push(id),
            None => {}
        }
    }

    let mut services = Vec::new();
    if params.aggregate && has_aggregate {
        services.push(Service::singleton());
    }
    if params.individual {
        services.extend(cores.into_iter().map(Service::with_item));
    }
    services
}

/// The mpstat time columns of one record. Missing columns count as zero;
/// an unparsable column fails the whole record.
struct CpuTimes {
    usr: f64,
    sys: f64,
    iowait: f64,
    idle: f64,
    nice: f64,
    irq: f64,
    soft: f64,
    steal: f64,
}

impl CpuTimes {
    fn from_record(record: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            usr: float_field(record, "usr")?,
            sys: float_field(record, "sys")?,
            iowait: float_field(record, "iowait")?,
            idle: float_field(record, "idle")?,
            nice: float_field(record, "nice")?,
            irq: float_field(record, "irq")?,
            soft: float_field(record, "soft")?,
            steal: float_field(record, "steal")?,
        })
    }

    fn utilization(&self) -> f64 {
        100.0 - self.idle
    }
}

fn graded_state(params: &ProcessorParams, times: &CpuTimes) -> State {
    let util_state = grade_opt(params.util, times.utilization());
    let iowait_state = grade_opt(params.iowait, times.iowait);
    util_state.worst(iowait_state)
}

pub fn check(params: &ProcessorParams, section: Option<&Processor>) -> Option<Verdict> {
    let Some(section) = section.filter(|s| !s.is_empty()) else {
        return Some(Verdict::new(State::Unknown, "No processor data"));
    };

    let Some(record) = section.find_cpu(AGGREGATE_CPU) else {
        return Some(Verdict::new(State::Unknown, "No aggregate CPU data"));
    };

    let Some(times) = CpuTimes::from_record(record) else {
        return Some(Verdict::new(State::Unknown, "Unable to parse CPU data"));
    };

    let mut verdict = Verdict::new(
        graded_state(params, &times),
        format!(
            "Total: {:.1}%, User: {:.1}%, System: {:.1}%, Wait: {:.1}%",
            times.utilization(),
            times.usr,
            times.sys,
            times.iowait
        ),
    )
    .with_metric("user", times.usr)
    .with_metric("system", times.sys)
    .with_metric("wait", times.iowait)
    .with_metric("util", times.utilization());

    // Detailed columns only when they carry anything
    if times.nice > 0.0 {
        verdict = verdict.with_metric("nice", times.nice);
    }
    if times.irq > 0.0 {
        verdict = verdict.with_metric("interrupt", times.irq);
    }
    if times.soft > 0.0 {
        verdict = verdict.with_metric("softirq", times.soft);
    }
    if times.steal > 0.0 {
        verdict = verdict.with_metric("steal", times.steal);
    }

    Some(verdict)
}

/// Per-core variant. An unknown core yields no result at all.
pub fn check_core(
    item: &str,
    params: &ProcessorParams,
    section: Option<&Processor>,
) -> Option<Verdict> {
    let record = section?.find_cpu(item)?;

    let Some(times) = CpuTimes::from_record(record) else {
        return Some(Verdict::new(State::Unknown, "Unable to parse CPU core data"));
    };

    let mut summary_parts = vec![format!("Total: {:.1}%", times.utilization())];
    if times.usr > 1.0 {
        summary_parts.push(format!("User: {:.1}%", times.usr));
    }
    if times.sys > 1.0 {
        summary_parts.push(format!("System: {:.1}%", times.sys));
    }
    if times.iowait > 1.0 {
        summary_parts.push(format!("Wait: {:.1}%", times.iowait));
    }

    let verdict = Verdict::new(graded_state(params, &times), summary_parts.join(", "))
        .with_metric(&format!("cpu_core_util_{}", item), times.utilization())
        .with_metric(&format!("cpu_core_util_user_{}", item), times.usr)
        .with_metric(&format!("cpu_core_util_system_{}", item), times.sys)
        .with_metric(&format!("cpu_core_util_wait_{}", item), times.iowait);

    Some(verdict)
}
