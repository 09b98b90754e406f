//! Check evaluation for UCTM appliance monitoring
//!
//! Consumes the sectioned text stream produced by `uctm-agent` and turns it
//! into monitoring services and graded verdicts:
//! - [`agent_output`] splits the stream into raw per-section blocks
//! - each section module parses its block into a normalized shape,
//!   discovers the checkable services and evaluates them
//! - [`params`] resolves threshold/discovery configuration up front
//! - [`state`] carries the result vocabulary (states, metrics, verdicts)
//!
//! Everything here is pure computation: no I/O, no state across polls, and
//! no failure of one section ever affects another.

pub mod agent_output;
pub mod chassis;
pub mod disk;
mod fields;
pub mod hdd_ethernet;
pub mod memory;
pub mod params;
pub mod processor;
pub mod state;
pub mod system_stats;
pub mod uptime;
