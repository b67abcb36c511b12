//! Regional monitoring agents.
//!
//! Each agent implements `MonitorAgent` and owns one region's
//! perceive/reason/act cycle. The coordinator drives agents round by
//! round and wires their peer visibility beforehand.

pub mod regional;
pub mod traits;

pub use regional::{CyclePhase, RegionalAgent};
pub use traits::{AgentRecord, MonitorAgent};
