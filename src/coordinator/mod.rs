//! Multi-Agent Coordinator
//!
//! Central orchestrator that manages the regional monitoring agents.
//! Owns the registry and drives sequential rounds with per-agent
//! failure isolation; each round's results reduce into a fresh global
//! status.

pub mod coordinator;
pub mod state;

pub use coordinator::Coordinator;
pub use state::{
    shared_round, AgentFailure, GlobalStatus, RoundReport, SharedRound, HIGH_RISK_SCORE,
};
