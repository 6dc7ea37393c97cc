//! State module for tracking harvest progress
//!
//! - `RunState`: lifecycle of a single run (not started, running, completed)

mod run_state;

pub use run_state::RunState;
