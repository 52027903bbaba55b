//! Agent module for conversational turn processing
//!
//! Provides the agent core, intent routing, and per-turn state.

pub mod core;
pub mod intent;
pub mod router;
pub mod state;

pub use core::{Agent, TurnOutcome};
pub use intent::Intent;
pub use state::TurnState;
