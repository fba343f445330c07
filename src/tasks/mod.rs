//! Background tasks module
//!
//! This module contains the phase resampling task and the edge-triggered
//! dispatcher that turns phase changes into cues and media commands.

pub mod dispatcher;
pub mod ticker;

// Re-export main types and functions
pub use dispatcher::{cues_for_phase, Dispatcher, EdgeTrigger};
pub use ticker::ticker_task;
