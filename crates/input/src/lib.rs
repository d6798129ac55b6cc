//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key events
//! into [`crate::types::ControlCommand`] and buffers them between cycles. The core
//! never sees key events; the runner turns commands into triggers, screen switches
//! and cursor moves.

pub mod map;
pub mod queue;

pub use tui_palace_types as types;

pub use map::{handle_key_event, is_pause_toggle, should_quit};
pub use queue::{CommandQueue, QUEUE_CAPACITY};
