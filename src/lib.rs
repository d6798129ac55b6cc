//! TUI Palace (workspace facade crate).
//!
//! Re-exports the engine crates under short names and adds what the runner needs on
//! top of them: a built-in demo level and the trigger replay script format.

pub use tui_palace_core as core;
pub use tui_palace_input as input;
pub use tui_palace_term as term;
pub use tui_palace_types as types;

pub mod demo;
pub mod replay;
