//! Terminal rendering for the palace engine.
//!
//! The engine produces per-layer draw lists; this crate turns them into character
//! cells. It avoids ratatui widgets/layout and renders into a plain framebuffer that
//! is diffed and flushed to a crossterm backend.
//!
//! - [`block_view`]: the engine's `LayerRenderer`, one cell per byte column
//! - [`palace_view`]: border, cursor and status panel around the block view
//! - [`renderer`]: diffing terminal writer

pub mod block_view;
pub mod fb;
pub mod glyphs;
pub mod palace_view;
pub mod renderer;

pub use tui_palace_core as core;
pub use tui_palace_types as types;

pub use block_view::{BlockView, PaintStats, VIEW_COLS, VIEW_ROWS};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use palace_view::{AnchorY, PalaceView, RunnerStatus, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
