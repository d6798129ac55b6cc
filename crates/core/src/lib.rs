//! Core engine module - pure, deterministic, and testable
//!
//! This crate holds the level, the object registries and the per-cycle update that
//! drives the palace's mechanisms. It has **no dependencies** on terminal I/O; the only
//! file access is optional configuration loading.
//!
//! - **Deterministic**: the same level and trigger sequence reproduce identical state
//!   and draw lists
//! - **Bounded**: registries and draw lists have fixed capacities and report overflow
//! - **Allocation-free cycles**: after construction, running a cycle does not allocate
//!
//! # Module Structure
//!
//! - [`blueprint`]: 2304-byte level image codec
//! - [`link`]: plate -> gate chain resolution
//! - [`trans`]: transitional objects (gates, spikes, plates, loose floors) and AnimTrans
//! - [`mobile`]: mobile objects (falling floors) and AnimMobs
//! - [`triggers`]: trigger catalog fired by the control layer
//! - [`redraw`]: per-block redraw counters for the visible screen
//! - [`image_list`], [`compositor`]: per-layer draw lists and the channel dispatch table
//! - [`engine`]: the context object owning all of the above
//!
//! # Cycle
//!
//! One cycle is one frame: triggers -> AnimTrans -> AnimMobs -> image lists ->
//! compositor. Anything inserted during a cycle is first advanced on the next one.
//!
//! # Example
//!
//! ```
//! use tui_palace_core::{Blueprint, Engine, EngineConfig, TriggerOutcome};
//! use tui_palace_core::types::{BlockAddr, ObjectId};
//!
//! let mut level = Blueprint::empty();
//! let addr = BlockAddr::new(3, 12).unwrap();
//! level.place(addr, ObjectId::LooseFloor, 0);
//!
//! let mut engine = Engine::new(level, EngineConfig::default());
//! let outcome = engine.loose_floor_trigger(addr).unwrap();
//! assert!(matches!(outcome, TriggerOutcome::Inserted(_)));
//!
//! engine.step();
//! assert_eq!(engine.trans().len(), 1);
//! ```

pub mod blueprint;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod error;
pub mod handle;
pub mod image_list;
pub mod link;
pub mod mobile;
pub mod pieces;
pub mod redraw;
pub mod sequence;
pub mod snapshot;
pub mod trans;
pub mod triggers;

pub use tui_palace_types as types;

pub use blueprint::{Blueprint, LevelInfo, LinkEntry, ScreenLinks};
pub use compositor::{BlockDraw, Compositor, LayerRenderer, DISPATCH};
pub use config::{AnimConfig, CapacityConfig, EngineConfig, RenderConfig};
pub use engine::{CycleReport, Engine};
pub use error::{ConfigError, EngineError, LevelError, ListFull, ListKind};
pub use handle::EntryHandle;
pub use image_list::{ImageListBuilder, LayerImage, MidImage, ObjEntry, Peel, WipeRect};
pub use link::{GateTarget, LinkResolver};
pub use mobile::{Mob, MobSpawn, MobType, MobileRegistry};
pub use redraw::{BlockMask, DirtyBlocks, RedrawBufferSet, VisibleScreen};
pub use sequence::{CharacterFrame, NoCharacters, SequenceInterpreter};
pub use snapshot::{EngineSnapshot, Fnv1aHasher};
pub use trans::{GatePhase, Motion, SpikePhase, TransitionalRegistry, Trob, TrobState};
pub use triggers::{TriggerEvent, TriggerKind, TriggerOutcome};
