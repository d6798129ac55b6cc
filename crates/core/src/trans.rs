//! Transitional objects - fixed-location mechanisms and their per-cycle advance
//!
//! A transitional object (TROB) animates one block in place: a gate rising and
//! falling, spikes extending and retracting, a plate held down, a loose floor
//! wiggling before it drops. At most one TROB exists per block.
//!
//! Removal is two-phase. When a state machine reaches its terminal phase the entry
//! becomes [`TrobState::PendingRemoval`] and its final frame is drawn; the next
//! [`TransitionalRegistry::advance_all`] drops it before advancing anything else.
//! The loose floor is the exception: its terminal phase hands the block over to a
//! falling [`Mob`](crate::mobile::Mob) and the entry is removed immediately.

use crate::blueprint::Blueprint;
use crate::config::EngineConfig;
use crate::error::{ListFull, ListKind};
use crate::handle::{EntryHandle, HandleSeq};
use crate::mobile::{MobSpawn, MobType, MobileRegistry};
use crate::redraw::{RedrawBufferSet, VisibleScreen};
use crate::types::{BlockAddr, ObjectId, RedrawChannel};

/// Gate state machine: CLOSED -> OPENING(k..1) -> OPEN(hold) -> CLOSING(k..1) -> CLOSED.
///
/// Openness itself lives in the gate's BlueSpec byte (0 = closed, `gate_frames` = open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatePhase {
    Opening { remaining: u8, hold: u8 },
    Open { hold: u8 },
    Closing { remaining: u8 },
}

/// Spike state machine; extension lives in BlueSpec (0 = retracted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpikePhase {
    Extending(u8),
    Out(u8),
    Retracting(u8),
}

/// Type-specific motion of an active TROB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Gate(GatePhase),
    Spikes(SpikePhase),
    /// Wiggle cycles left before the floor drops.
    LooseFloor(u8),
    /// Cycles left showing the depressed image.
    Plate(u8),
}

impl Motion {
    /// Signed motion code: positive countdown while rising, extending or wiggling,
    /// zero while holding, negative while falling back.
    pub fn code(&self) -> i16 {
        match *self {
            Motion::Gate(GatePhase::Opening { remaining, .. }) => remaining as i16,
            Motion::Gate(GatePhase::Open { .. }) => 0,
            Motion::Gate(GatePhase::Closing { remaining }) => -(remaining as i16) - 1,
            Motion::Spikes(SpikePhase::Extending(k)) => k as i16,
            Motion::Spikes(SpikePhase::Out(_)) => 0,
            Motion::Spikes(SpikePhase::Retracting(k)) => -(k as i16) - 1,
            Motion::LooseFloor(k) => k as i16,
            Motion::Plate(k) => k as i16,
        }
    }

    /// Whether this motion belongs on a block holding `object`.
    pub fn fits(&self, object: ObjectId) -> bool {
        match self {
            Motion::Gate(_) => object == ObjectId::Gate,
            Motion::Spikes(_) => object == ObjectId::Spikes,
            Motion::LooseFloor(_) => object == ObjectId::LooseFloor,
            Motion::Plate(_) => object.is_plate(),
        }
    }

    /// Channel that shows this motion's changes.
    pub fn channel(&self) -> RedrawChannel {
        match self {
            Motion::Gate(_) => RedrawChannel::Movable,
            _ => RedrawChannel::General,
        }
    }
}

/// Lifecycle tag of a TROB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrobState {
    Active(Motion),
    /// Terminal frame drawn; removed at the start of the next advance.
    PendingRemoval,
}

impl TrobState {
    /// Motion code with -1 standing for pending removal.
    pub fn code(&self) -> i16 {
        match self {
            TrobState::Active(m) => m.code(),
            TrobState::PendingRemoval => -1,
        }
    }
}

/// One transitional object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trob {
    pub handle: EntryHandle,
    pub addr: BlockAddr,
    pub state: TrobState,
    /// Cycle in which the entry was (re)inserted; it is not advanced in that cycle.
    pub born: u64,
}

impl Trob {
    pub fn motion(&self) -> Option<Motion> {
        match self.state {
            TrobState::Active(m) => Some(m),
            TrobState::PendingRemoval => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TrobState::Active(_))
    }
}

/// Everything an advance pass reads or writes besides the registries themselves.
pub struct AnimContext<'a> {
    pub blueprint: &'a mut Blueprint,
    pub redraw: &'a mut RedrawBufferSet,
    pub view: VisibleScreen,
    pub config: &'a EngineConfig,
    pub cycle: u64,
}

impl AnimContext<'_> {
    pub(crate) fn mark(&mut self, addr: BlockAddr, channel: RedrawChannel) {
        let passes = self.config.render.redraw_passes;
        self.redraw.mark_block(&self.view, addr, channel, passes);
    }
}

enum Step {
    Keep,
    Remove,
}

/// Fixed-capacity list of active TROBs.
#[derive(Debug, Clone)]
pub struct TransitionalRegistry {
    entries: Vec<Trob>,
    capacity: usize,
    handles: HandleSeq,
}

impl TransitionalRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            handles: HandleSeq::default(),
        }
    }

    /// Insert a TROB, or restart the one already at `addr` with `motion`.
    ///
    /// Fails with [`ListFull`] only when `addr` has no entry and the list is at capacity.
    pub fn insert(&mut self, addr: BlockAddr, motion: Motion, cycle: u64) -> Result<EntryHandle, ListFull> {
        if let Some(existing) = self.entries.iter_mut().find(|t| t.addr == addr) {
            existing.state = TrobState::Active(motion);
            existing.born = cycle;
            return Ok(existing.handle);
        }

        if self.entries.len() >= self.capacity {
            log::warn!("transitional list full; dropping {:?} at {:?}", motion, addr);
            return Err(ListFull {
                list: ListKind::Transitional,
                capacity: self.capacity,
            });
        }

        let handle = self.handles.issue();
        self.entries.push(Trob {
            handle,
            addr,
            state: TrobState::Active(motion),
            born: cycle,
        });
        log::trace!("trob {:?} inserted at {:?}: {:?}", handle, addr, motion);
        Ok(handle)
    }

    /// Change the motion of an existing entry without restarting its birth cycle.
    pub fn update(&mut self, addr: BlockAddr, motion: Motion) -> bool {
        match self.entries.iter_mut().find(|t| t.addr == addr) {
            Some(t) => {
                t.state = TrobState::Active(motion);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, addr: BlockAddr) -> Option<&Trob> {
        self.entries.iter().find(|t| t.addr == addr)
    }

    pub fn by_handle(&self, handle: EntryHandle) -> Option<&Trob> {
        self.entries.iter().find(|t| t.handle == handle)
    }

    /// Active motion at `addr`, ignoring entries pending removal.
    pub fn active_motion(&self, addr: BlockAddr) -> Option<Motion> {
        self.get(addr).and_then(Trob::motion)
    }

    pub fn remove(&mut self, addr: BlockAddr) -> bool {
        let before = self.entries.len();
        self.entries.retain(|t| t.addr != addr);
        self.entries.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trob> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discard every entry (level load or reset).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.handles.reset();
    }

    /// Advance every entry by one cycle.
    ///
    /// Entries pending removal are dropped first. Entries born this cycle are only
    /// marked for redraw so their initial phase is shown.
    pub fn advance_all(&mut self, mobs: &mut MobileRegistry, ctx: &mut AnimContext<'_>) {
        self.entries.retain(|t| t.is_active());

        let mut i = 0;
        while i < self.entries.len() {
            let trob = self.entries[i];
            let step = match trob.state {
                TrobState::Active(motion) if trob.born == ctx.cycle => {
                    ctx.mark(trob.addr, motion.channel());
                    Step::Keep
                }
                TrobState::Active(motion) => self.advance_one(i, motion, mobs, ctx),
                TrobState::PendingRemoval => Step::Keep,
            };

            match step {
                Step::Keep => i += 1,
                Step::Remove => {
                    self.entries.remove(i);
                }
            }
        }
    }

    fn advance_one(
        &mut self,
        i: usize,
        motion: Motion,
        mobs: &mut MobileRegistry,
        ctx: &mut AnimContext<'_>,
    ) -> Step {
        let addr = self.entries[i].addr;
        let object = ctx.blueprint.object(addr);
        if !motion.fits(object) {
            // The block changed under us (e.g. a falling floor landed on it).
            log::debug!("trob at {:?} no longer matches {:?}; removed", addr, object);
            ctx.mark(addr, RedrawChannel::General);
            return Step::Remove;
        }

        let next = match motion {
            Motion::Gate(phase) => advance_gate(addr, phase, ctx),
            Motion::Spikes(phase) => advance_spikes(addr, phase, ctx),
            Motion::Plate(k) => advance_plate(addr, k, ctx),
            Motion::LooseFloor(k) => match advance_loose_floor(addr, k, mobs, ctx) {
                Some(state) => state,
                None => return Step::Remove,
            },
        };

        log::trace!("trob at {:?}: {:?} -> {:?}", addr, motion, next);
        self.entries[i].state = next;
        Step::Keep
    }
}

fn advance_gate(addr: BlockAddr, phase: GatePhase, ctx: &mut AnimContext<'_>) -> TrobState {
    let frames = ctx.config.anim.gate_frames;
    let open = ctx.blueprint.spec(addr).min(frames);

    match phase {
        GatePhase::Opening { remaining, hold } => {
            let open = (open + 1).min(frames);
            ctx.blueprint.set_spec(addr, open);
            ctx.mark(addr, RedrawChannel::Movable);
            if remaining <= 1 || open >= frames {
                TrobState::Active(Motion::Gate(GatePhase::Open { hold }))
            } else {
                TrobState::Active(Motion::Gate(GatePhase::Opening {
                    remaining: remaining - 1,
                    hold,
                }))
            }
        }
        GatePhase::Open { hold } if hold > 0 => {
            TrobState::Active(Motion::Gate(GatePhase::Open { hold: hold - 1 }))
        }
        GatePhase::Open { .. } => {
            if open == 0 {
                TrobState::PendingRemoval
            } else {
                TrobState::Active(Motion::Gate(GatePhase::Closing { remaining: open }))
            }
        }
        GatePhase::Closing { remaining } => {
            let open = open.saturating_sub(1);
            ctx.blueprint.set_spec(addr, open);
            ctx.mark(addr, RedrawChannel::Movable);
            if remaining <= 1 || open == 0 {
                TrobState::PendingRemoval
            } else {
                TrobState::Active(Motion::Gate(GatePhase::Closing {
                    remaining: remaining - 1,
                }))
            }
        }
    }
}

fn advance_spikes(addr: BlockAddr, phase: SpikePhase, ctx: &mut AnimContext<'_>) -> TrobState {
    let frames = ctx.config.anim.spike_frames;
    let out = ctx.blueprint.spec(addr).min(frames);

    match phase {
        SpikePhase::Extending(k) => {
            let out = (out + 1).min(frames);
            ctx.blueprint.set_spec(addr, out);
            ctx.mark(addr, RedrawChannel::General);
            if k <= 1 || out >= frames {
                TrobState::Active(Motion::Spikes(SpikePhase::Out(ctx.config.anim.spike_hold_ticks)))
            } else {
                TrobState::Active(Motion::Spikes(SpikePhase::Extending(k - 1)))
            }
        }
        SpikePhase::Out(hold) if hold > 0 => TrobState::Active(Motion::Spikes(SpikePhase::Out(hold - 1))),
        SpikePhase::Out(_) => {
            if out == 0 {
                TrobState::PendingRemoval
            } else {
                TrobState::Active(Motion::Spikes(SpikePhase::Retracting(out)))
            }
        }
        SpikePhase::Retracting(k) => {
            let out = out.saturating_sub(1);
            ctx.blueprint.set_spec(addr, out);
            ctx.mark(addr, RedrawChannel::General);
            if k <= 1 || out == 0 {
                TrobState::PendingRemoval
            } else {
                TrobState::Active(Motion::Spikes(SpikePhase::Retracting(k - 1)))
            }
        }
    }
}

fn advance_plate(addr: BlockAddr, k: u8, ctx: &mut AnimContext<'_>) -> TrobState {
    if k <= 1 {
        // Plate pops back up: the raised image is the terminal frame.
        ctx.mark(addr, RedrawChannel::General);
        TrobState::PendingRemoval
    } else {
        TrobState::Active(Motion::Plate(k - 1))
    }
}

/// Wiggle, or hand the block over to a falling floor.
///
/// Returns `None` when the TROB must be removed right away.
fn advance_loose_floor(
    addr: BlockAddr,
    k: u8,
    mobs: &mut MobileRegistry,
    ctx: &mut AnimContext<'_>,
) -> Option<TrobState> {
    if k > 1 {
        ctx.blueprint.set_spec(addr, (k - 1) & 1);
        ctx.mark(addr, RedrawChannel::General);
        return Some(TrobState::Active(Motion::LooseFloor(k - 1)));
    }

    let spawn = MobSpawn {
        x: addr.x(),
        y: addr.y(),
        screen: addr.screen(),
        velocity: 0,
        kind: MobType::FALLING_FLOOR,
        level: addr.row(),
    };

    match mobs.insert(spawn, ctx.cycle) {
        Ok(handle) => {
            ctx.blueprint.set_object(addr, ObjectId::Space);
            ctx.blueprint.set_spec(addr, 0);
            ctx.mark(addr, RedrawChannel::General);
            log::debug!("loose floor at {:?} falls as mob {:?}", addr, handle);
            None
        }
        Err(full) => {
            // Stay on the last wiggle frame and retry next cycle.
            log::warn!("loose floor at {:?} cannot fall yet: {}", addr, full);
            Some(TrobState::Active(Motion::LooseFloor(1)))
        }
    }
}
