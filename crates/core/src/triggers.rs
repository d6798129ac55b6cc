//! Trigger catalog - entry points fired by the gameplay-control layer
//!
//! Each trigger checks the object at the block and inserts or updates the TROBs it
//! drives. Triggers run before the cycle's advance; anything they insert carries the
//! current cycle and is first advanced on the next one.

use crate::engine::Engine;
use crate::error::EngineError;
use crate::handle::EntryHandle;
use crate::link::LinkResolver;
use crate::trans::{GatePhase, Motion, SpikePhase, TransitionalRegistry};
use crate::types::{BlockAddr, ObjectId};

/// Which trigger an event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    Spike,
    Plate,
    LooseFloor,
    /// Pick the trigger from the object at the block.
    Auto,
}

/// A trigger request from the control layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerEvent {
    pub kind: TriggerKind,
    pub addr: BlockAddr,
}

impl TriggerEvent {
    pub const fn new(kind: TriggerKind, addr: BlockAddr) -> Self {
        Self { kind, addr }
    }
}

/// What a trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A new TROB started at the block.
    Inserted(EntryHandle),
    /// A TROB of this kind is already running there; nothing changed.
    AlreadyActive,
    /// The block does not hold an object this trigger applies to.
    NotApplicable,
    /// A plate fired and drove this many gates.
    Gates(usize),
}

impl Engine {
    /// Character crossed a spike block: start extending unless already in motion.
    pub fn spike_trigger(&mut self, addr: BlockAddr) -> Result<TriggerOutcome, EngineError> {
        if self.blueprint().object(addr) != ObjectId::Spikes {
            return Ok(TriggerOutcome::NotApplicable);
        }
        if self.trans().active_motion(addr).is_some() {
            return Ok(TriggerOutcome::AlreadyActive);
        }

        let frames = self.config().anim.spike_frames;
        let cycle = self.cycle();
        let handle = self
            .trans_mut()
            .insert(addr, Motion::Spikes(SpikePhase::Extending(frames)), cycle)?;
        log::debug!("spikes at {:?} triggered", addr);
        Ok(TriggerOutcome::Inserted(handle))
    }

    /// Character stood on a loose floor: start the wiggle countdown.
    pub fn loose_floor_trigger(&mut self, addr: BlockAddr) -> Result<TriggerOutcome, EngineError> {
        if self.blueprint().object(addr) != ObjectId::LooseFloor {
            return Ok(TriggerOutcome::NotApplicable);
        }
        if self.trans().active_motion(addr).is_some() {
            return Ok(TriggerOutcome::AlreadyActive);
        }

        let ticks = self.config().anim.wiggle_ticks.max(1);
        let cycle = self.cycle();
        let handle = self.trans_mut().insert(addr, Motion::LooseFloor(ticks), cycle)?;
        log::debug!("loose floor at {:?} triggered", addr);
        Ok(TriggerOutcome::Inserted(handle))
    }

    /// Weight on a plate: open (or, for an up-plate, close) every linked gate.
    ///
    /// Gates already processed stay driven if the chain later turns out to be corrupt.
    pub fn plate_trigger(&mut self, addr: BlockAddr) -> Result<TriggerOutcome, EngineError> {
        let object = self.blueprint().object(addr);
        if !object.is_plate() {
            return Ok(TriggerOutcome::NotApplicable);
        }

        let closing = object == ObjectId::UpPressPlate;
        let start = self.blueprint().spec(addr);
        let cycle = self.cycle();
        let cap = self.config().capacity.link_traversal_cap;
        let anim = self.config().anim;

        let (blueprint, trans) = self.blueprint_and_trans_mut();
        let resolver = LinkResolver::new(blueprint.links(), cap);
        let timer = resolver.plate_timer(start)?;
        let hold = timer.saturating_mul(anim.gate_hold_scale);

        let mut gates = 0;
        for target in resolver.resolve(start) {
            let target = target?;
            let gate = target.addr;
            if blueprint.object(gate) != ObjectId::Gate {
                log::warn!("plate at {:?} links to {:?} which is not a gate", addr, gate);
                continue;
            }
            let openness = blueprint.spec(gate).min(anim.gate_frames);
            if closing {
                close_gate(trans, gate, openness, cycle)?;
            } else {
                open_gate(trans, gate, openness, anim.gate_frames, hold, cycle)?;
            }
            gates += 1;
        }

        if let Err(full) = trans.insert(addr, Motion::Plate(anim.plate_down_ticks.max(1)), cycle) {
            log::warn!("plate at {:?} stays up: {}", addr, full);
        }

        log::debug!("plate at {:?} drove {} gate(s)", addr, gates);
        Ok(TriggerOutcome::Gates(gates))
    }

    /// Fire whichever trigger applies to the object at `addr`.
    pub fn trigger_at(&mut self, addr: BlockAddr) -> Result<TriggerOutcome, EngineError> {
        match self.blueprint().object(addr) {
            ObjectId::Spikes => self.spike_trigger(addr),
            ObjectId::PressPlate | ObjectId::UpPressPlate => self.plate_trigger(addr),
            ObjectId::LooseFloor => self.loose_floor_trigger(addr),
            _ => Ok(TriggerOutcome::NotApplicable),
        }
    }

    pub fn fire(&mut self, event: TriggerEvent) -> Result<TriggerOutcome, EngineError> {
        match event.kind {
            TriggerKind::Spike => self.spike_trigger(event.addr),
            TriggerKind::Plate => self.plate_trigger(event.addr),
            TriggerKind::LooseFloor => self.loose_floor_trigger(event.addr),
            TriggerKind::Auto => self.trigger_at(event.addr),
        }
    }
}

fn open_gate(
    trans: &mut TransitionalRegistry,
    gate: BlockAddr,
    openness: u8,
    frames: u8,
    hold: u8,
    cycle: u64,
) -> Result<(), EngineError> {
    match trans.active_motion(gate) {
        Some(Motion::Gate(GatePhase::Opening { remaining, .. })) => {
            trans.update(gate, Motion::Gate(GatePhase::Opening { remaining, hold }));
        }
        Some(Motion::Gate(GatePhase::Open { .. })) => {
            trans.update(gate, Motion::Gate(GatePhase::Open { hold }));
        }
        _ => {
            let remaining = frames.saturating_sub(openness);
            let phase = if remaining == 0 {
                GatePhase::Open { hold }
            } else {
                GatePhase::Opening { remaining, hold }
            };
            trans.insert(gate, Motion::Gate(phase), cycle)?;
        }
    }
    Ok(())
}

fn close_gate(trans: &mut TransitionalRegistry, gate: BlockAddr, openness: u8, cycle: u64) -> Result<(), EngineError> {
    match trans.active_motion(gate) {
        Some(Motion::Gate(GatePhase::Closing { .. })) => {}
        None if openness == 0 => {}
        _ => {
            let phase = GatePhase::Closing {
                remaining: openness.max(1),
            };
            trans.insert(gate, Motion::Gate(phase), cycle)?;
        }
    }
    Ok(())
}
