//! Built-in demo level.
//!
//! Four screens: 1-2-3 side by side and 4 below 1. Every mechanism appears at least
//! once: loose floors (one of them falls through to the screen below), spikes, a
//! plate opening two gates on different screens, an up-plate closing one of them, and
//! a plate with no gates.

use crate::core::{Blueprint, LinkEntry, ScreenLinks};
use crate::types::{BlockAddr, Facing, ObjectId};

const fn at(screen: u8, block: u8) -> BlockAddr {
    match BlockAddr::new(screen, block) {
        Some(addr) => addr,
        None => panic!("demo address out of range"),
    }
}

/// Where the kid starts.
pub const KID_START: BlockAddr = at(1, 21);
/// Loose floor on the top row of screen 1; lands on the middle-row floor below it.
pub const LOOSE_TOP: BlockAddr = at(1, 3);
/// Loose floor on the bottom row of screen 1; falls into screen 4.
pub const LOOSE_DROP: BlockAddr = at(1, 26);
pub const SPIKES: BlockAddr = at(1, 23);
/// Opens `GATE_NEAR` and `GATE_FAR`.
pub const PLATE: BlockAddr = at(1, 24);
pub const GATE_NEAR: BlockAddr = at(1, 28);
pub const GATE_FAR: BlockAddr = at(2, 27);
/// Closes `GATE_FAR`.
pub const UP_PLATE: BlockAddr = at(2, 22);
/// Plate whose chain drives nothing.
pub const DEAD_PLATE: BlockAddr = at(3, 21);
/// Where `LOOSE_DROP` ends up as rubble.
pub const DROP_LANDING: BlockAddr = at(4, 26);

const PLATE_LINK: u8 = 0;
const UP_PLATE_LINK: u8 = 2;
const DEAD_PLATE_LINK: u8 = 3;
const GATE_TIMER: u8 = 6;

/// Build the demo level.
pub fn demo_level() -> Blueprint {
    let mut bp = Blueprint::empty();

    bp.set_screen_links(1, ScreenLinks::new(0, 2, 0, 4));
    bp.set_screen_links(2, ScreenLinks::new(1, 3, 0, 0));
    bp.set_screen_links(3, ScreenLinks::new(2, 0, 0, 0));
    bp.set_screen_links(4, ScreenLinks::new(0, 0, 1, 0));

    for screen in 1..=4u8 {
        for addr in Blueprint::screen_blocks(screen) {
            // Bottom row is floor, the rest wall pattern.
            if addr.row() == 2 {
                bp.place(addr, ObjectId::Floor, 0);
            } else {
                bp.place(addr, ObjectId::Space, 1 + (addr.column() % 2));
            }
        }
    }

    // Screen 1: ledge on the middle row, a loose floor above it.
    for block in 11..=15 {
        bp.place(at(1, block), ObjectId::Floor, 0);
    }
    bp.place(at(1, 10), ObjectId::Pillar, 0);
    bp.place(at(1, 0), ObjectId::PillarTop, 0);
    bp.place(at(1, 2), ObjectId::Floor, 0);
    bp.place(LOOSE_TOP, ObjectId::LooseFloor, 0);
    bp.place(at(1, 20), ObjectId::Torch, 0);
    bp.place(SPIKES, ObjectId::Spikes, 0);
    bp.place(PLATE, ObjectId::PressPlate, PLATE_LINK);
    bp.place(LOOSE_DROP, ObjectId::LooseFloor, 0);
    bp.place(GATE_NEAR, ObjectId::Gate, 0);
    bp.place(at(1, 29), ObjectId::Floor, 0);

    // Screen 2: the far gate and the plate that shuts it.
    bp.place(at(2, 20), ObjectId::Bones, 0);
    bp.place(UP_PLATE, ObjectId::UpPressPlate, UP_PLATE_LINK);
    bp.place(at(2, 24), ObjectId::Flask, 0);
    bp.place(GATE_FAR, ObjectId::Gate, 0);
    for block in 0..10 {
        bp.place(at(2, block), ObjectId::PanelNoFloor, 0);
    }

    // Screen 3: a window, a dead plate and a block wall.
    bp.place(at(3, 14), ObjectId::Window, 0);
    bp.place(DEAD_PLATE, ObjectId::PressPlate, DEAD_PLATE_LINK);
    bp.place(at(3, 25), ObjectId::Sword, 0);
    for block in [9, 19, 29] {
        bp.place(at(3, block), ObjectId::Block, 0);
    }

    // Screen 4: open shaft under LOOSE_DROP down to its landing.
    bp.place(at(4, 6), ObjectId::Space, 0);
    bp.place(at(4, 16), ObjectId::Space, 0);
    bp.place(at(4, 29), ObjectId::Mirror, 0);

    bp.set_link(0, LinkEntry::to_gate(GATE_NEAR, GATE_TIMER, false));
    bp.set_link(1, LinkEntry::to_gate(GATE_FAR, GATE_TIMER, true));
    bp.set_link(UP_PLATE_LINK, LinkEntry::to_gate(GATE_FAR, 0, true));
    bp.set_link(DEAD_PLATE_LINK, LinkEntry::unlinked(4));

    bp.info_mut().set_kid_start(KID_START, Facing::Right);
    bp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_places_every_mechanism() {
        let bp = demo_level();
        assert_eq!(bp.object(LOOSE_TOP), ObjectId::LooseFloor);
        assert_eq!(bp.object(LOOSE_DROP), ObjectId::LooseFloor);
        assert_eq!(bp.object(SPIKES), ObjectId::Spikes);
        assert_eq!(bp.object(PLATE), ObjectId::PressPlate);
        assert_eq!(bp.object(UP_PLATE), ObjectId::UpPressPlate);
        assert_eq!(bp.object(GATE_NEAR), ObjectId::Gate);
        assert_eq!(bp.object(GATE_FAR), ObjectId::Gate);
        assert_eq!(bp.object(DROP_LANDING), ObjectId::Floor);
        assert_eq!(bp.info().kid_start(), Some((KID_START, Facing::Right)));
    }

    #[test]
    fn demo_survives_a_byte_round_trip() {
        let bp = demo_level();
        let again = Blueprint::from_bytes(&bp.to_bytes()).unwrap();
        assert_eq!(again.to_bytes(), bp.to_bytes());
    }
}
