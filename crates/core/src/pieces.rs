//! Pieces module - which images make up a block
//!
//! A block is drawn from up to six pieces, one per image table: the static back
//! piece, the movable piece (gate bars, spikes, plate, loose floor), the foreground
//! piece drawn in front of characters, the two floor masks and a static object
//! sprite. The BlueSpec byte selects the pattern of static terrain and the state of
//! movable objects.

use crate::types::{ImageId, ImageTable, ObjectId};

/// Images of one block; `None` where the object has no such piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockPieces {
    pub back: Option<ImageId>,
    pub movable: Option<ImageId>,
    pub fore: Option<ImageId>,
    pub floor_mask: Option<ImageId>,
    pub half_mask: Option<ImageId>,
    pub object: Option<ImageId>,
}

/// Width in bytes of the movable strip of a gate.
pub const GATE_BAR_WIDTH: i16 = 1;

/// Pieces for `object` with BlueSpec `spec`.
///
/// `pressed` selects the depressed plate image while a plate TROB is active.
pub fn block_pieces(object: ObjectId, spec: u8, pressed: bool) -> BlockPieces {
    use ObjectId::*;

    let id = object.bits();
    let back = |variant: u8| Some(ImageId::new(ImageTable::Background, id, variant));
    let movable = |variant: u8| Some(ImageId::new(ImageTable::Movable, id, variant));
    let fore = Some(ImageId::new(ImageTable::Foreground, id, 0));
    let floor = Some(ImageId::new(ImageTable::FloorMask, 0, 0));
    let half = Some(ImageId::new(ImageTable::HalfFloorMask, 0, 0));

    let mut p = BlockPieces::default();
    match object {
        Space => {
            // Wall pattern only; drawing it also clears whatever stood here.
            p.back = back(spec);
        }
        Floor | Torch | Bones => {
            p.back = back(spec);
            p.floor_mask = floor;
            if object == Torch {
                p.object = Some(ImageId::new(ImageTable::Object, id, 0));
            }
        }
        Rubble => {
            p.back = back(0);
            p.half_mask = half;
        }
        Gate => {
            p.back = back(0);
            p.movable = movable(spec);
            p.fore = fore;
            p.floor_mask = floor;
        }
        Spikes | LooseFloor | Slicer => {
            p.back = back(0);
            p.movable = movable(spec);
            p.floor_mask = floor;
        }
        PressPlate | UpPressPlate => {
            p.back = back(0);
            p.movable = movable(pressed as u8);
            p.floor_mask = floor;
        }
        StuckPlate => {
            p.back = back(0);
            p.movable = Some(ImageId::new(ImageTable::Movable, PressPlate.bits(), 1));
            p.floor_mask = floor;
        }
        Pillar | PillarBottom | PanelWithFloor | ArchBottom => {
            p.back = back(spec);
            p.fore = fore;
            p.floor_mask = floor;
        }
        PillarTop | PanelNoFloor | ArchTop1 | ArchTop2 | ArchTop3 | ArchTop4 => {
            p.back = back(spec);
            p.fore = fore;
        }
        Block => {
            p.back = back(spec);
            p.fore = fore;
        }
        Window | Window2 => {
            p.back = back(0);
        }
        Exit | Exit2 => {
            p.back = back(0);
            p.movable = movable(spec);
            p.floor_mask = floor;
        }
        Flask | Sword => {
            p.back = back(0);
            p.floor_mask = floor;
            p.object = Some(ImageId::new(ImageTable::Object, id, spec));
        }
        Mirror => {
            p.back = back(0);
            p.fore = fore;
            p.floor_mask = floor;
        }
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_movable_variant_is_openness() {
        let p = block_pieces(ObjectId::Gate, 5, false);
        assert_eq!(p.movable, Some(ImageId::new(ImageTable::Movable, 4, 5)));
        assert!(p.fore.is_some());
    }

    #[test]
    fn plate_image_follows_pressed_flag() {
        let up = block_pieces(ObjectId::PressPlate, 12, false);
        let down = block_pieces(ObjectId::PressPlate, 12, true);
        assert_eq!(up.movable.unwrap().variant, 0);
        assert_eq!(down.movable.unwrap().variant, 1);
    }

    #[test]
    fn space_has_only_a_back_piece() {
        let p = block_pieces(ObjectId::Space, 0, false);
        assert_eq!(p.back, Some(ImageId::new(ImageTable::Background, 0, 0)));
        assert_eq!(
            BlockPieces {
                back: None,
                ..p
            },
            BlockPieces::default()
        );
    }

    #[test]
    fn rubble_uses_half_mask() {
        let p = block_pieces(ObjectId::Rubble, 0, false);
        assert!(p.half_mask.is_some());
        assert!(p.floor_mask.is_none());
    }
}
