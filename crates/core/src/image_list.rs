//! Image list builder - per-layer draw instruction lists for one frame
//!
//! Six ordered lists, one per layer, plus the intermediate object list. Every list is
//! a fixed-capacity [`ArrayVec`]; a full list drops the instruction and counts it
//! instead of growing. The builder is reused across frames so a running engine never
//! allocates while composing.
//!
//! Objects (falling floors and characters) are collected every frame, sorted by
//! bottom line so nearer objects are drawn last, and expanded into mid-layer images.

use arrayvec::ArrayVec;

use crate::engine::Engine;
use crate::mobile::MobType;
use crate::sequence::SequenceInterpreter;
use crate::types::{
    ActionCode, CharacterIdentity, Facing, ImageId, ImageTable, Opacity, BLOCK_BOTTOM, SCREEN_HEIGHT,
};

pub const GENERAL_CAP: usize = 48;
pub const WIPE_CAP: usize = 48;
pub const BACK_CAP: usize = 96;
pub const MID_CAP: usize = 96;
pub const FORE_CAP: usize = 128;
pub const MESSAGE_CAP: usize = 16;
pub const OBJECT_CAP: usize = 32;

/// Sections a falling floor is drawn from.
pub const FALLING_FLOOR_SECTIONS: u8 = 3;

/// Background, foreground and message instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerImage {
    pub x: i16,
    /// Bottom line of the image.
    pub y: i16,
    pub image: ImageId,
    pub opacity: Opacity,
}

/// Solid fill of a rectangle whose bottom-left corner is `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WipeRect {
    pub x: i16,
    pub y: i16,
    pub width: i16,
    pub height: i16,
    pub color: u8,
}

/// Restore what was under previously drawn characters in a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Peel {
    pub x: i16,
    pub y: i16,
    pub width: i16,
    pub height: i16,
}

/// What a mid-layer image depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MidKind {
    Character,
    Section,
    StaticObject,
}

/// Mid-plane instruction: a layer image plus facing, kind and floor cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MidImage {
    pub x: i16,
    pub y: i16,
    pub image: ImageId,
    pub opacity: Opacity,
    pub face: Facing,
    pub kind: MidKind,
    /// Lines below this one are hidden behind the floor.
    pub cutoff: Option<i16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjKind {
    Character {
        identity: CharacterIdentity,
        image: u8,
        action: ActionCode,
    },
    Mob(MobType),
}

/// One visible object before expansion into mid-layer images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjEntry {
    pub x: i16,
    pub y: i16,
    pub face: Facing,
    pub kind: ObjKind,
    pub cutoff: Option<i16>,
    /// Collection order; breaks ties between objects on the same line.
    pub seq: u16,
}

/// Floor line the character at `y` stands on.
fn floor_line(y: i16) -> i16 {
    BLOCK_BOTTOM
        .iter()
        .copied()
        .find(|&b| y <= b)
        .unwrap_or(BLOCK_BOTTOM[BLOCK_BOTTOM.len() - 1])
}

fn push<T, const N: usize>(list: &mut ArrayVec<T, N>, item: T, dropped: &mut usize, layer: &'static str) {
    if list.try_push(item).is_err() {
        *dropped += 1;
        log::warn!("{} list full ({} entries); instruction dropped", layer, N);
    }
}

/// Builder and owner of the per-frame draw lists.
#[derive(Debug, Clone, Default)]
pub struct ImageListBuilder {
    general: ArrayVec<Peel, GENERAL_CAP>,
    wipe: ArrayVec<WipeRect, WIPE_CAP>,
    back: ArrayVec<LayerImage, BACK_CAP>,
    mid: ArrayVec<MidImage, MID_CAP>,
    fore: ArrayVec<LayerImage, FORE_CAP>,
    message: ArrayVec<LayerImage, MESSAGE_CAP>,
    objects: ArrayVec<ObjEntry, OBJECT_CAP>,
    dropped: usize,
}

impl ImageListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every list except messages, which persist until [`Self::clear_messages`].
    pub fn clear_frame(&mut self) {
        self.general.clear();
        self.wipe.clear();
        self.back.clear();
        self.mid.clear();
        self.fore.clear();
        self.objects.clear();
        self.dropped = 0;
    }

    pub fn clear_messages(&mut self) {
        self.message.clear();
    }

    pub fn push_general(&mut self, peel: Peel) {
        push(&mut self.general, peel, &mut self.dropped, "general");
    }

    pub fn push_wipe(&mut self, rect: WipeRect) {
        push(&mut self.wipe, rect, &mut self.dropped, "wipe");
    }

    pub fn push_back(&mut self, image: LayerImage) {
        push(&mut self.back, image, &mut self.dropped, "background");
    }

    pub fn push_mid(&mut self, image: MidImage) {
        push(&mut self.mid, image, &mut self.dropped, "mid");
    }

    pub fn push_fore(&mut self, image: LayerImage) {
        push(&mut self.fore, image, &mut self.dropped, "foreground");
    }

    pub fn push_message(&mut self, image: LayerImage) {
        push(&mut self.message, image, &mut self.dropped, "message");
    }

    pub fn push_object(&mut self, entry: ObjEntry) {
        push(&mut self.objects, entry, &mut self.dropped, "object");
    }

    /// Gather falling floors and characters shown on the visible screen, then sort.
    pub fn collect_objects<S: SequenceInterpreter + ?Sized>(&mut self, engine: &Engine, seq: &S) {
        let view = engine.visible_screen();
        let mut order: u16 = 0;

        for mob in engine.mobs().iter() {
            let y = if mob.screen == view.screen {
                mob.y
            } else if Some(mob.screen) == view.above {
                mob.y - SCREEN_HEIGHT
            } else {
                continue;
            };
            self.push_object(ObjEntry {
                x: mob.x,
                y,
                face: Facing::Left,
                kind: ObjKind::Mob(mob.kind),
                cutoff: None,
                seq: order,
            });
            order = order.wrapping_add(1);
        }

        for slot in 0..seq.character_count() {
            let Some(frame) = seq.character(slot) else {
                continue;
            };
            if frame.screen != view.screen {
                continue;
            }
            let (x, y) = frame.position();
            let cutoff = if frame.action.is_airborne() || frame.action.is_hanging() {
                None
            } else {
                Some(floor_line(y))
            };
            self.push_object(ObjEntry {
                x,
                y,
                face: frame.face,
                kind: ObjKind::Character {
                    identity: frame.identity,
                    image: frame.image,
                    action: frame.action,
                },
                cutoff,
                seq: order,
            });
            order = order.wrapping_add(1);
        }

        self.objects.sort_unstable_by_key(|o| (o.y, o.seq));
    }

    /// Expand the sorted object list into mid-layer images.
    pub fn expand_objects(&mut self) {
        for i in 0..self.objects.len() {
            let obj = self.objects[i];
            match obj.kind {
                ObjKind::Character { identity, image, .. } => self.push_mid(MidImage {
                    x: obj.x,
                    y: obj.y,
                    image: ImageId::new(ImageTable::Character(identity), image, 0),
                    opacity: Opacity::Mask,
                    face: obj.face,
                    kind: MidKind::Character,
                    cutoff: obj.cutoff,
                }),
                ObjKind::Mob(MobType::FALLING_FLOOR) => {
                    for section in 0..FALLING_FLOOR_SECTIONS {
                        self.push_mid(MidImage {
                            x: obj.x + section as i16,
                            y: obj.y,
                            image: ImageId::new(ImageTable::Section, section, 0),
                            opacity: Opacity::Mask,
                            face: obj.face,
                            kind: MidKind::Section,
                            cutoff: obj.cutoff,
                        });
                    }
                }
                ObjKind::Mob(other) => {
                    log::warn!("no images for mob type {}", other.0);
                }
            }
        }
    }

    pub fn general(&self) -> &[Peel] {
        &self.general
    }

    pub fn wipe(&self) -> &[WipeRect] {
        &self.wipe
    }

    pub fn back(&self) -> &[LayerImage] {
        &self.back
    }

    pub fn mid(&self) -> &[MidImage] {
        &self.mid
    }

    pub fn fore(&self) -> &[LayerImage] {
        &self.fore
    }

    pub fn message(&self) -> &[LayerImage] {
        &self.message
    }

    pub fn objects(&self) -> &[ObjEntry] {
        &self.objects
    }

    /// Instructions dropped this frame because a list was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(x: i16) -> LayerImage {
        LayerImage {
            x,
            y: 55,
            image: ImageId::new(ImageTable::Message, 0, 0),
            opacity: Opacity::Store,
        }
    }

    #[test]
    fn full_list_drops_and_counts() {
        let mut b = ImageListBuilder::new();
        for i in 0..MESSAGE_CAP as i16 + 3 {
            b.push_message(image(i));
        }
        assert_eq!(b.message().len(), MESSAGE_CAP);
        assert_eq!(b.dropped(), 3);
    }

    #[test]
    fn clear_frame_keeps_messages() {
        let mut b = ImageListBuilder::new();
        b.push_message(image(1));
        b.push_back(image(2));
        b.clear_frame();
        assert_eq!(b.message().len(), 1);
        assert!(b.back().is_empty());
    }

    #[test]
    fn falling_floor_expands_to_sections() {
        let mut b = ImageListBuilder::new();
        b.push_object(ObjEntry {
            x: 12,
            y: 70,
            face: Facing::Left,
            kind: ObjKind::Mob(MobType::FALLING_FLOOR),
            cutoff: None,
            seq: 0,
        });
        b.expand_objects();
        assert_eq!(b.mid().len(), FALLING_FLOOR_SECTIONS as usize);
        assert!(b.mid().iter().all(|m| m.kind == MidKind::Section));
    }

    #[test]
    fn floor_line_picks_row_bottom() {
        assert_eq!(floor_line(55), 55);
        assert_eq!(floor_line(60), 118);
        assert_eq!(floor_line(400), 181);
    }
}
