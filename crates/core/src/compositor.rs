//! Compositor - turns dirty blocks into layer instructions and flushes them
//!
//! Each redraw channel maps to a fixed, ordered list of block draw operations in
//! [`DISPATCH`]. Composing a frame walks the channels in order, runs each dirty
//! block through its channel's operations, expands the object list, and finally
//! hands the six layer lists to a [`LayerRenderer`] in flush order.

use crate::engine::Engine;
use crate::image_list::{ImageListBuilder, LayerImage, MidImage, MidKind, Peel, WipeRect};
use crate::pieces::{block_pieces, BlockPieces, GATE_BAR_WIDTH};
use crate::redraw::DirtyBlocks;
use crate::trans::Motion;
use crate::types::{
    BlockAddr, Facing, Opacity, RedrawChannel, BLOCK_HEIGHT, BLOCK_ROWS, BLOCK_WIDTH, TOP_ROW_Y,
};

/// One per-block draw operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockDraw {
    /// Restore what characters covered.
    Peel,
    /// Solid-fill the block.
    Wipe,
    /// Solid-fill the gate bar strip.
    MovableWipe,
    Background,
    MovableBackground,
    ForegroundMask,
    FloorMask,
    HalfFloorMask,
    /// Static object sprite (flask, sword, torch flame).
    Object,
}

/// Ordered draw operations of one channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelDraws {
    pub channel: RedrawChannel,
    pub ops: &'static [BlockDraw],
}

/// Channel -> ordered draw operations, indexed by [`RedrawChannel::index`].
pub static DISPATCH: [ChannelDraws; 8] = [
    ChannelDraws {
        channel: RedrawChannel::General,
        ops: &[
            BlockDraw::Peel,
            BlockDraw::Background,
            BlockDraw::MovableBackground,
            BlockDraw::ForegroundMask,
            BlockDraw::Object,
        ],
    },
    ChannelDraws {
        channel: RedrawChannel::Top,
        ops: &[
            BlockDraw::Background,
            BlockDraw::MovableBackground,
            BlockDraw::ForegroundMask,
        ],
    },
    ChannelDraws {
        channel: RedrawChannel::Wipe,
        ops: &[BlockDraw::Wipe],
    },
    ChannelDraws {
        channel: RedrawChannel::Movable,
        ops: &[
            BlockDraw::MovableWipe,
            BlockDraw::MovableBackground,
            BlockDraw::ForegroundMask,
        ],
    },
    ChannelDraws {
        channel: RedrawChannel::Foreground,
        ops: &[BlockDraw::ForegroundMask],
    },
    ChannelDraws {
        channel: RedrawChannel::FloorMask,
        ops: &[BlockDraw::FloorMask],
    },
    ChannelDraws {
        channel: RedrawChannel::HalfFloorMask,
        ops: &[BlockDraw::HalfFloorMask],
    },
    ChannelDraws {
        channel: RedrawChannel::Object,
        ops: &[BlockDraw::Object],
    },
];

pub fn draws_for(channel: RedrawChannel) -> &'static [BlockDraw] {
    DISPATCH[channel.index()].ops
}

/// Backend that paints one layer's instruction list at a time.
pub trait LayerRenderer {
    fn draw_general(&mut self, peels: &[Peel]);
    fn draw_wipe(&mut self, rects: &[WipeRect]);
    fn draw_back(&mut self, images: &[LayerImage]);
    fn draw_mid(&mut self, images: &[MidImage]);
    fn draw_fore(&mut self, images: &[LayerImage]);
    fn draw_message(&mut self, images: &[LayerImage]);
}

/// A dirty block resolved to level coordinates.
#[derive(Debug, Clone, Copy)]
struct Target {
    addr: BlockAddr,
    x: i16,
    y: i16,
    pieces: BlockPieces,
}

pub struct Compositor;

impl Compositor {
    /// Fill `lists` with this frame's instructions for the dirty blocks and objects.
    pub fn compose(engine: &Engine, dirty: &DirtyBlocks, lists: &mut ImageListBuilder) {
        for channel in RedrawChannel::ALL {
            let mask = dirty.get(channel);
            if mask.is_empty() {
                continue;
            }
            for slot in mask.iter() {
                let Some(target) = Self::resolve(engine, channel, slot) else {
                    continue;
                };
                for &op in draws_for(channel) {
                    Self::emit(op, &target, lists);
                }
            }
        }
        lists.expand_objects();
    }

    /// Hand every list to the renderer: general, wipe, back, mid, fore, message.
    pub fn flush<R: LayerRenderer + ?Sized>(lists: &ImageListBuilder, renderer: &mut R) {
        renderer.draw_general(lists.general());
        renderer.draw_wipe(lists.wipe());
        renderer.draw_back(lists.back());
        renderer.draw_mid(lists.mid());
        renderer.draw_fore(lists.fore());
        renderer.draw_message(lists.message());
    }

    fn resolve(engine: &Engine, channel: RedrawChannel, slot: u8) -> Option<Target> {
        let view = engine.visible_screen();
        let (addr, y) = if channel == RedrawChannel::Top {
            let above = view.above?;
            let addr = BlockAddr::from_column_row(above, slot, BLOCK_ROWS as u8 - 1)?;
            (addr, TOP_ROW_Y)
        } else {
            let addr = BlockAddr::new(view.screen, slot)?;
            (addr, addr.y())
        };

        let bp = engine.blueprint();
        let pressed = matches!(engine.trans().active_motion(addr), Some(Motion::Plate(_)));
        Some(Target {
            addr,
            x: addr.x(),
            y,
            pieces: block_pieces(bp.object(addr), bp.spec(addr), pressed),
        })
    }

    fn emit(op: BlockDraw, t: &Target, lists: &mut ImageListBuilder) {
        let layer = |image, opacity| LayerImage {
            x: t.x,
            y: t.y,
            image,
            opacity,
        };

        match op {
            BlockDraw::Peel => lists.push_general(Peel {
                x: t.x,
                y: t.y,
                width: BLOCK_WIDTH,
                height: BLOCK_HEIGHT,
            }),
            BlockDraw::Wipe => lists.push_wipe(WipeRect {
                x: t.x,
                y: t.y,
                width: BLOCK_WIDTH,
                height: BLOCK_HEIGHT,
                color: 0,
            }),
            BlockDraw::MovableWipe => {
                if t.pieces.movable.is_some() {
                    lists.push_wipe(WipeRect {
                        x: t.x + BLOCK_WIDTH - GATE_BAR_WIDTH,
                        y: t.y,
                        width: GATE_BAR_WIDTH,
                        height: BLOCK_HEIGHT,
                        color: 0,
                    });
                }
            }
            BlockDraw::Background => {
                if let Some(img) = t.pieces.back {
                    lists.push_back(layer(img, Opacity::Store));
                }
            }
            BlockDraw::MovableBackground => {
                if let Some(img) = t.pieces.movable {
                    lists.push_back(layer(img, Opacity::Mask));
                }
            }
            BlockDraw::ForegroundMask => {
                if let Some(img) = t.pieces.fore {
                    lists.push_fore(layer(img, Opacity::Mask));
                }
            }
            BlockDraw::FloorMask => {
                if let Some(img) = t.pieces.floor_mask {
                    lists.push_fore(layer(img, Opacity::And));
                }
            }
            BlockDraw::HalfFloorMask => {
                if let Some(img) = t.pieces.half_mask {
                    lists.push_fore(layer(img, Opacity::And));
                }
            }
            BlockDraw::Object => {
                if let Some(img) = t.pieces.object {
                    lists.push_mid(MidImage {
                        x: t.x,
                        y: t.y,
                        image: img,
                        opacity: Opacity::Mask,
                        face: Facing::Left,
                        kind: MidKind::StaticObject,
                        cutoff: None,
                    });
                }
            }
        }
        log::trace!("{:?} at {:?}", op, t.addr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_table_is_indexed_by_channel() {
        for channel in RedrawChannel::ALL {
            assert_eq!(DISPATCH[channel.index()].channel, channel);
            assert!(!draws_for(channel).is_empty());
        }
    }

    #[test]
    fn general_channel_order() {
        assert_eq!(
            draws_for(RedrawChannel::General),
            &[
                BlockDraw::Peel,
                BlockDraw::Background,
                BlockDraw::MovableBackground,
                BlockDraw::ForegroundMask,
                BlockDraw::Object,
            ]
        );
    }
}
