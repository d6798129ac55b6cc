//! Redraw buffers - per-block dirty counters for the visible screen
//!
//! Eight channels, each a row of saturating countdown counters. A counter of N means
//! "redraw this block on the next N frames"; 0 means clean. Marking raises a counter
//! and never lowers it. The compositor calls [`RedrawBufferSet::consume_and_decrement`]
//! exactly once per frame after both registries have advanced.
//!
//! Precedence is applied when consuming: a block dirty in `General` is not reported in
//! `Movable` or `Foreground`, and a block dirty in `FloorMask` is not reported in
//! `HalfFloorMask`. Suppressed counters still count down.

use crate::blueprint::Blueprint;
use crate::types::{BlockAddr, Direction, RedrawChannel, BLOCKS_PER_SCREEN, BLOCK_ROWS};

const CHANNELS: usize = RedrawChannel::ALL.len();

/// Set of block slots (0..29) within one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockMask(u32);

impl BlockMask {
    pub const EMPTY: BlockMask = BlockMask(0);

    pub const fn contains(&self, slot: u8) -> bool {
        slot < 32 && self.0 & (1 << slot) != 0
    }

    pub fn insert(&mut self, slot: u8) {
        debug_assert!((slot as usize) < BLOCKS_PER_SCREEN);
        self.0 |= 1 << slot;
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> {
        let bits = self.0;
        (0..BLOCKS_PER_SCREEN as u8).filter(move |s| bits & (1 << s) != 0)
    }
}

/// Result of one [`RedrawBufferSet::consume_and_decrement`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirtyBlocks {
    masks: [BlockMask; CHANNELS],
}

impl DirtyBlocks {
    pub fn get(&self, channel: RedrawChannel) -> BlockMask {
        self.masks[channel.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.masks.iter().all(BlockMask::is_empty)
    }
}

/// The screen being displayed and the one above it (whose bottom row shows on top).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleScreen {
    pub screen: u8,
    pub above: Option<u8>,
}

impl VisibleScreen {
    pub fn new(blueprint: &Blueprint, screen: u8) -> Self {
        Self {
            screen,
            above: blueprint.neighbor(screen, Direction::Up),
        }
    }

    /// Where a mark for `addr` lands: `(channel, slot)` or `None` when off screen.
    ///
    /// Blocks in the bottom row of the screen above are redirected to the `Top` channel.
    pub fn slot_for(&self, addr: BlockAddr, channel: RedrawChannel) -> Option<(RedrawChannel, u8)> {
        if addr.screen() == self.screen {
            if channel == RedrawChannel::Top {
                return None;
            }
            return Some((channel, addr.block()));
        }
        if Some(addr.screen()) == self.above && addr.row() as usize == BLOCK_ROWS - 1 {
            return Some((RedrawChannel::Top, addr.column()));
        }
        None
    }
}

/// Eight channels of per-block redraw counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedrawBufferSet {
    counters: [[u8; BLOCKS_PER_SCREEN]; CHANNELS],
}

impl RedrawBufferSet {
    pub fn new() -> Self {
        Self {
            counters: [[0; BLOCKS_PER_SCREEN]; CHANNELS],
        }
    }

    /// Raise the counter of `slot` in `channel` to at least `count`.
    ///
    /// Slots beyond the channel's capacity are a programming error: asserted in debug
    /// builds and ignored otherwise.
    pub fn mark(&mut self, channel: RedrawChannel, slot: u8, count: u8) {
        if slot as usize >= channel.capacity() {
            debug_assert!(false, "slot {slot} out of range for {} channel", channel.as_str());
            log::warn!("ignoring {} mark for slot {slot}", channel.as_str());
            return;
        }
        let c = &mut self.counters[channel.index()][slot as usize];
        *c = (*c).max(count);
    }

    /// Mark a level block relative to the visible screen; off-screen blocks are dropped.
    pub fn mark_block(&mut self, view: &VisibleScreen, addr: BlockAddr, channel: RedrawChannel, count: u8) {
        if let Some((channel, slot)) = view.slot_for(addr, channel) {
            self.mark(channel, slot, count);
        }
    }

    /// Mark every block of the visible screen and the top overflow row.
    pub fn mark_all(&mut self, count: u8) {
        self.counters[RedrawChannel::General.index()].fill(count);
        let top = RedrawChannel::Top;
        self.counters[top.index()][..top.capacity()].fill(count);
    }

    pub fn get(&self, channel: RedrawChannel, slot: u8) -> u8 {
        self.counters[channel.index()]
            .get(slot as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.counters.iter().all(|row| row.iter().all(|&c| c == 0))
    }

    pub fn clear(&mut self) {
        for row in &mut self.counters {
            row.fill(0);
        }
    }

    /// Report blocks that were dirty at the start of the call, then count every
    /// counter down by one (floored at zero).
    pub fn consume_and_decrement(&mut self) -> DirtyBlocks {
        let mut out = DirtyBlocks::default();

        for channel in RedrawChannel::ALL {
            let row = &mut self.counters[channel.index()];
            let mut mask = BlockMask::EMPTY;
            for (slot, c) in row.iter_mut().enumerate().take(channel.capacity()) {
                if *c > 0 {
                    mask.insert(slot as u8);
                    *c -= 1;
                }
            }
            out.masks[channel.index()] = mask;
        }

        let general = out.get(RedrawChannel::General).bits();
        out.masks[RedrawChannel::Movable.index()].0 &= !general;
        out.masks[RedrawChannel::Foreground.index()].0 &= !general;

        let floor = out.get(RedrawChannel::FloorMask).bits();
        out.masks[RedrawChannel::HalfFloorMask.index()].0 &= !floor;

        out
    }
}

impl Default for RedrawBufferSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::ScreenLinks;

    #[test]
    fn mark_only_raises() {
        let mut r = RedrawBufferSet::new();
        r.mark(RedrawChannel::Wipe, 4, 2);
        r.mark(RedrawChannel::Wipe, 4, 1);
        assert_eq!(r.get(RedrawChannel::Wipe, 4), 2);
    }

    #[test]
    fn counters_count_down_to_zero() {
        let mut r = RedrawBufferSet::new();
        r.mark(RedrawChannel::Object, 9, 2);

        assert!(r.consume_and_decrement().get(RedrawChannel::Object).contains(9));
        assert!(r.consume_and_decrement().get(RedrawChannel::Object).contains(9));
        assert!(r.consume_and_decrement().is_empty());
        assert!(r.is_clean());
    }

    #[test]
    fn general_supersedes_movable_and_foreground() {
        let mut r = RedrawBufferSet::new();
        r.mark(RedrawChannel::General, 3, 1);
        r.mark(RedrawChannel::Movable, 3, 1);
        r.mark(RedrawChannel::Foreground, 3, 1);
        r.mark(RedrawChannel::Movable, 4, 1);

        let d = r.consume_and_decrement();
        assert!(d.get(RedrawChannel::General).contains(3));
        assert!(!d.get(RedrawChannel::Movable).contains(3));
        assert!(!d.get(RedrawChannel::Foreground).contains(3));
        assert!(d.get(RedrawChannel::Movable).contains(4));
        // Suppressed counters were still consumed.
        assert_eq!(r.get(RedrawChannel::Movable, 3), 0);
    }

    #[test]
    fn floor_supersedes_half_floor() {
        let mut r = RedrawBufferSet::new();
        r.mark(RedrawChannel::FloorMask, 10, 1);
        r.mark(RedrawChannel::HalfFloorMask, 10, 1);
        let d = r.consume_and_decrement();
        assert!(d.get(RedrawChannel::FloorMask).contains(10));
        assert!(d.get(RedrawChannel::HalfFloorMask).is_empty());
    }

    #[test]
    fn screen_above_bottom_row_maps_to_top_channel() {
        let mut bp = Blueprint::empty();
        bp.set_screen_links(2, ScreenLinks::new(0, 0, 1, 0));
        let view = VisibleScreen::new(&bp, 2);

        let above_bottom = BlockAddr::from_column_row(1, 6, 2).unwrap();
        let above_middle = BlockAddr::from_column_row(1, 6, 1).unwrap();
        let elsewhere = BlockAddr::new(7, 0).unwrap();

        assert_eq!(
            view.slot_for(above_bottom, RedrawChannel::General),
            Some((RedrawChannel::Top, 6))
        );
        assert_eq!(view.slot_for(above_middle, RedrawChannel::General), None);
        assert_eq!(view.slot_for(elsewhere, RedrawChannel::General), None);
    }

    #[test]
    fn block_mask_iterates_in_order() {
        let mut m = BlockMask::EMPTY;
        m.insert(29);
        m.insert(0);
        m.insert(12);
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![0, 12, 29]);
        assert_eq!(m.len(), 3);
    }
}
