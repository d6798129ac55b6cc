//! Blueprint module - the in-memory level
//!
//! A blueprint is the 2304-byte level image decoded once into structured fields:
//! per-block type and spec bytes, the plate/gate link table, the screen adjacency
//! map and the info block. Encoding writes every section back bit-exactly, including
//! reserved BlueType bits and the unused info bytes.
//!
//! The engine mutates exactly two things here at run time: BlueSpec state bytes of
//! movable objects (gate openness, spike extension, loose-floor wiggle) and BlueType
//! of a block where a loose floor fell away or a falling floor landed.

use crate::error::LevelError;
use crate::types::{
    BlockAddr, Direction, Facing, ObjectId, BLOCKS_PER_SCREEN, BLUEPRINT_LEN, BLUESPEC_OFFSET,
    BLUETYPE_OFFSET, INFO_LEN, INFO_OFFSET, LEVEL_BLOCKS, LINKLOC_OFFSET, LINKMAP_OFFSET,
    LINK_TABLE_LEN, MAP_ENTRY_LEN, MAP_OFFSET, OBJECT_ID_MASK, SCREEN_COUNT,
};

/// LinkLoc value of a plate that controls no gate.
pub const NO_GATE_LOC: u8 = 0xFF;

/// One decoded link-table entry.
///
/// LinkLoc: bits 0-4 target block, bits 5-6 low screen bits, bit 7 last-in-chain.
/// LinkMap: bits 0-4 timer, bits 5-7 high screen bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LinkEntry {
    pub target_block: u8,
    pub target_screen: u8,
    pub last: bool,
    pub timer: u8,
}

impl LinkEntry {
    pub const fn decode(loc: u8, map: u8) -> Self {
        Self {
            target_block: loc & 0x1F,
            target_screen: ((loc >> 5) & 0x03) | ((map >> 5) << 2),
            last: loc & 0x80 != 0,
            timer: map & 0x1F,
        }
    }

    /// Encode back into `(LinkLoc, LinkMap)`.
    pub const fn encode(&self) -> (u8, u8) {
        let loc = (self.target_block & 0x1F)
            | ((self.target_screen & 0x03) << 5)
            | if self.last { 0x80 } else { 0 };
        let map = (self.timer & 0x1F) | (((self.target_screen >> 2) & 0x07) << 5);
        (loc, map)
    }

    /// A plate entry that drives nothing but still carries a timer.
    pub const fn unlinked(timer: u8) -> Self {
        Self::decode(NO_GATE_LOC, timer & 0x1F)
    }

    /// A chain entry pointing at `target`.
    pub const fn to_gate(target: BlockAddr, timer: u8, last: bool) -> Self {
        Self {
            target_block: target.block(),
            target_screen: target.screen(),
            last,
            timer: timer & 0x1F,
        }
    }

    pub const fn is_unlinked(&self) -> bool {
        self.encode().0 == NO_GATE_LOC
    }

    /// The gate this entry drives, if the entry decodes to a valid address.
    pub const fn target(&self) -> Option<BlockAddr> {
        if self.is_unlinked() {
            return None;
        }
        BlockAddr::new(self.target_screen, self.target_block)
    }
}

/// Neighbor screen numbers of one screen (0 = none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenLinks {
    pub left: u8,
    pub right: u8,
    pub up: u8,
    pub down: u8,
}

impl ScreenLinks {
    pub const fn new(left: u8, right: u8, up: u8, down: u8) -> Self {
        Self {
            left,
            right,
            up,
            down,
        }
    }

    pub const fn get(&self, dir: Direction) -> u8 {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    const fn decode(bytes: [u8; MAP_ENTRY_LEN]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    const fn encode(&self) -> [u8; MAP_ENTRY_LEN] {
        [self.left, self.right, self.up, self.down]
    }
}

const INFO_KID_SCREEN: usize = 64;
const INFO_KID_BLOCK: usize = 65;
const INFO_KID_FACE: usize = 66;
const INFO_SWORD_SCREEN: usize = 68;
const INFO_SWORD_BLOCK: usize = 69;
const INFO_GUARD_BLOCK: usize = 71;
const INFO_GUARD_FACE: usize = INFO_GUARD_BLOCK + SCREEN_COUNT;
const INFO_GUARD_X: usize = INFO_GUARD_FACE + SCREEN_COUNT;
const INFO_GUARD_PROG: usize = INFO_GUARD_X + 2 * SCREEN_COUNT;

/// Starting placement of the guard on one screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardStart {
    pub addr: BlockAddr,
    pub facing: Facing,
    pub x: u8,
    pub skill: u8,
}

/// The Info section. Raw bytes are kept so unused fields survive a round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelInfo {
    raw: [u8; INFO_LEN],
}

impl LevelInfo {
    pub fn raw(&self) -> &[u8; INFO_LEN] {
        &self.raw
    }

    /// Kid start block and facing.
    pub fn kid_start(&self) -> Option<(BlockAddr, Facing)> {
        let addr = BlockAddr::new(self.raw[INFO_KID_SCREEN], self.raw[INFO_KID_BLOCK])?;
        Some((addr, Facing::from_byte(self.raw[INFO_KID_FACE])))
    }

    pub fn set_kid_start(&mut self, addr: BlockAddr, facing: Facing) {
        self.raw[INFO_KID_SCREEN] = addr.screen();
        self.raw[INFO_KID_BLOCK] = addr.block();
        self.raw[INFO_KID_FACE] = match facing {
            Facing::Left => 0xFF,
            Facing::Right => 0,
        };
    }

    pub fn sword_start(&self) -> Option<BlockAddr> {
        BlockAddr::new(self.raw[INFO_SWORD_SCREEN], self.raw[INFO_SWORD_BLOCK])
    }

    /// Guard placement on `screen`; a block index of 30 or more means no guard.
    pub fn guard_start(&self, screen: u8) -> Option<GuardStart> {
        let slot = (screen as usize).checked_sub(1)?;
        if slot >= SCREEN_COUNT {
            return None;
        }
        let addr = BlockAddr::new(screen, self.raw[INFO_GUARD_BLOCK + slot])?;
        Some(GuardStart {
            addr,
            facing: Facing::from_byte(self.raw[INFO_GUARD_FACE + slot]),
            x: self.raw[INFO_GUARD_X + slot],
            skill: self.raw[INFO_GUARD_PROG + slot],
        })
    }
}

/// Decoded level blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    blue_type: [u8; LEVEL_BLOCKS],
    blue_spec: [u8; LEVEL_BLOCKS],
    links: [LinkEntry; LINK_TABLE_LEN],
    map: [ScreenLinks; SCREEN_COUNT],
    info: LevelInfo,
}

impl Blueprint {
    /// An all-empty level: every block is space, no links, no neighbors.
    pub fn empty() -> Self {
        Self {
            blue_type: [0; LEVEL_BLOCKS],
            blue_spec: [0; LEVEL_BLOCKS],
            links: [LinkEntry::default(); LINK_TABLE_LEN],
            map: [ScreenLinks::default(); SCREEN_COUNT],
            info: LevelInfo { raw: [0; INFO_LEN] },
        }
    }

    /// Decode a 2304-byte level image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LevelError> {
        if bytes.len() != BLUEPRINT_LEN {
            return Err(LevelError::WrongSize {
                expected: BLUEPRINT_LEN,
                actual: bytes.len(),
            });
        }

        let mut bp = Self::empty();
        bp.blue_type
            .copy_from_slice(&bytes[BLUETYPE_OFFSET..BLUETYPE_OFFSET + LEVEL_BLOCKS]);
        bp.blue_spec
            .copy_from_slice(&bytes[BLUESPEC_OFFSET..BLUESPEC_OFFSET + LEVEL_BLOCKS]);

        for (i, entry) in bp.links.iter_mut().enumerate() {
            *entry = LinkEntry::decode(bytes[LINKLOC_OFFSET + i], bytes[LINKMAP_OFFSET + i]);
        }

        for (i, links) in bp.map.iter_mut().enumerate() {
            let at = MAP_OFFSET + i * MAP_ENTRY_LEN;
            let mut entry = [0u8; MAP_ENTRY_LEN];
            entry.copy_from_slice(&bytes[at..at + MAP_ENTRY_LEN]);
            *links = ScreenLinks::decode(entry);
        }

        bp.info
            .raw
            .copy_from_slice(&bytes[INFO_OFFSET..INFO_OFFSET + INFO_LEN]);
        Ok(bp)
    }

    /// Encode into an existing buffer.
    pub fn write_into(&self, out: &mut [u8; BLUEPRINT_LEN]) {
        out[BLUETYPE_OFFSET..BLUETYPE_OFFSET + LEVEL_BLOCKS].copy_from_slice(&self.blue_type);
        out[BLUESPEC_OFFSET..BLUESPEC_OFFSET + LEVEL_BLOCKS].copy_from_slice(&self.blue_spec);

        for (i, entry) in self.links.iter().enumerate() {
            let (loc, map) = entry.encode();
            out[LINKLOC_OFFSET + i] = loc;
            out[LINKMAP_OFFSET + i] = map;
        }

        for (i, links) in self.map.iter().enumerate() {
            let at = MAP_OFFSET + i * MAP_ENTRY_LEN;
            out[at..at + MAP_ENTRY_LEN].copy_from_slice(&links.encode());
        }

        out[INFO_OFFSET..INFO_OFFSET + INFO_LEN].copy_from_slice(&self.info.raw);
    }

    pub fn to_bytes(&self) -> [u8; BLUEPRINT_LEN] {
        let mut out = [0u8; BLUEPRINT_LEN];
        self.write_into(&mut out);
        out
    }

    /// Object occupying a block.
    ///
    /// Unassigned ids are a data error: asserted in debug builds, read as space otherwise.
    pub fn object(&self, addr: BlockAddr) -> ObjectId {
        let bits = self.blue_type[addr.flat_index()];
        match ObjectId::from_bits(bits) {
            Some(id) => id,
            None => {
                debug_assert!(false, "unknown object id {} at {:?}", bits & OBJECT_ID_MASK, addr);
                log::warn!("unknown object id {} at {:?}", bits & OBJECT_ID_MASK, addr);
                ObjectId::Space
            }
        }
    }

    /// Replace the object id of a block, keeping its reserved upper bits.
    pub fn set_object(&mut self, addr: BlockAddr, id: ObjectId) {
        let slot = &mut self.blue_type[addr.flat_index()];
        *slot = (*slot & !OBJECT_ID_MASK) | id.bits();
    }

    /// Raw BlueType byte including reserved bits.
    pub fn blue_type(&self, addr: BlockAddr) -> u8 {
        self.blue_type[addr.flat_index()]
    }

    pub fn spec(&self, addr: BlockAddr) -> u8 {
        self.blue_spec[addr.flat_index()]
    }

    pub fn set_spec(&mut self, addr: BlockAddr, value: u8) {
        self.blue_spec[addr.flat_index()] = value;
    }

    /// Convenience for level construction: object and spec in one call.
    pub fn place(&mut self, addr: BlockAddr, id: ObjectId, spec: u8) {
        self.set_object(addr, id);
        self.set_spec(addr, spec);
    }

    pub fn links(&self) -> &[LinkEntry; LINK_TABLE_LEN] {
        &self.links
    }

    pub fn set_link(&mut self, index: u8, entry: LinkEntry) {
        self.links[index as usize] = entry;
    }

    pub fn screen_links(&self, screen: u8) -> Option<ScreenLinks> {
        let slot = (screen as usize).checked_sub(1)?;
        self.map.get(slot).copied()
    }

    pub fn set_screen_links(&mut self, screen: u8, links: ScreenLinks) {
        debug_assert!((1..=SCREEN_COUNT as u8).contains(&screen), "screen {screen} out of range");
        if let Some(slot) = (screen as usize).checked_sub(1).and_then(|s| self.map.get_mut(s)) {
            *slot = links;
        }
    }

    /// Neighbor of `screen` in `dir`, or `None` at the level edge.
    pub fn neighbor(&self, screen: u8, dir: Direction) -> Option<u8> {
        let next = self.screen_links(screen)?.get(dir);
        if next == 0 || next as usize > SCREEN_COUNT {
            if next != 0 {
                log::warn!("screen {screen} has out-of-range neighbor {next}");
            }
            return None;
        }
        Some(next)
    }

    pub fn info(&self) -> &LevelInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut LevelInfo {
        &mut self.info
    }

    /// Iterate over every block address of one screen, in block order.
    pub fn screen_blocks(screen: u8) -> impl Iterator<Item = BlockAddr> {
        (0..BLOCKS_PER_SCREEN as u8).filter_map(move |b| BlockAddr::new(screen, b))
    }
}

impl Default for Blueprint {
    fn default() -> Self {
        Self::empty()
    }
}
