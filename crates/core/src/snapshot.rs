//! Snapshot module - engine state capture and fingerprinting
//!
//! A snapshot copies the blueprint, both object lists and the redraw buffers so a
//! replay can compare cycles; the fingerprint is an FNV-1a hash over the same state.

use std::hash::{Hash, Hasher};

use crate::blueprint::Blueprint;
use crate::engine::Engine;
use crate::mobile::Mob;
use crate::trans::Trob;
use crate::types::{LEVEL_BLOCKS, SCREEN_COUNT};

/// Stable 64-bit FNV-1a hasher for deterministic fingerprints.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions/platforms.
#[derive(Debug, Clone)]
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Everything the engine mutates at run time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineSnapshot {
    pub cycle: u64,
    pub screen: u8,
    pub trobs: Vec<Trob>,
    pub mobs: Vec<Mob>,
    pub blue_type: Vec<u8>,
    pub blue_spec: Vec<u8>,
}

impl EngineSnapshot {
    /// Snapshot with room for the given registry capacities, so refilling it
    /// does not allocate.
    pub fn with_capacity(trobs: usize, mobs: usize) -> Self {
        Self {
            cycle: 0,
            screen: 0,
            trobs: Vec::with_capacity(trobs),
            mobs: Vec::with_capacity(mobs),
            blue_type: Vec::with_capacity(LEVEL_BLOCKS),
            blue_spec: Vec::with_capacity(LEVEL_BLOCKS),
        }
    }

    pub fn clear(&mut self) {
        self.cycle = 0;
        self.screen = 0;
        self.trobs.clear();
        self.mobs.clear();
        self.blue_type.clear();
        self.blue_spec.clear();
    }

    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1aHasher::new();
        self.hash(&mut h);
        h.finish()
    }
}

impl Engine {
    pub fn snapshot(&self) -> EngineSnapshot {
        let mut out = EngineSnapshot::with_capacity(self.trans().capacity(), self.mobs().capacity());
        self.snapshot_into(&mut out);
        out
    }

    /// Refill `out` in place.
    pub fn snapshot_into(&self, out: &mut EngineSnapshot) {
        out.clear();
        out.cycle = self.cycle();
        out.screen = self.visible_screen().screen;
        out.trobs.extend(self.trans().iter().copied());
        out.mobs.extend(self.mobs().iter().copied());

        let bp = self.blueprint();
        for screen in 1..=SCREEN_COUNT as u8 {
            for addr in Blueprint::screen_blocks(screen) {
                out.blue_type.push(bp.blue_type(addr));
                out.blue_spec.push(bp.spec(addr));
            }
        }
    }

    /// Fingerprint of the current state without building a snapshot.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1aHasher::new();
        self.cycle().hash(&mut h);
        self.visible_screen().screen.hash(&mut h);
        for t in self.trans().iter() {
            t.hash(&mut h);
        }
        for m in self.mobs().iter() {
            m.hash(&mut h);
        }
        let bp = self.blueprint();
        for screen in 1..=SCREEN_COUNT as u8 {
            for addr in Blueprint::screen_blocks(screen) {
                h.write_u8(bp.blue_type(addr));
                h.write_u8(bp.spec(addr));
            }
        }
        h.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn fnv_known_vector() {
        let mut h = Fnv1aHasher::new();
        h.write(b"a");
        assert_eq!(h.finish(), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn snapshot_covers_every_block() {
        let engine = Engine::new(Blueprint::empty(), EngineConfig::default());
        let snap = engine.snapshot();
        assert_eq!(snap.blue_type.len(), LEVEL_BLOCKS);
        assert_eq!(snap.blue_spec.len(), LEVEL_BLOCKS);
    }

    #[test]
    fn fingerprint_changes_with_state() {
        let mut engine = Engine::new(Blueprint::empty(), EngineConfig::default());
        let before = engine.fingerprint();
        engine.step();
        assert_ne!(before, engine.fingerprint());
    }
}
