//! Link resolver - walks a pressure plate's chain in the link table
//!
//! A plate's BlueSpec byte is the index of the first entry of its chain. Entries are
//! consumed in table order until (and including) the first one with the last-in-chain
//! bit. A chain whose first entry is the "no gate" sentinel yields no targets, but the
//! plate timer is still decoded from it.
//!
//! Resolution is lazy and allocation-free: [`LinkChain`] is a plain iterator over the
//! table and can be cloned or re-created to restart it.

use crate::blueprint::LinkEntry;
use crate::error::LevelError;
use crate::types::BlockAddr;

/// One gate driven by a plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTarget {
    pub addr: BlockAddr,
    pub timer: u8,
}

/// Resolves plate chains against a link table.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    table: &'a [LinkEntry],
    cap: usize,
}

impl<'a> LinkResolver<'a> {
    /// `cap` bounds how many entries a single chain may visit.
    pub fn new(table: &'a [LinkEntry], cap: usize) -> Self {
        Self {
            table,
            cap: cap.max(1),
        }
    }

    /// Timer of the plate whose chain starts at `start`.
    pub fn plate_timer(&self, start: u8) -> Result<u8, LevelError> {
        self.table
            .get(start as usize)
            .map(|e| e.timer)
            .ok_or(LevelError::LinkOutOfRange {
                index: start as usize,
            })
    }

    /// Lazily resolve the gates driven by the plate whose chain starts at `start`.
    pub fn resolve(&self, start: u8) -> LinkChain<'a> {
        LinkChain {
            table: self.table,
            start,
            next: start as usize,
            steps: 0,
            cap: self.cap,
            done: false,
        }
    }
}

/// Iterator over one plate's gate targets.
///
/// Yields `Err` once and then stops if the chain runs past the traversal cap or the
/// end of the table without a terminal entry.
#[derive(Debug, Clone)]
pub struct LinkChain<'a> {
    table: &'a [LinkEntry],
    start: u8,
    next: usize,
    steps: usize,
    cap: usize,
    done: bool,
}

impl<'a> Iterator for LinkChain<'a> {
    type Item = Result<GateTarget, LevelError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if self.steps >= self.cap {
                self.done = true;
                return Some(Err(LevelError::CorruptLinkChain {
                    start: self.start,
                    steps: self.steps,
                }));
            }

            let Some(entry) = self.table.get(self.next) else {
                self.done = true;
                let err = if self.steps == 0 {
                    LevelError::LinkOutOfRange { index: self.next }
                } else {
                    LevelError::CorruptLinkChain {
                        start: self.start,
                        steps: self.steps,
                    }
                };
                return Some(Err(err));
            };

            self.steps += 1;
            self.next += 1;

            if entry.is_unlinked() {
                // Sentinel: the plate controls nothing.
                self.done = true;
                return None;
            }

            if entry.last {
                self.done = true;
            }

            match entry.target() {
                Some(addr) => {
                    return Some(Ok(GateTarget {
                        addr,
                        timer: entry.timer,
                    }))
                }
                None => {
                    debug_assert!(false, "link entry {} has no valid target", self.next - 1);
                    log::warn!(
                        "link entry {} targets screen {} block {}; skipped",
                        self.next - 1,
                        entry.target_screen,
                        entry.target_block
                    );
                }
            }
        }
    }
}
