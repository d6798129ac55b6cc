//! CommandQueue: bounded per-tick buffer of control commands.
//!
//! Key repeat can deliver many events between two cycles. The runner drains the
//! queue once per cycle; commands beyond the capacity are dropped and counted.

use arrayvec::ArrayVec;

use crate::types::ControlCommand;

/// Commands kept per cycle.
pub const QUEUE_CAPACITY: usize = 16;

#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: ArrayVec<ControlCommand, QUEUE_CAPACITY>,
    dropped: u32,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command. Returns `false` when the queue was full.
    pub fn push(&mut self, command: ControlCommand) -> bool {
        if self.commands.try_push(command).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }
        true
    }

    /// Take every queued command, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = ControlCommand> + '_ {
        self.commands.drain(..)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands dropped since creation.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
