/// Stable reference to a registry entry.
///
/// Handles are issued from a per-registry counter and never reused within a level, so a
/// stale handle simply fails to match instead of aliasing a newer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryHandle(pub u32);

#[derive(Debug, Clone, Default)]
pub(crate) struct HandleSeq {
    next: u32,
}

impl HandleSeq {
    pub(crate) fn issue(&mut self) -> EntryHandle {
        let h = EntryHandle(self.next);
        self.next = self.next.wrapping_add(1);
        h
    }

    pub(crate) fn reset(&mut self) {
        self.next = 0;
    }
}
