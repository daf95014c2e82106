use std::collections::VecDeque;

/// Machine-level change that takes effect later than the instruction that
/// requested it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScheduledEffect {
    EnableInterrupts,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    due: u64,
    effect: ScheduledEffect,
}

/// Pending effects keyed by the retired-instruction count at which they
/// apply.
///
/// Entries stay ordered by `due`; entries with the same `due` keep their
/// insertion order.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    queue: VecDeque<Entry>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `effect` to apply once `due` instructions have retired.
    pub fn push(&mut self, due: u64, effect: ScheduledEffect) {
        let index = self.queue.partition_point(|entry| entry.due <= due);
        self.queue.insert(index, Entry { due, effect });
    }

    /// Take the next effect whose time has come, if any.
    pub fn pop_due(&mut self, now: u64) -> Option<ScheduledEffect> {
        match self.queue.front() {
            Some(entry) if entry.due <= now => self.queue.pop_front().map(|entry| entry.effect),
            _ => None,
        }
    }

    /// Drop every pending occurrence of `effect`. Returns whether any was
    /// pending.
    pub fn cancel(&mut self, effect: ScheduledEffect) -> bool {
        let before = self.queue.len();
        self.queue.retain(|entry| entry.effect != effect);
        self.queue.len() != before
    }

    pub fn is_pending(&self, effect: ScheduledEffect) -> bool {
        self.queue.iter().any(|entry| entry.effect == effect)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
