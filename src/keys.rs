//! Group key generation.
//!
//! Every generator must hand out keys that are unique for the lifetime of
//! the form state it feeds, including keys of groups already removed.

use crate::types::GroupKey;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh, never-repeating group keys.
pub trait KeyGenerator {
    fn next_key(&mut self) -> GroupKey;
}

impl<F> KeyGenerator for F
where
    F: FnMut() -> GroupKey,
{
    fn next_key(&mut self) -> GroupKey {
        self()
    }
}

/// Per-form monotonic counter. The default generator.
#[derive(Clone, Debug, Default)]
pub struct SequentialKeys {
    next: u64,
}

impl SequentialKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `first`. Useful for deterministic tests.
    pub fn starting_at(first: u64) -> Self {
        SequentialKeys { next: first }
    }
}

impl KeyGenerator for SequentialKeys {
    fn next_key(&mut self) -> GroupKey {
        let key = GroupKey::new(self.next);
        self.next += 1;
        key
    }
}

/// Counter shared explicitly between forms that must never collide.
///
/// Clones draw from the same sequence.
#[derive(Clone, Debug, Default)]
pub struct SharedKeys {
    counter: Arc<AtomicU64>,
}

impl SharedKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyGenerator for SharedKeys {
    fn next_key(&mut self) -> GroupKey {
        GroupKey::new(self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

static GLOBAL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Process-wide counter: keys are unique across every form in the process,
/// including forms that were dropped and rebuilt.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalKeys;

impl KeyGenerator for GlobalKeys {
    fn next_key(&mut self) -> GroupKey {
        GroupKey::new(GLOBAL_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}
