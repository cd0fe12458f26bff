//! Node id generation.
//!
//! Ids only give nodes a stable identity while they are edited; they are
//! never derived from node content, so two structurally identical siblings
//! still get distinct ids.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Produces fresh, never-repeating node ids.
pub trait IdGenerator: Send + Sync {
    /// Returns a new id.
    fn next_id(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<n>` ids, counting from 1.
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator whose first id is `<prefix>-1`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl fmt::Debug for SequentialIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequentialIdGenerator")
            .field("prefix", &self.prefix)
            .field("issued", &self.issued())
            .finish()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn uuid_ids_are_unique() {
        let ids = UuidIdGenerator;
        let seen: HashSet<String> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn uuid_ids_parse_as_uuid() {
        let id = UuidIdGenerator.next_id();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn sequential_ids_count_from_one() {
        let ids = SequentialIdGenerator::new("node");
        assert_eq!(ids.next_id(), "node-1");
        assert_eq!(ids.next_id(), "node-2");
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn closures_are_generators() {
        let counter = AtomicU64::new(0);
        let ids = move || format!("c{}", counter.fetch_add(1, Ordering::Relaxed));
        assert_eq!(ids.next_id(), "c0");
        assert_eq!(ids.next_id(), "c1");
    }

    #[test]
    fn generator_is_object_safe() {
        let ids: Box<dyn IdGenerator> = Box::new(SequentialIdGenerator::new("x"));
        assert_eq!(ids.next_id(), "x-1");
    }
}
