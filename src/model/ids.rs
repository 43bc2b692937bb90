//! Load identifiers and the id sources that issue them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one load entry.
///
/// Assigned once at creation and never reused. Serialized as a plain UUID
/// string so snapshots stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(Uuid);

impl LoadId {
    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Issues a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh load ids, injected into every load-creating call.
pub trait IdSource {
    /// Returns an id that this source has never returned before.
    fn next_id(&mut self) -> LoadId;
}

/// Issues random UUIDv4 ids. The default for interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> LoadId {
        LoadId::random()
    }
}

/// Issues deterministic ids from a counter.
///
/// Two sources started at the same value produce the same sequence, which
/// keeps generated load lists comparable across runs.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    /// Creates a source whose first id is derived from `start`.
    pub fn starting_at(start: u128) -> Self {
        Self { next: start }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> LoadId {
        let id = LoadId(Uuid::from_u128(self.next));
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_unique_and_repeatable() {
        let mut a = SequentialIds::default();
        let mut b = SequentialIds::default();
        let first = a.next_id();
        let second = a.next_id();
        assert_ne!(first, second);
        assert_eq!(first, b.next_id());
        assert_eq!(second, b.next_id());
    }

    #[test]
    fn random_ids_do_not_collide() {
        let mut ids = RandomIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn load_id_serializes_as_plain_uuid() {
        let id = LoadId::from_uuid(Uuid::from_u128(7));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", Uuid::from_u128(7)));
    }
}
