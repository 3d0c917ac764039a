//! The storage side of the write path: the insert entry point and an
//! in-memory merge-tree part store.
//!
//! Merge selection itself is out of scope here; the store records exactly
//! what an experiment needs to measure about the insert workload, plus a
//! deterministic digest so two runs can be compared byte-for-byte.

use blake3::Hasher;

use crate::time::SimTime;

/// Synchronous insertion entry point exposed to the driver.
///
/// Calls always succeed from the driver's perspective; there is exactly one
/// logical writer per simulation run.
pub trait InsertTarget {
    fn insert_part(&mut self, bytes: u64, now: SimTime);
}

/// One data part. Inserts always land at level 0; merges (out of scope
/// here) would produce higher levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub bytes: u64,
    pub created_at: SimTime,
    pub level: u32,
}

/// In-memory merge-tree part store with running workload counters.
#[derive(Default)]
pub struct MergeTree {
    parts: Vec<Part>,
    inserted_parts: u64,
    inserted_bytes: u64,
    hasher: Hasher,
}

impl MergeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parts currently present, in insertion order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn inserted_parts(&self) -> u64 {
        self.inserted_parts
    }

    pub fn inserted_bytes(&self) -> u64 {
        self.inserted_bytes
    }

    /// Hex-encoded blake3 digest over the insert log. Two runs with the same
    /// plan and seed produce the same digest.
    pub fn state_hash(&self) -> String {
        hex::encode(self.hasher.clone().finalize().as_bytes())
    }
}

impl InsertTarget for MergeTree {
    fn insert_part(&mut self, bytes: u64, now: SimTime) {
        self.parts.push(Part {
            bytes,
            created_at: now,
            level: 0,
        });
        self.inserted_parts += 1;
        self.inserted_bytes += bytes;
        self.hasher.update(&bytes.to_le_bytes());
        self.hasher.update(&now.to_le_bytes());
        tracing::trace!(bytes, at = now, "inserted part");
    }
}
