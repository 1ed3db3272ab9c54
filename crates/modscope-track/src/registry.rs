//! The module registry.
//!
//! The registry is the only shared mutable structure in the tracker. It is
//! a concurrent map from [`ModuleKey`] to [`ModuleRecord`]; every field
//! update happens while holding the record's entry guard, so a snapshot
//! never observes a half-written record.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::one::{Ref, RefMut};

use modscope_core::ModuleKey;

use crate::record::ModuleRecord;

/// Concurrent map of tracked module records.
///
/// Records are created on first sighting and never removed; memory is
/// bounded by the number of distinct modules observed, not by event volume.
/// There is deliberately no `remove`: uninstall events only change a
/// record's state, because historical metrics must remain reportable.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    records: DashMap<ModuleKey, ModuleRecord>,
    install_seq: AtomicU64,
    resolution_seq: AtomicU64,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record for `key`, creating it on first sighting.
    ///
    /// Get-or-create, never get-or-overwrite: an existing record is
    /// returned untouched. The returned guard holds the record's entry
    /// lock until dropped.
    pub fn upsert(&self, key: &ModuleKey) -> RefMut<'_, ModuleKey, ModuleRecord> {
        self.records.entry(key.clone()).or_insert_with(|| {
            let seq = self.install_seq.fetch_add(1, Ordering::Relaxed);
            ModuleRecord::new(key.clone(), seq)
        })
    }

    /// Read access to an existing record.
    pub fn get(&self, key: &ModuleKey) -> Option<Ref<'_, ModuleKey, ModuleRecord>> {
        self.records.get(key)
    }

    /// Write access to an existing record, without creating one.
    pub fn get_mut(&self, key: &ModuleKey) -> Option<RefMut<'_, ModuleKey, ModuleRecord>> {
        self.records.get_mut(key)
    }

    /// Number of distinct modules ever observed.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no module has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Claim the next global resolution order index.
    ///
    /// A single shared atomic counter: two modules resolving concurrently
    /// still receive distinct, contiguous indices. Call while holding the
    /// resolving record's guard so the claimed index cannot be dropped.
    pub fn next_resolution_order(&self) -> u64 {
        self.resolution_seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Clone out all records for the final report.
    ///
    /// Ordering: resolution order ascending, unresolved modules last,
    /// tie-broken by first-install order. Taking a snapshot while event
    /// callbacks are in flight is best-effort and may miss the last
    /// in-flight update.
    pub fn snapshot(&self) -> Vec<ModuleRecord> {
        let mut records: Vec<ModuleRecord> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by_key(|record| {
            (
                record.resolution_order.is_none(),
                record.resolution_order.unwrap_or(0),
                record.install_seq,
            )
        });
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_is_get_or_create() {
        let registry = ModuleRegistry::new();
        let key = ModuleKey::new("m", "1.0.0");

        {
            let mut record = registry.upsert(&key);
            record.classpath_size = Some(42);
        }
        // A second upsert returns the existing record, not a fresh one.
        let record = registry.upsert(&key);
        assert_eq!(record.classpath_size, Some(42));
        // Release the entry guard before len(), which locks the same shard.
        drop(record);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_mut_does_not_create() {
        let registry = ModuleRegistry::new();
        assert!(registry.get_mut(&ModuleKey::new("ghost", "1.0.0")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_install_seq_is_first_sighting_order() {
        let registry = ModuleRegistry::new();
        let a = ModuleKey::new("a", "1.0.0");
        let b = ModuleKey::new("b", "1.0.0");

        assert_eq!(registry.upsert(&a).install_seq, 0);
        assert_eq!(registry.upsert(&b).install_seq, 1);
        assert_eq!(registry.upsert(&a).install_seq, 0);
    }

    #[test]
    fn test_snapshot_ordering() {
        let registry = ModuleRegistry::new();
        let a = ModuleKey::new("a", "1.0.0");
        let b = ModuleKey::new("b", "1.0.0");
        let c = ModuleKey::new("c", "1.0.0");
        let d = ModuleKey::new("d", "1.0.0");

        registry.upsert(&a);
        registry.upsert(&b);
        registry.upsert(&c);
        registry.upsert(&d);
        // c resolves first, then a; b and d stay unresolved.
        registry.upsert(&c).resolution_order = Some(registry.next_resolution_order());
        registry.upsert(&a).resolution_order = Some(registry.next_resolution_order());

        let keys: Vec<ModuleKey> =
            registry.snapshot().into_iter().map(|record| record.key).collect();
        assert_eq!(keys, vec![c, a, b, d]);
    }

    #[test]
    fn test_concurrent_upserts_one_record_per_key() {
        let registry = ModuleRegistry::new();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for i in 0..100 {
                        registry.upsert(&ModuleKey::new(format!("m{i}"), "1.0.0"));
                    }
                });
            }
        });
        assert_eq!(registry.len(), 100);

        let mut seqs: Vec<u64> =
            registry.snapshot().into_iter().map(|record| record.install_seq).collect();
        seqs.sort_unstable();
        seqs.dedup();
        assert_eq!(seqs.len(), 100);
    }
}
