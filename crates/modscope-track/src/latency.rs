//! Top-K selection over resolution latencies.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use modscope_core::ModuleKey;

use crate::record::ModuleRecord;

/// Select the `k` modules with the largest resolution latency.
///
/// Fixed-size min-heap keyed by latency, O(n log k). Records without a
/// latency are ignored. The result is ordered slowest first.
pub fn slowest(records: &[ModuleRecord], k: usize) -> Vec<(ModuleKey, Duration)> {
    if k == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Reverse<(Duration, ModuleKey)>> = BinaryHeap::with_capacity(k + 1);
    for record in records {
        if let Some(latency) = record.resolution_latency {
            heap.push(Reverse((latency, record.key.clone())));
            if heap.len() > k {
                heap.pop();
            }
        }
    }
    let mut out: Vec<(ModuleKey, Duration)> = heap
        .into_iter()
        .map(|Reverse((latency, key))| (key, latency))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}
