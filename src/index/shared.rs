//! Atomically replaceable index handle.
//!
//! Readers take an `Arc` snapshot and drop the lock before doing any work,
//! so a query always sees one complete index. Writers build the replacement
//! off to the side and swap the `Arc` under the write lock; there is no
//! in-place mutation of a published index.

use std::sync::Arc;
use parking_lot::RwLock;

use super::CodeIndex;

/// Shared, copy-on-write handle to the current [`CodeIndex`].
#[derive(Debug, Clone)]
pub struct SharedIndex {
    current: Arc<RwLock<Arc<CodeIndex>>>,
}

impl SharedIndex {
    pub fn new(index: CodeIndex) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    /// The index as of now. Later publications do not affect it.
    pub fn snapshot(&self) -> Arc<CodeIndex> {
        Arc::clone(&self.current.read())
    }

    /// Replace the current index.
    pub fn publish(&self, index: CodeIndex) {
        let index = Arc::new(index);
        *self.current.write() = index;
        tracing::debug!("published replacement index");
    }

    /// Merge `other` into the current index and publish the result.
    ///
    /// The write lock is held across read-merge-swap so concurrent merges
    /// cannot lose each other's entries. Readers keep working on their
    /// snapshots meanwhile.
    pub fn merge(&self, other: &CodeIndex) -> Arc<CodeIndex> {
        let mut current = self.current.write();
        let merged = Arc::new(current.merge(other));
        tracing::debug!(
            before = current.len(),
            after = merged.len(),
            words = merged.word_count(),
            "merged taxonomy into shared index"
        );
        *current = Arc::clone(&merged);
        merged
    }
}

impl Default for SharedIndex {
    fn default() -> Self {
        Self::new(CodeIndex::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Code;
    use std::thread;

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    #[test]
    fn snapshot_survives_merge() {
        let shared = SharedIndex::new(CodeIndex::from_entries([(code("Aa01A01="), ["人"])]));
        let before = shared.snapshot();

        shared.merge(&CodeIndex::from_entries([(code("Ba01A01="), ["物"])]));

        assert_eq!(before.len(), 1);
        assert_eq!(shared.snapshot().len(), 2);
    }

    #[test]
    fn publish_replaces() {
        let shared = SharedIndex::default();
        assert!(shared.snapshot().is_empty());
        shared.publish(CodeIndex::from_entries([(code("Aa01A01="), ["人"])]));
        assert!(shared.snapshot().contains_word("人"));
    }

    #[test]
    fn concurrent_merges_keep_every_entry() {
        let shared = SharedIndex::default();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let c = code(&format!("Aa{:02}A01=", i + 1));
                    shared.merge(&CodeIndex::from_entries([(c, [format!("词{i}")])]));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let index = shared.snapshot();
        assert_eq!(index.len(), 8);
        assert_eq!(index.fanout("Aa"), 8);
    }
}
