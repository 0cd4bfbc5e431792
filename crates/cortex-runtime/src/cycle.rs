//! Pending-tool cycle detection.

use std::collections::{BTreeSet, HashSet};

/// Remembers every pending-tool signature observed during one run.
///
/// A signature seen twice means the agent keeps asking for the same tools
/// without progress.
#[derive(Clone, Debug, Default)]
pub struct CycleDetector {
    seen: HashSet<BTreeSet<String>>,
}

impl CycleDetector {
    /// Empty detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `signature`. Returns `false` if it was already seen.
    ///
    /// Empty signatures are never recorded and always return `true`.
    pub fn observe(&mut self, signature: BTreeSet<String>) -> bool {
        if signature.is_empty() {
            return true;
        }
        self.seen.insert(signature)
    }

    /// Number of distinct signatures seen.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
