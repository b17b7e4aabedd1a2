//! The built pipeline artifact.

use retab_core::hash::Hash256;
use retab_ops::{Operation, Summarizer};

/// An ordered sequence of validated operation instances.
///
/// A pipeline only exists after every entry of its spec validated; it is
/// immutable from then on.
pub struct Pipeline {
    ops: Vec<Box<dyn Operation>>,
    spec_hash: Hash256,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("ops", &self.ops.len())
            .field("spec_hash", &self.spec_hash)
            .finish()
    }
}

impl Pipeline {
    pub(crate) fn new(ops: Vec<Box<dyn Operation>>, spec_hash: Hash256) -> Self {
        Self { ops, spec_hash }
    }

    pub fn operations(&self) -> &[Box<dyn Operation>] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Stable hash of the spec this pipeline was built from.
    pub fn spec_hash(&self) -> Hash256 {
        self.spec_hash
    }

    /// The summarizing operations, in pipeline order.
    pub fn summarizers(&self) -> impl Iterator<Item = &dyn Summarizer> {
        self.ops.iter().filter_map(|op| op.as_summarizer())
    }
}
