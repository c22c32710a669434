//! Edge endpoint index: which node pairs form edges.

use crate::{Error, Result};

/// Immutable list of `(node_a, node_b)` pairs, one per edge.
///
/// Node indices are 0-based columns of the activation matrix. The first
/// endpoint contributes the high bit of the observed two-bit code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeEndpoints {
    pairs: Vec<(usize, usize)>,
}

impl EdgeEndpoints {
    pub fn new(pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Self { pairs: pairs.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Fail if any endpoint falls outside `n_nodes` columns.
    pub fn check_nodes(&self, n_nodes: usize) -> Result<()> {
        if let Some((edge, &(a, b))) = self
            .pairs
            .iter()
            .enumerate()
            .find(|(_, (a, b))| *a >= n_nodes || *b >= n_nodes)
        {
            return Err(Error::ShapeMismatch(format!(
                "edge {edge} connects nodes ({a}, {b}) but activations have {n_nodes} nodes"
            )));
        }
        Ok(())
    }
}
