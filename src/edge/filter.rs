//! Edge type filter.

use ndarray::Array2;

use crate::model::{EdgeType, NUM_EDGE_TYPES};

/// Allowed subset of edge types. Empty means no filtering.
///
/// With dense graphs most observed edges are `NCONV`/`NIMPL`, so trained
/// models commonly keep only `AND` edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeTypeFilter {
    types: Vec<EdgeType>,
    allowed: [bool; NUM_EDGE_TYPES],
}

impl EdgeTypeFilter {
    /// Filter keeping only `types`. Duplicates are dropped, order is kept.
    pub fn new(types: impl IntoIterator<Item = EdgeType>) -> Self {
        let mut filter = Self::default();
        for ty in types {
            if !filter.allowed[ty.code() as usize] {
                filter.allowed[ty.code() as usize] = true;
                filter.types.push(ty);
            }
        }
        filter
    }

    /// A filter that lets everything through.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> &[EdgeType] {
        &self.types
    }

    pub fn allows(&self, ty: EdgeType) -> bool {
        self.is_empty() || self.allowed[ty.code() as usize]
    }

    /// Rewrite every disallowed entry to `NULL`.
    pub fn apply(&self, mut states: Array2<EdgeType>) -> Array2<EdgeType> {
        if !self.is_empty() {
            states.mapv_inplace(|ty| if self.allows(ty) { ty } else { EdgeType::Null });
        }
        states
    }
}
