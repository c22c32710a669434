//! Edge-matching energy.

use ndarray::{Array2, ArrayView2};

use crate::edge::{EdgeTypeFilter, derive_edge_states};
use crate::model::{EdgeEndpoints, EdgeType};
use crate::{Error, Result};
use super::anchor_at_zero;

/// Counts edges whose observed state equals the learned one. A learned
/// `NULL` matches any observed state.
#[derive(Debug, Clone)]
pub struct EdgeMatchEnergy {
    /// n_cmp × n_edges
    learned: Array2<EdgeType>,
    endpoints: EdgeEndpoints,
    filter: EdgeTypeFilter,
}

impl EdgeMatchEnergy {
    pub fn new(
        learned: Array2<EdgeType>,
        endpoints: EdgeEndpoints,
        filter: EdgeTypeFilter,
    ) -> Result<Self> {
        check_learned_states(&learned, &endpoints, "edgematch")?;
        Ok(Self { learned, endpoints, filter })
    }

    pub fn n_cmp(&self) -> usize {
        self.learned.nrows()
    }

    pub fn learned_edge_states(&self) -> &Array2<EdgeType> {
        &self.learned
    }

    pub fn endpoints(&self) -> &EdgeEndpoints {
        &self.endpoints
    }

    pub fn filter(&self) -> &EdgeTypeFilter {
        &self.filter
    }

    /// Raw match counts before the global-minimum shift.
    pub fn match_counts(&self, activations: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let observed = derive_edge_states(activations, &self.endpoints, &self.filter)?;
        Ok(Array2::from_shape_fn(
            (observed.nrows(), self.n_cmp()),
            |(p, c)| {
                self.learned
                    .row(c)
                    .iter()
                    .zip(observed.row(p))
                    .filter(|(learned, seen)| learned.is_null() || learned == seen)
                    .count() as f64
            },
        ))
    }

    pub fn forward(&self, activations: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Ok(anchor_at_zero(self.match_counts(activations)?))
    }
}

/// Shared by the edge-based energies: learned states must exist and line up
/// with the endpoint list.
pub(crate) fn check_learned_states(
    learned: &Array2<EdgeType>,
    endpoints: &EdgeEndpoints,
    mode: &str,
) -> Result<()> {
    if learned.nrows() == 0 {
        return Err(Error::Structure(format!(
            "{mode} energy requires non-empty learned_edge_states"
        )));
    }
    if learned.ncols() != endpoints.len() {
        return Err(Error::ShapeMismatch(format!(
            "learned_edge_states have {} edges but edge_endnode_idx lists {}",
            learned.ncols(),
            endpoints.len()
        )));
    }
    Ok(())
}
