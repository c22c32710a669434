//! One-hot edge binarizer.
//!
//! Output columns are type-major, edge-minor: column `t * n_edges + e` is
//! the indicator for the `t`-th selected type at edge `e`. The trainer's
//! layout has not been confirmed bit-for-bit; treat the ordering as
//! provisional when exchanging binarized features with other tools.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::model::EdgeType;

const NULL_AND_OBSERVED: [EdgeType; 5] = [
    EdgeType::Null,
    EdgeType::Nor,
    EdgeType::Nconv,
    EdgeType::Nimpl,
    EdgeType::And,
];

/// Which edge types receive an indicator column block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinarizeOptions {
    /// Give `NULL` its own indicator block.
    pub include_null: bool,
    /// Encode all 16 boolean functions instead of the four observable ones.
    pub include_all_16: bool,
}

impl BinarizeOptions {
    pub const fn new(include_null: bool, include_all_16: bool) -> Self {
        Self { include_null, include_all_16 }
    }

    /// Selected types, in enumeration order.
    pub fn edge_types(&self) -> &'static [EdgeType] {
        match (self.include_all_16, self.include_null) {
            (true, true) => &EdgeType::ALL,
            (true, false) => &EdgeType::ALL[1..],
            (false, true) => &NULL_AND_OBSERVED,
            (false, false) => &EdgeType::OBSERVED,
        }
    }

    pub fn n_types(&self) -> usize {
        self.edge_types().len()
    }
}

/// One-hot encode an `n_pts × n_edges` state matrix into
/// `n_pts × (n_types · n_edges)` indicator bits.
pub fn binarize_edge_states(
    states: ArrayView2<'_, EdgeType>,
    options: BinarizeOptions,
) -> Array2<bool> {
    let types = options.edge_types();
    let n_edges = states.ncols();
    Array2::from_shape_fn((states.nrows(), types.len() * n_edges), |(p, col)| {
        states[[p, col % n_edges]] == types[col / n_edges]
    })
}
