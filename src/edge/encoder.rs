//! Observed edge-state encoder.

use ndarray::{Array2, ArrayView2};

use crate::model::{EdgeEndpoints, EdgeType};
use crate::{Error, Result};

/// Label every (datapoint, edge) pair from its endpoint bits.
///
/// `code = 2*a[i] + a[j]` for edge `(i, j)`, mapped to
/// `{0 → NOR, 1 → NCONV, 2 → NIMPL, 3 → AND}`. Every activation must be
/// exactly 0 or 1; the whole batch is checked before anything is encoded.
pub fn encode_edge_states(
    activations: ArrayView2<'_, f64>,
    endpoints: &EdgeEndpoints,
) -> Result<Array2<EdgeType>> {
    check_boolean(activations)?;
    endpoints.check_nodes(activations.ncols())?;

    let pairs = endpoints.pairs();
    Ok(Array2::from_shape_fn(
        (activations.nrows(), pairs.len()),
        |(p, e)| {
            let (a, b) = pairs[e];
            EdgeType::observe(activations[[p, a]] == 1.0, activations[[p, b]] == 1.0)
        },
    ))
}

/// Fail on the first activation that is not exactly 0 or 1.
pub fn check_boolean(activations: ArrayView2<'_, f64>) -> Result<()> {
    match activations
        .indexed_iter()
        .find(|(_, v)| **v != 0.0 && **v != 1.0)
    {
        Some(((p, n), v)) => Err(Error::Precondition(format!(
            "activation at datapoint {p}, node {n} is {v}; expected 0 or 1"
        ))),
        None => Ok(()),
    }
}
