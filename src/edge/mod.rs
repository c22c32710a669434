//! # Edge State Derivation
//!
//! Turns boolean node activations into categorical edge states and, for the
//! boolean-weights energy, into one-hot feature blocks.
//!
//! ```text
//! activations (n_pts × n_nodes)
//!   → encode_edge_states   (n_pts × n_edges, EdgeType)
//!   → EdgeTypeFilter::apply (disallowed types → NULL)
//!   → binarize_edge_states (n_pts × n_types·n_edges, bool)
//! ```

pub mod encoder;
pub mod filter;
pub mod binarize;

use ndarray::{Array2, ArrayView2};

use crate::model::{EdgeEndpoints, EdgeType};
use crate::Result;

pub use binarize::{BinarizeOptions, binarize_edge_states};
pub use encoder::encode_edge_states;
pub use filter::EdgeTypeFilter;

/// Encode observed edge states and apply the type filter.
pub fn derive_edge_states(
    activations: ArrayView2<'_, f64>,
    endpoints: &EdgeEndpoints,
    filter: &EdgeTypeFilter,
) -> Result<Array2<EdgeType>> {
    let states = encode_edge_states(activations, endpoints)?;
    Ok(filter.apply(states))
}
