//! # HNet Data Model
//!
//! The categorical vocabulary shared by every stage of evaluation: the 17
//! edge types and the per-model list of edge endpoints.
//!
//! Pure data: no I/O, no tensors.

pub mod edge_type;
pub mod endpoints;

pub use edge_type::{EdgeType, NUM_EDGE_TYPES};
pub use endpoints::EdgeEndpoints;
