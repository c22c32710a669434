//! # Network Composition
//!
//! Component banks and the tiered model built from them.
//!
//! ```text
//! sense → tier1 (bank) → out                 OneTier
//! sense → tier1 (bank) → tier2 (bank) → out  TwoTierFeedForward
//! ```

pub mod bank;
pub mod topology;
pub mod model;

pub use bank::ComponentBank;
pub use model::Model;
pub use topology::Topology;
