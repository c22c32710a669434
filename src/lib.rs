//! # hnet-rs — HNet Model Evaluation Engine
//!
//! Read-only inference for trained HNet models: graph-structured, energy-based
//! part-whole networks whose nodes carry boolean activations and whose edges
//! are categorized into one of 17 two-input boolean functions.
//!
//! ## Design Principles
//!
//! 1. **Parameters are immutable**: a `Model` never learns; evaluation is a pure
//!    function of the input batch, so a built model is `Send + Sync`.
//! 2. **Closed variants**: energy functions and nonlinearities are enums resolved
//!    once at build time, each variant owning only the parameters it needs.
//! 3. **Schema before numbers**: the model file is validated and normalized
//!    before any tensor is constructed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hnet::{build_model_from_file, evaluate_dataset, BuildOptions, Dataset, EnergyMode};
//!
//! # fn example() -> hnet::Result<()> {
//! let options = BuildOptions::new(EnergyMode::EdgeMatch);
//! let model = build_model_from_file("credit_tier1.hnetmodel.json", &options)?;
//! let dataset = Dataset::load("credit_tst.dataset.json")?;
//!
//! let codes = evaluate_dataset(&model, &dataset)?;
//! println!("{} datapoints x {} components", codes.nrows(), codes.ncols());
//! # Ok(())
//! # }
//! ```
//!
//! ## Energy Modes
//!
//! | Mode | Parameters | Score |
//! |------|------------|-------|
//! | `hamiltonian` | `h`, `k` | `max(E) - (aᵀHa + k)` |
//! | `edgematch` | learned edge states | matching edges, NULL is a wildcard |
//! | `boolweights` | learned edge states | overlap of one-hot edge encodings |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod edge;
pub mod energy;
pub mod nonlinearity;
pub mod network;
pub mod layout;
pub mod dataset;
pub mod evaluate;

// ============================================================================
// Re-exports: Model (the data types)
// ============================================================================

pub use model::{EdgeType, EdgeEndpoints, NUM_EDGE_TYPES};

// ============================================================================
// Re-exports: Edge derivation
// ============================================================================

pub use edge::{
    BinarizeOptions, EdgeTypeFilter,
    binarize_edge_states, derive_edge_states, encode_edge_states,
};

// ============================================================================
// Re-exports: Scoring
// ============================================================================

pub use energy::{BoolWeightsEnergy, EdgeMatchEnergy, EnergyFunction, HamiltonianEnergy};
pub use nonlinearity::{Nonlinearity, Pooled};

// ============================================================================
// Re-exports: Network + building
// ============================================================================

pub use network::{ComponentBank, Model, Topology};
pub use layout::{
    BuildOptions, ComponentBankRecord, EnergyMode, ModelBuilder, ModelFile,
    NonlinearityMode, build_model_from_file,
};
pub use dataset::Dataset;
pub use evaluate::{evaluate, evaluate_dataset};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Unexpected {kind} mode: {value:?}")]
    UnexpectedMode { kind: &'static str, value: String },

    #[error("Unexpected layout: {0:?}")]
    UnexpectedLayout(String),

    #[error("Structure error: {0}")]
    Structure(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Not implemented: {0}")]
    Unimplemented(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
