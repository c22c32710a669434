//! # Energy Functions
//!
//! Score a batch of activations against every learned component. All three
//! variants return a dense `n_pts × n_cmp` matrix where larger means more
//! similar; the raw energy convention (lower is better) never leaves this
//! module.
//!
//! | Variant | Raw score | Normalization |
//! |---------|-----------|---------------|
//! | `Hamiltonian` | `aᵀ·H·a + k` | `max(E) - E` |
//! | `EdgeMatch` | matching edges | `S - min(S)` |
//! | `BoolWeights` | shared one-hot bits | `S - min(S)` |

pub mod hamiltonian;
pub mod edge_match;
pub mod bool_weights;

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use bool_weights::BoolWeightsEnergy;
pub use edge_match::EdgeMatchEnergy;
pub use hamiltonian::HamiltonianEnergy;

// ============================================================================
// Energy mode
// ============================================================================

/// How a model scores activations. Chosen once per model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyMode {
    Hamiltonian,
    EdgeMatch,
    BoolWeights,
}

impl EnergyMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            EnergyMode::Hamiltonian => "hamiltonian",
            EnergyMode::EdgeMatch => "edgematch",
            EnergyMode::BoolWeights => "boolweights",
        }
    }
}

impl FromStr for EnergyMode {
    type Err = Error;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hamiltonian" => Ok(EnergyMode::Hamiltonian),
            "edgematch" => Ok(EnergyMode::EdgeMatch),
            "boolweights" => Ok(EnergyMode::BoolWeights),
            other => Err(Error::UnexpectedMode {
                kind: "energy",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for EnergyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Energy function
// ============================================================================

/// A built energy function. Each variant owns only its own parameters.
#[derive(Debug, Clone)]
pub enum EnergyFunction {
    Hamiltonian(HamiltonianEnergy),
    EdgeMatch(EdgeMatchEnergy),
    BoolWeights(BoolWeightsEnergy),
}

impl EnergyFunction {
    /// Similarity of every datapoint to every component.
    pub fn forward(&self, activations: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        match self {
            EnergyFunction::Hamiltonian(e) => e.forward(activations),
            EnergyFunction::EdgeMatch(e) => e.forward(activations),
            EnergyFunction::BoolWeights(e) => e.forward(activations),
        }
    }

    pub fn mode(&self) -> EnergyMode {
        match self {
            EnergyFunction::Hamiltonian(_) => EnergyMode::Hamiltonian,
            EnergyFunction::EdgeMatch(_) => EnergyMode::EdgeMatch,
            EnergyFunction::BoolWeights(_) => EnergyMode::BoolWeights,
        }
    }

    /// Number of components (output columns).
    pub fn n_cmp(&self) -> usize {
        match self {
            EnergyFunction::Hamiltonian(e) => e.n_cmp(),
            EnergyFunction::EdgeMatch(e) => e.n_cmp(),
            EnergyFunction::BoolWeights(e) => e.n_cmp(),
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// `max(E) - E` over the whole matrix: lowest energy becomes the largest score.
pub(crate) fn flip_to_similarity(mut energies: Array2<f64>) -> Array2<f64> {
    if !energies.is_empty() {
        let max = energies.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        energies.mapv_inplace(|v| max - v);
    }
    energies
}

/// `S - min(S)` over the whole matrix.
pub(crate) fn anchor_at_zero(mut scores: Array2<f64>) -> Array2<f64> {
    if !scores.is_empty() {
        let min = scores.fold(f64::INFINITY, |acc, &v| acc.min(v));
        scores.mapv_inplace(|v| v - min);
    }
    scores
}
