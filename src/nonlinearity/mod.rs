//! # Nonlinearities
//!
//! Applied to the energy output inside a component bank. Every variant
//! returns the output codes plus a premerge index recording which input
//! column produced each output value.

pub mod pooling;

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::model::EdgeType;
use crate::{Error, Result};

pub use pooling::{GroupPooling, PoolingKey};

// ============================================================================
// Nonlinearity mode
// ============================================================================

/// Nonlinearity named by a component bank record (`nonlinearity_mode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonlinearityMode {
    None,
    Max,
    MaxAbs,
    Kwta,
    Nonzero,
}

impl NonlinearityMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            NonlinearityMode::None => "none",
            NonlinearityMode::Max => "max",
            NonlinearityMode::MaxAbs => "maxabs",
            NonlinearityMode::Kwta => "kwta",
            NonlinearityMode::Nonzero => "nonzero",
        }
    }
}

impl FromStr for NonlinearityMode {
    type Err = Error;

    /// Expects an already normalized (lowercase, whitespace-free) string.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(NonlinearityMode::None),
            "max" => Ok(NonlinearityMode::Max),
            "maxabs" => Ok(NonlinearityMode::MaxAbs),
            "kwta" => Ok(NonlinearityMode::Kwta),
            "nonzero" => Ok(NonlinearityMode::Nonzero),
            other => Err(Error::UnexpectedMode {
                kind: "nonlinearity",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for NonlinearityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Output
// ============================================================================

/// Nonlinearity output: codes plus their provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Pooled {
    /// n_pts × n_out
    pub codes: Array2<f64>,
    /// n_pts × n_out input column behind each code; `None` where an output
    /// group had no members.
    pub premerge_idx: Array2<Option<usize>>,
}

impl Pooled {
    /// Codes that map one-to-one onto their input columns.
    pub fn one_to_one(codes: Array2<f64>) -> Self {
        let premerge_idx = Array2::from_shape_fn(codes.raw_dim(), |(_, j)| Some(j));
        Self { codes, premerge_idx }
    }
}

// ============================================================================
// Nonlinearity
// ============================================================================

/// A built nonlinearity. Parameterized at build time, stateless afterwards.
#[derive(Debug, Clone)]
pub enum Nonlinearity {
    /// Pass scores through unchanged.
    Identity,
    /// Per-group maximum.
    Max(GroupPooling),
    /// Per-group member furthest from zero, sign kept.
    MaxAbs(GroupPooling),
    /// k-winner-take-all. Not available for current models.
    KWinnerTakeAll { n_winners: usize },
    /// `1.0` where the score is strictly positive, else `0.0`.
    NonzeroThreshold,
}

impl Nonlinearity {
    /// Max pooling with groups read from the learned edge states.
    pub fn max(learned: &Array2<EdgeType>) -> Result<Self> {
        Ok(Nonlinearity::Max(GroupPooling::from_learned_edge_states(learned)?))
    }

    /// Max-absolute pooling with groups read from the learned edge states.
    pub fn max_abs(learned: &Array2<EdgeType>) -> Result<Self> {
        Ok(Nonlinearity::MaxAbs(GroupPooling::from_learned_edge_states(learned)?))
    }

    pub fn mode(&self) -> NonlinearityMode {
        match self {
            Nonlinearity::Identity => NonlinearityMode::None,
            Nonlinearity::Max(_) => NonlinearityMode::Max,
            Nonlinearity::MaxAbs(_) => NonlinearityMode::MaxAbs,
            Nonlinearity::KWinnerTakeAll { .. } => NonlinearityMode::Kwta,
            Nonlinearity::NonzeroThreshold => NonlinearityMode::Nonzero,
        }
    }

    pub fn forward(&self, scores: Array2<f64>) -> Result<Pooled> {
        match self {
            Nonlinearity::Identity => Ok(Pooled::one_to_one(scores)),
            Nonlinearity::Max(groups) => groups.pool(scores.view(), PoolingKey::Value),
            Nonlinearity::MaxAbs(groups) => groups.pool(scores.view(), PoolingKey::Magnitude),
            Nonlinearity::KWinnerTakeAll { n_winners } => Err(Error::Unimplemented(format!(
                "k-winner-take-all nonlinearity (n_winners = {n_winners})"
            ))),
            Nonlinearity::NonzeroThreshold => Ok(Pooled::one_to_one(
                scores.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mode_parse_round_trip() {
        for mode in [
            NonlinearityMode::None,
            NonlinearityMode::Max,
            NonlinearityMode::MaxAbs,
            NonlinearityMode::Kwta,
            NonlinearityMode::Nonzero,
        ] {
            assert_eq!(mode.as_str().parse::<NonlinearityMode>().unwrap(), mode);
        }
        assert!(matches!(
            "softmax".parse::<NonlinearityMode>(),
            Err(Error::UnexpectedMode { kind: "nonlinearity", .. })
        ));
    }

    #[test]
    fn test_identity_passes_through() {
        let scores = array![[1.5, -2.0, 0.0]];
        let pooled = Nonlinearity::Identity.forward(scores.clone()).unwrap();
        assert_eq!(pooled.codes, scores);
        assert_eq!(pooled.premerge_idx, array![[Some(0), Some(1), Some(2)]]);
    }

    #[test]
    fn test_nonzero_threshold_exact() {
        let scores = array![[0.0, 0.25, -1.0], [3.0, 0.0, 1e-12]];
        let pooled = Nonlinearity::NonzeroThreshold.forward(scores.clone()).unwrap();
        assert_eq!(pooled.codes, scores.mapv(|v| f64::from(u8::from(v > 0.0))));
        assert_eq!(pooled.codes, array![[0.0, 1.0, 0.0], [1.0, 0.0, 1.0]]);
        assert_eq!(pooled.premerge_idx[[1, 2]], Some(2));
    }

    #[test]
    fn test_kwta_is_unimplemented() {
        let kwta = Nonlinearity::KWinnerTakeAll { n_winners: 3 };
        let err = kwta.forward(array![[1.0, 2.0, 3.0, 4.0]]).unwrap_err();
        assert!(matches!(err, Error::Unimplemented(_)));
        assert!(err.to_string().contains("n_winners = 3"));
        assert_eq!(kwta.mode(), NonlinearityMode::Kwta);
    }
}
