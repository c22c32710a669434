//! Component bank: one energy function followed by one nonlinearity.

use ndarray::{Array2, ArrayView2};

use crate::energy::EnergyFunction;
use crate::nonlinearity::{Nonlinearity, Pooled};
use crate::Result;

/// The scoring unit of a tier.
#[derive(Debug, Clone)]
pub struct ComponentBank {
    name: String,
    energy: EnergyFunction,
    nonlinearity: Nonlinearity,
}

impl ComponentBank {
    pub fn new(name: impl Into<String>, energy: EnergyFunction, nonlinearity: Nonlinearity) -> Self {
        Self {
            name: name.into(),
            energy,
            nonlinearity,
        }
    }

    /// Display name only; never used for dispatch.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn energy(&self) -> &EnergyFunction {
        &self.energy
    }

    pub fn nonlinearity(&self) -> &Nonlinearity {
        &self.nonlinearity
    }

    pub fn forward(&self, activations: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Ok(self.forward_with_provenance(activations)?.codes)
    }

    pub fn forward_with_provenance(&self, activations: ArrayView2<'_, f64>) -> Result<Pooled> {
        let scores = self.energy.forward(activations)?;
        self.nonlinearity.forward(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeTypeFilter;
    use crate::energy::EdgeMatchEnergy;
    use crate::model::{EdgeEndpoints, EdgeType};
    use crate::Error;
    use ndarray::array;

    fn bank(nonlinearity: Nonlinearity) -> ComponentBank {
        let energy = EdgeMatchEnergy::new(
            array![[EdgeType::And], [EdgeType::Nor]],
            EdgeEndpoints::new([(0, 1)]),
            EdgeTypeFilter::none(),
        )
        .unwrap();
        ComponentBank::new("memorize", EnergyFunction::EdgeMatch(energy), nonlinearity)
    }

    #[test]
    fn test_energy_then_nonlinearity() {
        let activations = array![[1.0, 1.0], [0.0, 0.0], [0.0, 1.0]];
        let codes = bank(Nonlinearity::Identity).forward(activations.view()).unwrap();
        assert_eq!(codes, array![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]);

        let codes = bank(Nonlinearity::NonzeroThreshold)
            .forward(array![[0.0, 0.0]].view())
            .unwrap();
        assert_eq!(codes, array![[0.0, 1.0]]);
    }

    #[test]
    fn test_errors_propagate() {
        let err = bank(Nonlinearity::Identity)
            .forward(array![[2.0, 1.0]].view())
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));

        let err = bank(Nonlinearity::KWinnerTakeAll { n_winners: 1 })
            .forward(array![[1.0, 1.0]].view())
            .unwrap_err();
        assert!(matches!(err, Error::Unimplemented(_)));
    }
}
