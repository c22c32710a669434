//! Tiered HNet model.

use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::nonlinearity::Pooled;
use crate::{Error, Result};
use super::{ComponentBank, Topology};

#[derive(Debug, Clone)]
enum Tiers {
    One(ComponentBank),
    Two(ComponentBank, ComponentBank),
}

/// A built model: one or two component banks chained per its topology.
///
/// Immutable once built. Evaluation only reads the learned parameters and
/// allocates fresh outputs, so a model can be shared across threads.
#[derive(Debug, Clone)]
pub struct Model {
    comment: String,
    topology: Topology,
    tiers: Tiers,
}

impl Model {
    /// Compose banks (in layout order) into tiers per `topology`.
    pub fn new(topology: Topology, banks: Vec<ComponentBank>) -> Result<Self> {
        topology.check_layout(banks.len())?;

        let mut slots: Vec<Option<ComponentBank>> = banks.into_iter().map(Some).collect();
        let mut take = |i: usize| {
            slots
                .get_mut(i)
                .and_then(Option::take)
                .ok_or_else(|| Error::Structure(format!("layout entry {i} is not available")))
        };
        let tiers = match topology {
            Topology::OneTier { tier1 } => Tiers::One(take(tier1)?),
            Topology::TwoTierFeedForward { tier1, tier2 } => Tiers::Two(take(tier1)?, take(tier2)?),
        };

        Ok(Self {
            comment: String::new(),
            topology,
            tiers,
        })
    }

    /// Attach the free-text comment carried by the model file.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Banks in evaluation order.
    pub fn tiers(&self) -> Vec<&ComponentBank> {
        match &self.tiers {
            Tiers::One(tier1) => vec![tier1],
            Tiers::Two(tier1, tier2) => vec![tier1, tier2],
        }
    }

    /// Output codes of the final tier, `n_pts × n_out`.
    pub fn forward(&self, activations: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Ok(self.forward_with_provenance(activations)?.codes)
    }

    /// Final tier's codes plus its premerge index.
    pub fn forward_with_provenance(&self, activations: ArrayView2<'_, f64>) -> Result<Pooled> {
        match &self.tiers {
            Tiers::One(tier1) => run_tier(1, tier1, activations),
            Tiers::Two(tier1, tier2) => {
                let hidden = run_tier(1, tier1, activations)?;
                run_tier(2, tier2, hidden.codes.view())
            }
        }
    }
}

fn run_tier(tier: usize, bank: &ComponentBank, input: ArrayView2<'_, f64>) -> Result<Pooled> {
    let pooled = bank.forward_with_provenance(input)?;
    debug!(
        tier,
        bank = bank.name(),
        n_pts = input.nrows(),
        n_in = input.ncols(),
        n_out = pooled.codes.ncols(),
        "evaluated tier"
    );
    Ok(pooled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeTypeFilter;
    use crate::energy::{EdgeMatchEnergy, EnergyFunction};
    use crate::model::{EdgeEndpoints, EdgeType};
    use crate::nonlinearity::Nonlinearity;
    use ndarray::array;

    /// Two components over a single edge: AND and NOR.
    fn and_nor_bank(name: &str, nonlinearity: Nonlinearity) -> ComponentBank {
        let energy = EdgeMatchEnergy::new(
            array![[EdgeType::And], [EdgeType::Nor]],
            EdgeEndpoints::new([(0, 1)]),
            EdgeTypeFilter::none(),
        )
        .unwrap();
        ComponentBank::new(name, EnergyFunction::EdgeMatch(energy), nonlinearity)
    }

    #[test]
    fn test_one_tier_forward() {
        let model = Model::new(
            Topology::OneTier { tier1: 0 },
            vec![and_nor_bank("a", Nonlinearity::Identity)],
        )
        .unwrap();
        let codes = model.forward(array![[1.0, 1.0], [0.0, 0.0]].view()).unwrap();
        assert_eq!(codes, array![[1.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn test_two_tier_feeds_forward() {
        let model = Model::new(
            Topology::TwoTierFeedForward { tier1: 0, tier2: 1 },
            vec![
                and_nor_bank("first", Nonlinearity::NonzeroThreshold),
                and_nor_bank("second", Nonlinearity::Identity),
            ],
        )
        .unwrap();
        // tier1: [1,1] → [1,0] → tier2 edge (1,0) = NIMPL matches neither
        // tier1: [0,0] → [0,1] → tier2 edge (0,1) = NCONV matches neither
        let pooled = model
            .forward_with_provenance(array![[1.0, 1.0], [0.0, 0.0]].view())
            .unwrap();
        assert_eq!(pooled.codes, array![[0.0, 0.0], [0.0, 0.0]]);
        assert_eq!(model.tiers()[1].name(), "second");
    }

    #[test]
    fn test_tier_order_follows_links() {
        let model = Model::new(
            Topology::TwoTierFeedForward { tier1: 1, tier2: 0 },
            vec![
                and_nor_bank("b", Nonlinearity::Identity),
                and_nor_bank("a", Nonlinearity::NonzeroThreshold),
            ],
        )
        .unwrap();
        let names: Vec<&str> = model.tiers().iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_bank_count_must_match_topology() {
        let err = Model::new(
            Topology::TwoTierFeedForward { tier1: 0, tier2: 1 },
            vec![and_nor_bank("a", Nonlinearity::Identity)],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_model_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Model>();
    }
}
