//! Boolean-weights energy: overlap of one-hot edge encodings.

use ndarray::{Array2, ArrayView2};

use crate::edge::{BinarizeOptions, EdgeTypeFilter, binarize_edge_states, derive_edge_states};
use crate::model::{EdgeEndpoints, EdgeType};
use crate::Result;
use super::anchor_at_zero;
use super::edge_match::check_learned_states;

/// Learned states are binarized once at build time; each score is the
/// number of indicator bits set in both the learned and the observed
/// encoding.
#[derive(Debug, Clone)]
pub struct BoolWeightsEnergy {
    /// n_cmp × (n_types · n_edges), 0.0 / 1.0
    learned_bits: Array2<f64>,
    endpoints: EdgeEndpoints,
    filter: EdgeTypeFilter,
    options: BinarizeOptions,
}

impl BoolWeightsEnergy {
    pub fn new(
        learned: &Array2<EdgeType>,
        endpoints: EdgeEndpoints,
        filter: EdgeTypeFilter,
        options: BinarizeOptions,
    ) -> Result<Self> {
        check_learned_states(learned, &endpoints, "boolweights")?;
        let learned_bits = indicator(binarize_edge_states(learned.view(), options));
        Ok(Self { learned_bits, endpoints, filter, options })
    }

    pub fn n_cmp(&self) -> usize {
        self.learned_bits.nrows()
    }

    pub fn options(&self) -> BinarizeOptions {
        self.options
    }

    /// Raw overlap counts before the global-minimum shift.
    pub fn overlaps(&self, activations: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let observed = derive_edge_states(activations, &self.endpoints, &self.filter)?;
        let observed_bits = indicator(binarize_edge_states(observed.view(), self.options));
        Ok(observed_bits.dot(&self.learned_bits.t()))
    }

    pub fn forward(&self, activations: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Ok(anchor_at_zero(self.overlaps(activations)?))
    }
}

fn indicator(bits: Array2<bool>) -> Array2<f64> {
    bits.mapv(|b| if b { 1.0 } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_edges(options: BinarizeOptions) -> BoolWeightsEnergy {
        BoolWeightsEnergy::new(
            &array![
                [EdgeType::And, EdgeType::Nor],
                [EdgeType::Null, EdgeType::Nor],
                [EdgeType::Nimpl, EdgeType::Nconv],
            ],
            EdgeEndpoints::new([(0, 1), (1, 2)]),
            EdgeTypeFilter::none(),
            options,
        )
        .unwrap()
    }

    #[test]
    fn test_overlap_counts_shared_bits() {
        let energy = two_edges(BinarizeOptions::default());
        // edges: (1,1)=AND, (1,0)=NIMPL
        let overlaps = energy.overlaps(array![[1.0, 1.0, 0.0]].view()).unwrap();
        assert_eq!(overlaps, array![[1.0, 0.0, 0.0]]);
        // edges: (0,0)=NOR, (0,0)=NOR
        let overlaps = energy.overlaps(array![[0.0, 0.0, 0.0]].view()).unwrap();
        assert_eq!(overlaps, array![[1.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_null_block_counts_null_matches() {
        let energy = BoolWeightsEnergy::new(
            &array![[EdgeType::Null]],
            EdgeEndpoints::new([(0, 1)]),
            EdgeTypeFilter::new([EdgeType::And]),
            BinarizeOptions::new(true, false),
        )
        .unwrap();
        // NOR is filtered to NULL, which now shares the NULL indicator bit
        let overlaps = energy.overlaps(array![[0.0, 0.0], [1.0, 1.0]].view()).unwrap();
        assert_eq!(overlaps, array![[1.0], [0.0]]);
    }

    #[test]
    fn test_forward_is_zero_anchored() {
        let energy = two_edges(BinarizeOptions::new(true, true));
        let scores = energy
            .forward(array![[1.0, 1.0, 0.0], [0.0, 0.0, 0.0]].view())
            .unwrap();
        assert_eq!(scores.dim(), (2, 3));
        assert_eq!(scores.fold(f64::INFINITY, |a, &b| a.min(b)), 0.0);
    }
}
