//! Grouped max pooling over energy columns.

use ndarray::{Array2, ArrayView2};
use tracing::warn;

use crate::model::EdgeType;
use crate::{Error, Result};
use super::Pooled;

/// What "largest" means when picking a group's winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolingKey {
    /// Largest signed value.
    Value,
    /// Largest absolute value; the winner's signed value is reported.
    Magnitude,
}

impl PoolingKey {
    #[inline]
    fn rank(self, v: f64) -> f64 {
        match self {
            PoolingKey::Value => v,
            PoolingKey::Magnitude => v.abs(),
        }
    }
}

/// Output groups over input columns.
///
/// Read from a learned edge-state matrix of shape `n_inputs × n_outputs`:
/// input `c` belongs to output group `j` when `learned[c, j]` is not `NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPooling {
    groups: Vec<Vec<usize>>,
    n_inputs: usize,
}

impl GroupPooling {
    pub fn from_learned_edge_states(learned: &Array2<EdgeType>) -> Result<Self> {
        if learned.is_empty() {
            return Err(Error::Structure(
                "max pooling requires non-empty learned_edge_states".into(),
            ));
        }
        let groups: Vec<Vec<usize>> = learned
            .columns()
            .into_iter()
            .map(|column| {
                column
                    .iter()
                    .enumerate()
                    .filter(|(_, ty)| !ty.is_null())
                    .map(|(c, _)| c)
                    .collect()
            })
            .collect();

        let empty = groups.iter().filter(|g| g.is_empty()).count();
        if empty > 0 {
            warn!(empty, total = groups.len(), "pooling groups without members stay at zero");
        }
        Ok(Self { groups, n_inputs: learned.nrows() })
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    pub fn n_outputs(&self) -> usize {
        self.groups.len()
    }

    /// Winner of every group for every datapoint. Ties go to the lowest
    /// input index.
    pub fn pool(&self, scores: ArrayView2<'_, f64>, key: PoolingKey) -> Result<Pooled> {
        if scores.ncols() != self.n_inputs {
            return Err(Error::ShapeMismatch(format!(
                "pooling expects {} input columns, got {}",
                self.n_inputs,
                scores.ncols()
            )));
        }

        let shape = (scores.nrows(), self.n_outputs());
        let mut codes = Array2::zeros(shape);
        let mut premerge_idx = Array2::from_elem(shape, None);
        for (j, members) in self.groups.iter().enumerate() {
            for (p, row) in scores.rows().into_iter().enumerate() {
                let mut best: Option<usize> = None;
                for &c in members {
                    if best.is_none_or(|b| key.rank(row[c]) > key.rank(row[b])) {
                        best = Some(c);
                    }
                }
                if let Some(c) = best {
                    codes[[p, j]] = row[c];
                    premerge_idx[[p, j]] = Some(c);
                }
            }
        }
        Ok(Pooled { codes, premerge_idx })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use pretty_assertions::assert_eq;

    const N: EdgeType = EdgeType::Null;
    const A: EdgeType = EdgeType::And;

    /// inputs 0,1 → group 0; input 2 → group 1; group 2 empty
    fn pooling() -> GroupPooling {
        GroupPooling::from_learned_edge_states(&array![
            [A, N, N],
            [A, N, N],
            [N, A, N],
        ])
        .unwrap()
    }

    #[test]
    fn test_groups_from_mask() {
        let expected: Vec<Vec<usize>> = vec![vec![0, 1], vec![2], vec![]];
        assert_eq!(pooling().groups(), expected.as_slice());
        assert_eq!(pooling().n_inputs(), 3);
    }

    #[test]
    fn test_max_with_provenance() {
        let scores = array![[1.0, 4.0, -2.0], [5.0, 4.0, 7.0]];
        let pooled = pooling().pool(scores.view(), PoolingKey::Value).unwrap();
        assert_eq!(pooled.codes, array![[4.0, -2.0, 0.0], [5.0, 7.0, 0.0]]);
        assert_eq!(
            pooled.premerge_idx,
            array![[Some(1), Some(2), None], [Some(0), Some(2), None]]
        );
    }

    #[test]
    fn test_singleton_group_returns_member() {
        let scores = array![[0.0, 0.0, -3.5], [0.0, 0.0, 9.25]];
        let pooled = pooling().pool(scores.view(), PoolingKey::Value).unwrap();
        assert_eq!(pooled.codes.column(1).to_vec(), vec![-3.5, 9.25]);
        assert_eq!(pooled.premerge_idx.column(1).to_vec(), vec![Some(2), Some(2)]);
    }

    #[test]
    fn test_max_abs_keeps_sign() {
        let scores = array![[1.0, -4.0, 0.0], [-1.0, 0.5, 2.0]];
        let pooled = pooling().pool(scores.view(), PoolingKey::Magnitude).unwrap();
        assert_eq!(pooled.codes.column(0).to_vec(), vec![-4.0, -1.0]);
        assert_eq!(pooled.premerge_idx.column(0).to_vec(), vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let scores = array![[2.0, 2.0, 0.0]];
        let pooled = pooling().pool(scores.view(), PoolingKey::Value).unwrap();
        assert_eq!(pooled.premerge_idx[[0, 0]], Some(0));
        let scores = array![[-2.0, 2.0, 0.0]];
        let pooled = pooling().pool(scores.view(), PoolingKey::Magnitude).unwrap();
        assert_eq!(pooled.codes[[0, 0]], -2.0);
    }

    #[test]
    fn test_input_width_checked() {
        let err = pooling().pool(array![[1.0, 2.0]].view(), PoolingKey::Value).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }

    #[test]
    fn test_empty_learned_states_rejected() {
        let learned = Array2::<EdgeType>::default((0, 0));
        assert!(matches!(
            GroupPooling::from_learned_edge_states(&learned),
            Err(Error::Structure(_))
        ));
    }
}
