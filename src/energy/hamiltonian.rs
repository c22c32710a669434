//! Hamiltonian energy: a bilinear form per component.

use ndarray::{Array1, Array2, Array3, ArrayView2, Axis};

use crate::{Error, Result};
use super::flip_to_similarity;

/// `E[p, c] = a[p]ᵀ · H[c] · a[p] + k[c]`, accumulated in f64.
#[derive(Debug, Clone)]
pub struct HamiltonianEnergy {
    /// n_cmp × n_nodes × n_nodes
    h: Array3<f64>,
    /// n_cmp
    k: Array1<f64>,
}

impl HamiltonianEnergy {
    pub fn new(h: Array3<f64>, k: Array1<f64>) -> Result<Self> {
        let (n_cmp, rows, cols) = h.dim();
        if n_cmp == 0 {
            return Err(Error::Structure(
                "hamiltonian energy requires a non-empty h".into(),
            ));
        }
        if rows != cols {
            return Err(Error::ShapeMismatch(format!(
                "h must be n_cmp x n_nodes x n_nodes, got {n_cmp} x {rows} x {cols}"
            )));
        }
        if k.len() != n_cmp {
            return Err(Error::ShapeMismatch(format!(
                "k has {} entries but h has {n_cmp} components",
                k.len()
            )));
        }
        Ok(Self { h, k })
    }

    pub fn n_cmp(&self) -> usize {
        self.h.len_of(Axis(0))
    }

    pub fn n_nodes(&self) -> usize {
        self.h.len_of(Axis(1))
    }

    /// Raw energies, lower is better.
    pub fn energies(&self, activations: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if activations.ncols() != self.n_nodes() {
            return Err(Error::ShapeMismatch(format!(
                "activations have {} nodes, h expects {}",
                activations.ncols(),
                self.n_nodes()
            )));
        }

        let mut energies = Array2::<f64>::zeros((activations.nrows(), self.n_cmp()));
        for (c, (h_c, mut column)) in self
            .h
            .outer_iter()
            .zip(energies.columns_mut())
            .enumerate()
        {
            // row p of a·Hᵀ is H·a[p]
            let projected = activations.dot(&h_c.t());
            let quadratic = (&activations * &projected).sum_axis(Axis(1));
            column.assign(&(quadratic + self.k[c]));
        }
        Ok(energies)
    }

    /// Similarity: `max(E) - E` over the whole batch.
    pub fn forward(&self, activations: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Ok(flip_to_similarity(self.energies(activations)?))
    }
}
