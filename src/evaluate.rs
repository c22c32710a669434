//! Evaluation entry point.
//!
//! ```text
//! Model + batch (n_pts × n_features) → codes (n_pts × n_out)
//! ```

use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::dataset::Dataset;
use crate::network::Model;
use crate::Result;

/// Run `model` over a batch. The model is only read; concurrent calls on
/// independent batches are safe.
pub fn evaluate(model: &Model, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    debug!(
        topology = %model.topology(),
        n_pts = data.nrows(),
        n_features = data.ncols(),
        "evaluating batch"
    );
    model.forward(data)
}

/// Run `model` over every datapoint of `dataset`.
pub fn evaluate_dataset(model: &Model, dataset: &Dataset) -> Result<Array2<f64>> {
    evaluate(model, dataset.data.view())
}
