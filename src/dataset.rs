//! Dataset files exported alongside trained models.
//!
//! Only reading is supported; normalization, thresholding and class
//! balancing happen before export.

use std::path::Path;

use ndarray::Array2;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::layout::require_suffix;
use crate::layout::tensor::Tensor;
use crate::{Error, Result};

/// Required file name suffix for dataset files.
pub const DATASET_FILE_SUFFIX: &str = ".dataset.json";

/// A batch of datapoints, one row each.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub comment: String,
    pub name: String,
    /// `trn` or `tst` by convention.
    pub split: String,
    /// n_pts × n_features; nested per-datapoint lists are flattened row-major.
    pub data: Array2<f64>,
    /// One label per datapoint, or empty for unlabeled data.
    pub label_idx: Vec<f64>,
}

#[derive(Deserialize)]
struct DatasetFile {
    comment: String,
    name: String,
    split: String,
    data: Vec<Value>,
    label_idx: Vec<Value>,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: DatasetFile =
            serde_json::from_str(json).map_err(|e| Error::Schema(format!("dataset file: {e}")))?;

        let data = Tensor::from_json("data", &file.data)?;
        let n_pts = data.shape()[0];
        let n_features = if n_pts == 0 { 0 } else { data.shape()[1..].iter().product() };
        let data = Array2::from_shape_vec((n_pts, n_features), data.into_flat())
            .map_err(|e| Error::Schema(format!("data: {e}")))?;

        let label_idx = Tensor::from_json("label_idx", &file.label_idx)?.into_flat();
        if !label_idx.is_empty() && label_idx.len() != n_pts {
            return Err(Error::Structure(format!(
                "{} labels for {n_pts} datapoints",
                label_idx.len()
            )));
        }

        Ok(Self {
            comment: file.comment,
            name: file.name,
            split: file.split,
            data,
            label_idx,
        })
    }

    /// Read a `*.dataset.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        require_suffix(path, DATASET_FILE_SUFFIX)?;
        let dataset = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        info!(
            path = %path.display(),
            name = %dataset.name,
            split = %dataset.split,
            n_pts = dataset.n_pts(),
            n_features = dataset.n_features(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    pub fn n_pts(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.data.ncols()
    }

    pub fn has_labels(&self) -> bool {
        !self.label_idx.is_empty()
    }
}
