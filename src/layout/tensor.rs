//! Nested JSON number lists → shaped arrays.
//!
//! Model and dataset files store tensors as nested lists. Exporters drop
//! singleton dimensions, so a one-row matrix may arrive as a flat list and
//! a column vector as a list of one-element lists.

use ndarray::{Array1, Array2, Array3};
use serde_json::Value;

use crate::model::{EdgeEndpoints, EdgeType};
use crate::{Error, Result};

/// A rectangular, row-major tensor read from a nested list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tensor {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Tensor {
    pub(crate) fn from_json(field: &str, values: &[Value]) -> Result<Self> {
        let mut shape = Vec::new();
        probe_shape(values, &mut shape);

        let mut data = Vec::with_capacity(shape.iter().product());
        flatten(field, values, 0, &shape, &mut data)?;
        Ok(Self { shape, data })
    }

    pub(crate) fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Rank-3 view; a matrix is promoted to a single leading slice.
    pub(crate) fn into_array3(self, field: &str) -> Result<Array3<f64>> {
        let dim = match *self.shape.as_slice() {
            [a, b, c] => (a, b, c),
            [b, c] => (1, b, c),
            _ if self.is_empty() => (0, 0, 0),
            _ => return Err(rank_error(field, "3", &self.shape)),
        };
        Array3::from_shape_vec(dim, self.data).map_err(|e| Error::Schema(format!("{field}: {e}")))
    }

    /// Rank-2 view; a flat list is promoted to a single row.
    pub(crate) fn into_matrix(self, field: &str) -> Result<Array2<f64>> {
        let dim = match *self.shape.as_slice() {
            [r, c] => (r, c),
            [0] => (0, 0),
            [c] => (1, c),
            _ => return Err(rank_error(field, "2", &self.shape)),
        };
        Array2::from_shape_vec(dim, self.data).map_err(|e| Error::Schema(format!("{field}: {e}")))
    }

    /// Rank-1 view; row and column vectors are flattened.
    pub(crate) fn into_vector(self, field: &str) -> Result<Array1<f64>> {
        match *self.shape.as_slice() {
            [_] | [1, _] | [_, 1] => Ok(Array1::from_vec(self.data)),
            _ => Err(rank_error(field, "1", &self.shape)),
        }
    }

    /// All values in row-major order, whatever the rank.
    pub(crate) fn into_flat(self) -> Vec<f64> {
        self.data
    }
}

/// Shape is read along the first element at every depth; `flatten` then
/// checks every other element agrees.
fn probe_shape(values: &[Value], shape: &mut Vec<usize>) {
    shape.push(values.len());
    if let Some(Value::Array(inner)) = values.first() {
        probe_shape(inner, shape);
    }
}

fn flatten(
    field: &str,
    values: &[Value],
    depth: usize,
    shape: &[usize],
    out: &mut Vec<f64>,
) -> Result<()> {
    if values.len() != shape[depth] {
        return Err(Error::Schema(format!(
            "{field}: ragged list at depth {depth} (expected {} entries, found {})",
            shape[depth],
            values.len()
        )));
    }
    let leaf = depth + 1 == shape.len();
    for value in values {
        match value {
            Value::Array(inner) if !leaf => flatten(field, inner, depth + 1, shape, out)?,
            Value::Number(n) if leaf => out.push(n.as_f64().ok_or_else(|| {
                Error::Schema(format!("{field}: {n} is not representable as f64"))
            })?),
            other => {
                return Err(Error::Schema(format!(
                    "{field}: expected {} at depth {depth}, found {}",
                    if leaf { "a number" } else { "a list" },
                    json_type(other)
                )));
            }
        }
    }
    Ok(())
}

fn rank_error(field: &str, rank: &str, shape: &[usize]) -> Error {
    Error::Schema(format!("{field}: expected a rank-{rank} list, found shape {shape:?}"))
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Typed views
// ============================================================================

fn to_index(field: &str, v: f64) -> Result<usize> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
        Ok(v as usize)
    } else {
        Err(Error::Schema(format!("{field}: {v} is not a non-negative integer")))
    }
}

fn to_edge_type(field: &str, v: f64) -> Result<EdgeType> {
    to_index(field, v)
        .ok()
        .and_then(|code| EdgeType::from_code(code as i64))
        .ok_or_else(|| Error::Schema(format!("{field}: {v} is not an edge type code (0..=16)")))
}

/// `n_cmp × n_edges` learned edge states.
pub(crate) fn edge_state_matrix(field: &str, values: &[Value]) -> Result<Array2<EdgeType>> {
    let matrix = Tensor::from_json(field, values)?.into_matrix(field)?;
    let states = matrix
        .iter()
        .map(|&v| to_edge_type(field, v))
        .collect::<Result<Vec<_>>>()?;
    Array2::from_shape_vec(matrix.raw_dim(), states)
        .map_err(|e| Error::Schema(format!("{field}: {e}")))
}

/// `n_edges × 2` endpoint pairs.
pub(crate) fn endpoint_pairs(field: &str, values: &[Value]) -> Result<EdgeEndpoints> {
    let matrix = Tensor::from_json(field, values)?.into_matrix(field)?;
    if matrix.is_empty() {
        return Ok(EdgeEndpoints::default());
    }
    if matrix.ncols() != 2 {
        return Err(Error::Schema(format!(
            "{field}: expected n_edges x 2 node indices, found {} columns",
            matrix.ncols()
        )));
    }
    let pairs = matrix
        .rows()
        .into_iter()
        .map(|row| Ok((to_index(field, row[0])?, to_index(field, row[1])?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(EdgeEndpoints::new(pairs))
}

/// Flat list of edge type codes, any nesting.
pub(crate) fn edge_type_list(field: &str, values: &[Value]) -> Result<Vec<EdgeType>> {
    Tensor::from_json(field, values)?
        .into_flat()
        .into_iter()
        .map(|v| to_edge_type(field, v))
        .collect()
}
