//! # Model Layout
//!
//! The serialized model description written by the trainer, and the
//! builder that turns it into a [`Model`](crate::Model).
//!
//! ```text
//! *.hnetmodel.json → ModelFile (schema) → ModelBuilder (normalize, dispatch) → Model
//! ```
//!
//! ## File format
//!
//! ```json
//! {
//!   "comment": "free text",
//!   "links": "sense-->0,0-->1,1-->out",
//!   "layout": [
//!     {
//!       "name": "tier1",
//!       "h": [], "k": [],
//!       "learned_edge_states": [[9, 0, 2]],
//!       "edge_endnode_idx": [[0, 1], [1, 2], [0, 2]],
//!       "edge_type_filter": [],
//!       "nonlinearity_mode": "none",
//!       "n_winners": 0
//!     }
//!   ]
//! }
//! ```

pub mod builder;
pub(crate) mod tensor;

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{Error, Result};

pub use builder::{BuildOptions, ModelBuilder, build_model_from_file};
pub use crate::energy::EnergyMode;
pub use crate::nonlinearity::NonlinearityMode;

/// Required file name suffix for model files.
pub const MODEL_FILE_SUFFIX: &str = ".hnetmodel.json";

// ============================================================================
// Schema
// ============================================================================

/// Top-level model file.
///
/// Deserialization is the schema check: a missing field or a field of the
/// wrong JSON type fails before any tensor is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub comment: String,
    pub links: String,
    pub layout: Vec<ComponentBankRecord>,
}

/// One component bank as written by the trainer.
///
/// Tensor fields stay as raw nested lists until the builder knows which of
/// them the chosen energy mode consumes; unused ones may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentBankRecord {
    pub name: String,
    /// n_cmp × n_nodes × n_nodes
    pub h: Vec<Value>,
    /// n_cmp
    pub k: Vec<Value>,
    /// n_cmp × n_edges edge type codes
    pub learned_edge_states: Vec<Value>,
    /// n_edges × 2 node indices
    pub edge_endnode_idx: Vec<Value>,
    pub edge_type_filter: Vec<Value>,
    pub nonlinearity_mode: String,
    /// Only read by k-winner-take-all; other modes accept any integer.
    pub n_winners: i64,
    /// Overrides [`BuildOptions::binarize`] for this bank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_include_null: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_include_all_16: Option<bool>,
}

impl ModelFile {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Schema(format!("model file: {e}")))
    }

    /// Read and schema-check a `*.hnetmodel.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        require_suffix(path, MODEL_FILE_SUFFIX)?;
        let file = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        info!(
            path = %path.display(),
            links = %file.links,
            banks = file.layout.len(),
            "loaded model file"
        );
        Ok(file)
    }

    /// Lowercase and strip whitespace from `links` and every record's
    /// `name` and `nonlinearity_mode`.
    pub fn normalize(&mut self) {
        self.links = normalize_token(&self.links);
        for record in &mut self.layout {
            record.name = normalize_token(&record.name);
            record.nonlinearity_mode = normalize_token(&record.nonlinearity_mode);
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
}

/// Lowercase, with all whitespace removed.
pub fn normalize_token(text: &str) -> String {
    text.split_whitespace().collect::<String>().to_lowercase()
}

pub(crate) fn require_suffix(path: &Path, suffix: &str) -> Result<()> {
    let ok = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(suffix));
    if ok {
        Ok(())
    } else {
        Err(Error::Schema(format!(
            "{} does not end with {suffix}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"{
        "comment": "unit",
        "links": " Sense --> 0 , 0 --> OUT ",
        "layout": [{
            "name": " Tier One\t",
            "h": [], "k": [],
            "learned_edge_states": [[9]],
            "edge_endnode_idx": [[0, 1]],
            "edge_type_filter": [],
            "nonlinearity_mode": " MaxAbs ",
            "n_winners": 0
        }]
    }"#;

    #[test]
    fn test_parse_and_normalize() {
        let file = ModelFile::from_json_str(MINIMAL).unwrap().normalized();
        assert_eq!(file.links, "sense-->0,0-->out");
        assert_eq!(file.layout[0].name, "tierone");
        assert_eq!(file.layout[0].nonlinearity_mode, "maxabs");
        assert_eq!(file.layout[0].do_include_null, None);
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let json = MINIMAL.replace(r#""n_winners": 0"#, r#""unused": 0"#);
        let err = ModelFile::from_json_str(&json).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert!(err.to_string().contains("n_winners"));
    }

    #[test]
    fn test_mistyped_fields_are_schema_errors() {
        for (from, to) in [
            (r#""n_winners": 0"#, r#""n_winners": 2.5"#),
            (r#""n_winners": 0"#, r#""n_winners": "3""#),
            (r#""h": []"#, r#""h": 1"#),
            (r#""comment": "unit""#, r#""comment": 7"#),
            (r#""nonlinearity_mode": " MaxAbs ""#, r#""nonlinearity_mode": ["max"]"#),
        ] {
            let json = MINIMAL.replace(from, to);
            assert!(
                matches!(ModelFile::from_json_str(&json), Err(Error::Schema(_))),
                "{to} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("  Max\n Abs "), "maxabs");
        assert_eq!(normalize_token(""), "");
    }

    #[test]
    fn test_suffix_required() {
        let err = ModelFile::load("model.json").unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }
}
