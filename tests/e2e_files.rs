//! File round trip: write model and dataset files, load them, evaluate.

use std::path::PathBuf;
use std::sync::Arc;

use hnet::{
    BuildOptions, Dataset, EnergyMode, Error, ModelBuilder, ModelFile, build_model_from_file,
    evaluate, evaluate_dataset,
};
use ndarray::{Axis, array};
use pretty_assertions::assert_eq;

// ============================================================================
// Helpers
// ============================================================================

/// Model whose Hamiltonian and edge-match views rank the same patterns:
/// component 0 rewards (1,1), component 1 rewards (0,0).
const MODEL_JSON: &str = r#"{
    "comment": "exported for tests",
    "links": "sense-->0,0-->out",
    "layout": [{
        "name": "Credit Tier 1",
        "h": [[[0, -1], [0, 0]], [[0, 0], [0, 0]]],
        "k": [[0], [0]],
        "learned_edge_states": [[9], [2]],
        "edge_endnode_idx": [[0, 1]],
        "edge_type_filter": [],
        "nonlinearity_mode": "none",
        "n_winners": 0
    }]
}"#;

const DATASET_JSON: &str = r#"{
    "comment": "xor-ish",
    "name": "pairs",
    "split": "tst",
    "data": [[1, 1], [0, 0], [1, 0], [0, 1]],
    "label_idx": [1, 0, 1, 1]
}"#;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hnet-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// 1. Loading
// ============================================================================

#[test]
fn test_build_model_from_file() {
    let path = scratch_file("load.hnetmodel.json", MODEL_JSON);
    let model = build_model_from_file(&path, &BuildOptions::new(EnergyMode::EdgeMatch)).unwrap();
    assert_eq!(model.comment(), "exported for tests");
    assert_eq!(model.tiers()[0].name(), "credittier1");
}

#[test]
fn test_wrong_suffix_rejected() {
    let path = scratch_file("load.json", MODEL_JSON);
    let err = build_model_from_file(&path, &BuildOptions::new(EnergyMode::EdgeMatch)).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("hnet-e2e-absent.hnetmodel.json");
    let err = ModelFile::load(path).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_dataset_load_and_evaluate() {
    let model_path = scratch_file("eval.hnetmodel.json", MODEL_JSON);
    let data_path = scratch_file("pairs_tst.dataset.json", DATASET_JSON);

    let dataset = Dataset::load(&data_path).unwrap();
    assert_eq!((dataset.n_pts(), dataset.n_features()), (4, 2));
    assert_eq!(dataset.split, "tst");

    let model = build_model_from_file(&model_path, &BuildOptions::new(EnergyMode::EdgeMatch)).unwrap();
    let codes = evaluate_dataset(&model, &dataset).unwrap();
    assert_eq!(codes, array![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0], [0.0, 0.0]]);
}

// ============================================================================
// 2. Energy modes agree on the winning component
// ============================================================================

#[test]
fn test_hamiltonian_and_edgematch_rank_alike() {
    let file = ModelFile::from_json_str(MODEL_JSON).unwrap();
    let dataset = Dataset::from_json_str(DATASET_JSON).unwrap();

    let hamiltonian = ModelBuilder::new(BuildOptions::new(EnergyMode::Hamiltonian))
        .build(&file)
        .unwrap();
    let scores = evaluate_dataset(&hamiltonian, &dataset).unwrap();
    // energies [-1,0],[0,0],[0,0],[0,0] → max 0 → similarity 1 for (1,1) on component 0
    assert_eq!(scores, array![[1.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.0]]);

    let edge = ModelBuilder::new(BuildOptions::new(EnergyMode::EdgeMatch))
        .build(&file)
        .unwrap();
    let edge_scores = evaluate_dataset(&edge, &dataset).unwrap();
    assert_eq!(scores.row(0), edge_scores.row(0));
}

// ============================================================================
// 3. Shared model across threads
// ============================================================================

#[test]
fn test_concurrent_evaluation_matches_serial() {
    let file = ModelFile::from_json_str(MODEL_JSON).unwrap();
    let model = Arc::new(
        ModelBuilder::new(BuildOptions::new(EnergyMode::BoolWeights))
            .build(&file)
            .unwrap(),
    );
    let batch = Dataset::from_json_str(DATASET_JSON).unwrap().data;
    let serial = evaluate(&model, batch.view()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let model = Arc::clone(&model);
            let batch = batch.clone();
            std::thread::spawn(move || evaluate(&model, batch.view()).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), serial);
    }
    assert_eq!(serial.len_of(Axis(0)), 4);
}
