//! Shared fixtures for integration tests

#![allow(dead_code)]

use promotion_predictor::ml::{ArtifactPaths, ArtifactStore, InferencePipeline};
use promotion_predictor::models::RawAttributes;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Artifact set shipped with the repository
pub fn shipped_artifacts() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts")
}

/// Copy of the shipped artifacts that a test may break
pub fn scratch_artifacts() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for entry in fs::read_dir(shipped_artifacts()).expect("read artifacts dir") {
        let entry = entry.expect("dir entry");
        fs::copy(entry.path(), dir.path().join(entry.file_name())).expect("copy artifact");
    }
    dir
}

pub fn shipped_pipeline() -> InferencePipeline {
    let store = ArtifactStore::new(ArtifactPaths::in_dir(shipped_artifacts()));
    InferencePipeline::new(store.load().expect("shipped artifacts load"))
}

pub fn shared_pipeline() -> Arc<InferencePipeline> {
    Arc::new(shipped_pipeline())
}

/// Reference employee used throughout the tests
pub fn reference_attributes() -> RawAttributes {
    RawAttributes {
        department: "Technology".to_string(),
        education: "Bachelor's".to_string(),
        gender: "m".to_string(),
        recruitment_channel: "sourcing".to_string(),
        age: 30,
        avg_training_score: 75,
        no_of_trainings: 1,
        previous_year_rating: 3.0,
        length_of_service: 5,
        kpis_met: false,
        awards_won: false,
    }
}
