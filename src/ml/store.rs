use crate::ml::classifier::{BinaryClassifier, ModelArtifact, ModelMetadata};
use crate::ml::encoder::{artifact_name, CategoricalEncoder, EncoderArtifact, LabelEncoder};
use crate::ml::error::ArtifactLoadError;
use crate::ml::features::CategoricalField;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Locations of the five artifact files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub department: PathBuf,
    pub education: PathBuf,
    pub gender: PathBuf,
    pub recruitment_channel: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join("model.json"),
            department: dir.join("department_encoder.json"),
            education: dir.join("education_encoder.json"),
            gender: dir.join("gender_encoder.json"),
            recruitment_channel: dir.join("recruitment_channel_encoder.json"),
        }
    }

    pub fn encoder(&self, field: CategoricalField) -> &Path {
        match field {
            CategoricalField::Department => &self.department,
            CategoricalField::Education => &self.education,
            CategoricalField::Gender => &self.gender,
            CategoricalField::RecruitmentChannel => &self.recruitment_channel,
        }
    }
}

/// The four categorical encoders, one per field
pub struct EncoderSet {
    department: Box<dyn CategoricalEncoder>,
    education: Box<dyn CategoricalEncoder>,
    gender: Box<dyn CategoricalEncoder>,
    recruitment_channel: Box<dyn CategoricalEncoder>,
}

impl EncoderSet {
    pub fn new(
        department: Box<dyn CategoricalEncoder>,
        education: Box<dyn CategoricalEncoder>,
        gender: Box<dyn CategoricalEncoder>,
        recruitment_channel: Box<dyn CategoricalEncoder>,
    ) -> Self {
        Self {
            department,
            education,
            gender,
            recruitment_channel,
        }
    }

    pub fn get(&self, field: CategoricalField) -> &dyn CategoricalEncoder {
        match field {
            CategoricalField::Department => self.department.as_ref(),
            CategoricalField::Education => self.education.as_ref(),
            CategoricalField::Gender => self.gender.as_ref(),
            CategoricalField::RecruitmentChannel => self.recruitment_channel.as_ref(),
        }
    }
}

/// Classifier plus encoders, read-only once constructed
pub struct ArtifactBundle {
    classifier: Box<dyn BinaryClassifier>,
    encoders: EncoderSet,
}

impl ArtifactBundle {
    pub fn new(classifier: Box<dyn BinaryClassifier>, encoders: EncoderSet) -> Self {
        Self {
            classifier,
            encoders,
        }
    }

    pub fn classifier(&self) -> &dyn BinaryClassifier {
        self.classifier.as_ref()
    }

    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    pub fn metadata(&self) -> &ModelMetadata {
        self.classifier.metadata()
    }

    /// Read and validate all five artifacts from disk.
    pub fn from_paths(paths: &ArtifactPaths) -> Result<Self, ArtifactLoadError> {
        let model: ModelArtifact = read_json("model", &paths.model)?;
        let classifier = model.into_classifier()?;

        let encoders = EncoderSet::new(
            Box::new(load_encoder(paths, CategoricalField::Department)?),
            Box::new(load_encoder(paths, CategoricalField::Education)?),
            Box::new(load_encoder(paths, CategoricalField::Gender)?),
            Box::new(load_encoder(paths, CategoricalField::RecruitmentChannel)?),
        );

        Ok(Self::new(classifier, encoders))
    }
}

impl fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("model_type", &self.classifier.model_type())
            .field("metadata", self.classifier.metadata())
            .finish_non_exhaustive()
    }
}

/// Loads the artifact bundle once and hands out shared handles to it.
///
/// Concurrent first callers block until the winning load completes. A failed
/// load leaves the store empty, so a later call performs a fresh attempt.
pub struct ArtifactStore {
    paths: ArtifactPaths,
    bundle: OnceCell<Arc<ArtifactBundle>>,
    loads: AtomicUsize,
}

impl ArtifactStore {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            bundle: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Get the bundle, reading it from disk on first use
    pub fn load(&self) -> Result<Arc<ArtifactBundle>, ArtifactLoadError> {
        self.bundle
            .get_or_try_init(|| {
                self.loads.fetch_add(1, Ordering::SeqCst);
                let bundle = ArtifactBundle::from_paths(&self.paths)?;
                info!(
                    model = %bundle.metadata().name,
                    version = %bundle.metadata().version,
                    model_type = ?bundle.classifier().model_type(),
                    path = %self.paths.model.display(),
                    "Loaded prediction artifacts"
                );
                Ok(Arc::new(bundle))
            })
            .map(Arc::clone)
    }

    /// Number of disk loads performed so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn is_loaded(&self) -> bool {
        self.bundle.get().is_some()
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }
}

fn load_encoder(
    paths: &ArtifactPaths,
    field: CategoricalField,
) -> Result<LabelEncoder, ArtifactLoadError> {
    let artifact: EncoderArtifact = read_json(&artifact_name(field), paths.encoder(field))?;
    LabelEncoder::from_artifact(artifact, field)
}

fn read_json<T: DeserializeOwned>(artifact: &str, path: &Path) -> Result<T, ArtifactLoadError> {
    debug!(artifact, path = %path.display(), "Reading artifact");

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ArtifactLoadError::Missing {
            artifact: artifact.to_string(),
            path: path.to_path_buf(),
        },
        _ => ArtifactLoadError::Io {
            artifact: artifact.to_string(),
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    serde_json::from_slice(&bytes).map_err(|e| ArtifactLoadError::Corrupt {
        artifact: artifact.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::features::FEATURE_NAMES;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, value: serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_vec_pretty(&value).unwrap()).unwrap();
    }

    fn write_encoder(dir: &Path, field: &str, classes: &[&str]) {
        write(
            dir,
            &format!("{}_encoder.json", field),
            json!({"format_version": 1, "field": field, "classes": classes}),
        );
    }

    fn artifact_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "model.json",
            json!({
                "format_version": 1,
                "metadata": {"name": "promotion-lr", "version": "1.0"},
                "feature_names": FEATURE_NAMES,
                "model": {
                    "type": "logistic_regression",
                    "coefficients": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.3, 0.0, 1.5, 1.2, 0.05],
                    "intercept": -6.0
                }
            }),
        );
        write_encoder(dir.path(), "department", &["Analytics", "HR", "Technology"]);
        write_encoder(dir.path(), "education", &["Bachelor's", "Master's & above"]);
        write_encoder(dir.path(), "gender", &["f", "m"]);
        write_encoder(dir.path(), "recruitment_channel", &["other", "referred", "sourcing"]);
        dir
    }

    #[test]
    fn test_load_once() {
        let dir = artifact_dir();
        let store = ArtifactStore::new(ArtifactPaths::in_dir(dir.path()));

        assert!(!store.is_loaded());
        let first = store.load().unwrap();
        let second = store.load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.load_count(), 1);
        assert!(store.is_loaded());
        assert_eq!(first.metadata().name, "promotion-lr");
    }

    #[test]
    fn test_concurrent_first_load_runs_once() {
        let dir = artifact_dir();
        let store = ArtifactStore::new(ArtifactPaths::in_dir(dir.path()));

        let bundles: Vec<Arc<ArtifactBundle>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| store.load().unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(store.load_count(), 1);
        assert!(bundles.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_missing_file_reported() {
        let dir = artifact_dir();
        fs::remove_file(dir.path().join("gender_encoder.json")).unwrap();
        let store = ArtifactStore::new(ArtifactPaths::in_dir(dir.path()));

        let err = store.load().unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Missing { .. }));
        assert_eq!(err.artifact(), "gender_encoder");
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_failed_load_can_be_retried() {
        let dir = artifact_dir();
        let model = fs::read(dir.path().join("model.json")).unwrap();
        fs::write(dir.path().join("model.json"), b"{not json").unwrap();
        let store = ArtifactStore::new(ArtifactPaths::in_dir(dir.path()));

        assert!(matches!(
            store.load(),
            Err(ArtifactLoadError::Corrupt { .. })
        ));
        assert!(!store.is_loaded());

        fs::write(dir.path().join("model.json"), model).unwrap();
        assert!(store.load().is_ok());
        assert_eq!(store.load_count(), 2);
    }

    #[test]
    fn test_encoder_in_wrong_file_rejected() {
        let dir = artifact_dir();
        fs::copy(
            dir.path().join("department_encoder.json"),
            dir.path().join("education_encoder.json"),
        )
        .unwrap();
        let store = ArtifactStore::new(ArtifactPaths::in_dir(dir.path()));

        let err = store.load().unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Invalid { .. }));
        assert_eq!(err.artifact(), "education_encoder");
    }

    #[test]
    fn test_encoder_file_as_model_rejected() {
        let dir = artifact_dir();
        fs::copy(
            dir.path().join("department_encoder.json"),
            dir.path().join("model.json"),
        )
        .unwrap();
        let store = ArtifactStore::new(ArtifactPaths::in_dir(dir.path()));

        let err = store.load().unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Corrupt { .. }));
        assert_eq!(err.artifact(), "model");
    }
}
