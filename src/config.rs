use crate::error::{AppError, Result};
use crate::ml::ArtifactPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Artifact locations
    pub artifacts: ArtifactConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration, layering `config_path` (if present) and `PROMO__*`
    /// environment variables over the embedded defaults
    pub fn load_from(config_path: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(config_path).required(false))
            // Override with environment variables (prefix: PROMO_)
            .add_source(
                config::Environment::with_prefix("PROMO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Load from `config_path`, falling back to defaults on failure.
    ///
    /// The error is handed back so it can be logged once tracing is up.
    pub fn load_or_default(config_path: &str) -> (Self, Option<AppError>) {
        match Self::load_from(config_path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Path named by `CONFIG_PATH`, or the bundled default
    pub fn default_path() -> String {
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Directory holding the artifact files
    #[serde(default = "default_artifact_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_model_file")]
    pub model_file: String,

    #[serde(default = "default_department_file")]
    pub department_encoder_file: String,

    #[serde(default = "default_education_file")]
    pub education_encoder_file: String,

    #[serde(default = "default_gender_file")]
    pub gender_encoder_file: String,

    #[serde(default = "default_recruitment_channel_file")]
    pub recruitment_channel_encoder_file: String,
}

impl ArtifactConfig {
    /// Resolve file names against `dir`
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.dir.join(&self.model_file),
            department: self.dir.join(&self.department_encoder_file),
            education: self.dir.join(&self.education_encoder_file),
            gender: self.dir.join(&self.gender_encoder_file),
            recruitment_channel: self.dir.join(&self.recruitment_channel_encoder_file),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
            model_file: default_model_file(),
            department_encoder_file: default_department_file(),
            education_encoder_file: default_education_file(),
            gender_encoder_file: default_gender_file(),
            recruitment_channel_encoder_file: default_recruitment_channel_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("./artifacts")
}

fn default_model_file() -> String {
    "model.json".to_string()
}

fn default_department_file() -> String {
    "department_encoder.json".to_string()
}

fn default_education_file() -> String {
    "education_encoder.json".to_string()
}

fn default_gender_file() -> String {
    "gender_encoder.json".to_string()
}

fn default_recruitment_channel_file() -> String {
    "recruitment_channel_encoder.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
