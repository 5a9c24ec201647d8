use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobLevelsError {
    #[error("Input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("YAML file must contain a '{0}' key")]
    MissingConfigKey(&'static str),

    #[error("Invalid job at {path}: {reason}")]
    InvalidJob { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JobLevelsError>;
