use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};
use serde_json::Value;

use crate::error::{JobLevelsError, Result};

use super::job::JobSpec;
use super::placeholder::substitute_branch;

/// Top-level key holding the list of root jobs.
pub const CONFIG_KEY: &str = "config";

/// A parsed matrix configuration file.
///
/// Expected shape:
///
/// ```yaml
/// config:
///   - repo: org/base
///     image: org/base
///     dependent_jobs:
///       - repo: org/app
///         image: org/app
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixDocument {
    root: Value,
}

impl MatrixDocument {
    /// Reads and parses a YAML matrix file.
    ///
    /// # Errors
    ///
    /// Returns [`JobLevelsError::InputNotFound`] if the file does not exist,
    /// [`JobLevelsError::Yaml`] if it is not valid YAML, or
    /// [`JobLevelsError::Io`] for any other read failure.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => JobLevelsError::InputNotFound(path.to_path_buf()),
            _ => JobLevelsError::Io(err),
        })?;

        let document = Self::from_yaml_str(&contents)?;
        info!("Loaded matrix config from: {}", path.display());
        Ok(document)
    }

    /// Parses a YAML matrix, resolving `<<` merge keys against their anchors.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let mut yaml: serde_yaml::Value = serde_yaml::from_str(contents)?;
        yaml.apply_merge()?;
        let root: Value = serde_yaml::from_value(yaml)?;
        Ok(Self { root })
    }

    /// Returns a copy of the document with `BRANCH_PLACEHOLDER` replaced by
    /// `branch` throughout.
    pub fn with_branch(&self, branch: &str) -> Self {
        debug!("Substituting branch placeholder with '{branch}'");
        Self {
            root: substitute_branch(&self.root, branch),
        }
    }

    /// Parses the root jobs under the `config` key.
    ///
    /// # Errors
    ///
    /// Returns [`JobLevelsError::MissingConfigKey`] if the document has no
    /// `config` key, or [`JobLevelsError::InvalidJob`] if a job is malformed.
    pub fn jobs(&self) -> Result<Vec<JobSpec>> {
        let config = self
            .root
            .get(CONFIG_KEY)
            .ok_or(JobLevelsError::MissingConfigKey(CONFIG_KEY))?;

        JobSpec::parse_list(config, CONFIG_KEY)
    }
}
