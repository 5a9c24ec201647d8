use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{JobLevelsError, Result};

pub const REPO_KEY: &str = "repo";
pub const IMAGE_KEY: &str = "image";
pub const DEPENDENT_JOBS_KEY: &str = "dependent_jobs";
pub const BASE_IMAGE_KEY: &str = "base_image";

/// A job as declared in the matrix config.
///
/// The `dependent_jobs` entry is split out of the payload at parse time, so
/// `fields` holds every other key in its original order.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    fields: IndexMap<String, Value>,
    /// Jobs that build on top of this job's image, one level deeper.
    pub dependent_jobs: Vec<JobSpec>,
}

impl JobSpec {
    /// Parses the value under the document's `config` key.
    ///
    /// # Errors
    ///
    /// Returns [`JobLevelsError::InvalidJob`] if the value is not a sequence of
    /// mappings, if any `dependent_jobs` is not a sequence, or if `repo` or
    /// `image` is present with a non-string value.
    pub fn parse_list(value: &Value, path: &str) -> Result<Vec<Self>> {
        let items = value.as_array().ok_or_else(|| invalid(path, "expected a sequence of jobs"))?;

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| Self::from_value(item, &format!("{path}[{idx}]")))
            .collect()
    }

    fn from_value(value: &Value, path: &str) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| invalid(path, "expected a mapping"))?;

        let mut fields = IndexMap::with_capacity(map.len());
        let mut dependent_jobs = Vec::new();

        for (key, value) in map {
            match key.as_str() {
                DEPENDENT_JOBS_KEY => {
                    // `dependent_jobs: ~` is treated like an absent key
                    if !value.is_null() {
                        dependent_jobs =
                            Self::parse_list(value, &format!("{path}.{DEPENDENT_JOBS_KEY}"))?;
                    }
                }
                REPO_KEY | IMAGE_KEY if !(value.is_string() || value.is_null()) => {
                    return Err(invalid(path, &format!("'{key}' must be a string")));
                }
                _ => {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(Self {
            fields,
            dependent_jobs,
        })
    }

    pub fn repo(&self) -> Option<&str> {
        self.fields.get(REPO_KEY).and_then(Value::as_str)
    }

    pub fn image(&self) -> Option<&str> {
        self.fields.get(IMAGE_KEY).and_then(Value::as_str)
    }

    /// Copies the job's payload into an output record without its children.
    pub fn to_record(&self) -> JobRecord {
        JobRecord(self.fields.clone())
    }
}

fn invalid(path: &str, reason: &str) -> JobLevelsError {
    JobLevelsError::InvalidJob {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// A job as emitted into a level: the declared payload plus the derived
/// `base_image`, never carrying `dependent_jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRecord(IndexMap<String, Value>);

impl JobRecord {
    pub fn repo(&self) -> Option<&str> {
        self.get(REPO_KEY).and_then(Value::as_str)
    }

    pub fn image(&self) -> Option<&str> {
        self.get(IMAGE_KEY).and_then(Value::as_str)
    }

    pub fn base_image(&self) -> Option<&str> {
        self.get(BASE_IMAGE_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub(crate) fn set_base_image(&mut self, base_image: String) {
        self.0
            .insert(BASE_IMAGE_KEY.to_string(), Value::String(base_image));
    }
}
