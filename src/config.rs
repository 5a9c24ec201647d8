use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file structure for joblevels.
///
/// Lets a repository pin its matrix defaults (tag, branch, runners) instead of
/// repeating them on every CI invocation. Command-line flags always win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Defaults for the organizer options
    #[serde(default)]
    pub matrix: MatrixSettings,

    /// Output preferences
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatrixSettings {
    /// Tag appended to every derived base_image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Branch name substituted for BRANCH_PLACEHOLDER
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Only emit jobs from this repository and their dependents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputSettings {
    /// Number of level_<n>.json files the CI workflow expects
    #[serde(default = "default_slots")]
    pub slots: usize,

    /// Indent JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Print the per-level summary tables
    #[serde(default = "default_true")]
    pub summary: bool,

    /// Runner entries written next to each level's jobs
    #[serde(default = "default_runners")]
    pub runners: Vec<RunnerSpec>,
}

/// One entry of the `os` matrix axis in a level file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerSpec {
    pub arch: String,
    pub runner: String,
}

impl RunnerSpec {
    fn new(arch: &str, runner: &str) -> Self {
        Self {
            arch: arch.to_string(),
            runner: runner.to_string(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            pretty: true,
            summary: true,
            runners: default_runners(),
        }
    }
}

fn default_slots() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_runners() -> Vec<RunnerSpec> {
    vec![
        RunnerSpec::new("arm64", "ubuntu-24.04-arm"),
        RunnerSpec::new("amd64", "ubuntu-latest"),
    ]
}

const CANDIDATES: [&str; 4] = [
    "joblevels.toml",
    "joblevels.json",
    "joblevels.yaml",
    "joblevels.yml",
];

impl Settings {
    /// Load settings from a file.
    ///
    /// Searches for settings files in this order:
    /// 1. Specified path
    /// 2. ./joblevels.toml, ./joblevels.json, ./joblevels.yaml, ./joblevels.yml
    /// 3. `<user config dir>/joblevels/config.toml`
    ///
    /// Returns default settings if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if path.exists() {
                return Self::load_from_path(path);
            }
            warn!(
                "Settings file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let user = dirs::config_dir().map(|dir| dir.join("joblevels").join("config.toml"));

        match discover(&cwd, user.as_deref()) {
            Some(found) => Self::load_from_path(&found),
            None => {
                debug!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        let settings: Self = match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML settings: {}", path.display()))?,
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON settings: {}", path.display()))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML settings: {}", path.display()))?,
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse settings file: {}", path.display()))?
            }
        };

        debug!("Loaded settings from: {}", path.display());
        Ok(settings)
    }

    /// Save settings to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml" | "yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }
}

fn discover(dir: &Path, user_file: Option<&Path>) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
        .or_else(|| user_file.filter(|path| path.exists()).map(Path::to_path_buf))
}
