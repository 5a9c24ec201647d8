use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::config::Settings;
use crate::matrix::{organize_by_levels, organize_by_levels_filtered, Levels, MatrixDocument};
use crate::output::{self, paint, Tone};

#[derive(Parser)]
#[command(name = "joblevels")]
#[command(
    author,
    version,
    about = "Organize a nested CI job config into dependency levels",
    long_about = None
)]
pub struct Cli {
    /// Path to the YAML matrix configuration
    yaml_file: PathBuf,

    /// Directory for level_<n>.json and all_levels.json; JSON goes to stdout when omitted
    output_dir: Option<PathBuf>,

    /// Tag appended to base_image (e.g. "nightly", "v1.0")
    #[arg(short, long, env = "JOBLEVELS_TAG")]
    tag: Option<String>,

    /// Branch name to replace BRANCH_PLACEHOLDER with
    #[arg(short, long, env = "JOBLEVELS_BRANCH")]
    branch: Option<String>,

    /// Only emit jobs from this repository and the jobs depending on them
    #[arg(short, long)]
    repo: Option<String>,

    /// Settings file (toml, json or yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to this file before running
    #[arg(long)]
    save_settings: Option<PathBuf>,

    /// Single-line JSON instead of indented output
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Suppress the banner and level summary
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

impl Cli {
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Applies command-line overrides on top of the settings file.
    fn effective_settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;

        if let Some(tag) = &self.tag {
            settings.matrix.tag = Some(tag.clone());
        }
        if let Some(branch) = &self.branch {
            settings.matrix.branch = Some(branch.clone());
        }
        if let Some(repo) = &self.repo {
            settings.matrix.repo = Some(repo.clone());
        }
        if self.compact {
            settings.output.pretty = false;
        }
        if self.quiet {
            settings.output.summary = false;
        }

        Ok(settings)
    }

    fn compute_levels(&self, settings: &Settings) -> Result<Levels> {
        let mut document = MatrixDocument::load(&self.yaml_file)?;

        if let Some(branch) = settings.matrix.branch.as_deref().filter(|b| !b.is_empty()) {
            info!("Replacing BRANCH_PLACEHOLDER with: {}", branch);
            document = document.with_branch(branch);
        }

        let jobs = document.jobs()?;
        let tag = settings.matrix.tag.as_deref();

        let levels = match settings.matrix.repo.as_deref() {
            Some(repo) => {
                info!("Filtering jobs by repository: {}", repo);
                organize_by_levels_filtered(&jobs, tag, Some(repo))
            }
            None => organize_by_levels(&jobs, tag),
        };

        info!(
            "Organized {} jobs into {} dependency levels",
            levels.total_jobs(),
            levels.len()
        );
        Ok(levels)
    }

    pub fn execute(&self) -> Result<()> {
        let settings = self.effective_settings()?;

        if let Some(path) = &self.save_settings {
            settings.save(path)?;
            info!("Settings written to: {}", path.display());
        }

        let levels = self.compute_levels(&settings)?;
        let pretty = settings.output.pretty;

        if let Some(output_dir) = &self.output_dir {
            if settings.output.summary {
                output::print_summary(&levels);
            }

            let written = output::write_level_files(&levels, output_dir, &settings.output, pretty)
                .with_context(|| format!("Failed to write levels to {}", output_dir.display()))?;

            if let Some((all_levels, slot_files)) = written.split_last() {
                for file in slot_files {
                    println!(
                        "{} {}",
                        paint(Tone::Written, format!("Wrote {} jobs to", file.jobs)),
                        paint(Tone::Label, file.path.display())
                    );
                }
                println!(
                    "\n{} {}",
                    paint(Tone::Written, "Wrote all levels to"),
                    paint(Tone::Label, all_levels.path.display())
                );
            }
        } else {
            if settings.output.summary {
                output::eprint_summary(&levels);
            }
            println!("{}", output::render_levels_json(&levels, pretty)?);
        }

        Ok(())
    }
}
