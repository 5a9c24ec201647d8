use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::config::{OutputSettings, RunnerSpec};
use crate::error::Result;
use crate::matrix::{JobRecord, Levels};

/// Combined file written next to the per-level slot files.
pub const ALL_LEVELS_FILE: &str = "all_levels.json";

/// Shape of a `level_<n>.json` file, consumed as a CI build matrix with an
/// `image` axis (the jobs) and an `os` axis (the runners).
#[derive(Debug, Serialize)]
struct LevelMatrix<'a> {
    image: &'a [JobRecord],
    os: &'a [RunnerSpec],
}

/// A file written by [`write_level_files`] and the number of jobs in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub jobs: usize,
}

pub fn level_file_name(idx: usize) -> String {
    format!("level_{idx}.json")
}

/// Serializes the full level list.
pub fn render_levels_json(levels: &Levels, pretty: bool) -> Result<String> {
    to_json(levels, pretty)
}

/// Writes one `level_<n>.json` per configured slot plus `all_levels.json`.
///
/// The workflow reading these files expects a fixed number of slots, so
/// levels past the last slot are left out of the slot files (they are still in
/// `all_levels.json`) and missing levels are written with an empty job list.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
pub fn write_level_files(
    levels: &Levels,
    output_dir: &Path,
    settings: &OutputSettings,
    pretty: bool,
) -> Result<Vec<WrittenFile>> {
    fs::create_dir_all(output_dir)?;

    if levels.len() > settings.slots {
        warn!(
            "{} dependency levels exceed the {} level files; levels {}..{} are only in {}",
            levels.len(),
            settings.slots,
            settings.slots,
            levels.len() - 1,
            ALL_LEVELS_FILE
        );
    }

    let mut written = Vec::with_capacity(settings.slots + 1);

    for idx in 0..settings.slots {
        let jobs = levels.slot(idx);
        let matrix = LevelMatrix {
            image: jobs,
            os: &settings.runners,
        };
        let path = output_dir.join(level_file_name(idx));
        fs::write(&path, to_json(&matrix, pretty)?)?;
        info!("Wrote {} jobs to {}", jobs.len(), path.display());
        written.push(WrittenFile {
            path,
            jobs: jobs.len(),
        });
    }

    let path = output_dir.join(ALL_LEVELS_FILE);
    fs::write(&path, render_levels_json(levels, pretty)?)?;
    info!("Wrote all levels to {}", path.display());
    written.push(WrittenFile {
        path,
        jobs: levels.total_jobs(),
    });

    Ok(written)
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
