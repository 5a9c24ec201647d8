use serde::Serialize;

use super::job::JobRecord;

/// Jobs grouped by dependency depth: index 0 holds the top-level jobs, index
/// N the jobs nested N `dependent_jobs` deep.
///
/// Always holds at least one level, and every index up to the deepest
/// populated one is present even when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Levels(Vec<Vec<JobRecord>>);

impl Levels {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<JobRecord>> {
        self.0.iter()
    }

    /// Jobs at `depth`, or an empty slice past the deepest level.
    pub fn slot(&self, depth: usize) -> &[JobRecord] {
        self.0.get(depth).map_or(&[], Vec::as_slice)
    }

    pub fn total_jobs(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }
}

impl<'a> IntoIterator for &'a Levels {
    type Item = &'a Vec<JobRecord>;
    type IntoIter = std::slice::Iter<'a, Vec<JobRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Per-depth accumulator, grown on demand as deeper jobs are pushed.
#[derive(Debug, Default)]
pub(crate) struct LevelsBuilder {
    levels: Vec<Vec<JobRecord>>,
}

impl LevelsBuilder {
    pub fn push(&mut self, depth: usize, job: JobRecord) {
        if self.levels.len() <= depth {
            self.levels.resize_with(depth + 1, Vec::new);
        }
        self.levels[depth].push(job);
    }

    pub fn build(mut self) -> Levels {
        if self.levels.is_empty() {
            self.levels.push(Vec::new());
        }
        Levels(self.levels)
    }
}
