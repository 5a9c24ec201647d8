use log::{debug, warn};

use super::job::JobSpec;
use super::levels::{Levels, LevelsBuilder};

/// Groups jobs by dependency depth.
///
/// Top-level jobs land in level 0 and each `dependent_jobs` nesting adds one.
/// Jobs reached through a parent get a `base_image` derived from the parent's
/// `image` (see [`derive_base_image`]). Within a level, jobs keep depth-first,
/// left-to-right visitation order.
pub fn organize_by_levels(jobs: &[JobSpec], base_image_tag: Option<&str>) -> Levels {
    organize_by_levels_filtered(jobs, base_image_tag, None)
}

/// Like [`organize_by_levels`], but keeps only jobs whose `repo` equals
/// `repo_filter` and everything below them.
///
/// A job is not kept just because one of its descendants matches; the match
/// only flows down the tree. Kept jobs stay at their real depth, so the levels
/// above the first match come out empty.
pub fn organize_by_levels_filtered(
    jobs: &[JobSpec],
    base_image_tag: Option<&str>,
    repo_filter: Option<&str>,
) -> Levels {
    let mut organizer = Organizer {
        base_image_tag: base_image_tag.filter(|tag| !tag.is_empty()),
        repo_filter,
        levels: LevelsBuilder::default(),
    };

    let mut any_included = false;
    for job in jobs {
        any_included |= organizer.visit(job, 0, None, false);
    }

    if !any_included {
        if let Some(repo) = repo_filter {
            warn!("Repository filter '{repo}' matched no jobs");
        }
    }

    organizer.levels.build()
}

/// Computes a dependent job's `base_image` from its parent's image reference.
///
/// Slashes become underscores; a tag, when given, is appended after `--`.
pub fn derive_base_image(parent_image: &str, base_image_tag: Option<&str>) -> String {
    let normalized = parent_image.replace('/', "_");
    match base_image_tag {
        Some(tag) if !tag.is_empty() => format!("{normalized}--{tag}"),
        _ => normalized,
    }
}

struct Organizer<'a> {
    base_image_tag: Option<&'a str>,
    repo_filter: Option<&'a str>,
    levels: LevelsBuilder,
}

impl Organizer<'_> {
    /// Visits `job` and its subtree, returning whether anything in the subtree
    /// was emitted.
    fn visit(
        &mut self,
        job: &JobSpec,
        depth: usize,
        parent_image: Option<&str>,
        ancestor_included: bool,
    ) -> bool {
        let included = ancestor_included || self.matches(job);

        if included {
            let mut record = job.to_record();
            if let Some(parent) = parent_image.filter(|image| !image.is_empty()) {
                record.set_base_image(derive_base_image(parent, self.base_image_tag));
            }
            debug!(
                "Level {depth}: {} -> {}",
                job.repo().unwrap_or("unknown"),
                job.image().unwrap_or("unknown")
            );
            self.levels.push(depth, record);
        } else {
            debug!(
                "Level {depth}: skipping {} (no match for repository filter)",
                job.repo().unwrap_or("unknown")
            );
        }

        let mut subtree_included = included;
        for child in &job.dependent_jobs {
            subtree_included |= self.visit(child, depth + 1, job.image(), included);
        }
        subtree_included
    }

    fn matches(&self, job: &JobSpec) -> bool {
        match self.repo_filter {
            Some(repo) => job.repo() == Some(repo),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::job::tests::keys;
    use crate::matrix::job::{JobRecord, DEPENDENT_JOBS_KEY};
    use serde_json::{json, Value};

    fn jobs(value: Value) -> Vec<JobSpec> {
        JobSpec::parse_list(&value, "config").unwrap()
    }

    fn repos(level: &[JobRecord]) -> Vec<&str> {
        level.iter().map(|job| job.repo().unwrap_or("unknown")).collect()
    }

    fn simple_tree() -> Vec<JobSpec> {
        jobs(json!([{
            "repo": "a",
            "image": "img-a",
            "dependent_jobs": [{"repo": "b", "image": "img-b"}]
        }]))
    }

    /// a
    /// ├── b
    /// │   └── d
    /// └── c
    /// e
    /// └── f
    fn wide_tree() -> Vec<JobSpec> {
        jobs(json!([
            {
                "repo": "a",
                "image": "org/a",
                "dependent_jobs": [
                    {
                        "repo": "b",
                        "image": "org/b",
                        "dependent_jobs": [{"repo": "d", "image": "org/d"}]
                    },
                    {"repo": "c", "image": "org/c"}
                ]
            },
            {
                "repo": "e",
                "image": "org/e",
                "dependent_jobs": [{"repo": "f", "image": "org/f"}]
            }
        ]))
    }

    #[test]
    fn test_parent_and_child_without_tag() {
        let levels = organize_by_levels(&simple_tree(), None);
        assert_eq!(
            serde_json::to_value(&levels).unwrap(),
            json!([
                [{"repo": "a", "image": "img-a"}],
                [{"repo": "b", "image": "img-b", "base_image": "img-a"}]
            ])
        );
    }

    #[test]
    fn test_tag_is_appended_to_base_image() {
        let levels = organize_by_levels(&simple_tree(), Some("nightly"));
        assert_eq!(levels.slot(1)[0].base_image(), Some("img-a--nightly"));
        assert_eq!(levels.slot(0)[0].base_image(), None);
    }

    #[test]
    fn test_empty_tag_is_ignored() {
        let levels = organize_by_levels(&simple_tree(), Some(""));
        assert_eq!(levels.slot(1)[0].base_image(), Some("img-a"));
    }

    #[test]
    fn test_slashes_in_parent_image_become_underscores() {
        let tree = jobs(json!([{
            "repo": "a",
            "image": "org/name",
            "dependent_jobs": [{"repo": "b", "image": "org/child"}]
        }]));

        let levels = organize_by_levels(&tree, Some("v1.0"));
        assert_eq!(levels.slot(1)[0].base_image(), Some("org_name--v1.0"));
    }

    #[test]
    fn test_level_count_and_depth_first_order() {
        let levels = organize_by_levels(&wide_tree(), None);

        assert_eq!(levels.len(), 3);
        assert_eq!(repos(levels.slot(0)), ["a", "e"]);
        assert_eq!(repos(levels.slot(1)), ["b", "c", "f"]);
        assert_eq!(repos(levels.slot(2)), ["d"]);
        assert_eq!(levels.total_jobs(), 6);
    }

    #[test]
    fn test_base_image_comes_from_direct_parent() {
        let levels = organize_by_levels(&wide_tree(), None);

        let bases: Vec<_> = levels.slot(1).iter().map(JobRecord::base_image).collect();
        assert_eq!(bases, [Some("org_a"), Some("org_a"), Some("org_e")]);
        assert_eq!(levels.slot(2)[0].base_image(), Some("org_b"));
    }

    #[test]
    fn test_no_emitted_job_has_dependent_jobs() {
        let levels = organize_by_levels(&wide_tree(), Some("tag"));
        assert!(levels
            .iter()
            .flatten()
            .all(|job| job.get(DEPENDENT_JOBS_KEY).is_none()));
    }

    #[test]
    fn test_parent_without_image_gives_no_base_image() {
        let tree = jobs(json!([
            {"repo": "a", "dependent_jobs": [{"repo": "b"}]},
            {"repo": "c", "image": "", "dependent_jobs": [{"repo": "d"}]}
        ]));

        let levels = organize_by_levels(&tree, Some("nightly"));
        assert!(levels.slot(1).iter().all(|job| job.base_image().is_none()));
    }

    #[test]
    fn test_empty_input_yields_one_empty_level() {
        let levels = organize_by_levels(&[], None);
        assert_eq!(serde_json::to_value(&levels).unwrap(), json!([[]]));
    }

    #[test]
    fn test_payload_keys_keep_their_order() {
        let tree = jobs(json!([{
            "image": "root",
            "dependent_jobs": [{"name": "child", "repo": "r", "image": "c", "env": {"K": "V"}}],
            "repo": "top"
        }]));

        let levels = organize_by_levels(&tree, None);
        assert_eq!(keys(&levels.slot(0)[0]), ["image", "repo"]);
        assert_eq!(
            keys(&levels.slot(1)[0]),
            ["name", "repo", "image", "env", "base_image"]
        );
    }

    #[test]
    fn test_filter_on_child_leaves_root_level_empty() {
        let levels = organize_by_levels_filtered(&simple_tree(), None, Some("b"));
        assert_eq!(
            serde_json::to_value(&levels).unwrap(),
            json!([[], [{"repo": "b", "image": "img-b", "base_image": "img-a"}]])
        );
    }

    #[test]
    fn test_filter_includes_whole_subtree_of_match() {
        let levels = organize_by_levels_filtered(&wide_tree(), None, Some("a"));

        assert_eq!(levels.len(), 3);
        assert_eq!(repos(levels.slot(0)), ["a"]);
        assert_eq!(repos(levels.slot(1)), ["b", "c"]);
        assert_eq!(repos(levels.slot(2)), ["d"]);
    }

    #[test]
    fn test_filter_does_not_include_ancestors_or_siblings() {
        let levels = organize_by_levels_filtered(&wide_tree(), Some("nightly"), Some("b"));

        assert_eq!(levels.len(), 3);
        assert!(levels.slot(0).is_empty());
        assert_eq!(repos(levels.slot(1)), ["b"]);
        assert_eq!(levels.slot(1)[0].base_image(), Some("org_a--nightly"));
        assert_eq!(repos(levels.slot(2)), ["d"]);
        assert_eq!(levels.slot(2)[0].base_image(), Some("org_b--nightly"));
    }

    #[test]
    fn test_filter_matching_a_leaf_trims_deeper_levels() {
        let levels = organize_by_levels_filtered(&wide_tree(), None, Some("f"));

        assert_eq!(levels.len(), 2);
        assert!(levels.slot(0).is_empty());
        assert_eq!(repos(levels.slot(1)), ["f"]);
    }

    #[test]
    fn test_filter_matching_several_subtrees() {
        let tree = jobs(json!([
            {"repo": "x", "image": "x", "dependent_jobs": [{"repo": "lib", "image": "lib1"}]},
            {"repo": "lib", "image": "lib2", "dependent_jobs": [{"repo": "app", "image": "app"}]}
        ]));

        let levels = organize_by_levels_filtered(&tree, None, Some("lib"));
        assert_eq!(repos(levels.slot(0)), ["lib"]);
        assert_eq!(repos(levels.slot(1)), ["lib", "app"]);
    }

    #[test]
    fn test_filter_without_match_yields_one_empty_level() {
        let levels = organize_by_levels_filtered(&wide_tree(), None, Some("missing"));
        assert_eq!(levels.len(), 1);
        assert_eq!(levels.total_jobs(), 0);
    }

    #[test]
    fn test_filter_never_matches_job_without_repo() {
        let tree = jobs(json!([{"image": "anon", "dependent_jobs": [{"repo": "", "image": "x"}]}]));
        let levels = organize_by_levels_filtered(&tree, None, Some(""));

        assert!(levels.slot(0).is_empty());
        assert_eq!(levels.slot(1)[0].image(), Some("x"));
    }

    #[test]
    fn test_no_filter_matches_unfiltered_form() {
        let tree = wide_tree();
        assert_eq!(
            organize_by_levels_filtered(&tree, Some("t"), None),
            organize_by_levels(&tree, Some("t"))
        );
    }

    #[test]
    fn test_derive_base_image() {
        assert_eq!(derive_base_image("ghcr.io/org/app", None), "ghcr.io_org_app");
        assert_eq!(derive_base_image("app", Some("nightly")), "app--nightly");
        assert_eq!(derive_base_image("a/b", Some("")), "a_b");
    }
}
