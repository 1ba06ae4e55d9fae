use std::collections::HashMap;

use crate::clustering::ClusteringEngine;
use crate::config::GroupingConfig;
use crate::course_code::CourseCodeDetector;
use crate::error::GroupingError;
use crate::grouping::{auto, eligible_tabs, exact, labeled, GroupingMode, GroupingRequest, Invocation};
use crate::naming::name_group;
use crate::subject::CategoryTable;
use crate::types::{Group, GroupingResult};

/// Minimum number of eligible tabs worth organizing.
pub const MIN_ELIGIBLE_TABS: usize = 2;

/// Tab-grouping engine.
///
/// Holds only read-only state built at construction (compiled course-code
/// patterns, the subject category table), so one engine can serve any
/// number of invocations, including concurrent ones.
pub struct GroupingEngine {
    config: GroupingConfig,
    detector: CourseCodeDetector,
    categories: CategoryTable,
    clustering: ClusteringEngine,
}

impl GroupingEngine {
    pub fn new(config: GroupingConfig) -> Result<Self, GroupingError> {
        config.validate().map_err(GroupingError::InvalidConfig)?;

        let detector = CourseCodeDetector::new(&config.catalog.codes)?;
        let categories = CategoryTable::build(&config.subjects, config.features.min_token_len);
        let clustering = ClusteringEngine::new(config.clustering.clone());

        tracing::info!(
            catalog = config.catalog.codes.len(),
            subjects = config.subjects.len(),
            feature_mode = ?config.features.mode,
            "Grouping engine initialized"
        );

        Ok(Self {
            config,
            detector,
            categories,
            clustering,
        })
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Partition the request's eligible tabs into named groups.
    ///
    /// Validation runs before any clustering work; the result is built
    /// completely before it is returned.
    pub fn group(&self, request: &GroupingRequest) -> Result<GroupingResult, GroupingError> {
        let mode = request.mode(self.config.labeling.max_labels)?;

        let (tabs, skipped) = eligible_tabs(&request.tabs);
        tracing::debug!(eligible = tabs.len(), placeholders = skipped, "[Grouping] Placeholder filter");
        if tabs.len() < MIN_ELIGIBLE_TABS {
            return Err(GroupingError::InsufficientInput {
                eligible: tabs.len(),
            });
        }
        let eligible = tabs.len();

        let mut invocation = Invocation {
            config: &self.config,
            clustering: &self.clustering,
            categories: &self.categories,
            codes: self.detector.session(self.config.memo_capacity),
        };

        let groups = match &mode {
            GroupingMode::Auto { preferred_count } => auto::run(&mut invocation, tabs, *preferred_count),
            GroupingMode::Labeled { labels } => labeled::run(&invocation, tabs, labels),
            GroupingMode::ExactCount { count, labels } => {
                exact::run(&mut invocation, tabs, *count, labels.as_deref())
            }
        };

        let result = finalize(groups);
        tracing::info!(
            mode = mode.name(),
            tabs = eligible,
            groups = result.len(),
            "Tabs grouped"
        );
        Ok(result)
    }
}

/// Drop empty groups, merge accidental key collisions between groups of the
/// same origin, and name every group that needs a generated name.
///
/// Groups of different origins never merge; a later one whose key is taken
/// gets a numeric suffix instead, so no pass can shrink another's count.
fn finalize(groups: Vec<Group>) -> GroupingResult {
    let mut merged: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for mut group in groups.into_iter().filter(|g| !g.is_empty()) {
        if let Some(&i) = index.get(&group.key) {
            if merged[i].origin == group.origin {
                merged[i].tabs.extend(group.tabs);
                continue;
            }
            let key = unused_key(&index, &group.key);
            tracing::debug!(key = %group.key, renamed = %key, "[Grouping] Key taken by another pass");
            if group.display_name == group.key {
                group.display_name = key.clone();
            }
            group.key = key;
        }
        index.insert(group.key.clone(), merged.len());
        merged.push(group);
    }

    for group in &mut merged {
        if group.origin.needs_generated_name() {
            group.display_name = name_group(&group.tabs);
        }
    }
    GroupingResult::new(merged)
}

fn unused_key(index: &HashMap<String, usize>, key: &str) -> String {
    (2..)
        .map(|n| format!("{} ({})", key, n))
        .find(|candidate| !index.contains_key(candidate))
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupOrigin, Tab};

    fn engine() -> GroupingEngine {
        GroupingEngine::new(GroupingConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GroupingConfig::default();
        config.clustering.min_k = 0;
        let err = GroupingEngine::new(config).err().unwrap();
        assert!(matches!(err, GroupingError::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_catalog_rejected() {
        let mut config = GroupingConfig::default();
        config.catalog.codes = vec!["???".to_string()];
        assert!(GroupingEngine::new(config).is_err());
    }

    #[test]
    fn test_placeholders_do_not_count() {
        let request = GroupingRequest::new(vec![
            Tab::new("1", "Rust book", "https://doc.rust-lang.org/book"),
            Tab::new("2", "New Tab", "chrome://newtab"),
            Tab::new("3", "", "https://example.com"),
        ]);
        let err = engine().group(&request).unwrap_err();
        assert_eq!(err, GroupingError::InsufficientInput { eligible: 1 });
    }

    #[test]
    fn test_labels_validated_before_eligibility() {
        let request = GroupingRequest::new(vec![]).with_labels(["  "]);
        assert!(matches!(engine().group(&request), Err(GroupingError::InvalidLabels(_))));
    }

    #[test]
    fn test_finalize_drops_empty_and_merges_duplicates() {
        let groups = vec![
            Group::new("a", GroupOrigin::Label, vec![Tab::new("1", "One", "https://a.com")]),
            Group::new("b", GroupOrigin::Label, vec![]),
            Group::new("a", GroupOrigin::Label, vec![Tab::new("2", "Two", "https://b.com")]),
        ];
        let result = finalize(groups);
        assert_eq!(result.keys(), vec!["a"]);
        assert_eq!(result.tab_count(), 2);
        assert_eq!(result.groups[0].display_name, "a");
    }

    #[test]
    fn test_finalize_keeps_colliding_origins_apart() {
        let groups = vec![
            Group::new("CS 136", GroupOrigin::CourseCode, vec![Tab::new("1", "CS 136 notes", "https://a.com")]),
            Group::new("CS 136", GroupOrigin::Label, vec![Tab::new("2", "Recipes", "https://b.com")]),
        ];
        let result = finalize(groups);
        assert_eq!(result.keys(), vec!["CS 136", "CS 136 (2)"]);
        assert_eq!(result.groups[1].display_name, "CS 136 (2)");
        assert_eq!(result.tab_count(), 2);
    }

    #[test]
    fn test_finalize_names_generated_groups() {
        let groups = vec![Group::new(
            "cluster_1",
            GroupOrigin::Cluster,
            vec![
                Tab::new("1", "Issue tracker", "https://github.com/a/b/issues"),
                Tab::new("2", "Pull requests", "https://github.com/a/b/pulls"),
            ],
        )];
        let result = finalize(groups);
        assert_eq!(result.groups[0].display_name, "GitHub: a/b");
    }
}
