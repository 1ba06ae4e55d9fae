//! The grouping pipeline: request validation, mode selection and the stages
//! shared between modes.

pub mod auto;
pub mod domains;
pub mod exact;
pub mod labeled;
pub mod placeholder;
pub mod quality;
pub mod rebalance;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::clustering::ClusteringEngine;
use crate::config::{FeatureMode, GroupingConfig};
use crate::course_code::DetectionSession;
use crate::embeddings::{FeatureExtractor, FeatureVector, LetterFrequency, TfIdf};
use crate::error::GroupingError;
use crate::processing::tab_text;
use crate::subject::CategoryTable;
use crate::types::{Group, GroupOrigin, Tab};

pub use placeholder::{eligible_tabs, is_placeholder};

/// One batch of tabs plus the caller's grouping preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupingRequest {
    pub tabs: Vec<Tab>,
    /// Target labels for label mode (and slot names in exact-count mode).
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub exact_count: bool,
    #[serde(default)]
    pub preferred_count: Option<usize>,
}

impl GroupingRequest {
    pub fn new(tabs: Vec<Tab>) -> Self {
        Self {
            tabs,
            ..Default::default()
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_preferred_count(mut self, count: usize) -> Self {
        self.preferred_count = Some(count);
        self
    }

    pub fn with_exact_count(mut self, count: usize) -> Self {
        self.preferred_count = Some(count);
        self.exact_count = true;
        self
    }

    /// Resolve which mode this request runs in, validating its parameters.
    pub fn mode(&self, max_labels: usize) -> Result<GroupingMode, GroupingError> {
        if self.preferred_count == Some(0) {
            return Err(GroupingError::InvalidGroupCount(
                "group count must be at least 1".to_string(),
            ));
        }

        let labels = match &self.labels {
            Some(raw) => Some(clean_labels(raw, max_labels)?),
            None => None,
        };

        if self.exact_count {
            let count = self.preferred_count.ok_or_else(|| {
                GroupingError::InvalidGroupCount(
                    "an exact group count was requested without a count".to_string(),
                )
            })?;
            return Ok(GroupingMode::ExactCount { count, labels });
        }

        Ok(match labels {
            Some(labels) => GroupingMode::Labeled { labels },
            None => GroupingMode::Auto {
                preferred_count: self.preferred_count,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupingMode {
    Auto { preferred_count: Option<usize> },
    Labeled { labels: Vec<String> },
    ExactCount { count: usize, labels: Option<Vec<String>> },
}

impl GroupingMode {
    pub fn name(&self) -> &'static str {
        match self {
            GroupingMode::Auto { .. } => "auto",
            GroupingMode::Labeled { .. } => "labeled",
            GroupingMode::ExactCount { .. } => "exact_count",
        }
    }
}

/// Trim labels, drop blanks and case-insensitive duplicates.
pub fn clean_labels(raw: &[String], max_labels: usize) -> Result<Vec<String>, GroupingError> {
    let mut seen = HashSet::new();
    let labels: Vec<String> = raw
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .filter(|l| seen.insert(l.to_lowercase()))
        .map(|l| l.to_string())
        .collect();

    if labels.is_empty() {
        return Err(GroupingError::InvalidLabels(
            "at least one non-blank label is required".to_string(),
        ));
    }
    if labels.len() > max_labels {
        return Err(GroupingError::InvalidLabels(format!(
            "at most {} labels are allowed, got {}",
            max_labels,
            labels.len()
        )));
    }
    Ok(labels)
}

/// Per-invocation state: shared read-only engine parts plus the code memo.
pub struct Invocation<'a> {
    pub config: &'a GroupingConfig,
    pub clustering: &'a ClusteringEngine,
    pub categories: &'a CategoryTable,
    pub codes: DetectionSession<'a>,
}

impl<'a> Invocation<'a> {
    /// Feature vectors for `tabs`, in order, with the configured extractor.
    pub fn embed(&self, tabs: &[Tab]) -> Vec<FeatureVector> {
        let texts: Vec<String> = tabs.iter().map(tab_text).collect();
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        let features = &self.config.features;

        let extractor: Box<dyn FeatureExtractor> = match features.mode {
            FeatureMode::TfIdf => Box::new(TfIdf::fit(
                &texts,
                features.min_token_len,
                features.flag_weight,
            )),
            FeatureMode::LetterFrequency => Box::new(LetterFrequency::new(features.min_token_len)),
        };
        extractor.embed_batch(&texts)
    }

    /// Split `tabs` into one group per detected course code (in order of
    /// first appearance) and the tabs without a code.
    pub fn group_by_course_code(&mut self, tabs: Vec<Tab>) -> (Vec<Group>, Vec<Tab>) {
        let mut groups: Vec<Group> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut residual = Vec::new();

        for tab in tabs {
            match self.codes.detect(&tab.title) {
                Some(code) => {
                    let slot = *index.entry(code.clone()).or_insert_with(|| {
                        groups.push(Group::new(code, GroupOrigin::CourseCode, Vec::new()));
                        groups.len() - 1
                    });
                    groups[slot].tabs.push(tab);
                }
                None => residual.push(tab),
            }
        }

        tracing::debug!(
            code_groups = groups.len(),
            residual = residual.len(),
            "[Grouping] Course code pass"
        );
        (groups, residual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clean_labels() {
        let cleaned = clean_labels(&labels(&[" Work ", "", "work", "Personal", "  "]), 5).unwrap();
        assert_eq!(cleaned, vec!["Work", "Personal"]);
    }

    #[test]
    fn test_blank_labels_rejected() {
        let err = clean_labels(&labels(&["", "   "]), 5).unwrap_err();
        assert!(matches!(err, GroupingError::InvalidLabels(_)));
        assert!(clean_labels(&[], 5).is_err());
    }

    #[test]
    fn test_too_many_labels_rejected() {
        let err = clean_labels(&labels(&["a", "b", "c"]), 2).unwrap_err();
        assert!(err.to_string().contains("at most 2"));
    }

    #[test]
    fn test_mode_selection() {
        let base = GroupingRequest::new(vec![]);
        assert_eq!(base.mode(5).unwrap(), GroupingMode::Auto { preferred_count: None });

        let labeled = base.clone().with_labels(["Work"]);
        assert_eq!(labeled.mode(5).unwrap().name(), "labeled");

        let exact = base.clone().with_labels(["Work"]).with_exact_count(3);
        assert_eq!(
            exact.mode(5).unwrap(),
            GroupingMode::ExactCount {
                count: 3,
                labels: Some(vec!["Work".to_string()])
            }
        );

        let preferred = base.clone().with_preferred_count(4);
        assert_eq!(preferred.mode(5).unwrap(), GroupingMode::Auto { preferred_count: Some(4) });
    }

    #[test]
    fn test_invalid_counts() {
        let mut request = GroupingRequest::new(vec![]);
        request.exact_count = true;
        assert!(matches!(request.mode(5), Err(GroupingError::InvalidGroupCount(_))));

        let zero = GroupingRequest::new(vec![]).with_exact_count(0);
        assert!(matches!(zero.mode(5), Err(GroupingError::InvalidGroupCount(_))));
    }

    #[test]
    fn test_labels_validated_in_every_mode() {
        let request = GroupingRequest::new(vec![]).with_labels([" "]).with_exact_count(2);
        assert!(matches!(request.mode(5), Err(GroupingError::InvalidLabels(_))));
    }
}
