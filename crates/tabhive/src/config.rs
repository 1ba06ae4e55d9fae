use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::course_code::DEFAULT_CATALOG;
use crate::subject::{default_subjects, SubjectSpec};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    pub features: FeatureConfig,
    pub clustering: ClusteringConfig,
    pub labeling: LabelingConfig,
    pub auto: AutoConfig,
    pub catalog: CatalogConfig,
    pub subjects: Vec<SubjectSpec>,
    /// Entries kept by the per-invocation course-code memo.
    pub memo_capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureMode {
    TfIdf,
    LetterFrequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub mode: FeatureMode,
    pub min_token_len: usize,
    /// Weight of each domain-signal flag appended to TF-IDF vectors.
    pub flag_weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub min_k: usize,
    pub max_k: usize,
    pub max_iterations: usize,
    pub seeds: Vec<u64>,
    /// Auto-mode clusters whose mean pairwise cosine falls below this are
    /// pooled into "misc".
    pub coherence_floor: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    pub attempts: usize,
    pub confidence_threshold: f32,
    pub title_weight: f32,
    pub url_weight: f32,
    pub domain_bonus: f32,
    pub subject_weight: f32,
    pub min_subject_similarity: f32,
    /// Half-width of the random score perturbation on the first attempt.
    pub perturbation: f32,
    pub empty_group_penalty: f32,
    pub max_labels: usize,
    pub seed: u64,
}

/// A named step of auto mode. Stages run in the configured order, each
/// consuming the tabs earlier stages left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoStage {
    CourseCodes,
    DomainAffinity,
    Clustering,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoConfig {
    pub stages: Vec<AutoStage>,
    pub min_domain_group_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Known course codes, e.g. "CS 136" or "MATH118".
    pub codes: Vec<String>,
}

impl GroupingConfig {
    /// Validate config values, returning errors for clearly broken configurations.
    pub fn validate(&self) -> Result<(), String> {
        if self.features.min_token_len == 0 {
            return Err("features.min_token_len must be > 0".into());
        }
        if !self.features.flag_weight.is_finite() || self.features.flag_weight < 0.0 {
            return Err("features.flag_weight must be >= 0.0".into());
        }

        let clustering = &self.clustering;
        if clustering.min_k == 0 {
            return Err("clustering.min_k must be > 0".into());
        }
        if clustering.max_k < clustering.min_k {
            return Err("clustering.max_k must be >= min_k".into());
        }
        if clustering.max_iterations == 0 {
            return Err("clustering.max_iterations must be > 0".into());
        }
        if clustering.seeds.is_empty() {
            return Err("clustering.seeds must not be empty".into());
        }
        let distinct: HashSet<_> = clustering.seeds.iter().collect();
        if distinct.len() != clustering.seeds.len() {
            return Err("clustering.seeds must be distinct".into());
        }
        if !(-1.0..=1.0).contains(&clustering.coherence_floor) {
            return Err("clustering.coherence_floor must be in [-1.0, 1.0]".into());
        }

        let labeling = &self.labeling;
        if labeling.attempts == 0 {
            return Err("labeling.attempts must be > 0".into());
        }
        if !labeling.confidence_threshold.is_finite() || labeling.confidence_threshold < 0.0 {
            return Err("labeling.confidence_threshold must be >= 0.0".into());
        }
        if !(0.0..=1.0).contains(&labeling.min_subject_similarity) {
            return Err("labeling.min_subject_similarity must be in [0.0, 1.0]".into());
        }
        let weights = [
            ("title_weight", labeling.title_weight),
            ("url_weight", labeling.url_weight),
            ("domain_bonus", labeling.domain_bonus),
            ("subject_weight", labeling.subject_weight),
            ("perturbation", labeling.perturbation),
            ("empty_group_penalty", labeling.empty_group_penalty),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("labeling.{} must be >= 0.0", name));
            }
        }
        if labeling.max_labels == 0 {
            return Err("labeling.max_labels must be > 0".into());
        }

        if self.auto.stages.is_empty() {
            return Err("auto.stages must not be empty".into());
        }
        if self.auto.min_domain_group_size < 2 {
            return Err("auto.min_domain_group_size must be >= 2".into());
        }
        if self.subjects.is_empty() {
            return Err("subjects must not be empty".into());
        }
        if self.memo_capacity == 0 {
            return Err("memo_capacity must be > 0".into());
        }
        Ok(())
    }

    /// Load config from a JSON file, falling back to defaults for missing fields.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            features: FeatureConfig::default(),
            clustering: ClusteringConfig::default(),
            labeling: LabelingConfig::default(),
            auto: AutoConfig::default(),
            catalog: CatalogConfig::default(),
            subjects: default_subjects(),
            memo_capacity: 512,
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            mode: FeatureMode::TfIdf,
            min_token_len: 3,
            flag_weight: 0.5,
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_k: 2,
            max_k: 8,
            max_iterations: 100,
            seeds: vec![42, 1337, 2024],
            coherence_floor: 0.05,
        }
    }
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            confidence_threshold: 0.5,
            title_weight: 3.0,
            url_weight: 2.0,
            domain_bonus: 1.0,
            subject_weight: 2.0,
            min_subject_similarity: 0.1,
            perturbation: 0.25,
            empty_group_penalty: 10.0,
            max_labels: 5,
            seed: 7,
        }
    }
}

impl Default for AutoConfig {
    fn default() -> Self {
        Self {
            stages: vec![
                AutoStage::CourseCodes,
                AutoStage::DomainAffinity,
                AutoStage::Clustering,
            ],
            min_domain_group_size: 3,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            codes: DEFAULT_CATALOG.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GroupingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_broken_values() {
        let mut config = GroupingConfig::default();
        config.clustering.max_k = 1;
        assert!(config.validate().unwrap_err().contains("max_k"));

        let mut config = GroupingConfig::default();
        config.clustering.seeds = vec![1, 1];
        assert!(config.validate().unwrap_err().contains("distinct"));

        let mut config = GroupingConfig::default();
        config.labeling.attempts = 0;
        assert!(config.validate().is_err());

        let mut config = GroupingConfig::default();
        config.auto.stages.clear();
        assert!(config.validate().is_err());

        let mut config = GroupingConfig::default();
        config.labeling.perturbation = -1.0;
        assert!(config.validate().unwrap_err().contains("perturbation"));

        let mut config = GroupingConfig::default();
        config.memo_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GroupingConfig =
            serde_json::from_str(r#"{"clustering": {"max_k": 4}, "auto": {"stages": ["clustering"]}}"#).unwrap();
        assert_eq!(config.clustering.max_k, 4);
        assert_eq!(config.clustering.min_k, 2);
        assert_eq!(config.auto.stages, vec![AutoStage::Clustering]);
        assert_eq!(config.labeling.attempts, 5);
        assert_eq!(config.subjects.len(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"features": {"mode": "letter_frequency"}}"#).unwrap();

        let config = GroupingConfig::from_file(&path).unwrap();
        assert_eq!(config.features.mode, FeatureMode::LetterFrequency);

        std::fs::write(&path, r#"{"clustering": {"min_k": 0}}"#).unwrap();
        assert!(GroupingConfig::from_file(&path).is_err());
        assert!(GroupingConfig::from_file(&dir.path().join("missing.json")).is_err());
    }
}
