//! User preferences persisted between runs.
//!
//! JSON file, read before an organize pass and written after it on request.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on stored custom labels; matches the engine's default.
pub const MAX_CUSTOM_GROUPS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub use_custom_groups: bool,
    pub custom_groups: Vec<String>,
    pub collapse_groups: bool,
    pub preferred_group_count: Option<usize>,
    pub exact_group_count: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            use_custom_groups: false,
            custom_groups: vec!["Work".into(), "Personal".into(), "Research".into()],
            collapse_groups: true,
            preferred_group_count: None,
            exact_group_count: false,
        }
    }
}

impl Preferences {
    /// Labels to request, if custom groups are switched on.
    pub fn active_labels(&self) -> Option<Vec<String>> {
        self.use_custom_groups.then(|| self.custom_groups.clone())
    }
}

pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<local data dir>/tabhive/preferences.json`
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tabhive")
            .join("preferences.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored preferences, or defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences from {}", self.path.display()))?;
        let prefs = serde_json::from_str(&data).context("Failed to parse preferences")?;
        Ok(prefs)
    }

    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }
        let mut prefs = prefs.clone();
        prefs.custom_groups.truncate(MAX_CUSTOM_GROUPS);

        let data = serde_json::to_string_pretty(&prefs).context("Failed to serialize preferences")?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("prefs.json"));
        let prefs = store.load().unwrap();
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.custom_groups, vec!["Work", "Personal", "Research"]);
        assert!(prefs.collapse_groups);
        assert_eq!(prefs.active_labels(), None);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("nested").join("prefs.json"));
        let prefs = Preferences {
            use_custom_groups: true,
            custom_groups: (1..=7).map(|i| format!("Label {}", i)).collect(),
            preferred_group_count: Some(4),
            ..Default::default()
        };
        store.save(&prefs).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.custom_groups.len(), MAX_CUSTOM_GROUPS);
        assert_eq!(loaded.preferred_group_count, Some(4));
        assert_eq!(loaded.active_labels().map(|l| l.len()), Some(MAX_CUSTOM_GROUPS));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"exactGroupCount": true}"#).unwrap();
        let prefs = PreferenceStore::new(path).load().unwrap();
        assert!(prefs.exact_group_count);
        assert!(prefs.collapse_groups);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(PreferenceStore::new(path).load().is_err());
    }
}
