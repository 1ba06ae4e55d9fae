use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A browser tab as reported by the host. The engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

impl Tab {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Where a group came from. Decides whether the Group Namer runs on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrigin {
    /// Keyed by a detected course code, e.g. "CS 136".
    CourseCode,
    /// One of the caller's target labels.
    Label,
    /// Residual tabs sharing one host.
    Domain,
    /// A k-means cluster or a forced-count slot.
    Cluster,
    /// Leftover tabs that did not form a coherent cluster.
    Misc,
    /// Groups built from tabs no label claimed.
    Supplementary,
    /// Fixed catch-all names ("Other", "Other Courses").
    CatchAll,
}

impl GroupOrigin {
    /// Course codes, labels and catch-alls already carry a meaningful name.
    pub fn needs_generated_name(&self) -> bool {
        matches!(
            self,
            GroupOrigin::Domain | GroupOrigin::Cluster | GroupOrigin::Misc | GroupOrigin::Supplementary
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub key: String,
    pub display_name: String,
    pub origin: GroupOrigin,
    pub tabs: Vec<Tab>,
}

impl Group {
    /// New group whose display name defaults to its key.
    pub fn new(key: impl Into<String>, origin: GroupOrigin, tabs: Vec<Tab>) -> Self {
        let key = key.into();
        Self {
            display_name: key.clone(),
            key,
            origin,
            tabs,
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab_ids(&self) -> Vec<String> {
        self.tabs.iter().map(|t| t.id.clone()).collect()
    }
}

/// The complete partition produced by one invocation, in output order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupingResult {
    pub groups: Vec<Group>,
}

impl GroupingResult {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.key.as_str()).collect()
    }

    /// Group key to member tabs.
    pub fn tabs_by_key(&self) -> HashMap<String, Vec<Tab>> {
        self.groups
            .iter()
            .map(|g| (g.key.clone(), g.tabs.clone()))
            .collect()
    }

    /// Group key to display name.
    pub fn display_names(&self) -> HashMap<String, String> {
        self.groups
            .iter()
            .map(|g| (g.key.clone(), g.display_name.clone()))
            .collect()
    }

    pub fn tab_count(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }
}
