//! Host boundary: where tabs come from and where groups go.
//!
//! The engine itself never performs I/O. A host supplies a [`TabSource`] and
//! a [`TabGroupSink`] and drives one organize pass with [`organize`].
//! Concurrent passes against the same browser window are not coordinated
//! here; hosts serialize them.

use std::collections::HashSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::engine::GroupingEngine;
use crate::grouping::GroupingRequest;
use crate::types::Tab;

/// Tab-group colors offered by browsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Cyan,
    Pink,
    Orange,
    Grey,
}

impl GroupColor {
    pub const PALETTE: [GroupColor; 9] = [
        GroupColor::Blue,
        GroupColor::Green,
        GroupColor::Red,
        GroupColor::Yellow,
        GroupColor::Purple,
        GroupColor::Cyan,
        GroupColor::Pink,
        GroupColor::Orange,
        GroupColor::Grey,
    ];

    /// Color for a group name, fixed across runs and toolchains: the first
    /// eight bytes of the name's SHA-256, big-endian, modulo the palette.
    pub fn for_name(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        let index = u64::from_be_bytes(prefix) % Self::PALETTE.len() as u64;
        Self::PALETTE[index as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupColor::Blue => "blue",
            GroupColor::Green => "green",
            GroupColor::Red => "red",
            GroupColor::Yellow => "yellow",
            GroupColor::Purple => "purple",
            GroupColor::Cyan => "cyan",
            GroupColor::Pink => "pink",
            GroupColor::Orange => "orange",
            GroupColor::Grey => "grey",
        }
    }
}

/// Current tabs plus the ids of tabs that already sit in a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub grouped_tab_ids: HashSet<String>,
}

/// Everything a host needs to create one tab group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMaterialization {
    pub display_name: String,
    pub color: GroupColor,
    pub tab_ids: Vec<String>,
    pub collapsed: bool,
}

#[async_trait]
pub trait TabSource: Send + Sync {
    async fn snapshot(&self) -> Result<TabSnapshot>;
}

#[async_trait]
pub trait TabGroupSink: Send + Sync {
    async fn materialize(&self, group: GroupMaterialization) -> Result<()>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeOptions {
    pub labels: Option<Vec<String>>,
    pub preferred_count: Option<usize>,
    pub exact_count: bool,
    pub collapse: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeReport {
    pub groups_created: usize,
    pub tabs_grouped: usize,
    pub skipped_already_grouped: usize,
    pub groups: Vec<GroupMaterialization>,
}

/// Snapshot, group and materialize once.
///
/// Engine failures come back as a [`crate::GroupingError`] inside the
/// `anyhow::Error`, so callers can still branch on its kind.
pub async fn organize(
    engine: &GroupingEngine,
    source: &dyn TabSource,
    sink: &dyn TabGroupSink,
    options: &OrganizeOptions,
) -> Result<OrganizeReport> {
    let snapshot = source.snapshot().await.context("Failed to read tabs")?;

    let total = snapshot.tabs.len();
    let tabs: Vec<Tab> = snapshot
        .tabs
        .into_iter()
        .filter(|t| !snapshot.grouped_tab_ids.contains(&t.id))
        .collect();
    let skipped_already_grouped = total - tabs.len();

    let request = GroupingRequest {
        tabs,
        labels: options.labels.clone(),
        exact_count: options.exact_count,
        preferred_count: options.preferred_count,
    };
    let result = engine.group(&request)?;

    let mut report = OrganizeReport {
        skipped_already_grouped,
        ..Default::default()
    };
    for group in &result.groups {
        let materialization = GroupMaterialization {
            display_name: group.display_name.clone(),
            color: GroupColor::for_name(&group.display_name),
            tab_ids: group.tab_ids(),
            collapsed: options.collapse,
        };
        sink.materialize(materialization.clone())
            .await
            .with_context(|| format!("Failed to create group '{}'", group.display_name))?;

        report.groups_created += 1;
        report.tabs_grouped += group.len();
        report.groups.push(materialization);
    }

    tracing::info!(
        groups = report.groups_created,
        tabs = report.tabs_grouped,
        skipped = skipped_already_grouped,
        "Organized tabs"
    );
    Ok(report)
}
