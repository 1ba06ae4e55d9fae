//! File/stdin tab source and a printing group sink.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use tabhive::{GroupMaterialization, Tab, TabGroupSink, TabSnapshot, TabSource};

/// Accepted input shapes: a full snapshot or a bare list of tabs.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Snapshot(TabSnapshot),
    Tabs(Vec<Tab>),
}

pub fn parse_snapshot(data: &str) -> Result<TabSnapshot> {
    let parsed: SnapshotFile = serde_json::from_str(data).context("Failed to parse tab list")?;
    Ok(match parsed {
        SnapshotFile::Snapshot(snapshot) => snapshot,
        SnapshotFile::Tabs(tabs) => TabSnapshot {
            tabs,
            ..Default::default()
        },
    })
}

/// Reads a JSON tab list from a file, or from stdin when no path is given.
pub struct JsonTabSource {
    path: Option<PathBuf>,
}

impl JsonTabSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl TabSource for JsonTabSource {
    async fn snapshot(&self) -> Result<TabSnapshot> {
        let data = match &self.path {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => {
                let mut buf = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buf)
                    .await
                    .context("Failed to read tabs from stdin")?;
                buf
            }
        };
        parse_snapshot(&data)
    }
}

/// One line per group: `[color] name (n tabs): ids`.
pub fn render_group(group: &GroupMaterialization) -> String {
    format!(
        "[{}] {}{} ({} tabs): {}",
        group.color.as_str(),
        group.display_name,
        if group.collapsed { " (collapsed)" } else { "" },
        group.tab_ids.len(),
        group.tab_ids.join(", ")
    )
}

/// Prints each group as it is "created". Quiet mode prints nothing; the
/// caller reports from the organize result instead.
pub struct PrintSink {
    quiet: bool,
}

impl PrintSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

#[async_trait]
impl TabGroupSink for PrintSink {
    async fn materialize(&self, group: GroupMaterialization) -> Result<()> {
        if !self.quiet {
            println!("{}", render_group(&group));
        }
        Ok(())
    }
}
