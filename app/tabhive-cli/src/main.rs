//! TabHive command-line host.
//!
//! Reads a tab snapshot, applies stored preferences, runs one organize pass
//! and prints the groups a browser would create.

mod cli;
mod preferences;
mod sources;

use anyhow::{Context, Result};
use clap::Parser;

use tabhive::{organize, ErrorKind, GroupingConfig, GroupingEngine, GroupingError, OrganizeOptions};

use crate::cli::Cli;
use crate::preferences::{PreferenceStore, Preferences};
use crate::sources::{JsonTabSource, PrintSink};

/// Command-line values win over stored preferences.
fn effective_options(cli: &Cli, prefs: &Preferences) -> OrganizeOptions {
    OrganizeOptions {
        labels: cli.labels.clone().or_else(|| prefs.active_labels()),
        preferred_count: cli.groups.or(prefs.preferred_group_count),
        exact_count: cli.exact || prefs.exact_group_count,
        collapse: prefs.collapse_groups,
    }
}

fn updated_preferences(prefs: &Preferences, options: &OrganizeOptions) -> Preferences {
    let mut updated = prefs.clone();
    if let Some(labels) = &options.labels {
        updated.use_custom_groups = true;
        updated.custom_groups = labels.clone();
    }
    updated.preferred_group_count = options.preferred_count;
    updated.exact_group_count = options.exact_count;
    updated
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GroupingConfig::from_file(path).map_err(anyhow::Error::msg)?,
        None => GroupingConfig::default(),
    };
    let engine = GroupingEngine::new(config).context("Failed to initialize grouping engine")?;

    let store = PreferenceStore::new(cli.prefs.clone().unwrap_or_else(PreferenceStore::default_path));
    let prefs = store.load()?;
    let options = effective_options(&cli, &prefs);

    let source = JsonTabSource::new(cli.tabs_path());
    let sink = PrintSink::new(cli.json);

    let report = match organize(&engine, &source, &sink, &options).await {
        Ok(report) => report,
        Err(err) => {
            if let Some(grouping) = err.downcast_ref::<GroupingError>() {
                if grouping.kind() == ErrorKind::InsufficientInput {
                    eprintln!("Nothing to organize: {}", grouping);
                    return Ok(());
                }
            }
            return Err(err);
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Created {} groups from {} tabs ({} already grouped)",
            report.groups_created, report.tabs_grouped, report.skipped_already_grouped
        );
    }

    if cli.save_prefs {
        store.save(&updated_preferences(&prefs, &options))?;
        tracing::info!(path = %store.path().display(), "Preferences updated");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_preferences() {
        let prefs = Preferences {
            use_custom_groups: true,
            preferred_group_count: Some(2),
            ..Default::default()
        };
        let cli = Cli::parse_from(["tabhive", "--groups", "4"]);
        let options = effective_options(&cli, &prefs);
        assert_eq!(options.preferred_count, Some(4));
        assert_eq!(
            options.labels,
            Some(vec!["Work".to_string(), "Personal".to_string(), "Research".to_string()])
        );
        assert!(options.collapse);

        let cli = Cli::parse_from(["tabhive", "--labels", "School"]);
        let options = effective_options(&cli, &prefs);
        assert_eq!(options.labels, Some(vec!["School".to_string()]));
        assert_eq!(options.preferred_count, Some(2));
    }

    #[test]
    fn test_save_prefs_records_labels() {
        let prefs = Preferences::default();
        let options = OrganizeOptions {
            labels: Some(vec!["School".into()]),
            preferred_count: Some(3),
            exact_count: true,
            collapse: true,
        };
        let updated = updated_preferences(&prefs, &options);
        assert!(updated.use_custom_groups);
        assert_eq!(updated.custom_groups, vec!["School"]);
        assert_eq!(updated.preferred_group_count, Some(3));
        assert!(updated.exact_group_count);
    }
}
