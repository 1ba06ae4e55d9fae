//! CLI definitions for TabHive.

use std::path::PathBuf;

use clap::Parser;

/// Group browser tabs into named tab groups.
#[derive(Parser, Debug)]
#[command(name = "tabhive")]
#[command(about = "Organize open browser tabs into named groups")]
#[command(version)]
pub(crate) struct Cli {
    /// JSON tab list or snapshot; "-" reads stdin
    #[arg(short, long, default_value = "-")]
    pub tabs: String,

    /// Comma-separated group labels (overrides stored custom groups)
    #[arg(short, long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// Preferred number of groups
    #[arg(short, long)]
    pub groups: Option<usize>,

    /// Produce exactly --groups groups
    #[arg(long)]
    pub exact: bool,

    /// Grouping config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preferences file
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    /// Store the effective labels and counts as the new preferences
    #[arg(long)]
    pub save_prefs: bool,

    /// Print the report as JSON instead of one line per group
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// `None` means stdin.
    pub fn tabs_path(&self) -> Option<PathBuf> {
        (self.tabs != "-").then(|| PathBuf::from(&self.tabs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "tabhive", "--tabs", "tabs.json", "--labels", "Work,Personal", "--groups", "3", "--exact",
        ]);
        assert_eq!(cli.tabs_path(), Some(PathBuf::from("tabs.json")));
        assert_eq!(cli.labels, Some(vec!["Work".to_string(), "Personal".to_string()]));
        assert_eq!(cli.groups, Some(3));
        assert!(cli.exact);
        assert!(!cli.json);
    }

    #[test]
    fn test_defaults_read_stdin() {
        let cli = Cli::parse_from(["tabhive"]);
        assert_eq!(cli.tabs_path(), None);
        assert!(cli.labels.is_none());
    }
}
