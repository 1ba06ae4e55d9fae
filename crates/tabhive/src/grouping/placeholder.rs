//! Blank and new-tab pages never take part in grouping.

use crate::types::Tab;

const PLACEHOLDER_TITLES: &[&str] = &["new tab", "new tab page", "untitled"];

const PLACEHOLDER_URL_PREFIXES: &[&str] = &[
    "chrome://newtab",
    "chrome://new-tab-page",
    "edge://newtab",
    "about:blank",
    "about:newtab",
];

pub fn is_placeholder(tab: &Tab) -> bool {
    let title = tab.title.trim().to_lowercase();
    if title.is_empty() || PLACEHOLDER_TITLES.contains(&title.as_str()) {
        return true;
    }
    let url = tab.url.trim().to_lowercase();
    PLACEHOLDER_URL_PREFIXES.iter().any(|p| url.starts_with(p))
}

/// Eligible tabs in input order, and how many placeholders were dropped.
pub fn eligible_tabs(tabs: &[Tab]) -> (Vec<Tab>, usize) {
    let eligible: Vec<Tab> = tabs.iter().filter(|t| !is_placeholder(t)).cloned().collect();
    let skipped = tabs.len() - eligible.len();
    (eligible, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_patterns() {
        assert!(is_placeholder(&Tab::new("1", "", "https://example.com")));
        assert!(is_placeholder(&Tab::new("2", "   ", "https://example.com")));
        assert!(is_placeholder(&Tab::new("3", "New Tab", "chrome://newtab/")));
        assert!(is_placeholder(&Tab::new("4", "Start", "edge://newtab")));
        assert!(is_placeholder(&Tab::new("5", "Blank", "about:blank")));
        assert!(!is_placeholder(&Tab::new("6", "New tab features in Rust", "https://blog.rust-lang.org")));
        assert!(!is_placeholder(&Tab::new("7", "Docs", "")));
    }

    #[test]
    fn test_eligible_keeps_order() {
        let tabs = vec![
            Tab::new("a", "Alpha", "https://a.com"),
            Tab::new("b", "New Tab", "chrome://newtab"),
            Tab::new("c", "Gamma", "https://c.com"),
        ];
        let (eligible, skipped) = eligible_tabs(&tabs);
        assert_eq!(skipped, 1);
        assert_eq!(eligible.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
    }
}
