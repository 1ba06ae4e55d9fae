//! Display names for groups that have no natural name of their own.

use std::collections::HashMap;

use crate::processing::{capitalize, parse_link, registrable_domain, significant_words, site_stem};
use crate::types::Tab;

/// Last-resort name; never empty.
pub const FALLBACK_NAME: &str = "Quick Access";

const PRETTY_DOMAINS: &[(&str, &str)] = &[
    ("github.com", "GitHub"),
    ("gitlab.com", "GitLab"),
    ("bitbucket.org", "Bitbucket"),
    ("stackoverflow.com", "Stack Overflow"),
    ("mail.google.com", "Gmail"),
    ("drive.google.com", "Google Drive"),
    ("docs.google.com", "Google Docs"),
    ("google.com", "Google Search"),
    ("youtube.com", "YouTube"),
    ("netflix.com", "Netflix"),
    ("amazon.com", "Amazon"),
    ("reddit.com", "Reddit"),
    ("twitter.com", "Twitter"),
    ("x.com", "X"),
    ("facebook.com", "Facebook"),
    ("linkedin.com", "LinkedIn"),
    ("instagram.com", "Instagram"),
    ("en.wikipedia.org", "Wikipedia"),
];

/// Hosts whose first path segments are owner / repository.
const CODE_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

/// Hosts where the shared title keyword says more than the path.
const KEYWORD_HOSTS: &[&str] = &[
    "youtube.com",
    "google.com",
    "bing.com",
    "duckduckgo.com",
    "netflix.com",
    "twitch.tv",
];

pub fn pretty_domain(host: &str) -> Option<&'static str> {
    PRETTY_DOMAINS
        .iter()
        .find(|(domain, _)| *domain == host)
        .map(|(_, name)| *name)
}

/// Word frequencies in first-seen order.
struct WordCounter {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl WordCounter {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    fn add(&mut self, word: String) {
        let count = self.counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            self.order.push(word);
        }
        *count += 1;
    }

    /// Words by descending count; equal counts keep first-seen order.
    fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .order
            .iter()
            .map(|w| (w.as_str(), self.counts[w]))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Derive a display name from a group's tabs.
pub fn name_group(tabs: &[Tab]) -> String {
    let links: Vec<_> = tabs.iter().map(|t| parse_link(&t.url)).collect();

    if let Some(Some(first)) = links.first() {
        let shared = links
            .iter()
            .all(|l| l.as_ref().is_some_and(|l| l.host == first.host));
        if shared && !first.host.is_empty() {
            return name_single_site(tabs, &first.host);
        }
    }

    if let Some(name) = name_from_words(tabs) {
        return name;
    }

    name_from_sites(tabs).unwrap_or_else(|| FALLBACK_NAME.to_string())
}

fn site_label(host: &str) -> String {
    if let Some(pretty) = pretty_domain(host) {
        return pretty.to_string();
    }
    let stem = site_stem(host);
    if stem.is_empty() {
        host.to_string()
    } else {
        capitalize(&stem)
    }
}

fn name_single_site(tabs: &[Tab], host: &str) -> String {
    let base = site_label(host);

    let sub_label = if CODE_HOSTS.contains(&host) {
        shared_repository(tabs)
    } else if KEYWORD_HOSTS.contains(&registrable_domain(host).as_str()) {
        shared_title_keyword(tabs)
    } else {
        None
    };

    match sub_label {
        Some(sub) => format!("{}: {}", base, sub),
        None => base,
    }
}

/// `owner/repo` when every tab points into one repository, `owner` when
/// they only share the owner.
fn shared_repository(tabs: &[Tab]) -> Option<String> {
    let paths: Vec<Vec<String>> = tabs
        .iter()
        .map(|t| parse_link(&t.url).map(|l| l.path_segments).unwrap_or_default())
        .collect();

    let owner = paths.first()?.first()?.to_lowercase();
    if !paths
        .iter()
        .all(|p| p.first().is_some_and(|s| s.to_lowercase() == owner))
    {
        return None;
    }

    let repo = paths[0].get(1).map(|r| r.to_lowercase());
    match repo {
        Some(repo)
            if paths
                .iter()
                .all(|p| p.get(1).is_some_and(|s| s.to_lowercase() == repo)) =>
        {
            Some(format!("{}/{}", paths[0][0], paths[0][1]))
        }
        _ => Some(paths[0][0].clone()),
    }
}

fn shared_title_keyword(tabs: &[Tab]) -> Option<String> {
    let mut counter = WordCounter::new();
    for tab in tabs {
        significant_words(&tab.title).into_iter().for_each(|w| counter.add(w));
    }
    counter
        .ranked()
        .first()
        .filter(|(_, count)| *count >= 2)
        .map(|(word, _)| capitalize(word))
}

fn name_from_words(tabs: &[Tab]) -> Option<String> {
    let mut counter = WordCounter::new();
    for tab in tabs {
        significant_words(&tab.title).into_iter().for_each(|w| counter.add(w));
        if let Some(link) = parse_link(&tab.url) {
            for segment in &link.path_segments {
                significant_words(segment).into_iter().for_each(|w| counter.add(w));
            }
        }
    }

    let ranked = counter.ranked();
    let (top, _) = ranked.first()?;
    match ranked.get(1) {
        Some((second, count)) if *count > 1 => {
            Some(format!("{} & {}", capitalize(top), capitalize(second)))
        }
        _ => Some(capitalize(top)),
    }
}

fn name_from_sites(tabs: &[Tab]) -> Option<String> {
    let mut counter = WordCounter::new();
    for tab in tabs {
        if let Some(link) = parse_link(&tab.url) {
            let stem = site_stem(&link.host);
            if !stem.is_empty() {
                counter.add(stem);
            }
        }
    }

    let ranked = counter.ranked();
    let names: Vec<String> = ranked.iter().take(2).map(|(w, _)| capitalize(w)).collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(" & "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(title: &str, url: &str) -> Tab {
        Tab::new(title, title, url)
    }

    #[test]
    fn test_single_known_domain() {
        let tabs = vec![
            tab("Pull requests", "https://github.com/tokio-rs/tokio/pulls"),
            tab("Issues", "https://github.com/serde-rs/serde/issues"),
        ];
        assert_eq!(name_group(&tabs), "GitHub");
    }

    #[test]
    fn test_code_host_with_shared_repository() {
        let tabs = vec![
            tab("Pull requests", "https://github.com/tokio-rs/tokio/pulls"),
            tab("Issues", "https://github.com/tokio-rs/tokio/issues"),
        ];
        assert_eq!(name_group(&tabs), "GitHub: tokio-rs/tokio");

        let tabs = vec![
            tab("Tokio", "https://github.com/tokio-rs/tokio"),
            tab("Axum", "https://github.com/tokio-rs/axum"),
        ];
        assert_eq!(name_group(&tabs), "GitHub: tokio-rs");
    }

    #[test]
    fn test_video_site_with_shared_keyword() {
        let tabs = vec![
            tab("Lofi beats to study", "https://www.youtube.com/watch?v=1"),
            tab("Lofi jazz radio", "https://www.youtube.com/watch?v=2"),
        ];
        assert_eq!(name_group(&tabs), "YouTube: Lofi");
    }

    #[test]
    fn test_unknown_single_domain_uses_stem() {
        let tabs = vec![
            tab("Ticket 1", "https://tracker.example.co.uk/t/1"),
            tab("Ticket 2", "https://tracker.example.co.uk/t/2"),
        ];
        assert_eq!(name_group(&tabs), "Example");
    }

    #[test]
    fn test_mixed_domains_use_frequent_words() {
        let tabs = vec![
            tab("Pasta recipe with garlic", "https://cooking.com/a"),
            tab("Garlic bread recipe", "https://food.net/b"),
            tab("Soup recipe", "https://eat.org/c"),
        ];
        assert_eq!(name_group(&tabs), "Recipe & Garlic");
    }

    #[test]
    fn test_single_word_when_second_is_rare() {
        let tabs = vec![
            tab("Weather today", "https://a.com"),
            tab("Weather tomorrow", "https://b.com"),
        ];
        assert_eq!(name_group(&tabs), "Weather");
    }

    #[test]
    fn test_falls_back_to_sites_then_constant() {
        let tabs = vec![tab("A b", "https://alpha.com"), tab("C d", "https://beta.com")];
        assert_eq!(name_group(&tabs), "Alpha & Beta");

        let tabs = vec![tab("", "not a url"), tab("x", "")];
        assert_eq!(name_group(&tabs), FALLBACK_NAME);
        assert_eq!(name_group(&[]), FALLBACK_NAME);
    }
}
