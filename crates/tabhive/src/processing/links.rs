//! URL helpers. Malformed URLs never fail a batch: they yield an empty host.

use url::Url;

/// Second-level labels that sit under a country TLD (`co.uk`, `ac.jp`, ...).
const SECOND_LEVEL_LABELS: &[&str] = &["co", "com", "ac", "edu", "gov", "org", "net"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    /// Lowercase host without a leading `www.`.
    pub host: String,
    pub path_segments: Vec<String>,
}

pub fn parse_link(raw: &str) -> Option<ParsedLink> {
    let parsed = Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    let path_segments = parsed
        .path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();

    Some(ParsedLink {
        host,
        path_segments,
    })
}

pub fn host_of(raw: &str) -> String {
    parse_link(raw).map(|link| link.host).unwrap_or_default()
}

/// `docs.google.com` -> `google.com`, `news.bbc.co.uk` -> `bbc.co.uk`.
pub fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return labels.join(".");
    }

    let tld = labels[labels.len() - 1];
    let second = labels[labels.len() - 2];
    let keep = if tld.len() == 2 && SECOND_LEVEL_LABELS.contains(&second) {
        3
    } else {
        2
    };
    labels[labels.len() - keep..].join(".")
}

/// The distinctive label of a host: `en.wikipedia.org` -> `wikipedia`.
pub fn site_stem(host: &str) -> String {
    registrable_domain(host)
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Lowercase URL with query and fragment dropped and separators turned into
/// spaces, ready for tokenization.
pub fn url_keywords(raw: &str) -> String {
    let without_fragment = raw.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    without_query
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link_strips_www_and_splits_path() {
        let link = parse_link("https://www.GitHub.com/rust-lang/rust/issues?q=1").unwrap();
        assert_eq!(link.host, "github.com");
        assert_eq!(link.path_segments, vec!["rust-lang", "rust", "issues"]);
    }

    #[test]
    fn test_malformed_url_has_empty_host() {
        assert!(parse_link("not a url").is_none());
        assert_eq!(host_of("::::"), "");
        assert_eq!(host_of(""), "");
    }

    #[test]
    fn test_registrable_domain() {
        assert_eq!(registrable_domain("docs.google.com"), "google.com");
        assert_eq!(registrable_domain("news.bbc.co.uk"), "bbc.co.uk");
        assert_eq!(registrable_domain("github.com"), "github.com");
        assert_eq!(site_stem("en.wikipedia.org"), "wikipedia");
    }

    #[test]
    fn test_url_keywords_drop_query() {
        assert_eq!(
            url_keywords("https://www.youtube.com/watch?v=abc#t=10"),
            "https www youtube com watch"
        );
    }
}
