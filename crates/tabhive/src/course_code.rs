//! Course/topic code recognition.
//!
//! A [`CourseCodeDetector`] is compiled once from a catalog of known codes and
//! is immutable afterwards. Per-invocation memoization lives in a
//! [`DetectionSession`] so nothing is shared between concurrent calls.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::LazyLock;

use lru::LruCache;
use regex::Regex;

use crate::error::GroupingError;

/// The catalog shipped with the engine. Replaceable through config.
pub const DEFAULT_CATALOG: &[&str] = &[
    "COMMST192", "CS 136", "CS 136L", "CS 449", "CS 459", "CS 486", "CS 492", "CS138",
    "CS341", "ECE102", "ECE106", "ECE108", "ECE124", "ECE140", "ECE192", "ECE301",
    "ECE318", "ECE327", "ECE350", "ECE380", "ENGL192", "GENE123", "MATH 136", "MATH 138",
    "MATH118", "MATH119", "MATH213", "ME100B", "ME101", "ME115", "ME123", "ME300A",
    "ME303", "ME321", "ME340", "ME351", "ME354", "MSE100B", "MSE131", "MSE211",
    "MSE300A", "MSE334", "MSE342", "MSE431", "MSE446", "PHYS115", "SE102", "SE301",
    "SE350", "SE464", "SE465", "UCR192E",
];

static CATALOG_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]+)[\s\-.]*(\d+[A-Z]?)$").expect("catalog entry regex is valid")
});

/// One catalog code split into its prefix and number.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CatalogCode {
    prefix: String,
    number: String,
}

impl CatalogCode {
    fn parse(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_uppercase();
        let caps = CATALOG_ENTRY.captures(&upper)?;
        Some(Self {
            prefix: caps[1].to_string(),
            number: caps[2].to_string(),
        })
    }

    fn spaced(&self) -> String {
        format!("{} {}", self.prefix, self.number)
    }

    fn unspaced(&self) -> String {
        format!("{}{}", self.prefix, self.number)
    }
}

#[derive(Debug, Clone)]
pub struct CourseCodeDetector {
    /// Longest first, so "CS 136L" wins over "CS 136".
    codes: Vec<CatalogCode>,
    prefixes: Vec<String>,
    separated: Option<Regex>,
    joined: Option<Regex>,
}

impl CourseCodeDetector {
    /// Compile a detector from catalog entries such as `"CS 136"` or `"MATH118"`.
    pub fn new<I, S>(catalog: I) -> Result<Self, GroupingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes = Vec::new();
        for entry in catalog {
            let entry = entry.as_ref();
            let code = CatalogCode::parse(entry).ok_or_else(|| {
                GroupingError::InvalidConfig(format!("catalog entry '{}' is not PREFIX NUMBER", entry))
            })?;
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        codes.sort_by(|a, b| b.unspaced().len().cmp(&a.unspaced().len()));

        let mut prefixes: Vec<String> = codes
            .iter()
            .map(|c| c.prefix.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let (separated, joined) = if prefixes.is_empty() {
            (None, None)
        } else {
            let alternation = prefixes
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|");
            let number = r"(\d{2,3}[A-Z]?|\d{4})\b";
            let compile = |pattern: String| {
                Regex::new(&pattern)
                    .map_err(|e| GroupingError::InvalidConfig(format!("course code pattern: {}", e)))
            };
            (
                Some(compile(format!(r"(?i)\b({})[\s\-.]+{}", alternation, number))?),
                Some(compile(format!(r"(?i)\b({}){}", alternation, number))?),
            )
        };

        tracing::debug!(codes = codes.len(), prefixes = prefixes.len(), "[CourseCode] Detector compiled");

        Ok(Self {
            codes,
            prefixes,
            separated,
            joined,
        })
    }

    pub fn with_default_catalog() -> Result<Self, GroupingError> {
        Self::new(DEFAULT_CATALOG.iter().copied())
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Canonical `"PREFIX NUMBER"` code found in `text`, if any.
    pub fn detect(&self, text: &str) -> Option<String> {
        let upper = text.to_uppercase();

        for code in &self.codes {
            if contains_word(&upper, &code.spaced()) || contains_word(&upper, &code.unspaced()) {
                return Some(code.spaced());
            }
        }

        for pattern in [&self.separated, &self.joined].into_iter().flatten() {
            if let Some(caps) = pattern.captures(&upper) {
                return Some(format!("{} {}", &caps[1], &caps[2]).to_uppercase());
            }
        }
        None
    }

    /// Start a memoized detection pass for one invocation.
    pub fn session(&self, capacity: usize) -> DetectionSession<'_> {
        DetectionSession::new(self, capacity)
    }
}

/// Substring match that does not start or end inside a longer word.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}

/// Detector plus an LRU memo keyed by the exact input string.
pub struct DetectionSession<'a> {
    detector: &'a CourseCodeDetector,
    memo: LruCache<String, Option<String>>,
}

impl<'a> DetectionSession<'a> {
    fn new(detector: &'a CourseCodeDetector, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            detector,
            memo: LruCache::new(capacity),
        }
    }

    pub fn detect(&mut self, text: &str) -> Option<String> {
        if let Some(hit) = self.memo.get(text) {
            return hit.clone();
        }
        let found = self.detector.detect(text);
        self.memo.put(text.to_string(), found.clone());
        found
    }

    pub fn memoized(&self) -> usize {
        self.memo.len()
    }
}
