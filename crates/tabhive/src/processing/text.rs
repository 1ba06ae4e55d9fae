//! Tokenization shared by the feature extractors and the group namer.

use std::collections::HashSet;
use std::sync::LazyLock;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // English function words
        "the", "and", "for", "with", "from", "that", "this", "these", "those", "are", "was",
        "were", "been", "being", "have", "has", "had", "does", "did", "will", "would",
        "could", "should", "may", "might", "must", "can", "not", "but", "you", "your",
        "our", "their", "they", "them", "his", "her", "its", "what", "which", "who",
        "whom", "how", "why", "when", "where", "all", "any", "some", "into", "about",
        "over", "than", "then", "there", "here", "also", "just", "more", "most", "other",
        "such", "only", "own", "same", "very", "via", "per", "out", "off", "new", "get",
        "one", "two", "use", "using", "page", "home", "welcome",
        // URL noise
        "http", "https", "www", "com", "org", "net", "html", "htm", "php", "asp", "aspx",
        "index", "amp", "utm", "ref", "source", "medium", "campaign", "default",
    ]
    .into_iter()
    .collect()
});

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Lowercase, turn every non-alphanumeric character into a separator, then
/// drop tokens shorter than `min_len` and stopwords.
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= min_len && !is_stopword(w))
        .map(|w| w.to_string())
        .collect()
}

/// Words worth naming a group after: longer than 3 characters, not a
/// stopword, not purely numeric.
pub fn significant_words(text: &str) -> Vec<String> {
    tokenize(text, 4)
        .into_iter()
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_punctuation_and_short_words() {
        let tokens = tokenize("Intro to Rust: Ownership & Borrowing!", 3);
        assert_eq!(tokens, vec!["intro", "rust", "ownership", "borrowing"]);
    }

    #[test]
    fn test_tokenize_drops_stopwords_and_url_noise() {
        let tokens = tokenize("https www github com the rust-lang repo", 3);
        assert_eq!(tokens, vec!["github", "rust", "lang", "repo"]);
    }

    #[test]
    fn test_all_stopword_text_is_empty() {
        assert!(tokenize("the and for with", 3).is_empty());
        assert!(tokenize("", 3).is_empty());
    }

    #[test]
    fn test_significant_words_skip_numbers() {
        let words = significant_words("Lecture 2024 slides week");
        assert_eq!(words, vec!["lecture", "slides", "week"]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("recipes"), "Recipes");
        assert_eq!(capitalize(""), "");
    }
}
