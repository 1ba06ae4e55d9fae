pub mod links;
pub mod text;

pub use links::{host_of, parse_link, registrable_domain, site_stem, url_keywords, ParsedLink};
pub use text::{capitalize, is_stopword, significant_words, tokenize};

use crate::types::Tab;

/// Title plus URL keywords: the text every extractor sees for a tab.
pub fn tab_text(tab: &Tab) -> String {
    format!("{} {}", tab.title, url_keywords(&tab.url))
}
