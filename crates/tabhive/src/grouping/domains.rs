//! Keyword-to-domain tables behind the label-matching domain bonus.

/// Site families a label can be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainCategory {
    Work,
    Shopping,
    Social,
    News,
    Research,
}

impl DomainCategory {
    pub const ALL: [DomainCategory; 5] = [
        DomainCategory::Work,
        DomainCategory::Shopping,
        DomainCategory::Social,
        DomainCategory::News,
        DomainCategory::Research,
    ];

    /// Label fragments that select this family.
    fn label_keywords(&self) -> &'static [&'static str] {
        match self {
            DomainCategory::Work => &["work", "job", "office"],
            DomainCategory::Shopping => &["shop", "store"],
            DomainCategory::Social => &["social", "media"],
            DomainCategory::News => &["news", "media"],
            DomainCategory::Research => &["research", "academic"],
        }
    }

    /// URL fragments that identify a site of this family.
    fn url_markers(&self) -> &'static [&'static str] {
        match self {
            DomainCategory::Work => &[
                "docs.google.com", "github.com", "linkedin.com", "slack.com", "trello.com",
                "asana.com", "jira.com", "notion.so", "miro.com", "figma.com", "atlassian.com",
            ],
            DomainCategory::Shopping => &[
                "amazon.com", "ebay.com", "etsy.com", "walmart.com", "bestbuy.com",
                "target.com", "shop", "store", "ecommerce",
            ],
            DomainCategory::Social => &[
                "facebook", "twitter", "instagram", "reddit", "tiktok", "youtube", "linkedin",
                "pinterest", "tumblr", "discord",
            ],
            DomainCategory::News => &[
                "news", "bbc", "cnn", "nytimes", "reuters", "washingtonpost", "theguardian",
                "huffpost", "bloomberg",
            ],
            DomainCategory::Research => &[
                "scholar.google.com", "researchgate.net", "academia.edu", ".edu",
                "wikipedia.org", "sciencedirect", "springer", "arxiv", "ieee", "jstor",
            ],
        }
    }

    pub fn selected_by(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.label_keywords().iter().any(|k| label.contains(k))
    }

    pub fn matches_url(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        self.url_markers().iter().any(|m| url.contains(m))
    }
}

/// Whether `url` belongs to a site family that `label` asks for.
pub fn label_domain_match(label: &str, url: &str) -> bool {
    DomainCategory::ALL
        .iter()
        .any(|c| c.selected_by(label) && c.matches_url(url))
}
