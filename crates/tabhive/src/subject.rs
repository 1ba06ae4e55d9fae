//! Subject classification against a fixed table of topic categories.
//!
//! [`CategoryTable::build`] embeds every category once; the table is then
//! read-only and can be shared across invocations.

use serde::{Deserialize, Serialize};

use crate::embeddings::{cosine_similarity, FeatureExtractor, FeatureVector, FixedVocabulary};
use crate::processing::{tab_text, tokenize};
use crate::types::Tab;

/// Configured category: a name and the phrases that describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSpec {
    pub name: String,
    pub terms: Vec<String>,
}

impl SubjectSpec {
    pub fn new(name: &str, terms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }
}

pub fn default_subjects() -> Vec<SubjectSpec> {
    vec![
        SubjectSpec::new("Computer Science", &[
            "programming", "coding", "algorithm", "data structure", "software", "javascript",
            "python", "java", "html", "css", "react", "database", "sql", "api", "git",
            "github", "compiler", "machine learning", "artificial intelligence",
        ]),
        SubjectSpec::new("Linear Algebra", &[
            "linear algebra", "matrix", "vector space", "eigenvalue", "eigenvector",
            "linear transformation", "determinant", "rank", "nullity", "basis", "span",
            "orthogonal", "projection", "least squares", "inner product", "diagonalization",
            "gaussian elimination",
        ]),
        SubjectSpec::new("Calculus", &[
            "calculus", "derivative", "integral", "limit", "continuity", "differentiation",
            "integration", "differential equation", "gradient", "divergence", "taylor series",
            "power series", "convergence", "chain rule", "riemann sum",
        ]),
        SubjectSpec::new("Circuits", &[
            "circuits", "voltage", "current", "resistance", "capacitance", "inductance",
            "impedance", "kirchhoff", "resistor", "capacitor", "inductor", "transistor",
            "diode", "amplifier", "logic gate", "microcontroller", "oscillator",
        ]),
        SubjectSpec::new("Mechanics", &[
            "mechanics", "kinematics", "dynamics", "statics", "newton", "motion", "force",
            "torque", "momentum", "energy", "friction", "gravity", "projectile", "collision",
            "rigid body", "equilibrium", "inertia", "stress", "strain", "fluid",
        ]),
        SubjectSpec::new("Chemistry", &[
            "organic chemistry", "inorganic chemistry", "biochemistry", "chemical reaction",
            "molecule", "atom", "element", "compound", "acid", "salt", "periodic table",
            "bond", "isotope", "electron", "proton", "neutron", "catalyst",
        ]),
        SubjectSpec::new("Biology", &[
            "cell biology", "genetics", "ecology", "evolution", "microbiology", "botany",
            "zoology", "physiology", "anatomy", "dna", "rna", "protein", "enzyme", "tissue",
            "organism", "species", "ecosystem", "photosynthesis", "metabolism",
        ]),
        SubjectSpec::new("History", &[
            "ancient history", "medieval history", "modern history", "world history",
            "civilization", "empire", "revolution", "war", "monarchy", "democracy",
            "archaeology", "anthropology", "historiography",
        ]),
        SubjectSpec::new("Literature", &[
            "fiction", "poetry", "drama", "prose", "novel", "short story", "essay",
            "biography", "memoir", "literary criticism", "rhetoric", "narrative",
            "symbolism", "metaphor", "genre", "author",
        ]),
        SubjectSpec::new("Economics", &[
            "microeconomics", "macroeconomics", "econometrics", "economic policy", "market",
            "supply", "demand", "price", "competition", "monopoly", "inflation", "recession",
            "gdp", "unemployment", "interest rate", "currency",
        ]),
        SubjectSpec::new("Psychology", &[
            "cognitive psychology", "developmental psychology", "social psychology",
            "clinical psychology", "behavior", "cognition", "emotion", "motivation",
            "perception", "memory", "learning", "intelligence", "consciousness",
        ]),
        SubjectSpec::new("Philosophy", &[
            "metaphysics", "epistemology", "ethics", "logic", "aesthetics", "existentialism",
            "rationalism", "empiricism", "idealism", "materialism", "phenomenology",
            "pragmatism", "philosophy of mind", "moral philosophy",
        ]),
    ]
}

#[derive(Debug, Clone)]
pub struct SubjectCategory {
    pub name: String,
    pub terms: Vec<String>,
    pub embedding: FeatureVector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    pub similarity: f32,
}

impl Classification {
    /// Scores below `threshold` carry no information about the name.
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.similarity >= threshold
    }
}

#[derive(Debug, Clone)]
pub struct CategoryTable {
    vocabulary: FixedVocabulary,
    categories: Vec<SubjectCategory>,
}

impl CategoryTable {
    /// Embed every category's joined term list in a shared fixed vocabulary.
    pub fn build(specs: &[SubjectSpec], min_token_len: usize) -> Self {
        let vocabulary = FixedVocabulary::academic_with(
            specs.iter().flat_map(|s| s.terms.iter()),
            min_token_len,
        );
        let categories = specs
            .iter()
            .map(|spec| SubjectCategory {
                name: spec.name.clone(),
                terms: spec.terms.clone(),
                embedding: vocabulary.embed(&spec.terms.join(" ")),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            categories = categories.len(),
            vocabulary = vocabulary.dimension(),
            "[Subject] Category table built"
        );

        Self {
            vocabulary,
            categories,
        }
    }

    pub fn categories(&self) -> &[SubjectCategory] {
        &self.categories
    }

    /// Best category for free text. Returns `None` only for an empty table.
    ///
    /// A zero vector scores 0 everywhere; the first category is then
    /// returned with similarity 0.
    pub fn classify_text(&self, text: &str) -> Option<Classification> {
        let vector = self.vocabulary.embed(text);
        let mut best: Option<Classification> = None;
        for category in &self.categories {
            let similarity = cosine_similarity(&vector, &category.embedding);
            if best.as_ref().map_or(true, |b| similarity > b.similarity) {
                best = Some(Classification {
                    category: category.name.clone(),
                    similarity,
                });
            }
        }
        best
    }

    pub fn classify(&self, tab: &Tab) -> Option<Classification> {
        self.classify_text(&tab_text(tab))
    }
}

/// A label relates to a category when either name contains the other, or
/// they share a word of four or more letters.
pub fn label_relates_to(label: &str, category: &str) -> bool {
    let label = label.trim().to_lowercase();
    let category = category.trim().to_lowercase();
    if label.is_empty() || category.is_empty() {
        return false;
    }
    if label.contains(&category) || category.contains(&label) {
        return true;
    }
    let category_words = tokenize(&category, 4);
    tokenize(&label, 4).iter().any(|w| category_words.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CategoryTable {
        CategoryTable::build(&default_subjects(), 3)
    }

    #[test]
    fn test_table_has_twelve_categories() {
        let table = table();
        assert_eq!(table.categories().len(), 12);
        assert!(table.categories().iter().all(|c| !c.embedding.is_empty()));
    }

    #[test]
    fn test_classifies_obvious_topics() {
        let table = table();
        let tab = Tab::new("1", "Eigenvalue and eigenvector practice", "https://example.com/matrix");
        let result = table.classify(&tab).unwrap();
        assert_eq!(result.category, "Linear Algebra");
        assert!(result.similarity > 0.1);

        let result = table.classify_text("supply and demand curves, inflation").unwrap();
        assert_eq!(result.category, "Economics");
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let table = table();
        let result = table.classify_text("zzzz qqqq").unwrap();
        assert_eq!(result.similarity, 0.0);
        assert_eq!(result.category, "Computer Science");
        assert!(!result.is_confident(0.1));
    }

    #[test]
    fn test_confidence_boundary_is_inclusive() {
        let result = Classification {
            category: "Calculus".into(),
            similarity: 0.1,
        };
        assert!(result.is_confident(0.1));
        assert!(!result.is_confident(0.11));
    }

    #[test]
    fn test_empty_table() {
        let table = CategoryTable::build(&[], 3);
        assert!(table.classify_text("anything").is_none());
    }

    #[test]
    fn test_label_relation() {
        assert!(label_relates_to("Calculus", "Calculus"));
        assert!(label_relates_to("Algebra", "Linear Algebra"));
        assert!(label_relates_to("Computer stuff", "Computer Science"));
        assert!(!label_relates_to("Work", "Mechanics"));
        assert!(!label_relates_to("", "History"));
    }
}
