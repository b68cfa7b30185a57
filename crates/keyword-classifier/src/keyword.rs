//! Keyword classifier implementation.

use async_trait::async_trait;
use ticket_core::{Classification, Classifier, ClassifierError, IssueType, Tone, Urgency};

/// Ordered keyword table. The first match wins, so order is the tie-break
/// for descriptions that mention several problems.
pub const ISSUE_KEYWORDS: &[(&str, IssueType)] = &[
    ("leak", IssueType::Plumbing),
    ("heater", IssueType::HeatingCooling),
    ("lights", IssueType::Electricity),
    ("bugs", IssueType::Pest),
    ("wall", IssueType::Structural),
    ("noise", IssueType::Other),
    ("mold", IssueType::Other),
];

/// Any of these marks the ticket `High` urgency.
pub const URGENT_KEYWORDS: &[&str] = &["urgent", "asap", "flood"];

/// Any of these marks the tenant's tone `Frustrated`.
pub const FRUSTRATED_KEYWORDS: &[&str] = &["again", "angry", "still broken"];

/// Classify a description against the default tables.
///
/// Total and deterministic: every input, including the empty string,
/// yields a classification.
pub fn classify(description: &str) -> Classification {
    KeywordClassifier::new().classify_text(description)
}

/// A classifier backed by fixed keyword tables.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    issues: Vec<(String, IssueType)>,
    urgent: Vec<String>,
    frustrated: Vec<String>,
}

impl KeywordClassifier {
    /// Create a classifier using the default tables.
    pub fn new() -> Self {
        Self {
            issues: ISSUE_KEYWORDS
                .iter()
                .map(|(word, issue)| (word.to_string(), *issue))
                .collect(),
            urgent: URGENT_KEYWORDS.iter().map(|w| w.to_string()).collect(),
            frustrated: FRUSTRATED_KEYWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Append an issue keyword after the default table entries.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyword_classifier::{IssueType, KeywordClassifier};
    ///
    /// let classifier = KeywordClassifier::new().with_issue_keyword("roach", IssueType::Pest);
    /// assert_eq!(classifier.classify_text("Roaches everywhere").issue_type, IssueType::Pest);
    /// ```
    pub fn with_issue_keyword(mut self, keyword: impl Into<String>, issue: IssueType) -> Self {
        self.issues.push((keyword.into().to_lowercase(), issue));
        self
    }

    /// Classify synchronously.
    pub fn classify_text(&self, description: &str) -> Classification {
        let lower = description.to_lowercase();

        let issue_type = self
            .issues
            .iter()
            .find(|(word, _)| lower.contains(word.as_str()))
            .map(|(_, issue)| *issue)
            .unwrap_or(IssueType::Other);

        let urgency = if contains_any(&lower, &self.urgent) {
            Urgency::High
        } else {
            Urgency::Medium
        };

        let tone = if contains_any(&lower, &self.frustrated) {
            Tone::Frustrated
        } else {
            Tone::Neutral
        };

        Classification::new(issue_type, urgency, tone, description)
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, description: &str) -> Result<Classification, ClassifierError> {
        Ok(self.classify_text(description))
    }

    fn name(&self) -> &str {
        "KeywordClassifier"
    }
}
