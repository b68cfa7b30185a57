//! Classifier output types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of description characters quoted in a summary.
pub const SUMMARY_PREFIX_CHARS: usize = 60;

/// Default routing recommendation attached to every classification.
const DEFAULT_RECOMMENDATION: &str = "Auto-route to landlord and flag for review";

/// Coarse issue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    Plumbing,
    #[serde(rename = "Heating/Cooling")]
    HeatingCooling,
    Electricity,
    Pest,
    Structural,
    Other,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Plumbing => "Plumbing",
            IssueType::HeatingCooling => "Heating/Cooling",
            IssueType::Electricity => "Electricity",
            IssueType::Pest => "Pest",
            IssueType::Structural => "Structural",
            IssueType::Other => "Other",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    High,
    Medium,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::High => f.write_str("High"),
            Urgency::Medium => f.write_str("Medium"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Frustrated,
    Neutral,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Frustrated => f.write_str("Frustrated"),
            Tone::Neutral => f.write_str("Neutral"),
        }
    }
}

/// Result of classifying a ticket description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub issue_type: IssueType,
    pub urgency: Urgency,
    pub tone: Tone,
    pub summary: String,
    pub recommendation: String,
}

impl Classification {
    /// Build a classification, deriving the summary from the description.
    pub fn new(issue_type: IssueType, urgency: Urgency, tone: Tone, description: &str) -> Self {
        Self {
            issue_type,
            urgency,
            tone,
            summary: Self::summarize(issue_type, description),
            recommendation: DEFAULT_RECOMMENDATION.to_string(),
        }
    }

    /// `Other` / `Medium` / `Neutral`, the result for text that matches nothing.
    pub fn fallback(description: &str) -> Self {
        Self::new(IssueType::Other, Urgency::Medium, Tone::Neutral, description)
    }

    /// Fixed summary template quoting the start of the description.
    pub fn summarize(issue_type: IssueType, description: &str) -> String {
        let quoted: String = description.chars().take(SUMMARY_PREFIX_CHARS).collect();
        format!("Likely issue: {}. The user said: '{}...'", issue_type, quoted)
    }
}
