//! Keyword-table classifier for maintenance ticket descriptions.
//!
//! This crate provides [`KeywordClassifier`], an implementation of the
//! [`Classifier`] trait that maps free text to an issue category, urgency
//! and tone using case-insensitive substring matching against fixed tables.
//!
//! For a real NLP backend, implement [`Classifier`] in another crate and
//! hand it to the lifecycle engine instead.
//!
//! # Example
//!
//! ```rust
//! use keyword_classifier::{Classifier, KeywordClassifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), keyword_classifier::ClassifierError> {
//!     let classifier = KeywordClassifier::new();
//!
//!     let result = classifier.classify("URGENT leak again").await?;
//!     println!("{} / {} / {}", result.issue_type, result.urgency, result.tone);
//!     Ok(())
//! }
//! ```

mod keyword;

// Re-export ticket-core types for convenience
pub use ticket_core::{async_trait, Classification, Classifier, ClassifierError, IssueType, Tone, Urgency};

pub use keyword::{classify, KeywordClassifier, FRUSTRATED_KEYWORDS, ISSUE_KEYWORDS, URGENT_KEYWORDS};
