//! The Classifier trait definition.

use async_trait::async_trait;

use crate::classification::Classification;
use crate::error::ClassifierError;

/// A trait for turning a free-text problem description into a
/// [`Classification`].
///
/// Implementations can range from a fixed keyword table to a remote
/// NLP backend. This trait is object-safe and can be used with
/// `Arc<dyn Classifier>`.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a ticket description.
    ///
    /// # Arguments
    ///
    /// * `description` - The tenant's problem statement, possibly empty.
    async fn classify(&self, description: &str) -> Result<Classification, ClassifierError>;

    /// Get a human-readable name for this classifier implementation.
    fn name(&self) -> &str;

    /// Check if the classifier is ready to accept work.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
