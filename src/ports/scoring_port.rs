//! Text-scoring port trait.

use crate::domain::error::ProviderError;

/// An external service that answers a bounded prompt with free text.
///
/// Parsing and validating the answer is the caller's job.
pub trait ScoringPort {
    fn score(&self, prompt: &str) -> Result<String, ProviderError>;

    fn name(&self) -> &str;
}
