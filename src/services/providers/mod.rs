/// Language-model provider abstraction
///
/// Recommendation generation goes through this trait so the model backend is
/// handed to the service at construction time and can be replaced by a fake in
/// tests.
use crate::error::AppResult;

pub mod anthropic;

pub use anthropic::AnthropicProvider;

/// Trait for language-model providers
///
/// A provider sends one system instruction plus one user message and returns
/// the raw text of the model's reply. Parsing is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Request a completion for the given prompt pair
    async fn complete(&self, system: &str, user: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
