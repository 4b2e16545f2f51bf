//! "AI consultant": forwards a question plus an inventory snapshot to a hosted
//! chat-completion API and hands the answer back verbatim.

use crate::error::Result;
use async_trait::async_trait;

pub mod openai;

pub use openai::OpenAiConsultant;

pub const SYSTEM_PROMPT: &str = "You are an expert inventory management consultant. \
Analyze the inventory data provided and give specific, actionable advice. \
Focus on stock optimization, seasonal trends, reorder points and transfers \
between locations. Keep answers concise and reference the figures you rely on.";

#[async_trait]
pub trait AdviceProvider: Send + Sync + 'static {
    /// `context` is a JSON snapshot of the current inventory state.
    async fn advise(&self, question: &str, context: &serde_json::Value) -> Result<String>;
}
