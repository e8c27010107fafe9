//! Prompt templates and the single-shot helpers built on them.
//!
//! Translation and document analysis are one-off model calls outside any
//! session; grounded question answering feeds `grounding_instruction` to
//! the session engine as a system instruction.

use tracing::debug;

use crate::{AiClient, AiError, Message};

pub const NO_TRANSLATION: &str = "Translation failed";
pub const NO_ANALYSIS: &str = "No analysis generated.";

/// System instruction for answering questions about grounding content.
pub fn grounding_instruction(grounding: &str) -> String {
    format!(
        "You are an expert assistant. Answer the following question based on the \
         transcript below.\n\nTranscript:\n{grounding}"
    )
}

pub fn translation_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {target_language}. Maintain the original meaning, \
         context, and formatting while providing a natural translation:\n\nText:\n{text}\n\n\
         Translation:"
    )
}

pub fn analysis_prompt(text: &str) -> String {
    format!(
        "You are an expert document analyzer. Analyze the following text and provide a \
         detailed summary, key points, and insights.\n\nText:\n{text}\n\nAnalysis:"
    )
}

/// Translate `text` into the named language.
pub async fn translate(
    client: &dyn AiClient,
    text: &str,
    target_language: &str,
) -> Result<String, AiError> {
    if text.trim().is_empty() {
        return Err(AiError::InvalidInput("No text provided".into()));
    }
    debug!(target_language, chars = text.len(), "translation request");
    let prompt = translation_prompt(text, target_language);
    one_shot(client, prompt, NO_TRANSLATION).await
}

/// Summarize `text` with key points and insights.
pub async fn analyze(client: &dyn AiClient, text: &str) -> Result<String, AiError> {
    if text.trim().is_empty() {
        return Err(AiError::InvalidInput("No text provided".into()));
    }
    debug!(chars = text.len(), "analysis request");
    one_shot(client, analysis_prompt(text), NO_ANALYSIS).await
}

async fn one_shot(
    client: &dyn AiClient,
    prompt: String,
    fallback: &str,
) -> Result<String, AiError> {
    let response = client.send_message(&[Message::user(prompt)], None).await?;
    if response.content.trim().is_empty() {
        Ok(fallback.to_string())
    } else {
        Ok(response.content)
    }
}
