//! Auxiliary collaborator endpoints: transcripts and document extraction.

use serde::{Deserialize, Serialize};

/// Auxiliary service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Transcript service accepting `{url, language}`.
    pub transcript_url: String,
    /// Remote document extractor (multipart upload). Takes precedence over
    /// `document_command` when set.
    pub document_url: Option<String>,
    /// Local extractor command; the file path and language are appended.
    pub document_command: Vec<String>,
    /// Default 2-letter language code for transcripts and documents.
    pub default_language: String,
    /// Default target language name for translations.
    pub translate_to: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            transcript_url: "https://python-script-3.onrender.com/get-transcript/".into(),
            document_url: None,
            document_command: vec!["python".into(), "scripts/process_pdf.py".into()],
            default_language: "en".into(),
            translate_to: "Hindi".into(),
        }
    }
}
