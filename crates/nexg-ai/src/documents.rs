//! Document (PDF) text extraction collaborators.
//!
//! Extraction itself is delegated: either to a remote service that accepts a
//! multipart upload, or to a local command that prints `{"text": ...}` or
//! `{"error": ...}` as JSON on stdout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::language::is_language_code;
use crate::AiError;

/// Turns raw document bytes into plain text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        language: &str,
    ) -> Result<String, AiError>;
}

/// Uploads the document to an extraction service.
pub struct HttpDocumentExtractor {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpDocumentExtractor {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }
}

#[async_trait]
impl DocumentExtractor for HttpDocumentExtractor {
    async fn extract(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        language: &str,
    ) -> Result<String, AiError> {
        check_input(&bytes, language)?;
        debug!(size = bytes.len(), file = file_name, "document upload");

        let file_part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))
            .map_err(|e| AiError::ApiError(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("language", language.to_string());

        let response = self.http.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            let detail = parse_extraction(&text)
                .err()
                .map(|e| e.to_string())
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(AiError::ApiError(detail));
        }
        parse_extraction(&text)
    }
}

/// Runs a local extractor as `<command...> <file> <language>`.
pub struct CommandDocumentExtractor {
    program: String,
    args: Vec<String>,
    scratch_dir: PathBuf,
}

impl CommandDocumentExtractor {
    /// `command` is the program followed by its leading arguments.
    pub fn new(command: &[String]) -> Result<Self, AiError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| AiError::InvalidInput("empty extractor command".into()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            scratch_dir: std::env::temp_dir(),
        })
    }

    /// Directory for the temporary copy handed to the command.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    fn scratch_path(&self, file_name: &str) -> PathBuf {
        let base = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf");
        self.scratch_dir
            .join(format!("nexg-{}-{base}", nexg_common::new_correlation_id()))
    }
}

#[async_trait]
impl DocumentExtractor for CommandDocumentExtractor {
    async fn extract(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        language: &str,
    ) -> Result<String, AiError> {
        check_input(&bytes, language)?;

        let path = self.scratch_path(file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AiError::ApiError(format!("failed to stage {}: {e}", path.display())))?;

        debug!(program = %self.program, file = %path.display(), "running document extractor");

        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(&path)
            .arg(language)
            .output()
            .await;

        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("failed to delete temporary file {}: {e}", path.display());
        }

        let output = output
            .map_err(|e| AiError::ApiError(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AiError::ApiError(if stderr.is_empty() {
                "Failed to process PDF".into()
            } else {
                stderr
            }));
        }

        parse_extraction(&String::from_utf8_lossy(&output.stdout))
    }
}

fn check_input(bytes: &[u8], language: &str) -> Result<(), AiError> {
    if bytes.is_empty() {
        return Err(AiError::InvalidInput("No file provided".into()));
    }
    if !is_language_code(language) {
        return Err(AiError::InvalidInput(
            "Invalid language code. Must be a 2-letter ISO code".into(),
        ));
    }
    Ok(())
}

fn mime_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next().map(|ext| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "pdf" => "application/pdf",
        Some(ext) if ext == "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Decode an extractor reply: `{"text": ...}` or `{"error": ...}`.
pub(crate) fn parse_extraction(raw: &str) -> Result<String, AiError> {
    let json: serde_json::Value = serde_json::from_str(raw.trim())
        .map_err(|_| AiError::ParseError("Failed to parse PDF data".into()))?;
    if let Some(error) = json["error"].as_str() {
        return Err(AiError::ApiError(error.to_string()));
    }
    json["text"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| AiError::ParseError("no 'text' field in extractor output".into()))
}
