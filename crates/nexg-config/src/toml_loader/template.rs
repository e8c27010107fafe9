//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# NexG Configuration
# Only override what you want to change -- missing fields use defaults.
# The API key is read from GEMINI_API_KEY (or GOOGLE_AI_API_KEY), never from this file.

[model]
# name = "gemini-2.0-flash"
# api_base = "https://generativelanguage.googleapis.com/v1beta/models"
# temperature = 0.5        # 0.0-2.0
# top_k = 1                # 1-100
# top_p = 0.8              # 0.0-1.0
# max_output_tokens = 1024 # 1-8192
# candidate_count = 1
# connect_timeout_secs = 10
# request_timeout_secs = 120

[safety]
# threshold = "BLOCK_MEDIUM_AND_ABOVE"  # BLOCK_NONE, BLOCK_ONLY_HIGH, BLOCK_MEDIUM_AND_ABOVE, BLOCK_LOW_AND_ABOVE
# categories = ["harassment", "hate_speech", "sexually_explicit", "dangerous_content"]

[reveal]
# interval_ms = 5          # 0-1000
# welcome_message = "Hello! I'm NexG AI, your AI assistant powered by Next Generation. How can I help you today?"

[services]
# transcript_url = "https://python-script-3.onrender.com/get-transcript/"
# document_url = "https://example.com/extract"   # multipart upload; overrides document_command
# document_command = ["python", "scripts/process_pdf.py"]
# default_language = "en"  # 2-letter code
# translate_to = "Hindi"

[logging]
# level = "INFO"           # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
