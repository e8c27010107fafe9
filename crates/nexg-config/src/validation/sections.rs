//! Per-section validation: model, safety, reveal, and services.

use std::collections::HashSet;

use crate::schema::NexgConfig;

use super::helpers::{validate_http_url, validate_range, validate_range_f64};

/// Validate model endpoint and generation parameters.
pub(crate) fn validate_model(errors: &mut Vec<String>, config: &NexgConfig) {
    let model = &config.model;
    if model.name.trim().is_empty() {
        errors.push("model.name must not be empty".into());
    }
    validate_http_url(errors, "model.api_base", &model.api_base);
    validate_range_f64(errors, "model.temperature", model.temperature, 0.0, 2.0);
    validate_range_f64(errors, "model.top_p", model.top_p, 0.0, 1.0);
    validate_range(errors, "model.top_k", model.top_k.into(), 1, 100);
    validate_range(
        errors,
        "model.max_output_tokens",
        model.max_output_tokens.into(),
        1,
        8192,
    );
    // Only candidates[0] is ever read.
    validate_range(errors, "model.candidate_count", model.candidate_count.into(), 1, 1);
    validate_range(
        errors,
        "model.connect_timeout_secs",
        model.connect_timeout_secs.into(),
        1,
        60,
    );
    validate_range(
        errors,
        "model.request_timeout_secs",
        model.request_timeout_secs.into(),
        1,
        600,
    );
}

/// Validate safety settings: no category may be listed twice.
pub(crate) fn validate_safety(errors: &mut Vec<String>, config: &NexgConfig) {
    let mut seen = HashSet::new();
    for category in &config.safety.categories {
        if !seen.insert(category) {
            errors.push(format!(
                "safety.categories lists {} more than once",
                category.as_api_str()
            ));
        }
    }
}

/// Validate reveal pacing.
pub(crate) fn validate_reveal(errors: &mut Vec<String>, config: &NexgConfig) {
    validate_range(errors, "reveal.interval_ms", config.reveal.interval_ms, 0, 1000);
}

/// Validate auxiliary service settings.
pub(crate) fn validate_services(errors: &mut Vec<String>, config: &NexgConfig) {
    let services = &config.services;
    validate_http_url(errors, "services.transcript_url", &services.transcript_url);
    if let Some(ref url) = services.document_url {
        validate_http_url(errors, "services.document_url", url);
    }
    if services.document_url.is_none() && services.document_command.is_empty() {
        errors.push("services: set document_url or document_command".into());
    }
    let lang = &services.default_language;
    if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.push(format!(
            "services.default_language = {lang:?} must be a 2-letter code"
        ));
    }
    if services.translate_to.trim().is_empty() {
        errors.push("services.translate_to must not be empty".into());
    }
}
