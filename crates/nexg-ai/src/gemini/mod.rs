//! Google Gemini API client.
//!
//! Implements the `AiClient` trait for Gemini models via the
//! Generative Language API's non-streaming `generateContent` method.

mod api;
mod client;
mod config;


pub use client::GeminiClient;
pub use config::{GeminiConfig, SafetySetting};
