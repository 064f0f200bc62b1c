//! Design assistant.
//!
//! A thin client for Gemini's `generateContent` endpoint: it turns a
//! selection of catalog parts into furniture ideas, and an idea into a
//! presentation image. Replies come back as ordinary project lines, so the
//! rest of the application prices them exactly like hand-written ones.

pub use client::{Client, GeneratedImage};
pub use error::AssistantError;
pub use ideas::{Idea, SuggestedItem, ideas_prompt, image_prompt, parse_ideas};

mod client;
mod error;
mod ideas;

/// Hosted endpoint the client talks to unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used to suggest furniture ideas.
pub const IDEAS_MODEL: &str = "gemini-3-flash-preview";

/// Model used to render an idea as a photo.
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";
