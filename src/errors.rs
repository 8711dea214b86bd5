// ABOUTME: Error types for the deck-slides application
// ABOUTME: Provides structured error handling for validation, rendering, and generation

use std::path::PathBuf;
use thiserror::Error;

use crate::types::SlideType;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to reach completion endpoint: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown slide type: {0}")]
    UnknownSlideType(String),

    #[error("Slide type '{slide_type}': missing required field '{field}'")]
    MissingField { slide_type: SlideType, field: String },

    #[error(
        "Slide type '{slide_type}': field '{field}' is {actual} characters long (limit {limit})"
    )]
    FieldTooLong {
        slide_type: SlideType,
        field: String,
        limit: usize,
        actual: usize,
    },

    #[error(
        "Slide type '{slide_type}': field '{field}' has {actual} items (expected {min} to {max})"
    )]
    CardinalityError {
        slide_type: SlideType,
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Slide type '{slide_type}': field '{field}' must be {expected}")]
    TypeMismatch {
        slide_type: SlideType,
        field: String,
        expected: &'static str,
    },

    #[error("Template directory not found: {0}")]
    TemplateDirNotFound(PathBuf),

    #[error("Template not found for slide type: {0}")]
    TemplateNotFound(String),

    #[error("Template rendering failed for slide type '{slide_type}': {message}")]
    TemplateRender { slide_type: String, message: String },

    #[error("Error rendering slide {index} ({slide_type}): {source}")]
    SlideRenderFailed {
        index: usize,
        slide_type: String,
        #[source]
        source: Box<DeckError>,
    },

    #[error("Failed to parse plan output as JSON: {0}")]
    PlanParseError(String),

    #[error("Plan failed validation: {0}")]
    PlanSchemaError(String),

    #[error("Completion request failed: {0}")]
    CompletionFailed(String),

    #[error("Slide {slide_number} ({slide_type}) exhausted {attempts} generation attempts: {detail}")]
    SlideGenerationExhausted {
        slide_number: u32,
        slide_type: SlideType,
        attempts: u32,
        detail: String,
    },

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
