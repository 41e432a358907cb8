// SPDX-License-Identifier: MIT

//! Typed error handling for captionflow
//!
//! Every fallible operation in the crate returns [`CaptionError`]. Model and
//! workflow faults are grouped in their own enums and converted with `#[from]`.

use thiserror::Error;

/// Top-level error type for captionflow
#[derive(Debug, Error)]
pub enum CaptionError {
    /// API errors from the hosted model
    #[error("API error from {provider}: {message}")]
    Api { provider: String, message: String },

    /// Configuration errors (missing credential, unparseable setting)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller input (empty topic)
    #[error("Invalid input: {0}")]
    Input(String),

    /// Model/LLM-specific errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Workflow wiring errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Tool not found during execution
    #[error("Tool '{name}' not found")]
    ToolNotFound { name: String },

    /// Page template registration or rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Max iterations/turns reached
    #[error("Max {kind} reached: {limit}")]
    MaxIterations { kind: String, limit: u32 },
}

/// Workflow-specific errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A node has no outgoing edge
    #[error("No outgoing edge from node '{0}'")]
    MissingEdge(String),

    /// A conditional edge produced a route with no dispatch entry
    #[error("Route '{route}' from node '{node}' has no target")]
    MissingRoute { node: String, route: String },

    /// The executor ran more steps than any valid caption run needs
    #[error("Step limit of {0} exceeded")]
    StepLimit(u32),
}

/// Model/LLM-specific errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Response withheld by the provider's safety filters
    #[error("Response blocked: {0}")]
    Blocked(String),

    /// Invalid response from model
    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),
}

impl CaptionError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an input error
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// Create a tool not found error
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    /// Shorthand for an invalid model response
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::Model(ModelError::InvalidResponse(message.into()))
    }
}

impl From<handlebars::RenderError> for CaptionError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for CaptionError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CaptionError>;
