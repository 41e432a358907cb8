// SPDX-License-Identifier: MIT

//! Model module - defines the LLM model trait and its implementation
//!
//! This module provides the core Model trait and shared message types.
//! The hosted backend lives in its own submodule:
//! - [gemini] - Google's Gemini API

pub mod gemini;

use crate::adk::error::Result;
use crate::adk::tool::Tool;
use async_trait::async_trait;
use std::sync::Arc;

/// Configuration for model generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
}

impl GenerationConfig {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..Self::default()
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    /// A system instruction message
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    /// A user (human) message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts, ignoring thinking and function parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Parts of a message - text, thinking, function calls, etc.
#[derive(Debug, Clone)]
pub enum Part {
    /// Regular text output from the model
    Text(String),
    /// Thinking/reasoning content from thinking models
    Thinking(String),
    /// Function/tool call requested by the model
    FunctionCall {
        name: String,
        args: serde_json::Value,
        /// Thought signature from Gemini thinking models - must be sent back unchanged
        thought_signature: Option<String>,
    },
    /// Response from executing a function/tool
    FunctionResponse {
        name: String,
        response: serde_json::Value,
    },
}

/// Core trait for LLM model implementations
#[async_trait]
pub trait Model: Send + Sync {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        tools: Option<&[Arc<dyn Tool>]>,
    ) -> Result<Content>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_text_skips_non_text_parts() {
        let content = Content {
            role: "model".to_string(),
            parts: vec![
                Part::Thinking("hmm".to_string()),
                Part::Text("Hello ".to_string()),
                Part::Text("world".to_string()),
            ],
        };
        assert_eq!(content.text(), "Hello world");
    }

    #[test]
    fn test_role_constructors() {
        assert_eq!(Content::system("s").role, "system");
        assert_eq!(Content::user("u").role, "user");
        assert_eq!(Content::user("u").text(), "u");
    }

    #[test]
    fn test_generation_config_with_temperature() {
        let config = GenerationConfig::with_temperature(0.2);
        assert_eq!(config.temperature, Some(0.2));
        assert!(config.max_output_tokens.is_none());
    }
}
