// SPDX-License-Identifier: MIT

//! Environment-driven configuration for the caption workflow
//!
//! Variables are read through a lookup function so the same parsing runs
//! against the process environment (after `dotenv`) and against fixed maps
//! in tests. Empty values count as unset.

use crate::adk::error::{CaptionError, Result};
use crate::adk::model::gemini::DEFAULT_BASE_URL;
use crate::caption::tools::profile::DEFAULT_PROFILE;
use std::env;
use std::str::FromStr;

pub const GENERATE_SYSTEM_VAR: &str = "GEN_CAPTION_SYSTEM";
pub const REVIEW_SYSTEM_VAR: &str = "REVIEW_CAP_SYSTEM";
pub const REGENERATE_SYSTEM_VAR: &str = "REGENERATE_SYSTEM";
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const MODEL_VAR: &str = "CAPTION_MODEL";
pub const TEMPERATURE_VAR: &str = "CAPTION_TEMPERATURE";
pub const MAX_TRIES_VAR: &str = "CAPTION_MAX_TRIES";
pub const MAX_TURNS_VAR: &str = "CAPTION_MAX_TURNS";
pub const PROFILE_VAR: &str = "CAPTION_PROFILE";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

pub const DEFAULT_GENERATE_SYSTEM: &str = "You write strong LinkedIn captions.";
pub const DEFAULT_REVIEW_SYSTEM: &str = "You are a strict LinkedIn post reviewer.";
pub const DEFAULT_REGENERATE_SYSTEM: &str = "You rewrite posts based on review comments.";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TRIES: u32 = 2;
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// System instructions for the three caption nodes
#[derive(Debug, Clone, PartialEq)]
pub struct PromptConfig {
    pub generate_system: String,
    pub review_system: String,
    pub regenerate_system: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            generate_system: DEFAULT_GENERATE_SYSTEM.to_string(),
            review_system: DEFAULT_REVIEW_SYSTEM.to_string(),
            regenerate_system: DEFAULT_REGENERATE_SYSTEM.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaptionConfig {
    pub prompts: PromptConfig,
    /// Credential for the hosted model; checked when the graph is built
    pub api_key: Option<String>,
    pub model_name: String,
    pub temperature: f32,
    /// Non-approving reviews allowed before the cap forces approval
    pub max_tries: u32,
    /// Model round trips one agent may spend on tool calls before giving up
    pub max_turns: u32,
    pub profile: String,
    pub base_url: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            prompts: PromptConfig::default(),
            api_key: None,
            model_name: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tries: DEFAULT_MAX_TRIES,
            max_turns: DEFAULT_MAX_TURNS,
            profile: DEFAULT_PROFILE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CaptionConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            prompts: PromptConfig {
                generate_system: get(GENERATE_SYSTEM_VAR)
                    .unwrap_or(defaults.prompts.generate_system),
                review_system: get(REVIEW_SYSTEM_VAR).unwrap_or(defaults.prompts.review_system),
                regenerate_system: get(REGENERATE_SYSTEM_VAR)
                    .unwrap_or(defaults.prompts.regenerate_system),
            },
            api_key: get(API_KEY_VAR),
            model_name: get(MODEL_VAR).unwrap_or(defaults.model_name),
            temperature: parse_or(get(TEMPERATURE_VAR), TEMPERATURE_VAR, defaults.temperature)?,
            max_tries: parse_or(get(MAX_TRIES_VAR), MAX_TRIES_VAR, defaults.max_tries)?,
            max_turns: parse_or(get(MAX_TURNS_VAR), MAX_TURNS_VAR, defaults.max_turns)?,
            profile: get(PROFILE_VAR).unwrap_or(defaults.profile),
            base_url: get(BASE_URL_VAR).unwrap_or(defaults.base_url),
        })
    }

    /// The model credential, or a configuration error naming the variable
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| CaptionError::config(format!("{} not found in environment", API_KEY_VAR)))
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| CaptionError::config(format!("{} has invalid value '{}'", key, v))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CaptionConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.prompts, PromptConfig::default());
        assert_eq!(config.prompts.generate_system, "You write strong LinkedIn captions.");
        assert_eq!(config.model_name, "gemini-2.5-flash");
        assert_eq!(config.max_tries, 2);
        assert_eq!(config.max_turns, 10);
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_overrides_are_read() {
        let config = CaptionConfig::from_lookup(lookup(&[
            (GENERATE_SYSTEM_VAR, "Write punchy captions."),
            (REVIEW_SYSTEM_VAR, "Be kind."),
            (REGENERATE_SYSTEM_VAR, "Apply notes."),
            (API_KEY_VAR, "secret"),
            (MODEL_VAR, "gemini-2.0-flash"),
            (MAX_TRIES_VAR, "3"),
            (MAX_TURNS_VAR, "4"),
            (TEMPERATURE_VAR, "0.7"),
        ]))
        .unwrap();

        assert_eq!(config.prompts.generate_system, "Write punchy captions.");
        assert_eq!(config.prompts.review_system, "Be kind.");
        assert_eq!(config.prompts.regenerate_system, "Apply notes.");
        assert_eq!(config.require_api_key().unwrap(), "secret");
        assert_eq!(config.model_name, "gemini-2.0-flash");
        assert_eq!(config.max_tries, 3);
        assert_eq!(config.max_turns, 4);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config = CaptionConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "   "),
            (REVIEW_SYSTEM_VAR, ""),
        ]))
        .unwrap();

        assert!(config.api_key.is_none());
        assert_eq!(config.prompts.review_system, DEFAULT_REVIEW_SYSTEM);
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let config = CaptionConfig::default();
        let err = config.require_api_key().unwrap_err();
        assert!(matches!(err, CaptionError::Config(_)));
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = CaptionConfig::from_lookup(lookup(&[(MAX_TRIES_VAR, "two")])).unwrap_err();
        assert!(matches!(err, CaptionError::Config(_)));
        assert!(err.to_string().contains(MAX_TRIES_VAR));
    }
}
