// SPDX-License-Identifier: MIT

use crate::adk::error::Result;
use crate::adk::tool::Tool;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_PROFILE: &str = "I'm a final-year engineering student specializing in AI and \
machine learning. I'm passionate about applying AI to real-world problems that create scalable, \
real value. I love learning why and how things work, both technical and non-technical.";

// --- Static schema ---

static PROFILE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {}
    })
});

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProfileResult {
    pub profile: String,
}

/// Returns the author's background so captions can be personalised.
///
/// The text is fixed when the tool is built and the call takes no arguments.
pub struct ProfileTool {
    profile: String,
}

impl ProfileTool {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }
}

impl Default for ProfileTool {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE)
    }
}

#[async_trait]
impl Tool for ProfileTool {
    fn name(&self) -> &str {
        "profile_background"
    }

    fn description(&self) -> &str {
        "Return my background info to personalize the LinkedIn caption."
    }

    fn schema(&self) -> &Value {
        &PROFILE_SCHEMA
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        let result = ProfileResult {
            profile: self.profile.clone(),
        };
        Ok(serde_json::to_value(result)?)
    }
}
