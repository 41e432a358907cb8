// SPDX-License-Identifier: MIT

//! LLM Agent - LLM agent with tool calling
//!
//! Sends the instruction and input to the model and executes tool calls in a
//! loop until a text response is received.

use super::Agent;
use crate::adk::error::{CaptionError, Result};
use crate::adk::model::{Content, GenerationConfig, Model, Part};
use crate::adk::tool::Tool;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_MAX_TURNS: u32 = 10;

/// LLM agent with tool calling support
pub struct LLMAgent {
    pub name: String,
    pub instruction: String,
    pub model: Arc<dyn Model>,
    pub tools: Vec<Arc<dyn Tool>>,
    pub config: Option<GenerationConfig>,
    pub max_turns: u32,
    /// HashMap for O(1) tool lookups
    tool_map: HashMap<String, usize>,
}

impl LLMAgent {
    pub fn new(
        name: impl Into<String>,
        instruction: impl Into<String>,
        model: Arc<dyn Model>,
        tools: Vec<Arc<dyn Tool>>,
    ) -> Self {
        let tool_map: HashMap<String, usize> = tools
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name().to_string(), i))
            .collect();

        Self {
            name: name.into(),
            instruction: instruction.into(),
            model,
            tools,
            config: None,
            max_turns: DEFAULT_MAX_TURNS,
            tool_map,
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    fn get_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tool_map.get(name).map(|&i| &self.tools[i])
    }

    async fn call_tool(&self, name: &str, args: &serde_json::Value) -> serde_json::Value {
        log::info!("Agent {} tool call: {} {}", self.name, name, args);

        let Some(tool) = self.get_tool(name) else {
            log::error!("Tool {} not found", name);
            return serde_json::json!({ "error": CaptionError::tool_not_found(name).to_string() });
        };

        match tool.execute(args.clone()).await {
            Ok(res) => res,
            Err(e) => {
                log::error!("Tool {} failed: {}", name, e);
                serde_json::json!({ "error": e.to_string() })
            }
        }
    }
}

#[async_trait]
impl Agent for LLMAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, input: String) -> Result<String> {
        let mut history = vec![Content::system(self.instruction.clone()), Content::user(input)];
        let tools = (!self.tools.is_empty()).then_some(self.tools.as_slice());

        for turn in 0..self.max_turns {
            log::debug!("Agent {} turn {}/{}", self.name, turn + 1, self.max_turns);
            let response = self
                .model
                .generate_content(&history, self.config.as_ref(), tools)
                .await?;

            let function_calls: Vec<(String, serde_json::Value)> = response
                .parts
                .iter()
                .filter_map(|part| match part {
                    Part::FunctionCall { name, args, .. } => Some((name.clone(), args.clone())),
                    _ => None,
                })
                .collect();

            if function_calls.is_empty() {
                let text = response.text();
                if text.is_empty() {
                    log::warn!("Agent {} received empty response", self.name);
                } else {
                    log::info!(
                        "Agent {} returning text response (length: {}, preview: '{}')",
                        self.name,
                        text.len(),
                        text.chars().take(100).collect::<String>()
                    );
                }
                return Ok(text);
            }

            let mut function_responses = Vec::with_capacity(function_calls.len());
            for (name, args) in &function_calls {
                let response = self.call_tool(name, args).await;
                function_responses.push(Part::FunctionResponse {
                    name: name.clone(),
                    response,
                });
            }

            history.push(response);
            history.push(Content {
                role: "user".to_string(),
                parts: function_responses,
            });
        }

        log::error!(
            "Agent {} reached max turns without text response",
            self.name
        );
        Err(CaptionError::MaxIterations {
            kind: "turns".to_string(),
            limit: self.max_turns,
        })
    }
}
