// SPDX-License-Identifier: MIT

//! Agent module - the text-in, text-out seam every caption node calls
//!
//! - `LLMAgent` - LLM agent with tool calling

mod llm;

pub use llm::LLMAgent;

use crate::adk::error::Result;
use async_trait::async_trait;

/// Core agent trait
#[async_trait]
pub trait Agent: Send + Sync {
    /// Returns the agent name
    fn name(&self) -> &str;

    /// Run the agent with the given input
    async fn run(&self, input: String) -> Result<String>;
}
