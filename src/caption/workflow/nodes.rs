// SPDX-License-Identifier: MIT

//! The three caption nodes
//!
//! Each node builds the human message for its agent, calls the agent exactly
//! once and writes the result into the state. The system instruction lives
//! on the agent. Errors are returned unchanged.

use serde::Serialize;
use std::fmt;

use super::state::{Verdict, WorkflowState};
use crate::adk::agent::Agent;
use crate::adk::error::{CaptionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    GenerateCaption,
    ReviewCaption,
    RegenerateCaption,
}

impl NodeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeId::GenerateCaption => "generate_caption",
            NodeId::ReviewCaption => "review_caption",
            NodeId::RegenerateCaption => "regenerate_caption",
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn generate_prompt(topic: &str) -> String {
    format!(
        "Write a LinkedIn caption for this topic: {}. Use my background if useful via tools.",
        topic
    )
}

pub fn review_prompt(post: &str) -> String {
    format!(
        "Review this LinkedIn post. If no changes are needed reply ONLY 'yes'. \
         Otherwise reply ONLY 'comments' and then give bullet-point improvements.\n\nPOST:\n{}",
        post
    )
}

pub fn regenerate_prompt(post: &str, review: &str) -> String {
    format!(
        "Rewrite the post using these review notes.\n\nPOST:\n{}\n\nREVIEW:\n{}",
        post, review
    )
}

/// Draft the first caption for the topic
pub async fn generate_caption(agent: &dyn Agent, state: &mut WorkflowState) -> Result<()> {
    let post = agent.run(generate_prompt(state.topic())).await?;
    state.post = non_empty_post(post, NodeId::GenerateCaption)?;
    Ok(())
}

/// Review the current caption; a non-approving review bumps `tries`
pub async fn review_caption(agent: &dyn Agent, state: &mut WorkflowState) -> Result<()> {
    let review = agent.run(review_prompt(&state.post)).await?;
    state.review = review;
    if state.verdict() == Verdict::Comments {
        state.tries += 1;
    }
    Ok(())
}

/// Rewrite the caption using the last review
pub async fn regenerate_caption(agent: &dyn Agent, state: &mut WorkflowState) -> Result<()> {
    let post = agent
        .run(regenerate_prompt(&state.post, &state.review))
        .await?;
    state.post = non_empty_post(post, NodeId::RegenerateCaption)?;
    Ok(())
}

fn non_empty_post(post: String, node: NodeId) -> Result<String> {
    if post.trim().is_empty() {
        return Err(CaptionError::invalid_response(format!(
            "{} produced an empty caption",
            node
        )));
    }
    Ok(post)
}
