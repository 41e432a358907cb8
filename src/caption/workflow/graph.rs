// SPDX-License-Identifier: MIT

//! Compiled caption graph and its executor
//!
//! The graph is built once (agents, edge table, retry cap) and shared
//! read-only; every `run` owns a fresh [`WorkflowState`].

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::edge::{route_after_review, Edge, Route, Target};
use super::nodes::{self, NodeId};
use super::state::{WorkflowOutcome, WorkflowState};
use crate::adk::agent::{Agent, LLMAgent};
use crate::adk::error::{CaptionError, Result, WorkflowError};
use crate::adk::model::gemini::GeminiModel;
use crate::adk::model::{GenerationConfig, Model};
use crate::caption::config::{CaptionConfig, DEFAULT_MAX_TRIES};
use crate::caption::tools::ProfileTool;

pub struct CaptionGraph {
    generator: Arc<dyn Agent>,
    reviewer: Arc<dyn Agent>,
    rewriter: Arc<dyn Agent>,
    entry: NodeId,
    edges: HashMap<NodeId, Edge>,
    max_tries: u32,
}

impl CaptionGraph {
    /// Wire the three agents into generate → review ⇄ regenerate
    pub fn new(
        generator: Arc<dyn Agent>,
        reviewer: Arc<dyn Agent>,
        rewriter: Arc<dyn Agent>,
    ) -> Self {
        let edges = HashMap::from([
            (
                NodeId::GenerateCaption,
                Edge::Direct(Target::Node(NodeId::ReviewCaption)),
            ),
            (
                NodeId::ReviewCaption,
                Edge::conditional(
                    route_after_review,
                    [
                        (Route::Yes, Target::End),
                        (Route::Comments, Target::Node(NodeId::RegenerateCaption)),
                    ],
                ),
            ),
            (
                NodeId::RegenerateCaption,
                Edge::Direct(Target::Node(NodeId::ReviewCaption)),
            ),
        ]);

        Self {
            generator,
            reviewer,
            rewriter,
            entry: NodeId::GenerateCaption,
            edges,
            max_tries: DEFAULT_MAX_TRIES,
        }
    }

    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    /// Build the graph against the hosted Gemini model.
    ///
    /// Fails with [`CaptionError::Config`] when the credential is missing;
    /// nothing is contacted in that case.
    pub fn from_config(config: &CaptionConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        let model = GeminiModel::new(config.model_name.clone(), api_key)
            .with_base_url(config.base_url.clone());
        log::info!(
            "Building caption graph on model {} (max tries {})",
            model.model_name(),
            config.max_tries
        );
        Ok(Self::with_model(Arc::new(model), config))
    }

    /// Build the graph on any model. Only the generation agent gets the
    /// profile tool.
    pub fn with_model(model: Arc<dyn Model>, config: &CaptionConfig) -> Self {
        let generation = GenerationConfig::with_temperature(config.temperature);

        let generator = LLMAgent::new(
            NodeId::GenerateCaption.as_str(),
            config.prompts.generate_system.clone(),
            model.clone(),
            vec![Arc::new(ProfileTool::new(config.profile.clone()))],
        )
        .with_config(generation.clone())
        .with_max_turns(config.max_turns);
        let reviewer = LLMAgent::new(
            NodeId::ReviewCaption.as_str(),
            config.prompts.review_system.clone(),
            model.clone(),
            vec![],
        )
        .with_config(generation.clone())
        .with_max_turns(config.max_turns);
        let rewriter = LLMAgent::new(
            NodeId::RegenerateCaption.as_str(),
            config.prompts.regenerate_system.clone(),
            model,
            vec![],
        )
        .with_config(generation)
        .with_max_turns(config.max_turns);

        Self::new(Arc::new(generator), Arc::new(reviewer), Arc::new(rewriter))
            .with_max_tries(config.max_tries)
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// Upper bound on generator calls: one generate, at most
    /// `max(max_tries, 1)` reviews and one rewrite between each pair of
    /// reviews. Every review that does not approve bumps `tries`, so the
    /// review that brings `tries` to the cap is the last one.
    pub fn max_generator_calls(&self) -> u32 {
        self.max_tries.max(1).saturating_mul(2)
    }

    /// Run the loop for `topic` until approval or the retry cap
    pub async fn run(&self, topic: &str) -> Result<WorkflowOutcome> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(CaptionError::input("topic must not be empty"));
        }

        let run_id = Uuid::new_v4();
        let step_limit = self.max_generator_calls();
        let mut state = WorkflowState::new(topic);
        let mut trace = Vec::new();
        let mut current = Target::Node(self.entry);

        log::info!("[{}] caption run started for topic '{}'", run_id, topic);

        while let Target::Node(node) = current {
            if trace.len() >= step_limit as usize {
                log::error!("[{}] exceeded {} steps", run_id, step_limit);
                return Err(WorkflowError::StepLimit(step_limit).into());
            }

            log::info!("[{}] executing node {}", run_id, node);
            if let Err(e) = self.execute_node(node, &mut state).await {
                log::error!("[{}] node {} failed: {}", run_id, node, e);
                return Err(e);
            }
            trace.push(node);

            current = self.next(node, &state)?;
            log::info!(
                "[{}] node {} completed (tries {}), next: {:?}",
                run_id,
                node,
                state.tries,
                current
            );
        }

        log::info!(
            "[{}] caption run finished after {} generator calls",
            run_id,
            trace.len()
        );
        Ok(WorkflowOutcome::new(state, trace))
    }

    async fn execute_node(&self, node: NodeId, state: &mut WorkflowState) -> Result<()> {
        match node {
            NodeId::GenerateCaption => nodes::generate_caption(self.generator.as_ref(), state).await,
            NodeId::ReviewCaption => nodes::review_caption(self.reviewer.as_ref(), state).await,
            NodeId::RegenerateCaption => {
                nodes::regenerate_caption(self.rewriter.as_ref(), state).await
            }
        }
    }

    /// Follow the outgoing edge of `node`
    fn next(&self, node: NodeId, state: &WorkflowState) -> Result<Target> {
        let edge = self
            .edges
            .get(&node)
            .ok_or_else(|| WorkflowError::MissingEdge(node.to_string()))?;

        match edge {
            Edge::Direct(target) => Ok(*target),
            Edge::Conditional { router, targets } => {
                let route = router(state, self.max_tries);
                log::debug!("Router after {} chose '{}'", node, route);
                targets.get(&route).copied().ok_or_else(|| {
                    WorkflowError::MissingRoute {
                        node: node.to_string(),
                        route: route.to_string(),
                    }
                    .into()
                })
            }
        }
    }
}
