// SPDX-License-Identifier: MIT

//! Per-run state threaded through the caption nodes

use serde::Serialize;

use super::nodes::NodeId;

/// Outcome of a review, read from the leading token of the review text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Comments,
}

impl Verdict {
    /// Approved iff the trimmed, lower-cased text starts with "yes"
    pub fn parse(review: &str) -> Self {
        if review.trim().to_lowercase().starts_with("yes") {
            Verdict::Approved
        } else {
            Verdict::Comments
        }
    }
}

/// Mutable record owned by a single run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    topic: String,
    /// Current caption draft
    pub post: String,
    /// Raw text of the last review
    pub review: String,
    /// Non-approving reviews seen so far
    pub tries: u32,
}

impl WorkflowState {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::parse(&self.review)
    }
}

/// Terminal result of a caption run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowOutcome {
    pub post: String,
    pub review: String,
    pub tries: u32,
    /// Nodes in execution order; one entry per generator call
    pub trace: Vec<NodeId>,
}

impl WorkflowOutcome {
    pub(crate) fn new(state: WorkflowState, trace: Vec<NodeId>) -> Self {
        Self {
            post: state.post,
            review: state.review,
            tries: state.tries,
            trace,
        }
    }

    /// `(final post, last review)`
    pub fn into_pair(self) -> (String, String) {
        (self.post, self.review)
    }

    /// How many times `node` ran
    pub fn count(&self, node: NodeId) -> usize {
        self.trace.iter().filter(|n| **n == node).count()
    }

    pub fn generator_calls(&self) -> usize {
        self.trace.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_parse() {
        assert_eq!(Verdict::parse("yes"), Verdict::Approved);
        assert_eq!(Verdict::parse("  YES\n"), Verdict::Approved);
        assert_eq!(Verdict::parse("Yes, ship it."), Verdict::Approved);
        assert_eq!(Verdict::parse("comments\n- shorten"), Verdict::Comments);
        assert_eq!(Verdict::parse(""), Verdict::Comments);
        assert_eq!(Verdict::parse("no"), Verdict::Comments);
    }

    #[test]
    fn test_new_state_is_blank() {
        let state = WorkflowState::new("Rust");
        assert_eq!(state.topic(), "Rust");
        assert!(state.post.is_empty());
        assert!(state.review.is_empty());
        assert_eq!(state.tries, 0);
        // An empty review never approves
        assert_eq!(state.verdict(), Verdict::Comments);
    }

    #[test]
    fn test_outcome_counts() {
        let mut state = WorkflowState::new("t");
        state.post = "final".to_string();
        state.review = "yes".to_string();
        let outcome = WorkflowOutcome::new(
            state,
            vec![
                NodeId::GenerateCaption,
                NodeId::ReviewCaption,
                NodeId::RegenerateCaption,
                NodeId::ReviewCaption,
            ],
        );

        assert_eq!(outcome.generator_calls(), 4);
        assert_eq!(outcome.count(NodeId::ReviewCaption), 2);
        assert_eq!(outcome.count(NodeId::RegenerateCaption), 1);
        assert_eq!(
            outcome.into_pair(),
            ("final".to_string(), "yes".to_string())
        );
    }
}
