// SPDX-License-Identifier: MIT

//! Edges and routing for the caption graph

use std::collections::HashMap;
use std::fmt;

use super::nodes::NodeId;
use super::state::{Verdict, WorkflowState};

/// Decision returned by a router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Stop: approved, or the retry cap was reached
    Yes,
    /// Rewrite using the review notes
    Comments,
}

impl Route {
    pub fn label(&self) -> &'static str {
        match self {
            Route::Yes => "yes",
            Route::Comments => "comments",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where an edge leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Node(NodeId),
    End,
}

/// Router function type: state and retry cap in, route out
pub type RouterFn = fn(&WorkflowState, u32) -> Route;

#[derive(Clone)]
pub enum Edge {
    /// Always go to `Target`
    Direct(Target),
    /// Ask the router, then look the route up in `targets`
    Conditional {
        router: RouterFn,
        targets: HashMap<Route, Target>,
    },
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Direct(target) => f.debug_tuple("Direct").field(target).finish(),
            Edge::Conditional { targets, .. } => f
                .debug_struct("Conditional")
                .field("targets", targets)
                .finish(),
        }
    }
}

impl Edge {
    pub fn conditional<I>(router: RouterFn, targets: I) -> Self
    where
        I: IntoIterator<Item = (Route, Target)>,
    {
        Edge::Conditional {
            router,
            targets: targets.into_iter().collect(),
        }
    }
}

/// Routing decision after a review.
///
/// Once `tries` reaches `max_tries` the run stops whatever the review says.
pub fn route_after_review(state: &WorkflowState, max_tries: u32) -> Route {
    if state.tries >= max_tries {
        return Route::Yes;
    }
    match state.verdict() {
        Verdict::Approved => Route::Yes,
        Verdict::Comments => Route::Comments,
    }
}
