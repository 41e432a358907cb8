// SPDX-License-Identifier: MIT

//! Generate → review → regenerate caption workflow
//!
//! - `state` - per-run record and review verdicts
//! - `nodes` - the three caption nodes and their prompts
//! - `edge` - edge table types and the post-review router
//! - `graph` - the compiled graph and its executor

pub mod edge;
pub mod graph;
pub mod nodes;
pub mod state;

pub use edge::{route_after_review, Edge, Route, Target};
pub use graph::CaptionGraph;
pub use nodes::NodeId;
pub use state::{Verdict, WorkflowOutcome, WorkflowState};
