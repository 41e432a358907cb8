// SPDX-License-Identifier: MIT

//! Agent development kit: the model, tool and agent seams the caption
//! workflow is built on.

pub mod agent;
pub mod error;
pub mod model;
pub mod tool;
