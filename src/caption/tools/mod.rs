// SPDX-License-Identifier: MIT

pub mod profile;

pub use profile::ProfileTool;
