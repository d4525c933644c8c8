//! Command handlers: translate parsed arguments into service calls and
//! display the results.

pub mod artifact;
pub mod completions;
pub mod config;
pub mod deps;
pub mod project;
