//! dpservice CLI
//!
//! Command tree, configuration and renderers of the `dpservice-cli`
//! binary.

pub mod commands;
pub mod config;
pub mod output;
