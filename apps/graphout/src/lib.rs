//! # Graphout
//!
//! Command-line driver for the graphout-core serializer framework.
//!
//! - `cli`: clap command definitions and their implementations
//! - `config`: `graphout.toml` loading and command-line overrides
//! - `document`: the JSON statement documents the `serialize` command reads

pub mod cli;
pub mod config;
pub mod document;
