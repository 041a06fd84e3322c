//! CLI support for the `bi-migrate` binary
//!
//! One command module per pipeline stage plus `run` for the whole pipeline.

pub mod commands;
pub mod error;
