//! `simile-cli` library crate.
//!
//! Re-exports the argument definitions and command handlers for
//! integration testing. The binary entrypoint lives in `main.rs`.

pub mod cli;
pub mod commands;
