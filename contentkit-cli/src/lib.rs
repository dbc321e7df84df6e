//! Library half of the `contentkit` binary: argument parsing, logging setup
//! and the command implementations.

pub mod cli;
pub mod commands;
pub mod exit_codes;
pub mod logging;
