// ABOUTME: Library root for ucdeploy - exposes the publish pipeline for testing.
// ABOUTME: The command-line binary is in main.rs.

pub mod build;
pub mod client;
pub mod config;
pub mod delivery;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod publish;
pub mod types;
