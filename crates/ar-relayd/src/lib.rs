//! Artifact relay daemon — library crate.
//!
//! Re-exports the config, handler, and service modules so integration
//! tests can wire up a relay without going through the binary.

pub mod config;
pub mod handler;
pub mod service;
