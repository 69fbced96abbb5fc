//! Common test utilities and fixtures for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: credential stores, config files and raw provider reports
//! - `logger`: per-test phase logging to stderr

pub mod fixtures;
pub mod logger;
