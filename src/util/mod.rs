//! Utility functions.

pub mod env;
pub mod time;

pub use time::{format_clock, format_countdown, format_timestamp};
