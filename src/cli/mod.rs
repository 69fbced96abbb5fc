//! CLI argument parsing and the dashboard driver.

pub mod args;
pub mod run;
pub mod watch;

pub use args::Cli;
pub use run::execute;
