//! Presentation layer for clinicsim
//!
//! The CLI surface: argument definitions, progress reporting and console
//! output formatting.

pub mod cli;
pub mod output;
pub mod progress;

pub use cli::Cli;
pub use output::ConsoleFormatter;
pub use progress::{ProgressReporter, SimpleProgress};
