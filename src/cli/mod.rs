//! Command Line Interface for lexisense.

pub mod args;
pub mod commands;
pub mod output;
pub mod records;

// Re-export commonly used types
pub use args::*;
pub use commands::*;
pub use output::*;
pub use records::*;
