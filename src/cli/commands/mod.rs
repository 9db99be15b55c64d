//! CLI command implementations.

mod config;
mod metadata;
mod transcript;

pub use config::run_config;
pub use metadata::run_metadata;
pub use transcript::run_transcript;
