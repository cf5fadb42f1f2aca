//! CLI command implementations for sentimap operations.
//!
//! Available commands:
//! - **analyze**: Resolve labels for comment batches and report statistics
//! - **init**: Initialize a new sentimap configuration file

pub mod analyze;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeConfig, LabelFilter};
pub use init::init_config;
