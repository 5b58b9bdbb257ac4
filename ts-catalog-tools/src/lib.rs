//! Support code for the `tscat` command-line tool

pub mod logging;
pub mod report;
pub mod settings;

pub use logging::{VerbosityLevel, init_logging};
pub use report::{format_issues, format_stats};
pub use settings::{STORED_LANGUAGE_ENV, language_settings};
