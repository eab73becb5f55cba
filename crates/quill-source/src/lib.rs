//! Source file management for the quill compiler front-end.
//!
//! This crate is responsible for:
//! - Holding source text together with its location so diagnostics can be rendered
//! - Bridging resolver diagnostics to miette reports
//! - Loading the session configuration shared by the front-end passes
//!
//! ## Diagnostics
//!
//! Passes collect their diagnostics as plain values. Anything implementing
//! [`miette::Diagnostic`] can be paired with its [`SourceFile`] through
//! [`QuillError::report`], which produces a [`Report`] an external renderer can print.

mod config;
mod diagnostic;
mod error;
mod file;

pub use config::SessionConfig;
pub use diagnostic::{QuillError, Report};
pub use error::ConfigError;
pub use file::SourceFile;

/// Re-exported so downstream crates name spans through one path.
pub use miette::SourceSpan;

/// Builds a span from a start offset and a length.
pub fn span(offset: usize, len: usize) -> SourceSpan {
    SourceSpan::new(offset.into(), len)
}
