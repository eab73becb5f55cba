//! Diagnostic report plumbing for the quill front-end.
//!
//! Passes return their diagnostics as ordinary values (see `quill_resolve::ResolutionError`).
//! Rendering them to a terminal is not the front-end's job; this module only pairs a
//! diagnostic with the text of the file it points into, so that miette (or any other
//! renderer) can show labels with source context.

use crate::SourceFile;
use miette::{Diagnostic, Severity};
use std::{fmt, sync::Arc};

/// A diagnostic bundled with the source text its spans refer to.
#[derive(Debug, Clone)]
pub struct Report {
    /// Where the source text came from
    pub location: String,

    /// The source code text for context in error displays
    pub source_code: String,

    /// The diagnostic itself
    pub report: Arc<dyn QuillError>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.report, f)
    }
}

impl std::error::Error for Report {}

/// Delegates everything to the wrapped diagnostic except `source_code`, which is the
/// reason this wrapper exists.
impl Diagnostic for Report {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.report.code()
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        self.report.diagnostic_source()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.report.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        self.report.labels()
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        self.report.related()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }

    fn url<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.report.url()
    }

    fn severity(&self) -> Option<Severity> {
        self.report.severity()
    }
}

/// Errors that can be reported against a [`SourceFile`].
///
/// Blanket-implemented for every miette diagnostic that can cross threads.
pub trait QuillError: Diagnostic + Send + Sync + 'static {
    /// Wraps this diagnostic into a [`Report`] carrying the text of `file`.
    fn report(self, file: &SourceFile) -> Report
    where
        Self: Sized,
    {
        Report {
            location: file.location().to_string(),
            source_code: file.contents().to_string(),
            report: Arc::new(self),
        }
    }

    /// Whether this diagnostic should block later pipeline stages.
    fn is_error(&self) -> bool {
        !matches!(self.severity(), Some(Severity::Warning) | Some(Severity::Advice))
    }
}

impl<T: Diagnostic + Send + Sync + 'static> QuillError for T {}
