// Copyright 2025-2026 Neil Henderson
//
//! The `diagnostics` module defines errors and warnings emitted by the compiler, and the `ErrorHandler`
//! sink that collects them.
//!
//! Compiler stages record recoverable problems as [Diagnostic] values on the [ErrorHandler] and keep
//! going, so that a single run surfaces as many problems as possible. The driver inspects
//! [ErrorHandler::error_occurred] after each stage and aborts the pipeline once errors exist.

use std::fmt;
use std::io::{self, Write};

use crate::core::SourceLocation;

/// A diagnostic emitted by the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    location: SourceLocation,
}

/// The kind of diagnostic.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DiagnosticKind {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticKind::Error => write!(f, "error"),
            DiagnosticKind::Warning => write!(f, "warning"),
        }
    }
}

impl Diagnostic {
    /// Creates an error diagnostic with the given message and source code location.
    pub fn error_at_location(message: String, location: SourceLocation) -> Self {
        Self { kind: DiagnosticKind::Error, message, location }
    }

    /// Creates a warning diagnostic with the given message and source code location.
    pub fn warning_at_location(message: String, location: SourceLocation) -> Self {
        Self { kind: DiagnosticKind::Warning, message, location }
    }

    /// The kind of diagnostic.
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// The diagnostic's message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source code location the diagnostic refers to.
    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.location == SourceLocation::none() {
            write!(f, "{}: {}", self.kind, self.message)
        } else {
            write!(f, "{}: {}: {}", self.location, self.kind, self.message)
        }
    }
}

/// Collects the diagnostics emitted by the compiler stages.
///
/// The handler is append-only while a stage runs. Warnings never affect the outcome of a stage;
/// errors make the driver abort the pipeline after the stage returns.
#[derive(Debug, Default)]
pub struct ErrorHandler {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl ErrorHandler {
    /// Creates a new, empty error handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error diagnostic at the given location.
    pub fn error<S: Into<String>>(&mut self, location: SourceLocation, message: S) {
        self.add_diagnostic(Diagnostic::error_at_location(message.into(), location));
    }

    /// Records a warning diagnostic at the given location.
    pub fn warn<S: Into<String>>(&mut self, location: SourceLocation, message: S) {
        self.add_diagnostic(Diagnostic::warning_at_location(message.into(), location));
    }

    /// Adds a diagnostic (error or warning).
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        match diagnostic.kind() {
            DiagnosticKind::Error => self.error_count += 1,
            DiagnosticKind::Warning => self.warning_count += 1,
        }

        self.diagnostics.push(diagnostic);
    }

    /// Have any error diagnostics been recorded?
    pub fn error_occurred(&self) -> bool {
        self.error_count > 0
    }

    /// The number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// The number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// All recorded diagnostics, in the order they were emitted.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Writes every recorded diagnostic to the given sink, one per line.
    pub fn print_all<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(out, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_and_warnings_are_counted_separately() {
        let mut handler = ErrorHandler::new();
        assert!(!handler.error_occurred());

        handler.warn(SourceLocation::new(1, 1), "something dubious");
        assert!(!handler.error_occurred());
        assert_eq!(1, handler.warning_count());

        handler.error(SourceLocation::new(2, 5), "something wrong");
        assert!(handler.error_occurred());
        assert_eq!(1, handler.error_count());
        assert_eq!(2, handler.diagnostics().len());
    }

    #[test]
    fn diagnostics_render_with_location_and_severity() {
        let error = Diagnostic::error_at_location("invalid variable type".to_string(), SourceLocation::new(3, 7));
        assert_eq!("3:7: error: invalid variable type", error.to_string());

        let warning = Diagnostic::warning_at_location("suspicious".to_string(), SourceLocation::none());
        assert_eq!("warning: suspicious", warning.to_string());
    }

    #[test]
    fn print_all_writes_one_line_per_diagnostic() {
        let mut handler = ErrorHandler::new();
        handler.error(SourceLocation::new(1, 2), "first");
        handler.warn(SourceLocation::new(3, 4), "second");

        let mut out = Vec::new();
        handler.print_all(&mut out).unwrap();

        assert_eq!("1:2: error: first\n3:4: warning: second\n", String::from_utf8(out).unwrap());
    }
}
