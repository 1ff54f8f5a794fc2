//! A single diagnostic message.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use frost_common::LineSpan;
use serde::{Deserialize, Serialize};

/// A message about one line of chipdb or bitstream text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Taken from the code.
    pub severity: Severity,
    /// What kind of condition this is.
    pub code: DiagnosticCode,
    /// The main message.
    pub message: String,
    /// The line the message is about, or [`LineSpan::DUMMY`].
    pub span: LineSpan,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// Suggestions for the user.
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with the severity of its code.
    pub fn new(code: DiagnosticCode, message: impl Into<String>, span: LineSpan) -> Self {
        Self {
            severity: code.severity,
            code,
            message: message.into(),
            span,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Adds a footnote.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a suggestion.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Returns `true` for error-severity diagnostics.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_code() {
        let diag = Diagnostic::new(
            DiagnosticCode::error(201),
            "net 7 is already defined",
            LineSpan::new(12),
        );
        assert!(diag.is_error());
        assert_eq!(diag.span.line, 12);

        let diag = Diagnostic::new(DiagnosticCode::note(101), "skipped", LineSpan::DUMMY);
        assert_eq!(diag.severity, Severity::Note);
        assert!(!diag.is_error());
    }

    #[test]
    fn footnotes_accumulate() {
        let diag = Diagnostic::new(DiagnosticCode::warning(103), "net 4 redefined", LineSpan::new(9))
            .with_note("the previous definition is discarded")
            .with_help("set ingest.duplicate_nets = \"reject\" to make this an error")
            .with_help("or remove the second .net 4");
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 2);
    }

    #[test]
    fn json_keeps_everything() {
        let diag = Diagnostic::new(DiagnosticCode::error(201), "boom", LineSpan::new(1)).with_note("n");
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, "boom");
        assert_eq!(back.notes, vec!["n"]);
        assert_eq!(back.code, diag.code);
        assert_eq!(back.span, LineSpan::new(1));
    }
}
