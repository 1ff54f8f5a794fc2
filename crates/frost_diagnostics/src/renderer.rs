//! Diagnostic rendering for terminal output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic. `source` names the text the diagnostic's
    /// line refers to, typically a file path.
    fn render(&self, diag: &Diagnostic, source: &str) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[W103]: net 12 redefined, previous definition discarded
///   --> chipdb-1k.txt:4711
///    = help: set ingest.duplicate_nets = "reject" to make this an error
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[1;{}m{text}\x1b[0m", severity.ansi_color())
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source: &str) -> String {
        let mut out = String::new();

        let head = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(diag.severity, &head),
            diag.message
        ));

        if !diag.span.is_dummy() {
            out.push_str(&format!("  --> {source}:{}\n", diag.span));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;
    use frost_common::LineSpan;

    #[test]
    fn render_error_with_line() {
        let diag = Diagnostic::new(
            DiagnosticCode::error(201),
            "malformed bit reference 'B0x'",
            LineSpan::new(23),
        );
        let output = TerminalRenderer::new(false).render(&diag, "chipdb-1k.txt");
        assert!(output.contains("error[E201]: malformed bit reference 'B0x'"));
        assert!(output.contains("--> chipdb-1k.txt:23"));
    }

    #[test]
    fn render_without_line_omits_location() {
        let diag = Diagnostic::new(
            DiagnosticCode::note(101),
            "skipped 2 '.pins' sections",
            LineSpan::DUMMY,
        );
        let output = TerminalRenderer::new(false).render(&diag, "chipdb-1k.txt");
        assert!(output.starts_with("note[N101]: skipped 2 '.pins' sections"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn render_notes_and_help() {
        let diag = Diagnostic::new(
            DiagnosticCode::warning(103),
            "net 3 redefined",
            LineSpan::new(7),
        )
        .with_note("the previous definition is discarded")
        .with_help("reject duplicates instead");
        let output = TerminalRenderer::new(false).render(&diag, "db.txt");
        assert!(output.contains("= note: the previous definition is discarded"));
        assert!(output.contains("= help: reject duplicates instead"));
    }

    #[test]
    fn color_wraps_header_in_ansi() {
        let diag = Diagnostic::new(
            DiagnosticCode::error(201),
            "x",
            LineSpan::DUMMY,
        );
        let output = TerminalRenderer::new(true).render(&diag, "db.txt");
        assert!(output.starts_with("\x1b[1;31merror[E201]\x1b[0m: x"));
    }
}
