//! Stable identifiers for kinds of diagnostics.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A diagnostic code such as `E201` or `N101`.
///
/// The letter is the severity every diagnostic carrying this code is
/// emitted with; the number identifies the condition. Codes are usually
/// declared as constants next to the code that emits them:
///
/// ```
/// use frost_diagnostics::DiagnosticCode;
///
/// const SKIPPED: DiagnosticCode = DiagnosticCode::note(101);
/// assert_eq!(SKIPPED.to_string(), "N101");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// Severity of diagnostics with this code.
    pub severity: Severity,
    /// Number within the severity.
    pub number: u16,
}

impl DiagnosticCode {
    /// An error code.
    pub const fn error(number: u16) -> Self {
        Self {
            severity: Severity::Error,
            number,
        }
    }

    /// A warning code.
    pub const fn warning(number: u16) -> Self {
        Self {
            severity: Severity::Warning,
            number,
        }
    }

    /// A note code.
    pub const fn note(number: u16) -> Self {
        Self {
            severity: Severity::Note,
            number,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.severity.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_is_zero_padded() {
        assert_eq!(DiagnosticCode::error(201).to_string(), "E201");
        assert_eq!(DiagnosticCode::note(7).to_string(), "N007");
    }

    #[test]
    fn constructors_set_severity() {
        assert_eq!(DiagnosticCode::warning(103).severity, Severity::Warning);
        assert_ne!(DiagnosticCode::warning(1), DiagnosticCode::error(1));
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::warning(103);
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, r#"{"severity":"warning","number":103}"#);
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
