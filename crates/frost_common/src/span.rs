//! Line locations within chipdb and bitstream text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based line number within a text source.
///
/// Chipdb and ASCII bitstream files are line-oriented, so a section is
/// located by the line of its `.label` header. Line `0` means "unknown".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct LineSpan {
    /// The 1-based line number, or `0` when no location is available.
    pub line: u32,
}

impl LineSpan {
    /// A span used when no source location is available.
    pub const DUMMY: LineSpan = LineSpan { line: 0 };

    /// Creates a span pointing at the given 1-based line.
    pub fn new(line: u32) -> Self {
        Self { line }
    }

    /// Returns `true` if this is the dummy span.
    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_is_zero() {
        assert!(LineSpan::DUMMY.is_dummy());
        assert!(!LineSpan::new(3).is_dummy());
        assert_eq!(LineSpan::default(), LineSpan::DUMMY);
    }

    #[test]
    fn ordering_follows_lines() {
        assert!(LineSpan::new(2) < LineSpan::new(10));
    }

    #[test]
    fn display_is_line_number() {
        assert_eq!(format!("{}", LineSpan::new(42)), "42");
    }

    #[test]
    fn serde_roundtrip() {
        let span = LineSpan::new(17);
        let json = serde_json::to_string(&span).unwrap();
        let back: LineSpan = serde_json::from_str(&json).unwrap();
        assert_eq!(span, back);
    }
}
