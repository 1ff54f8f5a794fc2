//! Diagnostic codes emitted while loading chip databases and bitstreams.

use frost_diagnostics::DiagnosticCode;

/// A known chipdb section kind that the model does not use was skipped.
pub const SKIPPED_SECTION: DiagnosticCode = DiagnosticCode::note(101);

/// An unrecognised chipdb section was skipped.
pub const UNKNOWN_SECTION: DiagnosticCode = DiagnosticCode::warning(102);

/// A net index was declared again and the earlier net discarded.
pub const NET_OVERWRITTEN: DiagnosticCode = DiagnosticCode::warning(103);

/// Bitstream sections that decode does not interpret.
pub const IGNORED_BITSTREAM_SECTION: DiagnosticCode = DiagnosticCode::note(104);

/// Ingestion or decode failed.
pub const LOAD_FAILED: DiagnosticCode = DiagnosticCode::error(201);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_with_prefix() {
        let rendered: Vec<String> = [
            SKIPPED_SECTION,
            UNKNOWN_SECTION,
            NET_OVERWRITTEN,
            IGNORED_BITSTREAM_SECTION,
            LOAD_FAILED,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(rendered, ["N101", "W102", "W103", "N104", "E201"]);
    }
}
