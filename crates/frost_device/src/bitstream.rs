//! Bitstream decoding with diagnostics.
//!
//! [`load_bitstream`] is to [`DeviceState::decode`] what
//! [`load_chipdb`](crate::load_chipdb) is to the builder: the same work,
//! with every problem also reported against the line that caused it.

use crate::codes;
use crate::device::{DecodeSummary, DeviceState};
use crate::error::DeviceResult;
use crate::section::Section;
use frost_common::LineSpan;
use frost_diagnostics::{Diagnostic, DiagnosticSink};

/// Decodes the tile sections of a bitstream into `state`.
///
/// Each kind of non-tile section is reported once as an `N104` note at its
/// first occurrence. A failing section is reported as `E201` at its header
/// line before the error is returned.
///
/// # Errors
///
/// Any error of [`DeviceState::decode`].
pub fn load_bitstream(
    state: &mut DeviceState<'_>,
    sections: &[Section],
    sink: &DiagnosticSink,
) -> DeviceResult<DecodeSummary> {
    let mut summary = DecodeSummary::default();
    for section in sections {
        if let Err(err) = state.decode_section(section, &mut summary) {
            sink.emit(
                Diagnostic::new(codes::LOAD_FAILED, err.to_string(), section.span)
                    .with_note(format!("in '.{} {}'", section.label, section.header.join(" "))),
            );
            return Err(err);
        }
    }

    for (label, count) in &summary.skipped {
        let span = sections
            .iter()
            .find(|s| &s.label == label)
            .map_or(LineSpan::DUMMY, |s| s.span);
        sink.emit(Diagnostic::new(
            codes::IGNORED_BITSTREAM_SECTION,
            format!("ignored {count} '.{label}' section(s)"),
            span,
        ));
    }
    Ok(summary)
}
