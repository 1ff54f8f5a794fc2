//! Chip database loading.
//!
//! A chipdb is a flat list of sections. [`load_chipdb`] sorts them by label
//! and feeds them to a [`DeviceBuilder`] in dependency order: the device
//! header, the four schemas, placements, nets, switches, buffers. Section
//! kinds the model has no use for (package pins, global buffers, DSP and
//! IP-connect tiles, extra bits) are skipped with a note.

use crate::builder::{DeviceBuilder, Ingested};
use crate::codes;
use crate::device::Device;
use crate::error::{DeviceError, DeviceResult};
use crate::kind::TileKind;
use crate::options::{IngestOptions, UnknownSectionPolicy};
use crate::routing::RoutingKind;
use crate::section::Section;
use frost_common::LineSpan;
use frost_diagnostics::{Diagnostic, DiagnosticSink};
use std::collections::BTreeMap;

const UNMODELLED: &[&str] = &[
    "pins",
    "gbufin",
    "gbufpin",
    "iolatch",
    "ieren",
    "colbuf",
    "ipcon_tile",
    "ipcon_tile_bits",
    "extra_cell",
    "extra_bits",
];

fn is_unmodelled(label: &str) -> bool {
    if UNMODELLED.contains(&label) {
        return true;
    }
    // dsp0_tile .. dsp3_tile and their *_bits schemas
    let Some(rest) = label.strip_prefix("dsp") else {
        return false;
    };
    let mut chars = rest.chars();
    matches!(chars.next(), Some('0'..='3'))
        && matches!(chars.as_str(), "_tile" | "_tile_bits")
}

#[derive(Default)]
struct Sorted<'a> {
    device: Vec<&'a Section>,
    schemas: [Vec<&'a Section>; 4],
    placements: [Vec<&'a Section>; 4],
    nets: Vec<&'a Section>,
    switches: Vec<&'a Section>,
    buffers: Vec<&'a Section>,
    skipped: BTreeMap<&'a str, (usize, LineSpan)>,
}

/// Builds a frozen [`Device`] from chipdb sections.
///
/// Progress and problems are reported to `sink`; every error is also
/// emitted there as an `E201` diagnostic before it is returned.
///
/// # Errors
///
/// - [`DeviceError::MissingSection`] without a `.device` section.
/// - [`DeviceError::MissingSchema`] if any of the four schemas is absent.
/// - [`DeviceError::UnknownSection`] for an unrecognised label, unless
///   `options` skip unknown sections.
/// - Any ingestion error raised by [`DeviceBuilder::process_section`].
pub fn load_chipdb(
    sections: &[Section],
    options: &IngestOptions,
    sink: &DiagnosticSink,
) -> DeviceResult<Device> {
    let sorted = sort(sections, options, sink)?;

    for (label, (count, span)) in &sorted.skipped {
        sink.emit(Diagnostic::new(
            codes::SKIPPED_SECTION,
            format!("skipped {count} '.{label}' section(s)"),
            *span,
        ));
    }

    let mut builder = DeviceBuilder::with_options(*options);

    let Some(&device) = sorted.device.first() else {
        return fail(sink, LineSpan::DUMMY, DeviceError::MissingSection("device".into()));
    };
    ingest(&mut builder, sink, device)?;
    for &extra in &sorted.device[1..] {
        ingest(&mut builder, sink, extra)?;
    }

    for kind in TileKind::ALL {
        let schemas = &sorted.schemas[kind.slot()];
        if schemas.is_empty() {
            return fail(sink, LineSpan::DUMMY, DeviceError::MissingSchema(kind));
        }
        for &section in schemas {
            ingest(&mut builder, sink, section)?;
        }
    }

    for kind in TileKind::ALL {
        for &section in &sorted.placements[kind.slot()] {
            ingest(&mut builder, sink, section)?;
        }
    }

    for &section in &sorted.nets {
        if let Ingested::Net { id, replaced: true } = ingest(&mut builder, sink, section)? {
            sink.emit(
                Diagnostic::new(
                    codes::NET_OVERWRITTEN,
                    format!("net {id} redefined, previous definition discarded"),
                    section.span,
                )
                .with_help("set ingest.duplicate_nets = \"reject\" to make this an error"),
            );
        }
    }

    for &section in sorted.switches.iter().chain(&sorted.buffers) {
        ingest(&mut builder, sink, section)?;
    }

    builder.freeze();
    builder.finish().or_else(|err| fail(sink, LineSpan::DUMMY, err))
}

fn sort<'a>(
    sections: &'a [Section],
    options: &IngestOptions,
    sink: &DiagnosticSink,
) -> DeviceResult<Sorted<'a>> {
    let mut sorted = Sorted::default();

    for section in sections {
        let label = section.label.as_str();
        if label == "device" {
            sorted.device.push(section);
        } else if let Some(kind) = TileKind::from_bits_label(label) {
            sorted.schemas[kind.slot()].push(section);
        } else if let Some(kind) = TileKind::from_label(label) {
            sorted.placements[kind.slot()].push(section);
        } else if label == "net" {
            sorted.nets.push(section);
        } else if let Some(kind) = RoutingKind::from_label(label) {
            match kind {
                RoutingKind::Switch => sorted.switches.push(section),
                RoutingKind::Buffer => sorted.buffers.push(section),
            }
        } else if is_unmodelled(label) {
            let entry = sorted.skipped.entry(label).or_insert((0, section.span));
            entry.0 += 1;
        } else if options.unknown_sections == UnknownSectionPolicy::Skip {
            sink.emit(Diagnostic::new(
                codes::UNKNOWN_SECTION,
                format!("unknown section '.{label}' skipped"),
                section.span,
            ));
        } else {
            return fail(sink, section.span, DeviceError::UnknownSection(label.to_string()));
        }
    }

    Ok(sorted)
}

fn ingest(
    builder: &mut DeviceBuilder,
    sink: &DiagnosticSink,
    section: &Section,
) -> DeviceResult<Ingested> {
    builder
        .process_section(section)
        .or_else(|err| fail(sink, section.span, err))
}

fn fail<T>(sink: &DiagnosticSink, span: LineSpan, err: DeviceError) -> DeviceResult<T> {
    sink.emit(Diagnostic::new(codes::LOAD_FAILED, err.to_string(), span));
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::tests::schema_section;
    use crate::ids::NetId;
    use crate::section::read_sections;
    use frost_diagnostics::Severity;

    fn chipdb(extra: &[Section]) -> Vec<Section> {
        let mut sections = vec![
            Section::new("logic_tile", ["0", "0"]),
            Section::new("net", ["0"]).with_lines(["0 0 lutff_0/out", "1 0 span4_0"]),
            Section::new("device", ["1k", "2", "1", "2"]),
            Section::new("io_tile", ["1", "0"]),
            Section::new("net", ["1"]).with_lines(["0 0 local_g0_0"]),
            Section::new("buffer", ["0", "0", "0", "B3[15]"]).with_lines(["1 1"]),
        ];
        sections.extend(TileKind::ALL.map(schema_section));
        sections.extend(extra.iter().cloned());
        sections
    }

    #[test]
    fn sections_are_applied_in_dependency_order() {
        let sink = DiagnosticSink::new();
        let device = load_chipdb(&chipdb(&[]), &IngestOptions::default(), &sink).unwrap();
        assert_eq!(device.tiles().len(), 2);
        assert_eq!(device.nets().count(), 2);
        assert_eq!(device.tile_at(0, 0).unwrap().routing().len(), 1);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn unmodelled_sections_are_noted_once_per_label() {
        let extra = [
            Section::new("pins", ["tq144"]).with_lines(["1 0 0 0"]),
            Section::new("dsp0_tile_bits", ["54", "16"]),
            Section::new("extra_bits", Vec::<String>::new()),
            Section::new("extra_bits", Vec::<String>::new()),
        ];
        let sink = DiagnosticSink::new();
        load_chipdb(&chipdb(&extra), &IngestOptions::default(), &sink).unwrap();
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 3);
        assert!(diags.iter().all(|d| d.code == codes::SKIPPED_SECTION));
        assert!(diags.iter().any(|d| d.message == "skipped 2 '.extra_bits' section(s)"));
    }

    #[test]
    fn missing_device_section() {
        let sections: Vec<Section> = chipdb(&[])
            .into_iter()
            .filter(|s| s.label != "device")
            .collect();
        let sink = DiagnosticSink::new();
        let err = load_chipdb(&sections, &IngestOptions::default(), &sink).unwrap_err();
        assert_eq!(err, DeviceError::MissingSection("device".into()));
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn every_schema_is_required() {
        let sections: Vec<Section> = chipdb(&[])
            .into_iter()
            .filter(|s| s.label != "ramt_tile_bits")
            .collect();
        let sink = DiagnosticSink::new();
        assert_eq!(
            load_chipdb(&sections, &IngestOptions::default(), &sink).unwrap_err(),
            DeviceError::MissingSchema(TileKind::RamTop)
        );
    }

    #[test]
    fn unknown_section_policy() {
        let extra = [Section::new("sdram_tile", ["0", "0"])];

        let sink = DiagnosticSink::new();
        let err = load_chipdb(&chipdb(&extra), &IngestOptions::default(), &sink).unwrap_err();
        assert_eq!(err, DeviceError::UnknownSection("sdram_tile".into()));
        assert!(sink.has_errors());

        let sink = DiagnosticSink::new();
        load_chipdb(&chipdb(&extra), &IngestOptions::lenient(), &sink).unwrap();
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, codes::UNKNOWN_SECTION);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn duplicate_net_policy() {
        let extra = [Section::new("net", ["1"]).with_lines(["1 0 local_g0_0"])];

        let sink = DiagnosticSink::new();
        let err = load_chipdb(&chipdb(&extra), &IngestOptions::default(), &sink).unwrap_err();
        assert_eq!(err, DeviceError::DuplicateNet(NetId::from_raw(1)));

        let sink = DiagnosticSink::new();
        let device = load_chipdb(&chipdb(&extra), &IngestOptions::lenient(), &sink).unwrap();
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, codes::NET_OVERWRITTEN);
        let io = device.tile_at(1, 0).unwrap().id();
        assert!(device.net(NetId::from_raw(1)).unwrap().wire_at(io).is_some());
    }

    #[test]
    fn ingestion_errors_carry_the_section_line() {
        let text = "\
.device 1k 1 1 1
.logic_tile_bits 1 1
NegClk B0[0]
";
        let sink = DiagnosticSink::new();
        let err = load_chipdb(&read_sections(text).unwrap(), &IngestOptions::default(), &sink)
            .unwrap_err();
        assert!(matches!(err, DeviceError::IncompleteSchema { kind: TileKind::Logic, .. }));
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, codes::LOAD_FAILED);
        assert_eq!(diags[0].span, LineSpan::new(2));
    }

    #[test]
    fn dsp_labels() {
        assert!(is_unmodelled("dsp0_tile"));
        assert!(is_unmodelled("dsp3_tile_bits"));
        assert!(!is_unmodelled("dsp4_tile"));
        assert!(!is_unmodelled("dsp0_tiles"));
        assert!(!is_unmodelled("dsp"));
    }
}
