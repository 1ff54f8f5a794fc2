//! Shared pipeline helpers for CLI commands.
//!
//! Resolves `frost.toml` and the chipdb path, translates the configuration
//! into codec options, loads chip databases and bitstreams, and renders the
//! diagnostics each step produced.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use frost_common::LineSpan;
use frost_config::{CodecConfig, DuplicateNets, UnknownSections, CONFIG_FILE_NAME};
use frost_device::{
    codes, load_bitstream, load_chipdb, read_sections, DecodeSummary, Device, DeviceState,
    DuplicateNetPolicy, EncodeOptions, IngestOptions, UnknownSectionPolicy,
};
use frost_diagnostics::{
    Diagnostic, DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer,
};

use crate::GlobalArgs;

/// Configuration in effect for one command, with the directory that
/// relative paths inside it are resolved against.
#[derive(Debug)]
pub struct Session {
    /// Parsed `frost.toml`, or defaults.
    pub config: CodecConfig,
    /// Directory of the config file, or the working directory.
    pub base_dir: PathBuf,
}

/// Loads the configuration named by `--config`, or `./frost.toml` if present.
///
/// `--config` may point at the file itself or at its directory.
pub fn load_session(global: &GlobalArgs) -> Result<Session, Box<dyn Error>> {
    match global.config {
        Some(ref path) => {
            let path = PathBuf::from(path);
            if path.is_dir() {
                let config = frost_config::load_config(&path)?;
                Ok(Session {
                    config,
                    base_dir: path,
                })
            } else {
                let content = fs::read_to_string(&path)
                    .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
                let config = frost_config::load_config_from_str(&content)?;
                let base_dir = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                Ok(Session { config, base_dir })
            }
        }
        None => {
            let cwd = std::env::current_dir()?;
            let config = if cwd.join(CONFIG_FILE_NAME).is_file() {
                frost_config::load_config(&cwd)?
            } else {
                CodecConfig::default()
            };
            Ok(Session {
                config,
                base_dir: cwd,
            })
        }
    }
}

/// Picks the chipdb: the command-line flag, else `device.chipdb`.
pub fn resolve_chipdb(flag: Option<&str>, session: &Session) -> Result<PathBuf, Box<dyn Error>> {
    if let Some(path) = flag {
        return Ok(PathBuf::from(path));
    }
    match session.config.device.chipdb {
        Some(ref path) => Ok(session.base_dir.join(path)),
        None => Err("no chipdb given (pass --chipdb or set device.chipdb in frost.toml)".into()),
    }
}

/// Ingestion options selected by the `[ingest]` table.
pub fn ingest_options(config: &CodecConfig) -> IngestOptions {
    IngestOptions {
        duplicate_nets: match config.ingest.duplicate_nets {
            DuplicateNets::Reject => DuplicateNetPolicy::Reject,
            DuplicateNets::Overwrite => DuplicateNetPolicy::Overwrite,
        },
        unknown_sections: match config.ingest.unknown_sections {
            UnknownSections::Reject => UnknownSectionPolicy::Reject,
            UnknownSections::Skip => UnknownSectionPolicy::Skip,
        },
    }
}

/// Encoding options selected by the `[output]` table.
pub fn encode_options(config: &CodecConfig) -> EncodeOptions {
    EncodeOptions {
        device_line: config.output.device_line,
    }
}

/// Loads and freezes the device described by the chipdb at `path`.
///
/// Returns `Ok(None)` if the chipdb was read but rejected; the reason has
/// been rendered to stderr.
pub fn load_device(
    path: &Path,
    session: &Session,
    global: &GlobalArgs,
) -> Result<Option<Device>, Box<dyn Error>> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let sink = DiagnosticSink::new();

    let device = match read_sections(&text) {
        Ok(sections) => load_chipdb(&sections, &ingest_options(&session.config), &sink).ok(),
        Err(err) => {
            sink.emit(Diagnostic::new(codes::LOAD_FAILED, err.to_string(), LineSpan::DUMMY));
            None
        }
    };

    render_diagnostics(&sink, &path.display().to_string(), global);
    Ok(device)
}

/// Decodes the bitstream at `path` into `state`.
///
/// Section kinds decode does not interpret are reported as notes. Returns
/// `Ok(None)` if the bitstream was read but rejected.
pub fn decode_bitstream(
    state: &mut DeviceState<'_>,
    path: &Path,
    global: &GlobalArgs,
) -> Result<Option<DecodeSummary>, Box<dyn Error>> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let sink = DiagnosticSink::new();

    let summary = match read_sections(&text) {
        Ok(sections) => load_bitstream(state, &sections, &sink).ok(),
        Err(err) => {
            sink.emit(Diagnostic::new(codes::LOAD_FAILED, err.to_string(), LineSpan::DUMMY));
            None
        }
    };

    render_diagnostics(&sink, &path.display().to_string(), global);
    Ok(summary)
}

/// Renders the sink's diagnostics to stderr, only errors when quiet.
///
/// Unless quiet, a line of per-severity totals follows. Returns the number
/// of diagnostics rendered.
pub fn render_diagnostics(sink: &DiagnosticSink, source: &str, global: &GlobalArgs) -> usize {
    let renderer = TerminalRenderer::new(global.color);
    let mut rendered = 0;
    for diag in sink.take_all() {
        if global.quiet && !diag.is_error() {
            continue;
        }
        eprint!("{}", renderer.render(&diag, source));
        rendered += 1;
    }
    if !global.quiet {
        if let Some(totals) = tally(sink) {
            eprintln!("{source}: {totals}");
        }
    }
    rendered
}

/// Summarises everything emitted to `sink`, most severe first, e.g.
/// `1 error, 2 notes`. `None` if nothing was emitted.
pub fn tally(sink: &DiagnosticSink) -> Option<String> {
    sink.worst()?;
    let parts: Vec<String> = Severity::ALL
        .into_iter()
        .rev()
        .map(|severity| (severity, sink.count(severity)))
        .filter(|&(_, n)| n > 0)
        .map(|(severity, n)| format!("{n} {severity}{}", if n == 1 { "" } else { "s" }))
        .collect();
    Some(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use tempfile::TempDir;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            color: false,
            config: None,
        }
    }

    fn session(config: CodecConfig, dir: &Path) -> Session {
        Session {
            config,
            base_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn session_from_config_file_and_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[device]\nchipdb = \"db/chipdb-1k.txt\"\n",
        )
        .unwrap();

        for config in [
            tmp.path().to_path_buf(),
            tmp.path().join(CONFIG_FILE_NAME),
        ] {
            let global = GlobalArgs {
                config: Some(config.display().to_string()),
                ..quiet()
            };
            let session = load_session(&global).unwrap();
            assert_eq!(session.base_dir, tmp.path());
            assert_eq!(
                resolve_chipdb(None, &session).unwrap(),
                tmp.path().join("db/chipdb-1k.txt")
            );
        }
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let global = GlobalArgs {
            config: Some(tmp.path().join("nope.toml").display().to_string()),
            ..quiet()
        };
        let err = load_session(&global).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn chipdb_flag_wins_over_config() {
        let tmp = TempDir::new().unwrap();
        let mut config = CodecConfig::default();
        config.device.chipdb = Some("from-config.txt".into());
        let session = session(config, tmp.path());
        assert_eq!(
            resolve_chipdb(Some("flag.txt"), &session).unwrap(),
            PathBuf::from("flag.txt")
        );
    }

    #[test]
    fn chipdb_is_required() {
        let tmp = TempDir::new().unwrap();
        let session = session(CodecConfig::default(), tmp.path());
        let err = resolve_chipdb(None, &session).unwrap_err();
        assert!(err.to_string().contains("no chipdb given"));
    }

    #[test]
    fn options_follow_config() {
        let config = frost_config::load_config_from_str(
            "[ingest]\nduplicate_nets = \"overwrite\"\nunknown_sections = \"skip\"\n[output]\ndevice_line = false\n",
        )
        .unwrap();
        assert_eq!(ingest_options(&config), IngestOptions::lenient());
        assert!(!encode_options(&config).device_line);

        let defaults = CodecConfig::default();
        assert_eq!(ingest_options(&defaults), IngestOptions::default());
        assert!(encode_options(&defaults).device_line);
    }

    #[test]
    fn load_device_reports_rejection_as_none() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.txt");
        let bad = tmp.path().join("bad.txt");
        fs::write(&good, fixtures::chipdb_text()).unwrap();
        fs::write(&bad, ".logic_tile 0 0\n").unwrap();
        let session = session(CodecConfig::default(), tmp.path());

        let device = load_device(&good, &session, &quiet()).unwrap().unwrap();
        assert_eq!(device.tiles().len(), 2);
        assert!(load_device(&bad, &session, &quiet()).unwrap().is_none());
        assert!(load_device(&tmp.path().join("missing.txt"), &session, &quiet()).is_err());
    }

    #[test]
    fn decode_bitstream_counts_tiles() {
        let tmp = TempDir::new().unwrap();
        let chipdb = tmp.path().join("chipdb.txt");
        let asc = tmp.path().join("design.asc");
        fs::write(&chipdb, fixtures::chipdb_text()).unwrap();
        let session = session(CodecConfig::default(), tmp.path());
        let device = load_device(&chipdb, &session, &quiet()).unwrap().unwrap();

        fs::write(&asc, fixtures::bitstream_text(&device)).unwrap();
        let mut state = device.new_state();
        let summary = decode_bitstream(&mut state, &asc, &quiet()).unwrap().unwrap();
        assert_eq!(summary.tiles, 2);
        assert_eq!(summary.skipped.get("comment"), Some(&1));

        fs::write(&asc, ".io_tile 0 0\n").unwrap();
        assert!(decode_bitstream(&mut state, &asc, &quiet()).unwrap().is_none());
    }

    #[test]
    fn quiet_renders_only_errors() {
        let sink = DiagnosticSink::new();
        sink.emit(Diagnostic::new(codes::SKIPPED_SECTION, "skipped", LineSpan::DUMMY));
        sink.emit(Diagnostic::new(codes::LOAD_FAILED, "failed", LineSpan::new(3)));
        assert_eq!(render_diagnostics(&sink, "chipdb.txt", &quiet()), 1);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn tally_lists_severities_worst_first() {
        let sink = DiagnosticSink::new();
        assert_eq!(tally(&sink), None);
        sink.emit(Diagnostic::new(codes::SKIPPED_SECTION, "a", LineSpan::DUMMY));
        sink.emit(Diagnostic::new(codes::IGNORED_BITSTREAM_SECTION, "b", LineSpan::DUMMY));
        assert_eq!(tally(&sink).as_deref(), Some("2 notes"));
        sink.emit(Diagnostic::new(codes::LOAD_FAILED, "c", LineSpan::new(4)));
        sink.take_all();
        assert_eq!(tally(&sink).as_deref(), Some("1 error, 2 notes"));
    }
}
