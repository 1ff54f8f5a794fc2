//! `frost dump`: print a decoded bitstream as JSON.

use std::error::Error;
use std::path::Path;

use crate::pipeline::{decode_bitstream, load_device, load_session, resolve_chipdb};
use crate::{DumpArgs, GlobalArgs};

/// Runs the `frost dump` command.
///
/// Prints the non-empty tiles of the decoded configuration to stdout.
pub fn run(args: &DumpArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let session = load_session(global)?;
    let chipdb = resolve_chipdb(args.chipdb.as_deref(), &session)?;

    let Some(device) = load_device(&chipdb, &session, global)? else {
        return Ok(1);
    };
    let mut state = device.new_state();
    if decode_bitstream(&mut state, Path::new(&args.bitstream), global)?.is_none() {
        return Ok(1);
    }

    println!("{}", render(&state.report(), args.compact)?);
    Ok(0)
}

fn render(report: &frost_device::DeviceReport, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(report)
    } else {
        serde_json::to_string_pretty(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use frost_device::{load_chipdb, read_sections, IngestOptions};
    use frost_diagnostics::DiagnosticSink;

    #[test]
    fn report_json_shape() {
        let sections = read_sections(&fixtures::chipdb_text()).unwrap();
        let device = load_chipdb(&sections, &IngestOptions::default(), &DiagnosticSink::new()).unwrap();
        let mut state = device.new_state();
        state
            .decode(&read_sections(&fixtures::bitstream_text(&device)).unwrap())
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&render(&state.report(), true).unwrap()).unwrap();
        assert_eq!(json["device_type"], "1k");
        let tiles = json["tiles"].as_array().unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0]["kind"], "logic");
        assert_eq!(tiles[0]["fields"]["LC_0"], 1);
        assert_eq!(tiles[0]["connections"][0]["src"], 1);
        assert_eq!(tiles[1]["fields"]["IoCtrl.IE_0"], 1);

        let pretty = render(&state.report(), false).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!render(&state.report(), true).unwrap().contains('\n'));
    }

    #[test]
    fn missing_bitstream_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let chipdb = tmp.path().join("chipdb.txt");
        std::fs::write(&chipdb, fixtures::chipdb_text()).unwrap();
        let args = DumpArgs {
            bitstream: tmp.path().join("absent.asc").display().to_string(),
            chipdb: Some(chipdb.display().to_string()),
            compact: true,
        };
        let global = GlobalArgs {
            quiet: true,
            color: false,
            config: Some(tmp.path().display().to_string()),
        };
        assert!(run(&args, &global).is_err());
    }
}
