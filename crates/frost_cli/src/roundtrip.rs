//! `frost roundtrip`: decode a bitstream and encode it again.

use std::error::Error;
use std::fs;
use std::path::Path;

use crate::pipeline::{decode_bitstream, encode_options, load_device, load_session, resolve_chipdb};
use crate::{GlobalArgs, RoundtripArgs};

/// Runs the `frost roundtrip` command.
///
/// The re-encoded bitstream goes to `--output` or stdout. Returns exit
/// code 0 on success, 1 if the chipdb or the bitstream is rejected.
pub fn run(args: &RoundtripArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let session = load_session(global)?;
    let chipdb = resolve_chipdb(args.chipdb.as_deref(), &session)?;

    let Some(device) = load_device(&chipdb, &session, global)? else {
        return Ok(1);
    };
    let mut state = device.new_state();
    let Some(summary) = decode_bitstream(&mut state, Path::new(&args.bitstream), global)? else {
        return Ok(1);
    };

    let text = state.encode_with(&encode_options(&session.config));
    match args.output {
        Some(ref path) => {
            fs::write(path, &text).map_err(|e| format!("cannot write {path}: {e}"))?;
            if !global.quiet {
                eprintln!("   Wrote {} tile(s) to {path}", summary.tiles);
            }
        }
        None => print!("{text}"),
    }
    Ok(0)
}
