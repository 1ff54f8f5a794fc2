//! `frost check`: load a chipdb and summarise the device it describes.

use std::collections::BTreeMap;
use std::error::Error;

use frost_device::{Device, TileKind};

use crate::pipeline::{load_device, load_session, resolve_chipdb};
use crate::{CheckArgs, GlobalArgs};

/// Runs the `frost check` command.
///
/// Returns exit code 0 if the chipdb loads, 1 if it is rejected.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let session = load_session(global)?;
    let chipdb = resolve_chipdb(args.chipdb.as_deref(), &session)?;

    let Some(device) = load_device(&chipdb, &session, global)? else {
        return Ok(1);
    };

    if !global.quiet {
        print!("{}", summary(&device));
    }
    Ok(0)
}

fn summary(device: &Device) -> String {
    let mut per_kind: BTreeMap<TileKind, usize> = BTreeMap::new();
    for tile in device.tiles() {
        *per_kind.entry(tile.kind()).or_default() += 1;
    }
    let routing: usize = device.tiles().iter().map(|t| t.routing().len()).sum();

    let mut out = format!(
        "device {}: {}x{} grid, {} tiles, {} nets, {} wires, {} routing resources\n",
        device.device_type(),
        device.width(),
        device.height(),
        device.tiles().len(),
        device.nets().count(),
        device.wire_count(),
        routing,
    );
    for (kind, count) in per_kind {
        out.push_str(&format!("  {kind}: {count}\n"));
    }
    out
}
