//! Small synthetic chipdb and bitstream shared by command tests.

use frost_device::{BitCoordinate, Device, FieldSource, NetId, TileKind};

const WIDTH: u32 = 16;

fn schema_text(kind: TileKind) -> String {
    let mut out = format!(".{} {WIDTH} 4\n", kind.bits_label());
    let mut next = 0;
    let mut bit = || {
        let coord = BitCoordinate::new(next % WIDTH, next / WIDTH);
        next += 1;
        coord.to_string()
    };
    for def in kind.fields() {
        let slots = match def.source {
            FieldSource::Bits(_) => vec![format!("{} {}", bit(), bit())],
            source => (0..source.slot_count()).map(|_| bit()).collect(),
        };
        for (slot, refs) in slots.iter().enumerate() {
            out.push_str(&format!("{} {refs}\n", def.source.slot_name(slot)));
        }
    }
    out
}

/// A 2x1 device: a logic tile at (0, 0) and an io tile at (1, 0), two nets
/// and one switch in the logic tile selecting net 1.
pub fn chipdb_text() -> String {
    let mut text = String::from(".device 1k 2 1 2\n.pins tq144\n1 0 0 0\n");
    for kind in TileKind::ALL {
        text.push_str(&schema_text(kind));
    }
    text.push_str(
        "\
.logic_tile 0 0
.io_tile 1 0
.net 0
0 0 lutff_0/out
.net 1
0 0 local_g0_0
1 0 io_0/D_IN_0
.routing 0 0 0 B3[1] B3[0]
01 1
",
    );
    text
}

/// A bitstream for [`chipdb_text`] with a comment and some configuration.
pub fn bitstream_text(device: &Device) -> String {
    let mut state = device.new_state();
    if let Some(logic) = state.tile_at_mut(0, 0) {
        logic.set_value("LC_0", 1).unwrap();
    }
    if let Some(io) = state.tile_at_mut(1, 0) {
        io.set_flag("IoCtrl.IE_0", true).unwrap();
    }
    let logic = device.tile_at(0, 0).unwrap().id();
    state
        .routing_mut(logic, 0)
        .unwrap()
        .connect(NetId::from_raw(1))
        .unwrap();
    format!(".comment made by hand\n{}", state.encode())
}
