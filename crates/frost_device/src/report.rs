//! Serializable summary of a decoded configuration.

use crate::device::DeviceState;
use crate::ids::NetId;
use crate::kind::TileKind;
use crate::routing::RoutingKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything configured on a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceReport {
    /// Device type label.
    pub device_type: String,
    /// Tiles with at least one non-zero field or live connection, row-major.
    pub tiles: Vec<TileReport>,
}

/// Configuration of one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileReport {
    /// Tile kind.
    pub kind: TileKind,
    /// Grid column.
    pub x: u32,
    /// Grid row.
    pub y: u32,
    /// Non-zero fields by name.
    pub fields: BTreeMap<String, u32>,
    /// Live routing connections.
    pub connections: Vec<ConnectionReport>,
}

/// One selected routing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionReport {
    /// Switch or buffer.
    pub kind: RoutingKind,
    /// The driven net.
    pub dst: NetId,
    /// The selected source net.
    pub src: NetId,
}

impl DeviceState<'_> {
    /// Summarises the non-empty part of this configuration.
    pub fn report(&self) -> DeviceReport {
        let tiles = self
            .states()
            .filter(|(_, state)| !state.is_empty())
            .map(|(tile, state)| TileReport {
                kind: tile.kind(),
                x: tile.x(),
                y: tile.y(),
                fields: state
                    .values()
                    .filter(|&(_, value)| value != 0)
                    .map(|(field, value)| (field.def().name.to_string(), value))
                    .collect(),
                connections: tile
                    .routing()
                    .iter()
                    .zip(state.connections())
                    .filter_map(|(res, conn)| {
                        conn.map(|src| ConnectionReport {
                            kind: res.kind(),
                            dst: res.dst(),
                            src,
                        })
                    })
                    .collect(),
            })
            .collect();

        DeviceReport {
            device_type: self.device().device_type().to_string(),
            tiles,
        }
    }
}
