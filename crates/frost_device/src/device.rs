//! The frozen device topology and its live-configuration overlay.
//!
//! A [`Device`] is produced once by [`DeviceBuilder::finish`] and never
//! changes afterwards, so it can be shared across threads. Configuration
//! lives in a [`DeviceState`] borrowed from it: field values and selected
//! routing sources for every placed tile. Many states can share one device.
//!
//! [`DeviceBuilder::finish`]: crate::DeviceBuilder::finish

use crate::bitmap::TileBitmap;
use crate::error::{DeviceError, DeviceResult};
use crate::graph::{Net, Wire};
use crate::ids::{NetId, TileId, WireId};
use crate::kind::TileKind;
use crate::options::EncodeOptions;
use crate::routing::RoutingMut;
use crate::schema::TileBitConfig;
use crate::section::Section;
use crate::tile::{Tile, TileState};
use frost_common::{Ident, Interner};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// The `.device` header of a chipdb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHeader {
    /// Device type label, e.g. `1k`.
    pub device_type: String,
    /// Grid columns.
    pub width: u32,
    /// Grid rows.
    pub height: u32,
    /// Size of the net index space.
    pub net_count: u32,
}

/// Immutable device topology.
#[derive(Debug)]
pub struct Device {
    pub(crate) header: DeviceHeader,
    pub(crate) schemas: [Option<Arc<TileBitConfig>>; 4],
    pub(crate) grid: Vec<Option<TileId>>,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) nets: Vec<Option<Net>>,
    pub(crate) wires: Vec<Wire>,
    pub(crate) wire_names: HashMap<Ident, WireId>,
    pub(crate) interner: Interner,
}

impl Device {
    /// The chipdb header.
    pub fn header(&self) -> &DeviceHeader {
        &self.header
    }

    /// Device type label.
    pub fn device_type(&self) -> &str {
        &self.header.device_type
    }

    /// Grid columns.
    pub fn width(&self) -> u32 {
        self.header.width
    }

    /// Grid rows.
    pub fn height(&self) -> u32 {
        self.header.height
    }

    /// The schema of `kind`.
    pub fn schema(&self, kind: TileKind) -> Option<&TileBitConfig> {
        self.schemas[kind.slot()].as_deref()
    }

    /// A tile by handle.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// The tile placed at `(x, y)`.
    pub fn tile_at(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let id = self.grid[y as usize * self.width() as usize + x as usize]?;
        self.tile(id)
    }

    /// All placed tiles, in placement order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Placed tiles row by row, `y` outer and `x` inner.
    pub fn tiles_row_major(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.grid.iter().flatten().map(|id| &self.tiles[id.index()])
    }

    /// A net by index, if it was declared.
    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.index())?.as_ref()
    }

    /// All declared nets, by index.
    pub fn nets(&self) -> impl Iterator<Item = &Net> + '_ {
        self.nets.iter().flatten()
    }

    /// A wire by handle.
    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(id.index())
    }

    /// Looks a wire up by name.
    pub fn wire_id(&self, name: &str) -> Option<WireId> {
        let ident = self.interner.lookup(name)?;
        self.wire_names.get(&ident).copied()
    }

    /// The name of a wire.
    pub fn wire_name(&self, id: WireId) -> Option<&str> {
        self.wire(id).and_then(|w| self.interner.name(w.name()))
    }

    /// Number of distinct wires.
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// A fresh all-zero configuration for this device.
    pub fn new_state(&self) -> DeviceState<'_> {
        DeviceState {
            device: self,
            tiles: self.tiles.iter().map(Tile::new_state).collect(),
        }
    }
}

/// What [`DeviceState::decode`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Tile sections decoded.
    pub tiles: usize,
    /// Labels of sections that are not tiles, with their counts.
    pub skipped: BTreeMap<String, usize>,
}

/// Live configuration of every tile of one [`Device`].
#[derive(Debug, Clone)]
pub struct DeviceState<'d> {
    device: &'d Device,
    tiles: Vec<TileState>,
}

impl<'d> DeviceState<'d> {
    /// The device this state configures.
    pub fn device(&self) -> &'d Device {
        self.device
    }

    /// State of a tile by handle.
    pub fn tile(&self, id: TileId) -> Option<&TileState> {
        self.tiles.get(id.index())
    }

    /// Mutable state of a tile by handle.
    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut TileState> {
        self.tiles.get_mut(id.index())
    }

    /// State of the tile at `(x, y)`.
    pub fn tile_at(&self, x: u32, y: u32) -> Option<&TileState> {
        let id = self.device.tile_at(x, y)?.id();
        self.tile(id)
    }

    /// Mutable state of the tile at `(x, y)`.
    pub fn tile_at_mut(&mut self, x: u32, y: u32) -> Option<&mut TileState> {
        let id = self.device.tile_at(x, y)?.id();
        self.tile_mut(id)
    }

    /// Edits the connection of routing resource `index` of `tile`.
    ///
    /// # Errors
    ///
    /// [`DeviceError::OutOfRange`] if the tile or the resource does not exist.
    pub fn routing_mut(&mut self, tile: TileId, index: usize) -> DeviceResult<RoutingMut<'_>> {
        let missing = || DeviceError::OutOfRange(format!("routing resource {index} of tile {tile}"));
        let topology = self.device.tile(tile).ok_or_else(missing)?;
        self.tiles
            .get_mut(tile.index())
            .and_then(|state| state.routing_mut(topology, index))
            .ok_or_else(missing)
    }

    /// Clears every field and connection. Topology is untouched.
    pub fn reset(&mut self) {
        self.tiles.iter_mut().for_each(TileState::reset);
    }

    /// Loads the tile sections of a bitstream.
    ///
    /// Sections whose label is not a tile kind are counted in the summary
    /// and otherwise ignored; `.device` is neither decoded nor counted.
    /// Tiles decoded before a failing section keep their new values.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::MalformedSection`] for a header other than `x y`.
    /// - [`DeviceError::OutOfRange`] for a cell outside the grid or empty.
    /// - [`DeviceError::TileTypeMismatch`] if the placed tile is of another kind.
    /// - [`DeviceError::MalformedBitmap`] or [`DeviceError::InvalidPattern`]
    ///   from the tile itself.
    pub fn decode(&mut self, sections: &[Section]) -> DeviceResult<DecodeSummary> {
        let mut summary = DecodeSummary::default();
        for section in sections {
            self.decode_section(section, &mut summary)?;
        }
        Ok(summary)
    }

    pub(crate) fn decode_section(
        &mut self,
        section: &Section,
        summary: &mut DecodeSummary,
    ) -> DeviceResult<()> {
        match TileKind::from_label(&section.label) {
            Some(kind) => {
                self.decode_tile(kind, section)?;
                summary.tiles += 1;
            }
            None if section.label == "device" => {}
            None => *summary.skipped.entry(section.label.clone()).or_default() += 1,
        }
        Ok(())
    }

    fn decode_tile(&mut self, declared: TileKind, section: &Section) -> DeviceResult<()> {
        section.expect_arity(2)?;
        let x = section.header_number(0)?;
        let y = section.header_number(1)?;
        let tile = self
            .device
            .tile_at(x, y)
            .ok_or_else(|| DeviceError::OutOfRange(format!("tile ({x}, {y})")))?;
        if tile.kind() != declared {
            return Err(DeviceError::TileTypeMismatch {
                x,
                y,
                placed: tile.kind(),
                declared,
            });
        }
        let schema = tile.schema();
        let bitmap = TileBitmap::from_lines(schema.width(), schema.height(), section.lines())?;
        self.tiles[tile.id().index()].decode(tile, &bitmap)
    }

    /// Renders the whole configuration as an ASCII bitstream.
    pub fn encode(&self) -> String {
        self.encode_with(&EncodeOptions::default())
    }

    /// Renders the whole configuration, row-major, one section per placed tile.
    pub fn encode_with(&self, options: &EncodeOptions) -> String {
        let mut out = String::new();
        if options.device_line {
            out.push_str(&format!(".device {}\n", self.device.device_type()));
        }
        for tile in self.device.tiles_row_major() {
            out.push_str(&format!(".{} {} {}\n", tile.kind(), tile.x(), tile.y()));
            for row in self.tiles[tile.id().index()].encode(tile).rows() {
                out.push_str(&row);
                out.push('\n');
            }
        }
        out
    }

    pub(crate) fn states(&self) -> impl Iterator<Item = (&'d Tile, &TileState)> + '_ {
        self.device.tiles_row_major().map(|tile| (tile, &self.tiles[tile.id().index()]))
    }
}
