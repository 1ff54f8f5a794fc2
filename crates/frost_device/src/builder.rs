//! Incremental device construction from chipdb data.
//!
//! A [`DeviceBuilder`] accepts the device header, the four schemas, tile
//! placements, nets and routing resources, in that dependency order. After
//! [`DeviceBuilder::freeze`] every ingestion call fails with
//! [`DeviceError::FrozenViolation`] without touching state;
//! [`DeviceBuilder::finish`] turns the topology into an immutable [`Device`].

use crate::addr::{parse_bit_refs, BitCoordinate};
use crate::device::{Device, DeviceHeader};
use crate::error::{DeviceError, DeviceResult};
use crate::graph::{Net, Wire};
use crate::ids::{NetId, TileId, WireId};
use crate::kind::TileKind;
use crate::options::{DuplicateNetPolicy, IngestOptions};
use crate::routing::{RoutingKind, RoutingResource};
use crate::schema::{SchemaBuilder, TileBitConfig, MAX_FIELD_BITS};
use crate::section::{parse_number, Section};
use crate::tile::Tile;
use frost_common::{Ident, Interner};
use std::collections::HashMap;
use std::sync::Arc;

/// Most grid cells a device header may declare.
pub const MAX_GRID_CELLS: u64 = 1 << 16;

/// Most nets a device header may declare.
pub const MAX_NETS: u32 = 1 << 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Building,
    Frozen,
}

/// What a successfully processed section contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingested {
    /// The device header.
    Device,
    /// A schema.
    Schema(TileKind),
    /// A tile placement.
    Tile(TileId),
    /// A net; `replaced` is set if an earlier net with this index was overwritten.
    Net {
        /// The net's index.
        id: NetId,
        /// Whether an earlier definition was replaced.
        replaced: bool,
    },
    /// A routing resource.
    Routing(RoutingKind),
}

/// Mutable device under construction.
#[derive(Debug)]
pub struct DeviceBuilder {
    options: IngestOptions,
    phase: Phase,
    header: Option<DeviceHeader>,
    schemas: [Option<Arc<TileBitConfig>>; 4],
    grid: Vec<Option<TileId>>,
    tiles: Vec<Tile>,
    nets: Vec<Option<Net>>,
    wires: Vec<Wire>,
    wire_names: HashMap<Ident, WireId>,
    interner: Interner,
}

impl Default for DeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceBuilder {
    /// Creates an empty builder with strict options.
    pub fn new() -> Self {
        Self::with_options(IngestOptions::default())
    }

    /// Creates an empty builder.
    pub fn with_options(options: IngestOptions) -> Self {
        Self {
            options,
            phase: Phase::Building,
            header: None,
            schemas: Default::default(),
            grid: Vec::new(),
            tiles: Vec::new(),
            nets: Vec::new(),
            wires: Vec::new(),
            wire_names: HashMap::new(),
            interner: Interner::new(),
        }
    }

    /// The options this builder applies.
    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Ends the building phase. Idempotent.
    pub fn freeze(&mut self) {
        self.phase = Phase::Frozen;
    }

    /// Returns `true` once [`freeze`](Self::freeze) has been called.
    pub fn is_frozen(&self) -> bool {
        self.phase == Phase::Frozen
    }

    /// The device header, once ingested.
    pub fn header(&self) -> Option<&DeviceHeader> {
        self.header.as_ref()
    }

    /// Number of placed tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Number of ingested nets.
    pub fn net_count(&self) -> usize {
        self.nets.iter().flatten().count()
    }

    /// Number of distinct wires.
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// The tile placed at `(x, y)`.
    pub fn tile_at(&self, x: u32, y: u32) -> Option<&Tile> {
        let id = (*self.grid.get(self.cell(x, y)?)?)?;
        self.tiles.get(id.index())
    }

    /// The net with index `id`, if ingested.
    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.index())?.as_ref()
    }

    fn ensure_building(&self) -> DeviceResult<()> {
        match self.phase {
            Phase::Building => Ok(()),
            Phase::Frozen => Err(DeviceError::FrozenViolation),
        }
    }

    fn require_header(&self) -> DeviceResult<&DeviceHeader> {
        self.header
            .as_ref()
            .ok_or_else(|| DeviceError::MissingSection("device".into()))
    }

    fn cell(&self, x: u32, y: u32) -> Option<usize> {
        let header = self.header.as_ref()?;
        (x < header.width && y < header.height)
            .then(|| y as usize * header.width as usize + x as usize)
    }

    fn tile_id_at(&self, x: u32, y: u32) -> DeviceResult<TileId> {
        self.cell(x, y)
            .and_then(|cell| self.grid[cell])
            .ok_or_else(|| DeviceError::OutOfRange(format!("tile ({x}, {y})")))
    }

    fn populated_net(&self, id: NetId) -> DeviceResult<&Net> {
        self.net(id)
            .ok_or_else(|| DeviceError::OutOfRange(format!("net {id}")))
    }

    /// Consumes the device header, allocating the grid and the net table.
    ///
    /// # Errors
    ///
    /// [`DeviceError::MalformedSection`] if a header was already ingested,
    /// or if the grid exceeds [`MAX_GRID_CELLS`] cells or the net count
    /// exceeds [`MAX_NETS`].
    pub fn ingest_device(
        &mut self,
        device_type: &str,
        width: u32,
        height: u32,
        net_count: u32,
    ) -> DeviceResult<()> {
        self.ensure_building()?;
        if self.header.is_some() {
            return Err(DeviceError::MalformedSection(
                "device header given twice".into(),
            ));
        }
        let cells = u64::from(width) * u64::from(height);
        if cells > MAX_GRID_CELLS {
            return Err(DeviceError::MalformedSection(format!(
                "{width}x{height} grid exceeds {MAX_GRID_CELLS} cells"
            )));
        }
        if net_count > MAX_NETS {
            return Err(DeviceError::MalformedSection(format!(
                "{net_count} nets exceed the limit of {MAX_NETS}"
            )));
        }
        self.grid = vec![None; cells as usize];
        self.nets = vec![None; net_count as usize];
        self.header = Some(DeviceHeader {
            device_type: device_type.to_string(),
            width,
            height,
            net_count,
        });
        Ok(())
    }

    /// Installs the schema of one tile kind.
    ///
    /// # Errors
    ///
    /// [`DeviceError::DuplicateSchema`] if that kind already has one.
    pub fn ingest_schema(&mut self, schema: TileBitConfig) -> DeviceResult<()> {
        self.ensure_building()?;
        self.require_header()?;
        let slot = &mut self.schemas[schema.kind().slot()];
        if slot.is_some() {
            return Err(DeviceError::DuplicateSchema(schema.kind()));
        }
        *slot = Some(Arc::new(schema));
        Ok(())
    }

    /// Places a tile of `kind` at `(x, y)`.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::MissingSchema`] if `kind` has no schema yet.
    /// - [`DeviceError::OutOfRange`] if the cell is outside the grid.
    /// - [`DeviceError::MalformedSection`] if the cell is already occupied.
    pub fn place_tile(&mut self, kind: TileKind, x: u32, y: u32) -> DeviceResult<TileId> {
        self.ensure_building()?;
        self.require_header()?;
        let schema = self.schemas[kind.slot()]
            .clone()
            .ok_or(DeviceError::MissingSchema(kind))?;
        let cell = self
            .cell(x, y)
            .ok_or_else(|| DeviceError::OutOfRange(format!("tile ({x}, {y})")))?;
        if let Some(existing) = self.grid[cell] {
            return Err(DeviceError::MalformedSection(format!(
                "({x}, {y}) already holds a {}",
                self.tiles[existing.index()].kind()
            )));
        }

        let id = TileId::from_raw(self.tiles.len() as u32);
        self.tiles.push(Tile::new(id, x, y, schema));
        self.grid[cell] = Some(id);
        Ok(id)
    }

    /// Declares net `id` as the given `(x, y, wire-name)` occurrences.
    ///
    /// Returns `true` if an earlier net with the same index was replaced.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::OutOfRange`] if the index exceeds the header's net
    ///   count or a member names an empty cell.
    /// - [`DeviceError::DuplicateNet`] if the index is reused while
    ///   duplicates are rejected.
    pub fn ingest_net<S: AsRef<str>>(
        &mut self,
        id: NetId,
        members: &[(u32, u32, S)],
    ) -> DeviceResult<bool> {
        self.ensure_building()?;
        self.require_header()?;
        let replaced = match self.nets.get(id.index()) {
            None => return Err(DeviceError::OutOfRange(format!("net {id}"))),
            Some(existing) => existing.is_some(),
        };
        if replaced && self.options.duplicate_nets == DuplicateNetPolicy::Reject {
            return Err(DeviceError::DuplicateNet(id));
        }

        let tiles = members
            .iter()
            .map(|&(x, y, _)| self.tile_id_at(x, y))
            .collect::<DeviceResult<Vec<_>>>()?;

        let mut net = Net::new(id);
        for (tile, (_, _, name)) in tiles.into_iter().zip(members) {
            let wire = self.intern_wire(name.as_ref());
            self.wires[wire.index()].add_tile(tile);
            self.tiles[tile.index()].add_wire(wire);
            net.insert(tile, wire);
        }
        self.nets[id.index()] = Some(net);
        Ok(replaced)
    }

    fn intern_wire(&mut self, name: &str) -> WireId {
        let ident = self.interner.intern(name);
        *self.wire_names.entry(ident).or_insert_with(|| {
            let id = WireId::from_raw(self.wires.len() as u32);
            self.wires.push(Wire::new(ident));
            id
        })
    }

    /// Adds a routing resource to the tile at `(x, y)`.
    ///
    /// `bits` are listed most-significant first, as in the chipdb header;
    /// `candidates` pair each selecting pattern with its source net.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::OutOfRange`] for an empty cell, an unpopulated net or
    ///   a control bit outside the tile.
    /// - [`DeviceError::MalformedSection`] for a resource without control
    ///   bits, more than 32 of them, or a pattern that is zero or too wide.
    pub fn ingest_routing(
        &mut self,
        kind: RoutingKind,
        x: u32,
        y: u32,
        dst: NetId,
        bits: &[BitCoordinate],
        candidates: &[(u32, NetId)],
    ) -> DeviceResult<()> {
        self.ensure_building()?;
        self.require_header()?;
        let tile = self.tile_id_at(x, y)?;
        self.populated_net(dst)?;

        if bits.is_empty() || bits.len() > MAX_FIELD_BITS {
            return Err(DeviceError::MalformedSection(format!(
                "{kind} at ({x}, {y}) has {} control bits",
                bits.len()
            )));
        }
        let schema = self.tiles[tile.index()].schema();
        if let Some(bad) = bits
            .iter()
            .find(|c| !c.fits(schema.width(), schema.height()))
        {
            return Err(DeviceError::OutOfRange(format!(
                "control bit {bad} of {kind} at ({x}, {y})"
            )));
        }

        let limit = if bits.len() == MAX_FIELD_BITS {
            u32::MAX
        } else {
            (1 << bits.len()) - 1
        };
        for &(pattern, src) in candidates {
            self.populated_net(src)?;
            if pattern == 0 || pattern > limit {
                return Err(DeviceError::MalformedSection(format!(
                    "pattern {pattern:#b} for net {src} does not fit {} control bits",
                    bits.len()
                )));
            }
        }

        let mut resource = RoutingResource::new(kind, dst, bits.iter().rev().copied().collect());
        for &(pattern, src) in candidates {
            resource.add_candidate(src, pattern);
        }
        self.tiles[tile.index()].add_routing(resource);
        Ok(())
    }

    /// Ingests one chipdb section by label.
    ///
    /// # Errors
    ///
    /// Any error of the matching `ingest_*` call, [`DeviceError::MalformedSection`]
    /// for a bad header or body row, and [`DeviceError::UnknownSection`] for
    /// a label that is not modelled.
    pub fn process_section(&mut self, section: &Section) -> DeviceResult<Ingested> {
        self.ensure_building()?;
        let label = section.label.as_str();

        if label == "device" {
            section.expect_arity(4)?;
            let width = section.header_number(1)?;
            let height = section.header_number(2)?;
            let nets = section.header_number(3)?;
            self.ingest_device(&section.header[0], width, height, nets)?;
            return Ok(Ingested::Device);
        }
        if let Some(kind) = TileKind::from_bits_label(label) {
            self.ingest_schema(parse_schema(kind, section)?)?;
            return Ok(Ingested::Schema(kind));
        }
        if let Some(kind) = TileKind::from_label(label) {
            section.expect_arity(2)?;
            let x = section.header_number(0)?;
            let y = section.header_number(1)?;
            return self.place_tile(kind, x, y).map(Ingested::Tile);
        }
        if label == "net" {
            section.expect_arity(1)?;
            let id = NetId::from_raw(section.header_number(0)?);
            let members = section
                .rows()
                .map(|row| -> DeviceResult<_> {
                    match row.as_slice() {
                        [x, y, name] => Ok((parse_number(x)?, parse_number(y)?, *name)),
                        _ => Err(section.malformed(format!("net row '{}'", row.join(" ")))),
                    }
                })
                .collect::<DeviceResult<Vec<_>>>()?;
            let replaced = self.ingest_net(id, &members)?;
            return Ok(Ingested::Net { id, replaced });
        }
        if let Some(kind) = RoutingKind::from_label(label) {
            if section.header.len() < 4 {
                return Err(section.malformed(format!(
                    "expected at least 4 header tokens, found {}",
                    section.header.len()
                )));
            }
            let x = section.header_number(0)?;
            let y = section.header_number(1)?;
            let dst = NetId::from_raw(section.header_number(2)?);
            let bits = parse_bit_refs(&section.header[3..])?;
            let candidates = section
                .rows()
                .map(|row| -> DeviceResult<_> {
                    match row.as_slice() {
                        [pattern, src] => Ok((
                            parse_pattern(pattern)?,
                            NetId::from_raw(parse_number(src)?),
                        )),
                        _ => Err(section.malformed(format!("{kind} row '{}'", row.join(" ")))),
                    }
                })
                .collect::<DeviceResult<Vec<_>>>()?;
            self.ingest_routing(kind, x, y, dst, &bits, &candidates)?;
            return Ok(Ingested::Routing(kind));
        }

        Err(DeviceError::UnknownSection(label.to_string()))
    }

    /// Freezes the builder and hands the topology to an immutable [`Device`].
    ///
    /// # Errors
    ///
    /// [`DeviceError::MissingSection`] if no device header was ingested.
    pub fn finish(mut self) -> DeviceResult<Device> {
        self.freeze();
        let header = self
            .header
            .take()
            .ok_or_else(|| DeviceError::MissingSection("device".into()))?;
        Ok(Device {
            header,
            schemas: self.schemas,
            grid: self.grid,
            tiles: self.tiles,
            nets: self.nets,
            wires: self.wires,
            wire_names: self.wire_names,
            interner: self.interner,
        })
    }
}

fn parse_schema(kind: TileKind, section: &Section) -> DeviceResult<TileBitConfig> {
    section.expect_arity(2)?;
    let width = section.header_number(0)?;
    let height = section.header_number(1)?;
    let mut builder = SchemaBuilder::new(kind, width, height);
    for row in section.rows() {
        if let Some((name, refs)) = row.split_first() {
            builder.ingest_line(name, refs)?;
        }
    }
    builder.finish()
}

fn parse_pattern(token: &str) -> DeviceResult<u32> {
    let valid = !token.is_empty() && token.bytes().all(|b| b == b'0' || b == b'1');
    valid
        .then(|| u32::from_str_radix(token, 2).ok())
        .flatten()
        .ok_or_else(|| DeviceError::MalformedSection(format!("'{token}' is not a binary pattern")))
}
