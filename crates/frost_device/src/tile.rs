//! Placed tiles and their live configuration.
//!
//! [`Tile`] is the frozen topology of one grid cell: its kind, position,
//! shared schema, wire occurrences and routing resources. [`TileState`] is
//! the mutable overlay holding the tile's field values and the selected
//! source of each routing resource. Decode and encode translate between a
//! state and a [`TileBitmap`] using the tile's schema.

use crate::bitmap::TileBitmap;
use crate::error::{DeviceError, DeviceResult};
use crate::ids::{NetId, TileId, WireId};
use crate::kind::{FieldId, FieldKind, TileKind};
use crate::routing::{RoutingMut, RoutingResource};
use crate::schema::TileBitConfig;
use std::sync::Arc;

/// One placed tile.
#[derive(Debug, Clone)]
pub struct Tile {
    id: TileId,
    x: u32,
    y: u32,
    schema: Arc<TileBitConfig>,
    wires: Vec<WireId>,
    routing: Vec<RoutingResource>,
}

impl Tile {
    pub(crate) fn new(id: TileId, x: u32, y: u32, schema: Arc<TileBitConfig>) -> Self {
        Self {
            id,
            x,
            y,
            schema,
            wires: Vec::new(),
            routing: Vec::new(),
        }
    }

    /// The tile's handle.
    pub fn id(&self) -> TileId {
        self.id
    }

    /// The tile's kind.
    pub fn kind(&self) -> TileKind {
        self.schema.kind()
    }

    /// Grid column.
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Grid row.
    pub fn y(&self) -> u32 {
        self.y
    }

    /// The schema shared by all tiles of this kind.
    pub fn schema(&self) -> &Arc<TileBitConfig> {
        &self.schema
    }

    /// Wires occurring in this tile, in ingestion order.
    pub fn wires(&self) -> &[WireId] {
        &self.wires
    }

    /// Routing resources owned by this tile, in ingestion order.
    pub fn routing(&self) -> &[RoutingResource] {
        &self.routing
    }

    pub(crate) fn add_wire(&mut self, wire: WireId) {
        if !self.wires.contains(&wire) {
            self.wires.push(wire);
        }
    }

    pub(crate) fn add_routing(&mut self, resource: RoutingResource) {
        self.routing.push(resource);
    }

    /// A fresh all-zero state for this tile.
    pub fn new_state(&self) -> TileState {
        TileState {
            schema: Arc::clone(&self.schema),
            values: vec![0; self.kind().fields().len()],
            connections: vec![None; self.routing.len()],
        }
    }
}

/// Live configuration of one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileState {
    schema: Arc<TileBitConfig>,
    values: Vec<u32>,
    connections: Vec<Option<NetId>>,
}

impl TileState {
    /// The tile kind this state belongs to.
    pub fn kind(&self) -> TileKind {
        self.schema.kind()
    }

    fn own(&self, field: FieldId) -> DeviceResult<usize> {
        if field.kind() == self.kind() {
            Ok(field.index())
        } else {
            Err(DeviceError::OutOfRange(format!(
                "field '{}' of {} on a {}",
                field.def().name,
                field.kind(),
                self.kind()
            )))
        }
    }

    fn named(&self, name: &str) -> DeviceResult<FieldId> {
        self.kind()
            .field(name)
            .ok_or_else(|| DeviceError::OutOfRange(format!("field '{name}' on a {}", self.kind())))
    }

    /// The value of a field of this kind.
    pub fn get(&self, field: FieldId) -> Option<u32> {
        self.own(field).ok().map(|i| self.values[i])
    }

    /// The value of the field called `name`.
    pub fn value(&self, name: &str) -> Option<u32> {
        self.kind().field(name).and_then(|f| self.get(f))
    }

    /// The value of the flag called `name`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        let field = self.kind().field(name)?;
        (field.def().kind == FieldKind::Flag).then(|| self.values[field.index()] != 0)
    }

    /// Sets a field.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::OutOfRange`] if the field belongs to another
    /// kind or `value` does not fit its bits.
    pub fn set(&mut self, field: FieldId, value: u32) -> DeviceResult<()> {
        let index = self.own(field)?;
        let max = self.schema.field_max(field);
        if value > max {
            return Err(DeviceError::OutOfRange(format!(
                "value {value} for '{}' (max {max})",
                field.def().name
            )));
        }
        self.values[index] = value;
        Ok(())
    }

    /// Sets the field called `name`.
    pub fn set_value(&mut self, name: &str, value: u32) -> DeviceResult<()> {
        let field = self.named(name)?;
        self.set(field, value)
    }

    /// Sets the flag called `name`.
    pub fn set_flag(&mut self, name: &str, on: bool) -> DeviceResult<()> {
        self.set_value(name, u32::from(on))
    }

    /// Field values in table order.
    pub fn values(&self) -> impl Iterator<Item = (FieldId, u32)> + '_ {
        self.kind().field_ids().zip(self.values.iter().copied())
    }

    /// The selected source of each routing resource, in resource order.
    pub fn connections(&self) -> &[Option<NetId>] {
        &self.connections
    }

    /// Edits the connection of routing resource `index` of `tile`.
    pub fn routing_mut<'a>(&'a mut self, tile: &'a Tile, index: usize) -> Option<RoutingMut<'a>> {
        let resource = tile.routing.get(index)?;
        let connection = self.connections.get_mut(index)?;
        Some(RoutingMut::new(resource, connection))
    }

    /// Returns `true` if every field is zero and nothing is connected.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|&v| v == 0) && self.connections.iter().all(Option::is_none)
    }

    /// Clears every field and connection.
    pub fn reset(&mut self) {
        self.values.fill(0);
        self.connections.fill(None);
    }

    /// Loads fields and connections from a bitmap.
    ///
    /// Nothing is changed unless the whole bitmap decodes.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::MalformedBitmap`] if the bitmap is not the schema's size.
    /// - [`DeviceError::InvalidPattern`] if a routing resource's control bits
    ///   select no candidate.
    pub fn decode(&mut self, tile: &Tile, bitmap: &TileBitmap) -> DeviceResult<()> {
        let schema = &self.schema;
        if bitmap.width() != schema.width() || bitmap.height() != schema.height() {
            return Err(DeviceError::MalformedBitmap(format!(
                "{}x{} bitmap for a {}x{} {}",
                bitmap.width(),
                bitmap.height(),
                schema.width(),
                schema.height(),
                schema.kind()
            )));
        }

        let connections = tile
            .routing
            .iter()
            .map(|res| res.resolve(bitmap.read_word(res.bits())))
            .collect::<DeviceResult<Vec<_>>>()?;
        let values = schema
            .kind()
            .field_ids()
            .map(|f| bitmap.read_word(schema.bits(f)))
            .collect();

        self.values = values;
        self.connections = connections;
        Ok(())
    }

    /// Renders fields and connections into a fresh bitmap.
    ///
    /// Only non-zero fields and live connections are written, fields first,
    /// onto an all-zero bitmap. Where bit coordinates overlap, a set bit is
    /// never cleared by a zero field or a disconnected resource sharing it.
    pub fn encode(&self, tile: &Tile) -> TileBitmap {
        let schema = &self.schema;
        let mut bitmap = TileBitmap::new(schema.width(), schema.height());
        for (field, value) in self.values() {
            if value != 0 {
                bitmap.write_word(schema.bits(field), value);
            }
        }
        for (res, &conn) in tile.routing.iter().zip(&self.connections) {
            if conn.is_some() {
                bitmap.write_word(res.bits(), res.pattern(conn));
            }
        }
        bitmap
    }
}
