//! Wires and nets: the fabric's connectivity graph.
//!
//! A [`Wire`] is one distinct wire name; it may occur in several tiles. A
//! [`Net`] is a chip-wide equivalence class recording, for each tile it
//! touches, which wire carries it there. Both live in arenas owned by the
//! device and refer to tiles by [`TileId`].

use crate::ids::{NetId, TileId, WireId};
use frost_common::Ident;
use std::collections::BTreeMap;

/// A named fabric wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    name: Ident,
    tiles: Vec<TileId>,
}

impl Wire {
    pub(crate) fn new(name: Ident) -> Self {
        Self {
            name,
            tiles: Vec::new(),
        }
    }

    /// The interned wire name.
    pub fn name(&self) -> Ident {
        self.name
    }

    /// Tiles this wire occurs in, in ingestion order.
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub(crate) fn add_tile(&mut self, tile: TileId) {
        if !self.tiles.contains(&tile) {
            self.tiles.push(tile);
        }
    }
}

/// A chip-wide net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    id: NetId,
    members: BTreeMap<TileId, WireId>,
}

impl Net {
    pub(crate) fn new(id: NetId) -> Self {
        Self {
            id,
            members: BTreeMap::new(),
        }
    }

    /// The net's index.
    pub fn id(&self) -> NetId {
        self.id
    }

    /// The wire carrying this net in `tile`.
    pub fn wire_at(&self, tile: TileId) -> Option<WireId> {
        self.members.get(&tile).copied()
    }

    /// All `(tile, wire)` memberships, ordered by tile.
    pub fn members(&self) -> impl Iterator<Item = (TileId, WireId)> + '_ {
        self.members.iter().map(|(&t, &w)| (t, w))
    }

    /// Number of tiles the net touches.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the net touches no tile.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn insert(&mut self, tile: TileId, wire: WireId) {
        self.members.insert(tile, wire);
    }
}
