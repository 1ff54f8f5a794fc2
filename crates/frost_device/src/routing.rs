//! Multiplexer-like routing resources and their live connections.
//!
//! A [`RoutingResource`] drives one destination net from at most one of its
//! candidate sources. Which source is selected is encoded by a small bit
//! pattern on the resource's control bits. The topology (destination,
//! control bits, candidate table) is fixed at ingestion; the selected source
//! lives in the per-state overlay and is edited through [`RoutingMut`].

use crate::addr::BitCoordinate;
use crate::error::{DeviceError, DeviceResult};
use crate::ids::NetId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The chipdb section a routing resource came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingKind {
    /// A bidirectional switch (`.routing`).
    Switch,
    /// A directional buffer (`.buffer`).
    Buffer,
}

impl RoutingKind {
    /// The chipdb section label.
    pub fn label(self) -> &'static str {
        match self {
            RoutingKind::Switch => "routing",
            RoutingKind::Buffer => "buffer",
        }
    }

    /// Looks up a kind by section label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "routing" => Some(RoutingKind::Switch),
            "buffer" => Some(RoutingKind::Buffer),
            _ => None,
        }
    }
}

impl fmt::Display for RoutingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Topology of one routing resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingResource {
    kind: RoutingKind,
    dst: NetId,
    bits: Vec<BitCoordinate>,
    candidates: Vec<(NetId, u32)>,
}

impl RoutingResource {
    /// Creates a resource with control bits given least-significant first
    /// and no candidates.
    pub(crate) fn new(kind: RoutingKind, dst: NetId, bits: Vec<BitCoordinate>) -> Self {
        Self {
            kind,
            dst,
            bits,
            candidates: Vec::new(),
        }
    }

    /// Adds a candidate; a source listed again takes the new pattern.
    pub(crate) fn add_candidate(&mut self, src: NetId, pattern: u32) {
        match self.candidates.iter_mut().find(|(net, _)| *net == src) {
            Some(entry) => entry.1 = pattern,
            None => self.candidates.push((src, pattern)),
        }
    }

    /// Switch or buffer.
    pub fn kind(&self) -> RoutingKind {
        self.kind
    }

    /// The driven net.
    pub fn dst(&self) -> NetId {
        self.dst
    }

    /// Control bits, least-significant first.
    pub fn bits(&self) -> &[BitCoordinate] {
        &self.bits
    }

    /// Candidate sources with their selecting patterns, in declaration order.
    pub fn candidates(&self) -> &[(NetId, u32)] {
        &self.candidates
    }

    /// The pattern that selects `src`.
    pub fn pattern_of(&self, src: NetId) -> Option<u32> {
        self.candidates
            .iter()
            .find(|(net, _)| *net == src)
            .map(|&(_, p)| p)
    }

    /// The source selected by exactly `pattern`.
    pub fn source_of(&self, pattern: u32) -> Option<NetId> {
        self.candidates
            .iter()
            .find(|(_, p)| *p == pattern)
            .map(|&(net, _)| net)
    }

    /// The pattern a connection puts on the control bits; 0 when disconnected.
    pub fn pattern(&self, connection: Option<NetId>) -> u32 {
        connection.and_then(|src| self.pattern_of(src)).unwrap_or(0)
    }

    /// Resolves a pattern read from the control bits.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidPattern`] for a non-zero pattern that
    /// selects no candidate.
    pub fn resolve(&self, pattern: u32) -> DeviceResult<Option<NetId>> {
        if pattern == 0 {
            return Ok(None);
        }
        self.source_of(pattern)
            .map(Some)
            .ok_or(DeviceError::InvalidPattern { pattern })
    }
}

/// A mutable view pairing a resource with its live connection.
#[derive(Debug)]
pub struct RoutingMut<'a> {
    resource: &'a RoutingResource,
    connection: &'a mut Option<NetId>,
}

impl<'a> RoutingMut<'a> {
    pub(crate) fn new(resource: &'a RoutingResource, connection: &'a mut Option<NetId>) -> Self {
        Self {
            resource,
            connection,
        }
    }

    /// The resource's topology.
    pub fn resource(&self) -> &RoutingResource {
        self.resource
    }

    /// The selected source, if any.
    pub fn connection(&self) -> Option<NetId> {
        *self.connection
    }

    /// Selects `src`, replacing any previous selection.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnknownSource`] if `src` is not a candidate.
    pub fn connect(&mut self, src: NetId) -> DeviceResult<()> {
        if self.resource.pattern_of(src).is_none() {
            return Err(DeviceError::UnknownSource(src));
        }
        *self.connection = Some(src);
        Ok(())
    }

    /// Clears the selection.
    pub fn disconnect(&mut self) {
        *self.connection = None;
    }

    /// The pattern of the live selection, or 0.
    pub fn pattern(&self) -> u32 {
        self.resource.pattern(*self.connection)
    }

    /// Selects the source whose pattern is exactly `pattern`; 0 disconnects.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidPattern`] if no candidate has that
    /// pattern. The previous selection is kept.
    pub fn set_pattern(&mut self, pattern: u32) -> DeviceResult<()> {
        *self.connection = self.resource.resolve(pattern)?;
        Ok(())
    }
}
