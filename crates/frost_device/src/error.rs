//! Error type shared by ingestion, decode and encode.

use crate::ids::NetId;
use crate::kind::TileKind;

/// Result alias for fallible device-model operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Everything that can go wrong while building or (de)configuring a device.
///
/// No operation retries or rolls back on its own; the caller decides whether
/// to abort or keep going with the next item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// A textual bit reference is not of the form `B<row>[<column>]`.
    #[error("malformed bit reference '{0}'")]
    MalformedAddress(String),

    /// A schema finished ingestion with an unpopulated field slot.
    #[error("incomplete {kind} schema: no bits for '{field}'")]
    IncompleteSchema {
        /// The tile kind whose schema is incomplete.
        kind: TileKind,
        /// The chipdb name of the first missing slot.
        field: String,
    },

    /// The same schema slot appeared twice.
    #[error("{kind} schema populates '{field}' more than once")]
    DuplicateField {
        /// The tile kind whose schema was being ingested.
        kind: TileKind,
        /// The chipdb name of the repeated slot.
        field: String,
    },

    /// A schema was ingested a second time.
    #[error("{0} schema is already defined")]
    DuplicateSchema(TileKind),

    /// A tile was placed, or looked up, before its schema was ingested.
    #[error("no {0} schema has been ingested")]
    MissingSchema(TileKind),

    /// A coordinate or index addresses nothing.
    #[error("{0} is out of range")]
    OutOfRange(String),

    /// Topology was modified after the device was frozen.
    #[error("device topology is frozen")]
    FrozenViolation,

    /// The bitstream declares a different tile kind than the device places there.
    #[error("tile ({x}, {y}) is a {placed} but the bitstream declares a {declared}")]
    TileTypeMismatch {
        /// Grid column.
        x: u32,
        /// Grid row.
        y: u32,
        /// The kind placed by the chipdb.
        placed: TileKind,
        /// The kind named by the bitstream section.
        declared: TileKind,
    },

    /// A routing resource was asked to connect a net it cannot select.
    #[error("net {0} is not a source of this routing resource")]
    UnknownSource(NetId),

    /// A non-zero control pattern matches no candidate source.
    #[error("bit pattern {pattern:#b} does not select any source")]
    InvalidPattern {
        /// The unmatched pattern, bit 0 at the first control bit.
        pattern: u32,
    },

    /// A net index was declared twice while duplicates are rejected.
    #[error("net {0} is already defined")]
    DuplicateNet(NetId),

    /// A section header or body row does not have the expected shape.
    #[error("malformed section: {0}")]
    MalformedSection(String),

    /// A bitstream tile body is not a `height` x `width` grid of `0`/`1`.
    #[error("malformed tile bitmap: {0}")]
    MalformedBitmap(String),

    /// A mandatory chipdb section is absent.
    #[error("missing '.{0}' section")]
    MissingSection(String),

    /// A chipdb section label is not recognised.
    #[error("unknown section '.{0}'")]
    UnknownSection(String),
}
