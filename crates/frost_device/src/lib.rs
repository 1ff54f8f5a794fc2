//! Device-configuration model for iCE40-style FPGA fabrics.
//!
//! The crate translates between two textual formats and a structured model:
//!
//! - a **chip database** describing, per tile kind, where each logical
//!   setting lives in the tile's bit rectangle, plus the tile grid, the
//!   chip-wide nets and the routing multiplexers between them;
//! - an **ASCII bitstream** holding every configuration bit of one chip,
//!   tile by tile.
//!
//! Construction is two-phase. A [`DeviceBuilder`] ingests chipdb sections
//! and is then frozen into an immutable [`Device`]. Configuration lives in
//! a separate [`DeviceState`] that decodes from and encodes to bitstreams
//! without ever touching the topology.
//!
//! ```no_run
//! use frost_device::{load_chipdb, read_sections, IngestOptions};
//! use frost_diagnostics::DiagnosticSink;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let chipdb = std::fs::read_to_string("chipdb-1k.txt")?;
//! let sink = DiagnosticSink::new();
//! let device = load_chipdb(&read_sections(&chipdb)?, &IngestOptions::default(), &sink)?;
//!
//! let mut state = device.new_state();
//! state.decode(&read_sections(&std::fs::read_to_string("blinky.asc")?)?)?;
//! print!("{}", state.encode());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod addr;
pub mod bitmap;
pub mod bitstream;
pub mod builder;
pub mod chipdb;
pub mod codes;
pub mod device;
pub mod error;
pub mod graph;
pub mod ids;
pub mod kind;
pub mod options;
pub mod report;
pub mod routing;
pub mod schema;
pub mod section;
pub mod tile;

pub use addr::{parse_bit_ref, BitCoordinate};
pub use bitmap::TileBitmap;
pub use bitstream::load_bitstream;
pub use builder::{DeviceBuilder, Ingested};
pub use chipdb::load_chipdb;
pub use device::{DecodeSummary, Device, DeviceHeader, DeviceState};
pub use error::{DeviceError, DeviceResult};
pub use graph::{Net, Wire};
pub use ids::{NetId, TileId, WireId};
pub use kind::{FieldDef, FieldId, FieldKind, FieldSource, TileKind};
pub use options::{DuplicateNetPolicy, EncodeOptions, IngestOptions, UnknownSectionPolicy};
pub use report::{ConnectionReport, DeviceReport, TileReport};
pub use routing::{RoutingKind, RoutingMut, RoutingResource};
pub use schema::{SchemaBuilder, TileBitConfig};
pub use section::{read_sections, Section};
pub use tile::{Tile, TileState};
