//! Per-kind bit-layout schemas (`*_tile_bits` sections).
//!
//! A [`SchemaBuilder`] consumes the body lines of one schema section, matching
//! each field name against the kind's static field table. Lines whose names
//! match nothing are ignored so newer chip databases still load. Once every
//! slot of every field has been seen, [`SchemaBuilder::finish`] yields an
//! immutable [`TileBitConfig`] that all tiles of that kind share.

use crate::addr::{parse_bit_refs, BitCoordinate};
use crate::error::{DeviceError, DeviceResult};
use crate::kind::{FieldId, FieldKind, FieldSource, TileKind};

/// Widest value a field can hold.
pub const MAX_FIELD_BITS: usize = 32;

/// Most bits a tile rectangle may hold.
pub const MAX_TILE_BITS: u64 = 1 << 16;

/// The finished schema of one tile kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBitConfig {
    kind: TileKind,
    width: u32,
    height: u32,
    fields: Vec<Vec<BitCoordinate>>,
}

impl TileBitConfig {
    /// The tile kind this schema describes.
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Columns of the tile's bit rectangle.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Rows of the tile's bit rectangle.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coordinates of a field, least-significant bit first.
    ///
    /// Fields of another kind have no coordinates here.
    pub fn bits(&self, field: FieldId) -> &[BitCoordinate] {
        if field.kind() != self.kind {
            return &[];
        }
        &self.fields[field.index()]
    }

    /// Number of bits a field occupies.
    pub fn field_width(&self, field: FieldId) -> usize {
        self.bits(field).len()
    }

    /// Largest value a field can hold.
    pub fn field_max(&self, field: FieldId) -> u32 {
        match self.field_width(field) {
            0 => 0,
            n if n >= MAX_FIELD_BITS => u32::MAX,
            n => (1 << n) - 1,
        }
    }
}

/// Accumulates schema lines for one tile kind.
#[derive(Debug)]
pub struct SchemaBuilder {
    kind: TileKind,
    width: u32,
    height: u32,
    slots: Vec<Vec<Option<Vec<BitCoordinate>>>>,
}

impl SchemaBuilder {
    /// Starts a schema for a `width` x `height` rectangle.
    pub fn new(kind: TileKind, width: u32, height: u32) -> Self {
        let slots = kind
            .fields()
            .iter()
            .map(|def| vec![None; def.source.slot_count()])
            .collect();
        Self {
            kind,
            width,
            height,
            slots,
        }
    }

    /// Consumes one `<name> <bit-ref>...` line.
    ///
    /// Returns `Ok(false)` if the name belongs to no field of this kind.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::MalformedAddress`] for an unparsable bit reference.
    /// - [`DeviceError::MalformedSection`] for a recognised line without bits.
    /// - [`DeviceError::OutOfRange`] for a bit outside the rectangle.
    /// - [`DeviceError::DuplicateField`] if the slot was already populated.
    pub fn ingest_line<S: AsRef<str>>(&mut self, name: &str, refs: &[S]) -> DeviceResult<bool> {
        let Some((field, slot, source)) = self.locate(name) else {
            return Ok(false);
        };

        let mut coords = parse_bit_refs(refs)?;
        if coords.is_empty() {
            return Err(DeviceError::MalformedSection(format!(
                "schema line '{name}' has no bit references"
            )));
        }
        if let Some(bad) = coords.iter().find(|c| !c.fits(self.width, self.height)) {
            return Err(DeviceError::OutOfRange(format!(
                "bit {bad} of '{name}' in a {}x{} {} schema",
                self.width, self.height, self.kind
            )));
        }
        if !matches!(source, FieldSource::Bits(_)) {
            coords.truncate(1);
        }

        let entry = &mut self.slots[field][slot];
        if entry.is_some() {
            return Err(DeviceError::DuplicateField {
                kind: self.kind,
                field: name.to_string(),
            });
        }
        *entry = Some(coords);
        Ok(true)
    }

    fn locate(&self, name: &str) -> Option<(usize, usize, FieldSource)> {
        self.kind
            .fields()
            .iter()
            .enumerate()
            .find_map(|(i, def)| def.source.match_name(name).map(|slot| (i, slot, def.source)))
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::IncompleteSchema`] naming the first unpopulated slot.
    /// - [`DeviceError::MalformedSection`] if a field is wider than 32 bits,
    ///   or a flag is not exactly one bit.
    /// - [`DeviceError::MalformedSection`] if the rectangle holds more than
    ///   [`MAX_TILE_BITS`] bits.
    pub fn finish(self) -> DeviceResult<TileBitConfig> {
        let kind = self.kind;
        if u64::from(self.width) * u64::from(self.height) > MAX_TILE_BITS {
            return Err(DeviceError::MalformedSection(format!(
                "{}x{} {kind} rectangle exceeds {MAX_TILE_BITS} bits",
                self.width, self.height
            )));
        }
        let mut fields = Vec::with_capacity(self.slots.len());

        for (def, slots) in kind.fields().iter().zip(self.slots) {
            let mut coords = Vec::new();
            for (slot, entry) in slots.into_iter().enumerate() {
                match entry {
                    Some(bits) => coords.extend(bits),
                    None => {
                        return Err(DeviceError::IncompleteSchema {
                            kind,
                            field: def.source.slot_name(slot),
                        })
                    }
                }
            }
            if coords.len() > MAX_FIELD_BITS {
                return Err(DeviceError::MalformedSection(format!(
                    "field '{}' of {kind} has {} bits",
                    def.name,
                    coords.len()
                )));
            }
            if def.kind == FieldKind::Flag && coords.len() != 1 {
                return Err(DeviceError::MalformedSection(format!(
                    "flag '{}' of {kind} must be a single bit",
                    def.name
                )));
            }
            fields.push(coords);
        }

        Ok(TileBitConfig {
            kind,
            width: self.width,
            height: self.height,
            fields,
        })
    }
}
