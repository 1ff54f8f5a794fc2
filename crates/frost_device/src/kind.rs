//! The four tile kinds and their fixed, ordered field tables.
//!
//! The set of kinds is fixed by the hardware family, so it is a closed enum.
//! Each kind owns a static table of [`FieldDef`]s describing which chipdb
//! `*_tile_bits` lines populate which logical field. The table is both the
//! schema-ingestion matcher and the order in which fields are decoded,
//! encoded and reported.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a fabric tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Logic tile: eight logic cells plus carry and clock control.
    Logic,
    /// I/O tile: two I/O blocks, PLL configuration and I/O control.
    Io,
    /// Bottom half of a block RAM (read side).
    RamBottom,
    /// Top half of a block RAM (write side).
    RamTop,
}

impl TileKind {
    /// All kinds, in chipdb ingestion order.
    pub const ALL: [TileKind; 4] = [
        TileKind::Logic,
        TileKind::Io,
        TileKind::RamBottom,
        TileKind::RamTop,
    ];

    /// Section label for placements and bitstream tiles, e.g. `logic_tile`.
    pub fn label(self) -> &'static str {
        match self {
            TileKind::Logic => "logic_tile",
            TileKind::Io => "io_tile",
            TileKind::RamBottom => "ramb_tile",
            TileKind::RamTop => "ramt_tile",
        }
    }

    /// Section label for the schema, e.g. `logic_tile_bits`.
    pub fn bits_label(self) -> &'static str {
        match self {
            TileKind::Logic => "logic_tile_bits",
            TileKind::Io => "io_tile_bits",
            TileKind::RamBottom => "ramb_tile_bits",
            TileKind::RamTop => "ramt_tile_bits",
        }
    }

    /// Looks up a kind by its placement/bitstream section label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    /// Looks up a kind by its schema section label.
    pub fn from_bits_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.bits_label() == label)
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }

    /// The ordered field table of this kind.
    pub fn fields(self) -> &'static [FieldDef] {
        match self {
            TileKind::Logic => &LOGIC_FIELDS,
            TileKind::Io => &IO_FIELDS,
            TileKind::RamBottom => &RAMB_FIELDS,
            TileKind::RamTop => &RAMT_FIELDS,
        }
    }

    /// Returns the handle of the field called `name`.
    pub fn field(self, name: &str) -> Option<FieldId> {
        self.fields()
            .iter()
            .position(|f| f.name == name)
            .map(|index| FieldId { kind: self, index })
    }

    /// Iterates over the handles of all fields, in table order.
    pub fn field_ids(self) -> impl Iterator<Item = FieldId> {
        (0..self.fields().len()).map(move |index| FieldId { kind: self, index })
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A handle to one field of one tile kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId {
    kind: TileKind,
    index: usize,
}

impl FieldId {
    /// The tile kind this field belongs to.
    pub fn kind(self) -> TileKind {
        self.kind
    }

    /// The field's definition.
    pub fn def(self) -> &'static FieldDef {
        &self.kind.fields()[self.index]
    }

    pub(crate) fn index(self) -> usize {
        self.index
    }
}

/// How a field's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// A single boolean bit.
    Flag,
    /// An unsigned integer of up to 32 bits, bit 0 at the first coordinate.
    Word,
}

/// Which chipdb lines populate a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// One line with this exact name; its first bit reference is used.
    Bit(&'static str),
    /// One line with this exact name; all of its bit references, in order.
    Bits(&'static str),
    /// `count` lines named `<prefix><n>` for `n` in `first..first + count`,
    /// one bit each, slot `n - first` being bit `n - first` of the value.
    Slots {
        /// Name up to the index digits.
        prefix: &'static str,
        /// Number of slots.
        count: usize,
        /// Index of slot 0 in the chipdb names.
        first: usize,
    },
}

impl FieldSource {
    /// Number of slots the schema must populate.
    pub fn slot_count(self) -> usize {
        match self {
            FieldSource::Bit(_) | FieldSource::Bits(_) => 1,
            FieldSource::Slots { count, .. } => count,
        }
    }

    /// Returns the slot a chipdb field name populates, if it belongs to this source.
    pub fn match_name(self, name: &str) -> Option<usize> {
        match self {
            FieldSource::Bit(n) | FieldSource::Bits(n) => (n == name).then_some(0),
            FieldSource::Slots {
                prefix,
                count,
                first,
            } => {
                let digits = name.strip_prefix(prefix)?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let n: usize = digits.parse().ok()?;
                let slot = n.checked_sub(first)?;
                (slot < count).then_some(slot)
            }
        }
    }

    /// The chipdb name of a slot, for error messages.
    pub fn slot_name(self, slot: usize) -> String {
        match self {
            FieldSource::Bit(n) | FieldSource::Bits(n) => n.to_string(),
            FieldSource::Slots { prefix, first, .. } => format!("{prefix}{}", first + slot),
        }
    }
}

/// Definition of one logical field of a tile kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// The field's name as exposed by the model and reports.
    pub name: &'static str,
    /// Flag or word.
    pub kind: FieldKind,
    /// Where the schema takes the field's bits from.
    pub source: FieldSource,
}

const fn flag(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        kind: FieldKind::Flag,
        source: FieldSource::Bit(name),
    }
}

const fn word(name: &'static str, source: FieldSource) -> FieldDef {
    FieldDef {
        name,
        kind: FieldKind::Word,
        source,
    }
}

const fn slots(prefix: &'static str, count: usize, first: usize) -> FieldSource {
    FieldSource::Slots {
        prefix,
        count,
        first,
    }
}

const fn lut(name: &'static str) -> FieldDef {
    word(name, FieldSource::Bits(name))
}

const COL_BUF_CTRL: FieldDef = word("ColBufCtrl", slots("ColBufCtrl.glb_netwk_", 8, 0));
const NEG_CLK: FieldDef = flag("NegClk");

static LOGIC_FIELDS: [FieldDef; 11] = [
    word("CarryInSet", FieldSource::Bit("CarryInSet")),
    COL_BUF_CTRL,
    lut("LC_0"),
    lut("LC_1"),
    lut("LC_2"),
    lut("LC_3"),
    lut("LC_4"),
    lut("LC_5"),
    lut("LC_6"),
    lut("LC_7"),
    NEG_CLK,
];

static IO_FIELDS: [FieldDef; 11] = [
    COL_BUF_CTRL,
    word("IOB_0.PINTYPE", slots("IOB_0.PINTYPE_", 6, 0)),
    word("IOB_1.PINTYPE", slots("IOB_1.PINTYPE_", 6, 0)),
    flag("Icegate"),
    flag("IoCtrl.IE_0"),
    flag("IoCtrl.IE_1"),
    flag("IoCtrl.LVDS"),
    flag("IoCtrl.REN_0"),
    flag("IoCtrl.REN_1"),
    NEG_CLK,
    word("PLL.PLLCONFIG", slots("PLL.PLLCONFIG_", 9, 1)),
];

static RAMB_FIELDS: [FieldDef; 3] = [COL_BUF_CTRL, NEG_CLK, flag("RamConfig.PowerUp")];

static RAMT_FIELDS: [FieldDef; 3] = [
    NEG_CLK,
    word("RamConfig.CBIT", slots("RamConfig.CBIT_", 4, 0)),
    word("RamCascade.CBIT", slots("RamCascade.CBIT_", 4, 4)),
];
