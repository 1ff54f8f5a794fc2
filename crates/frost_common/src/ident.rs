//! Interned fabric wire names.
//!
//! A chip database repeats the same few thousand wire names (`sp4_h_r_0`,
//! `glb_netwk_3`, `lutff_2/out`) across every tile of the grid. Each name is
//! stored once in an [`Interner`] and referred to by a copyable [`Ident`].

use lasso::{Key, ThreadedRodeo};
use serde::{Deserialize, Serialize};

/// Handle to a name stored in an [`Interner`].
///
/// Handles from different interners are not comparable in any meaningful
/// way; a device only ever resolves handles it interned itself.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ident(u32);

impl Ident {
    /// Wraps a raw index, e.g. one read back from serialized data.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// The raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `into_usize` and `try_from_usize` are inverse on every value
// `try_from_usize` accepts, which is all of `u32`.
unsafe impl Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Append-only name table, safe to share between threads.
#[derive(Debug)]
pub struct Interner {
    names: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            names: ThreadedRodeo::new(),
        }
    }

    /// Returns the handle of `name`, storing it first if it is new.
    pub fn intern(&self, name: &str) -> Ident {
        self.names.get_or_intern(name)
    }

    /// Returns the handle of `name` if it has been interned.
    pub fn lookup(&self, name: &str) -> Option<Ident> {
        self.names.get(name)
    }

    /// Returns the name behind `ident`, or `None` for a foreign handle.
    pub fn name(&self, ident: Ident) -> Option<&str> {
        self.names.try_resolve(&ident)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
