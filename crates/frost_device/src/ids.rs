//! Opaque ID newtypes for arena-stored device entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and `Serialize`/`Deserialize`.
//! Tiles, nets and wires reference each other through these handles instead of
//! owning pointers, so the tile/wire/net graph has no ownership cycles.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Handle of a placed tile in the device's tile arena.
    TileId
);

define_id!(
    /// Index of a chip-wide net, as declared by the chipdb `.net` section.
    NetId
);

define_id!(
    /// Handle of a distinct wire name in the device's wire table.
    WireId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_roundtrip() {
        let id = NetId::from_raw(4106);
        assert_eq!(id.as_raw(), 4106);
        assert_eq!(id.index(), 4106);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(WireId::from_raw(1));
        set.insert(WireId::from_raw(2));
        set.insert(WireId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ids_order_by_index() {
        let mut ids = [TileId::from_raw(5), TileId::from_raw(1), TileId::from_raw(3)];
        ids.sort();
        assert_eq!(ids.map(TileId::as_raw), [1, 3, 5]);
    }

    #[test]
    fn display_is_raw_index() {
        assert_eq!(NetId::from_raw(77).to_string(), "77");
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = NetId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: NetId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
