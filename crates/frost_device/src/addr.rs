//! Tile-local bit coordinates and the `B<row>[<column>]` reference syntax.
//!
//! Every configuration bit of a tile lives in a small `width` x `height`
//! rectangle. The chipdb names such a bit as `B<row>[<column>]`, so `B3[17]`
//! is column 17 of row 3.

use crate::error::{DeviceError, DeviceResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One bit inside a tile's configuration rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BitCoordinate {
    /// Column within the row, `0..width`.
    pub column: u32,
    /// Row of the rectangle, `0..height`.
    pub row: u32,
}

impl BitCoordinate {
    /// Creates a coordinate from a column and a row.
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Returns `true` if the coordinate lies inside a `width` x `height` rectangle.
    pub fn fits(self, width: u32, height: u32) -> bool {
        self.column < width && self.row < height
    }
}

impl fmt::Display for BitCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}[{}]", self.row, self.column)
    }
}

impl FromStr for BitCoordinate {
    type Err = DeviceError;

    fn from_str(s: &str) -> DeviceResult<Self> {
        parse_bit_ref(s)
    }
}

/// Parses a bit reference like `B0[36]` into a [`BitCoordinate`].
///
/// # Errors
///
/// Returns [`DeviceError::MalformedAddress`] if the row or the bracketed
/// column is missing or not a decimal number.
pub fn parse_bit_ref(text: &str) -> DeviceResult<BitCoordinate> {
    let malformed = || DeviceError::MalformedAddress(text.to_string());

    let rest = text.strip_prefix('B').ok_or_else(malformed)?;
    let (row, column) = rest.split_once('[').ok_or_else(malformed)?;
    let column = column.strip_suffix(']').ok_or_else(malformed)?;

    let row = parse_decimal(row).ok_or_else(malformed)?;
    let column = parse_decimal(column).ok_or_else(malformed)?;

    Ok(BitCoordinate { column, row })
}

/// Parses a list of bit references, keeping their order.
pub fn parse_bit_refs<S: AsRef<str>>(refs: &[S]) -> DeviceResult<Vec<BitCoordinate>> {
    refs.iter().map(|s| parse_bit_ref(s.as_ref())).collect()
}

pub(crate) fn parse_decimal(s: &str) -> Option<u32> {
    // `u32::from_str` would also take a leading '+'.
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_reference() {
        let c = parse_bit_ref("B0[36]").unwrap();
        assert_eq!(c, BitCoordinate::new(36, 0));
    }

    #[test]
    fn parse_multi_digit_row() {
        let c = parse_bit_ref("B15[53]").unwrap();
        assert_eq!(c.row, 15);
        assert_eq!(c.column, 53);
    }

    #[test]
    fn display_matches_chipdb_syntax() {
        assert_eq!(BitCoordinate::new(7, 12).to_string(), "B12[7]");
    }

    #[test]
    fn from_str_delegates() {
        let c: BitCoordinate = "B2[4]".parse().unwrap();
        assert_eq!(c, BitCoordinate::new(4, 2));
    }

    #[test]
    fn missing_prefix_is_malformed() {
        assert!(matches!(
            parse_bit_ref("0[36]"),
            Err(DeviceError::MalformedAddress(s)) if s == "0[36]"
        ));
    }

    #[test]
    fn missing_column_is_malformed() {
        assert!(parse_bit_ref("B0").is_err());
        assert!(parse_bit_ref("B0[]").is_err());
        assert!(parse_bit_ref("B0[36").is_err());
    }

    #[test]
    fn missing_row_is_malformed() {
        assert!(parse_bit_ref("B[36]").is_err());
    }

    #[test]
    fn non_numeric_tokens_are_malformed() {
        assert!(parse_bit_ref("Bx[36]").is_err());
        assert!(parse_bit_ref("B0[y]").is_err());
        assert!(parse_bit_ref("B+1[2]").is_err());
        assert!(parse_bit_ref("B-1[2]").is_err());
    }

    #[test]
    fn parse_list_keeps_order() {
        let bits = parse_bit_refs(&["B0[1]", "B1[1]", "B0[2]"]).unwrap();
        assert_eq!(
            bits,
            vec![
                BitCoordinate::new(1, 0),
                BitCoordinate::new(1, 1),
                BitCoordinate::new(2, 0)
            ]
        );
    }

    #[test]
    fn parse_list_fails_on_first_bad_entry() {
        let err = parse_bit_refs(&["B0[1]", "nope"]).unwrap_err();
        assert_eq!(err, DeviceError::MalformedAddress("nope".into()));
    }

    #[test]
    fn fits_checks_both_axes() {
        let c = BitCoordinate::new(53, 15);
        assert!(c.fits(54, 16));
        assert!(!c.fits(53, 16));
        assert!(!c.fits(54, 15));
    }
}
