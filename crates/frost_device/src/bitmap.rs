//! The per-tile bit rectangle exchanged with ASCII bitstreams.

use crate::addr::BitCoordinate;
use crate::error::{DeviceError, DeviceResult};
use std::fmt;

/// A `width` x `height` grid of configuration bits for one tile.
///
/// In an ASCII bitstream the grid is written as `height` lines of `width`
/// `'0'`/`'1'` characters, row 0 first and column 0 leftmost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBitmap {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl TileBitmap {
    /// Creates an all-zero bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Parses the body lines of a bitstream tile section.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::MalformedBitmap`] unless there are exactly
    /// `height` lines of exactly `width` characters, each `'0'` or `'1'`.
    pub fn from_lines<S: AsRef<str>>(width: u32, height: u32, lines: &[S]) -> DeviceResult<Self> {
        if lines.len() != height as usize {
            return Err(DeviceError::MalformedBitmap(format!(
                "expected {height} rows, found {}",
                lines.len()
            )));
        }

        let mut bitmap = Self::new(width, height);
        for (row, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if line.len() != width as usize {
                return Err(DeviceError::MalformedBitmap(format!(
                    "row {row} has {} columns, expected {width}",
                    line.len()
                )));
            }
            for (column, ch) in line.bytes().enumerate() {
                let value = match ch {
                    b'0' => false,
                    b'1' => true,
                    other => {
                        return Err(DeviceError::MalformedBitmap(format!(
                            "row {row} column {column} holds {:?}",
                            other as char
                        )))
                    }
                };
                bitmap.bits[row * width as usize + column] = value;
            }
        }
        Ok(bitmap)
    }

    /// Returns the number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, coord: BitCoordinate) -> Option<usize> {
        coord
            .fits(self.width, self.height)
            .then(|| coord.row as usize * self.width as usize + coord.column as usize)
    }

    /// Reads one bit. Coordinates outside the rectangle read as `false`.
    pub fn get(&self, coord: BitCoordinate) -> bool {
        self.offset(coord).is_some_and(|i| self.bits[i])
    }

    /// Writes one bit. Coordinates outside the rectangle are ignored.
    pub fn set(&mut self, coord: BitCoordinate, value: bool) {
        if let Some(i) = self.offset(coord) {
            self.bits[i] = value;
        }
    }

    /// Composes an integer from `coords`, the first coordinate being bit 0.
    pub fn read_word(&self, coords: &[BitCoordinate]) -> u32 {
        coords
            .iter()
            .enumerate()
            .filter(|&(_, &c)| self.get(c))
            .fold(0, |word, (i, _)| word | 1 << i)
    }

    /// Writes bit `i` of `value` to `coords[i]`, least-significant bit first.
    pub fn write_word(&mut self, coords: &[BitCoordinate], value: u32) {
        for (i, &coord) in coords.iter().enumerate() {
            self.set(coord, (value >> i) & 1 == 1);
        }
    }

    /// Returns `true` if no bit is set.
    pub fn is_zero(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// Returns the rows as `'0'`/`'1'` strings, row 0 first.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.bits
            .chunks(self.width.max(1) as usize)
            .take(self.height as usize)
            .map(|row| row.iter().map(|&b| if b { '1' } else { '0' }).collect())
    }
}

impl fmt::Display for TileBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(&row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bitmap_is_zero() {
        let bm = TileBitmap::new(4, 2);
        assert!(bm.is_zero());
        assert_eq!(bm.to_string(), "0000\n0000");
    }

    #[test]
    fn set_and_get() {
        let mut bm = TileBitmap::new(4, 2);
        bm.set(BitCoordinate::new(3, 1), true);
        assert!(bm.get(BitCoordinate::new(3, 1)));
        assert!(!bm.get(BitCoordinate::new(1, 3)));
        assert_eq!(bm.to_string(), "0000\n0001");
    }

    #[test]
    fn out_of_range_access_is_noop() {
        let mut bm = TileBitmap::new(2, 2);
        bm.set(BitCoordinate::new(5, 0), true);
        assert!(bm.is_zero());
        assert!(!bm.get(BitCoordinate::new(5, 0)));
    }

    #[test]
    fn word_bit_order_is_lsb_first() {
        let coords = [
            BitCoordinate::new(0, 0),
            BitCoordinate::new(2, 1),
            BitCoordinate::new(1, 0),
        ];
        let mut bm = TileBitmap::new(3, 2);
        bm.write_word(&coords, 0b101);
        assert!(bm.get(coords[0]));
        assert!(!bm.get(coords[1]));
        assert!(bm.get(coords[2]));
        assert_eq!(bm.read_word(&coords), 0b101);
    }

    #[test]
    fn write_word_clears_zero_bits() {
        let coords = [BitCoordinate::new(0, 0), BitCoordinate::new(1, 0)];
        let mut bm = TileBitmap::from_lines(2, 1, &["11"]).unwrap();
        bm.write_word(&coords, 0b10);
        assert_eq!(bm.to_string(), "01");
    }

    #[test]
    fn parse_lines() {
        let bm = TileBitmap::from_lines(3, 2, &["100", "011"]).unwrap();
        assert!(bm.get(BitCoordinate::new(0, 0)));
        assert!(bm.get(BitCoordinate::new(1, 1)));
        assert!(bm.get(BitCoordinate::new(2, 1)));
        assert!(!bm.get(BitCoordinate::new(1, 0)));
        assert_eq!(bm.to_string(), "100\n011");
    }

    #[test]
    fn parse_rejects_wrong_row_count() {
        let err = TileBitmap::from_lines(3, 2, &["100"]).unwrap_err();
        assert!(matches!(err, DeviceError::MalformedBitmap(_)));
    }

    #[test]
    fn parse_rejects_wrong_width() {
        let err = TileBitmap::from_lines(3, 1, &["10"]).unwrap_err();
        assert!(matches!(err, DeviceError::MalformedBitmap(_)));
    }

    #[test]
    fn parse_rejects_foreign_characters() {
        let err = TileBitmap::from_lines(3, 1, &["1x0"]).unwrap_err();
        assert!(matches!(err, DeviceError::MalformedBitmap(m) if m.contains("'x'")));
    }
}
