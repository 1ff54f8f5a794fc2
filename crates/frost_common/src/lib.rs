//! Shared foundational types used across the frost bitstream codec.
//!
//! This crate provides interned identifiers for fabric wire names and the
//! line-based source locations attached to chipdb and bitstream diagnostics.

#![warn(missing_docs)]

pub mod ident;
pub mod span;

pub use ident::{Ident, Interner};
pub use span::LineSpan;
