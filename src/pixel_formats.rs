//! Module for pixel formats.
//!
//! PNG stores many pixel formats, but everything this crate decodes ends up
//! as [`RGBA8`], which is what texture uploads generally want.
//!
//! ## Format Conversion
//!
//! * **Gray to RGB:** copy the gray value into each of the RGB channels.
//! * **Increasing bit depth:** use the current bit pattern as the top bits,
//!   then copy that pattern down as many times as needed to fill the new low
//!   bits. A 2-bit `0b01` becomes `0b01010101`.
//! * **Decreasing bit depth:** keep the top 8 bits.

use bytemuck::{Pod, Zeroable};

/// An RGB value, 8-bits per channel.
///
/// This is the layout of a PNG palette entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// An RGBA value, 8-bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}
impl RGBA8 {
  /// A fully opaque color.
  #[inline]
  #[must_use]
  pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b, a: u8::MAX }
  }

  /// A gray value copied into all three color channels.
  #[inline]
  #[must_use]
  pub const fn gray(y: u8, a: u8) -> Self {
    Self { r: y, g: y, b: y, a }
  }
}
impl From<RGB8> for RGBA8 {
  #[inline]
  #[must_use]
  fn from(RGB8 { r, g, b }: RGB8) -> Self {
    Self::opaque(r, g, b)
  }
}

/// Views pixels as plain bytes, `[r, g, b, a, r, g, b, a, ...]`.
///
/// Handy for texture APIs that take untyped byte data.
#[inline]
#[must_use]
pub fn rgba8_as_bytes(pixels: &[RGBA8]) -> &[u8] {
  bytemuck::cast_slice(pixels)
}

#[test]
fn test_rgba8_byte_order() {
  let px = [RGBA8 { r: 1, g: 2, b: 3, a: 4 }, RGBA8::from(RGB8 { r: 5, g: 6, b: 7 })];
  assert_eq!(rgba8_as_bytes(&px), &[1, 2, 3, 4, 5, 6, 7, 255]);
}
