#![forbid(unsafe_code)]

//! Module for decoding PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! ## Automatic Decoding
//!
//! Just call [`decode_png`] and you'll get a [`Bitmap<RGBA8>`](crate::image::Bitmap),
//! or call [`decode_png_to_sink`] to hand the pixels to a
//! [`TextureSink`](crate::sink::TextureSink). If you have a file or other
//! seekable stream instead of bytes in memory, use [`decode_png_reader`]
//! (requires the `std` feature).
//!
//! To change what gets checked, make a [`PngDecodeConfig`] and use its
//! methods instead.
//!
//! ## Decoding Stages
//!
//! If you want to drive the decoding yourself, these are the steps:
//!
//! 1) Iterate the chunks with [`PngRawChunkIter`] (or [`PngChunkReader`] for
//!    a stream). The iterator checks the PNG signature before anything else.
//! 2) Feed each chunk to a [`PngImageParts`]. This keeps the [`IHDR`], the
//!    [`Palette`], the [`Transparency`], and the compressed image data, which
//!    is all of the `IDAT` chunks joined together as one Zlib stream. Other
//!    chunks are skipped.
//! 3) Decompress the image data with [`inflate_idat`]. This gives *filtered*
//!    data, not the final pixels.
//! 4) Wrap the decompressed data in [`Scanlines`], which checks that there's
//!    exactly one filter line per row of the image.
//! 5) Call [`unfilter_scanlines`]. Each line is unfiltered in place, using the
//!    line above it, and passed to your callback.
//! 6) In the callback, use a [`PixelReconstructor`] to turn the unfiltered
//!    line into [`RGBA8`] pixels.
//!
//! ## Parsing Errors
//!
//! Anything that affects the pixels is an error, and an error means you get no
//! image at all. Some things are ignored unless you ask for them:
//!
//! * CRC values (see [`PngDecodeConfig::verify_crc`]).
//! * A missing `IEND` chunk, the data just has to end cleanly on a chunk
//!   boundary (see [`PngDecodeConfig::require_iend`]).
//! * Ancillary chunks other than `tRNS`, and any chunk after `IEND`.
//!
//! Interlaced images are not supported and give
//! [`PngError::InterlaceNotSupported`].

use core::fmt::{Debug, Write};

use alloc::vec::Vec;

use crate::{
  error::{PngError, PngResult},
  pixel_formats::{RGB8, RGBA8},
};

mod crc32;
use crc32::chunk_crc;

mod raw_chunk;
pub use raw_chunk::*;

#[cfg(feature = "std")]
mod stream;
#[cfg(feature = "std")]
pub use stream::*;

mod ihdr;
pub use ihdr::*;

mod plte;
pub use plte::*;

mod trns;
pub use trns::*;

mod chunks;
pub use chunks::*;

mod inflate;
pub use inflate::*;

mod scanlines;
pub use scanlines::*;

mod unfilter;
pub use unfilter::*;

mod reconstruct;
pub use reconstruct::*;

mod decode;
pub use decode::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
///
/// * If this is the case, the rest of the bytes are very likely PNG data.
/// * If this is *not* the case, the rest of the bytes are very likely *not* PNG
///   data.
#[inline]
#[must_use]
pub const fn is_png_header_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}
