#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]

//! A crate for decoding PNG data into texture-ready pixels.
//!
//! The decoder turns PNG bytes into row-major [`RGBA8`] pixels, either as a
//! [`Bitmap`] or handed directly to a [`TextureSink`]. See the [`png`] module
//! for the details of each decoding stage.
//!
//! ## Features
//! * `std` (default): decode from any `Read + Seek` stream, and
//!   [`PngError`] implements `std::error::Error`.
//! * `cli`: builds the `png_texture` command line tool.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub mod error;
pub use error::*;

pub mod pixel_formats;
pub use pixel_formats::*;

pub mod image;
pub use image::*;

pub mod sink;
pub use sink::*;

pub mod png;
pub use png::{decode_png, decode_png_to_sink, PngDecodeConfig};

#[cfg(feature = "std")]
pub use png::decode_png_reader;
