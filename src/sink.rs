//! Where decoded pixels go.
//!
//! A game framework has some notion of a texture: create one with a size,
//! then upload pixels into it. The decoder only ever talks to that through
//! [`TextureSink`], so the same decoding code can feed a GPU upload, a file
//! writer, or a plain in-memory [`Bitmap`].

use alloc::vec::Vec;

use crate::{image::Bitmap, pixel_formats::RGBA8};

/// Receives decoded images.
pub trait TextureSink {
  /// Whatever the sink uses to refer to one texture.
  type Handle;

  /// Makes a new texture of the given size.
  fn create_texture(&mut self, width: u32, height: u32) -> Self::Handle;

  /// Uploads `pixels` to a texture previously made by this sink.
  ///
  /// The pixels are row-major with `width * height` entries.
  fn upload_pixels(&mut self, handle: &Self::Handle, pixels: &[RGBA8]);
}

/// Stores each texture as a [`Bitmap`], the handle is the index in the vec.
impl TextureSink for Vec<Bitmap<RGBA8>> {
  type Handle = usize;

  #[inline]
  fn create_texture(&mut self, width: u32, height: u32) -> usize {
    self.push(Bitmap { width, height, pixels: Vec::new() });
    self.len() - 1
  }

  #[inline]
  fn upload_pixels(&mut self, handle: &usize, pixels: &[RGBA8]) {
    if let Some(bitmap) = self.get_mut(*handle) {
      bitmap.pixels.clear();
      bitmap.pixels.extend_from_slice(pixels);
    }
  }
}

#[test]
fn test_vec_sink_handles() {
  let mut sink: Vec<Bitmap<RGBA8>> = Vec::new();
  let a = sink.create_texture(1, 1);
  let b = sink.create_texture(2, 1);
  sink.upload_pixels(&b, &[RGBA8::gray(1, 2), RGBA8::gray(3, 4)]);
  sink.upload_pixels(&a, &[RGBA8::opaque(9, 8, 7)]);
  assert_eq!((a, b), (0, 1));
  assert_eq!(sink[0].pixels, [RGBA8::opaque(9, 8, 7)]);
  assert_eq!(sink[1].pixels.len(), 2);
}
