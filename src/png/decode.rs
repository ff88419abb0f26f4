use super::*;

use crate::{image::Bitmap, sink::TextureSink};

/// Settings for a decode.
///
/// The defaults follow the "ignore whatever we safely can" approach described
/// in the [module docs](crate::png): CRCs aren't checked and the stream may end
/// without an `IEND` chunk. The pixel limit is on by default so that a tiny
/// corrupt header can't ask for gigabytes of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PngDecodeConfig {
  /// Check each chunk's CRC.
  pub verify_crc: bool,
  /// Fail if the stream ends without an `IEND` chunk.
  pub require_iend: bool,
  /// The most pixels (`width * height`) an image may have.
  pub max_pixels: Option<u64>,
}
impl Default for PngDecodeConfig {
  #[inline]
  #[must_use]
  fn default() -> Self {
    Self::new()
  }
}
impl PngDecodeConfig {
  /// Default pixel limit, 17,000 by 17,000.
  pub const DEFAULT_MAX_PIXELS: u64 = 17_000 * 17_000;

  /// The default settings.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { verify_crc: false, require_iend: false, max_pixels: Some(Self::DEFAULT_MAX_PIXELS) }
  }

  /// Sets [`verify_crc`](Self::verify_crc).
  #[inline]
  #[must_use]
  pub const fn with_verify_crc(self, verify_crc: bool) -> Self {
    Self { verify_crc, ..self }
  }

  /// Sets [`require_iend`](Self::require_iend).
  #[inline]
  #[must_use]
  pub const fn with_require_iend(self, require_iend: bool) -> Self {
    Self { require_iend, ..self }
  }

  /// Sets [`max_pixels`](Self::max_pixels).
  #[inline]
  #[must_use]
  pub const fn with_max_pixels(self, max_pixels: Option<u64>) -> Self {
    Self { max_pixels, ..self }
  }

  /// Decodes PNG bytes into an RGBA8 image.
  pub fn decode(&self, bytes: &[u8]) -> PngResult<Bitmap<RGBA8>> {
    let mut parts = PngImageParts::new();
    for raw_chunk in PngRawChunkIter::new(bytes)? {
      parts.push_chunk(raw_chunk?, self)?;
    }
    self.decode_parts(&parts)
  }

  /// Decodes PNG data from a seekable stream into an RGBA8 image.
  ///
  /// Reads until the end of the stream.
  #[cfg(feature = "std")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
  pub fn decode_reader<R>(&self, reader: R) -> PngResult<Bitmap<RGBA8>>
  where
    R: std::io::Read + std::io::Seek,
  {
    let mut parts = PngImageParts::new();
    for chunk in PngChunkReader::new(reader)? {
      parts.push_chunk(chunk?.as_raw(), self)?;
    }
    self.decode_parts(&parts)
  }

  /// Decodes PNG bytes and hands the pixels to a texture sink.
  ///
  /// The sink only sees a texture once the whole image decoded successfully.
  pub fn decode_to_sink<S: TextureSink>(&self, bytes: &[u8], sink: &mut S) -> PngResult<S::Handle> {
    let bitmap = self.decode(bytes)?;
    let handle = sink.create_texture(bitmap.width, bitmap.height);
    sink.upload_pixels(&handle, &bitmap.pixels);
    Ok(handle)
  }

  /// Runs the collected chunks through inflate, unfilter, and reconstruction.
  fn decode_parts(&self, parts: &PngImageParts) -> PngResult<Bitmap<RGBA8>> {
    let header = parts.finish(self)?;
    let reconstructor = PixelReconstructor::new(header, parts.palette.as_ref(), parts.transparency)?;

    let mut decompressed = inflate_idat(
      &parts.idat,
      header.get_zlib_decompression_requirement(),
      header.bytes_per_filterline(),
    )?;
    let mut lines = Scanlines::new(&mut decompressed, &header)?;

    let width = header.width as usize;
    let too_large = PngError::DimensionsTooLarge { width: header.width, height: header.height };
    let pixel_count = width.checked_mul(header.height as usize).ok_or(too_large)?;
    let mut pixels: Vec<RGBA8> = Vec::new();
    pixels.try_reserve_exact(pixel_count)?;
    pixels.resize(pixel_count, RGBA8::default());

    unfilter_scanlines(&mut lines, header.filter_chunk_size(), |y, line| {
      let start = (y as usize) * width;
      reconstructor.reconstruct_line(line, &mut pixels[start..start + width])
    })?;

    Ok(Bitmap { width: header.width, height: header.height, pixels })
  }
}

/// Decodes PNG bytes into an RGBA8 image, using the default config.
///
/// ```
/// # use png_texture::png::decode_png;
/// assert!(decode_png(b"not a png").is_err());
/// ```
#[inline]
pub fn decode_png(bytes: &[u8]) -> PngResult<Bitmap<RGBA8>> {
  PngDecodeConfig::new().decode(bytes)
}

/// Decodes PNG data from a seekable stream, using the default config.
#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
#[inline]
pub fn decode_png_reader<R>(reader: R) -> PngResult<Bitmap<RGBA8>>
where
  R: std::io::Read + std::io::Seek,
{
  PngDecodeConfig::new().decode_reader(reader)
}

/// Decodes PNG bytes into a texture sink, using the default config.
#[inline]
pub fn decode_png_to_sink<S: TextureSink>(bytes: &[u8], sink: &mut S) -> PngResult<S::Handle> {
  PngDecodeConfig::new().decode_to_sink(bytes, sink)
}
