use core::fmt;

use miniz_oxide::inflate::TINFLStatus;

/// Shorthand for results from this crate.
pub type PngResult<T> = Result<T, PngError>;

/// An error while decoding PNG data.
///
/// Every error is fatal to the image being decoded, no partial image is ever
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngError {
  /// The first 8 bytes aren't the PNG signature.
  NotPng,

  /// The data ended part way through a chunk.
  TruncatedChunk,

  /// A chunk declared a length over `2^31 - 1`.
  ChunkTooLong(u32),

  /// A chunk's declared CRC doesn't match its contents.
  ///
  /// Only checked when [`PngDecodeConfig::verify_crc`](crate::png::PngDecodeConfig) is set.
  CrcMismatch {
    /// The chunk type tag.
    chunk_type: [u8; 4],
    /// CRC stored in the file.
    declared: u32,
    /// CRC computed from the chunk.
    actual: u32,
  },

  /// The first chunk wasn't `IHDR`, or there were no chunks.
  MissingHeader,

  /// More than one `IHDR` chunk.
  DuplicateHeader,

  /// The `IHDR` chunk had the wrong length or an illegal field value.
  BadHeader,

  /// The bit depth and color type combination isn't legal PNG.
  UnsupportedFormat {
    /// bits per channel
    bit_depth: u8,
    /// raw color type byte
    color_type: u8,
  },

  /// The image is interlaced, which isn't supported.
  InterlaceNotSupported,

  /// A chunk appeared somewhere the format doesn't allow.
  ChunkOutOfOrder([u8; 4]),

  /// The `PLTE` chunk length isn't a non-zero multiple of 3 (max 256 entries).
  BadPalette,

  /// An indexed color image had no `PLTE` chunk.
  MissingPalette,

  /// A `tRNS` chunk for an indexed image came before the `PLTE` chunk.
  TransparencyBeforePalette,

  /// The `tRNS` chunk has the wrong length for the color type.
  BadTransparency,

  /// The zlib stream couldn't be decompressed.
  Decompression(TINFLStatus),

  /// The decompressed data isn't a whole number of filter lines.
  MalformedPixelData {
    /// decompressed byte count
    len: usize,
    /// bytes in one filter line (including the filter byte)
    bytes_per_filterline: usize,
  },

  /// The decompressed data holds the wrong number of filter lines.
  ScanlineCountMismatch {
    /// the image height
    expected: u32,
    /// lines actually present
    actual: usize,
  },

  /// A filter line started with a filter type byte other than 0 through 4.
  UnknownFilterType(u8),

  /// An indexed pixel referred past the end of the palette.
  PaletteIndexOutOfRange {
    /// the pixel's index value
    index: u8,
    /// entries in the palette
    palette_len: usize,
  },

  /// The image has more pixels than the configured limit.
  DimensionsTooLarge {
    /// declared width
    width: u32,
    /// declared height
    height: u32,
  },

  /// The data ended without an `IEND` chunk.
  ///
  /// Only checked when [`PngDecodeConfig::require_iend`](crate::png::PngDecodeConfig) is set.
  MissingEnd,

  /// The allocator couldn't give us enough space.
  Alloc,

  /// Reading the source stream failed.
  #[cfg(feature = "std")]
  Io(std::io::ErrorKind),
}

impl fmt::Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotPng => write!(f, "File does not have PNG signature."),
      Self::TruncatedChunk => write!(f, "Malformed chunk: data ended in the middle of a chunk."),
      Self::ChunkTooLong(len) => write!(f, "Malformed chunk: declared length {len} is too long."),
      Self::CrcMismatch { chunk_type, declared, actual } => write!(
        f,
        "CRC mismatch in {} chunk: declared {declared:08X}, actual {actual:08X}.",
        TagDisplay(chunk_type)
      ),
      Self::MissingHeader => write!(f, "First chunk is not IHDR."),
      Self::DuplicateHeader => write!(f, "More than one IHDR chunk."),
      Self::BadHeader => write!(f, "Malformed IHDR chunk."),
      Self::UnsupportedFormat { bit_depth, color_type } => {
        write!(f, "Unsupported bit depth {bit_depth} for color type {color_type}.")
      }
      Self::InterlaceNotSupported => write!(f, "Interlaced images are not supported."),
      Self::ChunkOutOfOrder(tag) => write!(f, "Chunk {} is out of order.", TagDisplay(tag)),
      Self::BadPalette => write!(f, "Malformed PLTE chunk."),
      Self::MissingPalette => write!(f, "Indexed color image has no PLTE chunk."),
      Self::TransparencyBeforePalette => write!(f, "tRNS chunk appeared before PLTE chunk."),
      Self::BadTransparency => write!(f, "Malformed tRNS chunk."),
      Self::Decompression(status) => write!(f, "decompression failed: {status:?}"),
      Self::MalformedPixelData { len, bytes_per_filterline } => write!(
        f,
        "Malformed pixel data - total length {len} is not a multiple of {bytes_per_filterline} bytes per scanline."
      ),
      Self::ScanlineCountMismatch { expected, actual } => {
        write!(f, "Malformed pixel data - expected {expected} scanlines, found {actual}.")
      }
      Self::UnknownFilterType(ty) => write!(f, "Unknown filter type. ({ty})"),
      Self::PaletteIndexOutOfRange { index, palette_len } => {
        write!(f, "Palette index {index} out of range for {palette_len} entries.")
      }
      Self::DimensionsTooLarge { width, height } => {
        write!(f, "Image dimensions {width}x{height} exceed the pixel limit.")
      }
      Self::MissingEnd => write!(f, "No IEND chunk."),
      Self::Alloc => write!(f, "Allocation failed."),
      #[cfg(feature = "std")]
      Self::Io(kind) => write!(f, "I/O error: {kind}"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for PngError {}

impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for PngError {
  #[inline]
  fn from(e: std::io::Error) -> Self {
    match e.kind() {
      std::io::ErrorKind::UnexpectedEof => Self::TruncatedChunk,
      kind => Self::Io(kind),
    }
  }
}

/// Prints a chunk tag as ASCII, with `?` for anything else.
struct TagDisplay<'a>(&'a [u8; 4]);
impl fmt::Display for TagDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    use fmt::Write;
    for &b in self.0 {
      f.write_char(if b.is_ascii_graphic() { b as char } else { '?' })?;
    }
    Ok(())
  }
}

#[test]
fn test_messages_name_the_problem() {
  use alloc::string::ToString;
  assert_eq!(PngError::NotPng.to_string(), "File does not have PNG signature.");
  assert!(PngError::UnknownFilterType(9).to_string().starts_with("Unknown filter type."));
  assert!(PngError::MalformedPixelData { len: 7, bytes_per_filterline: 4 }
    .to_string()
    .starts_with("Malformed pixel data"));
  assert_eq!(PngError::ChunkOutOfOrder(*b"PLTE").to_string(), "Chunk PLTE is out of order.");
  assert!(PngError::Decompression(TINFLStatus::Failed)
    .to_string()
    .starts_with("decompression failed"));
}
