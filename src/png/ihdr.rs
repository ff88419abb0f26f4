use super::*;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }

  /// If the bit depth is legal for this color type.
  #[inline]
  #[must_use]
  pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
    match self {
      Self::Y => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
      Self::Index => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::RGB | Self::YA | Self::RGBA => matches!(bit_depth, 8 | 16),
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = ();
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(()),
    })
  }
}

/// Image Header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// if the image data is stored interlaced.
  ///
  /// We can parse this, but we don't decode interlaced images.
  pub is_interlaced: bool,
}
impl IHDR {
  /// Bits in one pixel, across all channels.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// Distance in bytes to the "left" neighbor when unfiltering.
  ///
  /// This is the byte size of one pixel, rounded up to at least 1 for bit
  /// depths that pack more than one pixel per byte.
  #[inline]
  #[must_use]
  pub const fn filter_chunk_size(&self) -> usize {
    let bytes = self.bits_per_pixel() / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Bytes of pixel data in one scanline, not counting the filter byte.
  ///
  /// When pixels are less than 8 bits it's possible to end up with a partial
  /// byte on the end of the line, so we round up.
  #[inline]
  #[must_use]
  pub const fn bytes_per_scanline(&self) -> usize {
    let bits_per_line = self.bits_per_pixel().saturating_mul(self.width as usize);
    (bits_per_line / 8) + (bits_per_line % 8 != 0) as usize
  }

  /// Bytes in one filter line: the filter type byte plus one scanline.
  #[inline]
  #[must_use]
  pub const fn bytes_per_filterline(&self) -> usize {
    self.bytes_per_scanline().saturating_add(1)
  }

  /// Gets the buffer size required to perform Zlib decompression.
  #[inline]
  #[must_use]
  pub const fn get_zlib_decompression_requirement(&self) -> usize {
    self.bytes_per_filterline().saturating_mul(self.height as usize)
  }

  /// Width times height, without overflow.
  #[inline]
  #[must_use]
  pub const fn pixel_count(&self) -> u64 {
    (self.width as u64) * (self.height as u64)
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = PngError;
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =>
      {
        if *compression_method != 0 || *filter_method != 0 {
          return Err(PngError::BadHeader);
        }
        let unsupported =
          PngError::UnsupportedFormat { bit_depth: *bit_depth, color_type: *color_type };
        let color_type = PngColorType::try_from(*color_type).map_err(|_| unsupported)?;
        if !color_type.allows_bit_depth(*bit_depth) {
          return Err(unsupported);
        }
        Ok(Self {
          width: u32::from_be_bytes([*w0, *w1, *w2, *w3]),
          height: u32::from_be_bytes([*h0, *h1, *h2, *h3]),
          bit_depth: *bit_depth,
          color_type,
          is_interlaced: match interlace_method {
            0 => false,
            1 => true,
            _ => return Err(PngError::BadHeader),
          },
        })
      }
      _ => Err(PngError::BadHeader),
    }
  }
}

#[test]
fn test_ihdr_parse() {
  let ihdr = IHDR::try_from(&[0, 0, 1, 0, 0, 0, 0, 3, 8, 6, 0, 0, 0][..]).unwrap();
  assert_eq!(ihdr.width, 256);
  assert_eq!(ihdr.height, 3);
  assert_eq!(ihdr.color_type, PngColorType::RGBA);
  assert!(!ihdr.is_interlaced);
  assert_eq!(ihdr.filter_chunk_size(), 4);
  assert_eq!(ihdr.bytes_per_filterline(), 1 + 4 * 256);
  assert_eq!(ihdr.get_zlib_decompression_requirement(), 3 * (1 + 4 * 256));

  assert_eq!(
    IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 4, 2, 0, 0, 0][..]),
    Err(PngError::UnsupportedFormat { bit_depth: 4, color_type: 2 })
  );
  assert_eq!(
    IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 5, 0, 0, 0][..]),
    Err(PngError::UnsupportedFormat { bit_depth: 8, color_type: 5 })
  );
  assert_eq!(IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 1, 0, 0][..]), Err(PngError::BadHeader));
  assert_eq!(IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 2][..]), Err(PngError::BadHeader));
  assert_eq!(IHDR::try_from(&[0, 0, 0, 1][..]), Err(PngError::BadHeader));
}

#[test]
fn test_ihdr_sub_byte_sizes() {
  let ihdr =
    IHDR { width: 10, height: 2, bit_depth: 1, color_type: PngColorType::Y, is_interlaced: false };
  assert_eq!(ihdr.filter_chunk_size(), 1);
  assert_eq!(ihdr.bytes_per_scanline(), 2);
  let ihdr = IHDR { width: 3, bit_depth: 4, color_type: PngColorType::Index, ..ihdr };
  assert_eq!(ihdr.bytes_per_scanline(), 2);
  let ihdr = IHDR { width: 3, bit_depth: 16, color_type: PngColorType::YA, ..ihdr };
  assert_eq!(ihdr.filter_chunk_size(), 4);
  assert_eq!(ihdr.bytes_per_filterline(), 13);
  let ihdr = IHDR { width: 0, height: 0, ..ihdr };
  assert_eq!(ihdr.bytes_per_filterline(), 1);
  assert_eq!(ihdr.get_zlib_decompression_requirement(), 0);
}
