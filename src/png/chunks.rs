use super::*;

/// A parsed PNG chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub enum PngChunk<'b> {
  /// Image Header
  IHDR(IHDR),
  /// Palette entries
  PLTE(&'b [RGB8]),
  /// Transparency
  ///
  /// The meaning of the bytes depends on the header's color type, see
  /// [`Transparency::from_trns_data`].
  tRNS(&'b [u8]),
  /// Image Data
  ///
  /// All `IDAT` chunks of an image form a single Zlib datastream.
  IDAT(&'b [u8]),
  /// Image End
  IEND,
  /// Any other chunk, which we skip.
  Other(PngChunkType),
}
impl<'b> TryFrom<PngRawChunk<'b>> for PngChunk<'b> {
  type Error = PngError;
  #[inline]
  fn try_from(raw: PngRawChunk<'b>) -> Result<Self, Self::Error> {
    Ok(match raw.type_ {
      PngChunkType::IHDR => PngChunk::IHDR(IHDR::try_from(raw.data)?),
      PngChunkType::PLTE => PngChunk::try_from_plte_data(raw.data)?,
      PngChunkType::tRNS => PngChunk::tRNS(raw.data),
      PngChunkType::IDAT => PngChunk::IDAT(raw.data),
      PngChunkType::IEND => PngChunk::IEND,
      other => PngChunk::Other(other),
    })
  }
}

impl<'b> PngChunk<'b> {
  /// Checks a `PLTE` payload: a whole number of entries, 1 to 256 of them.
  pub(crate) fn try_from_plte_data(data: &'b [u8]) -> PngResult<Self> {
    match bytemuck::try_cast_slice::<u8, RGB8>(data) {
      Ok(entries) if !entries.is_empty() && entries.len() <= 256 => Ok(PngChunk::PLTE(entries)),
      _ => Err(PngError::BadPalette),
    }
  }
}

/// Everything the decoder keeps from the chunks of one PNG.
///
/// Feed it chunks in stream order with [`push_chunk`](Self::push_chunk), then
/// call [`finish`](Self::finish).
#[derive(Debug, Clone, Default)]
pub struct PngImageParts {
  /// The image header.
  pub header: Option<IHDR>,
  /// The palette, if there was a `PLTE` chunk.
  pub palette: Option<Palette>,
  /// Transparency info, if there was a usable `tRNS` chunk.
  pub transparency: Option<Transparency>,
  /// All `IDAT` payloads, concatenated.
  pub idat: Vec<u8>,
  seen_idat: bool,
  seen_trns: bool,
  seen_iend: bool,
}
impl PngImageParts {
  /// A fresh, empty state.
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Takes in the next chunk of the stream.
  pub fn push_chunk(&mut self, raw: PngRawChunk<'_>, config: &PngDecodeConfig) -> PngResult<()> {
    if self.seen_iend {
      return Ok(());
    }
    if config.verify_crc {
      raw.check_crc()?;
    }
    let header = match (self.header, raw.type_) {
      (None, PngChunkType::IHDR) => {
        let ihdr = IHDR::try_from(raw.data)?;
        if ihdr.is_interlaced {
          return Err(PngError::InterlaceNotSupported);
        }
        if let Some(max) = config.max_pixels {
          if ihdr.pixel_count() > max {
            return Err(PngError::DimensionsTooLarge { width: ihdr.width, height: ihdr.height });
          }
        }
        self.header = Some(ihdr);
        return Ok(());
      }
      (None, _) => return Err(PngError::MissingHeader),
      (Some(ihdr), _) => ihdr,
    };
    match PngChunk::try_from(raw)? {
      PngChunk::IHDR(_) => return Err(PngError::DuplicateHeader),
      PngChunk::PLTE(entries) => {
        if self.seen_idat || self.palette.is_some() {
          return Err(PngError::ChunkOutOfOrder(raw.type_.0));
        }
        self.palette = Some(Palette::from_entries(entries)?);
      }
      PngChunk::tRNS(data) => {
        if self.seen_idat || self.seen_trns {
          return Err(PngError::ChunkOutOfOrder(raw.type_.0));
        }
        self.seen_trns = true;
        self.transparency =
          Transparency::from_trns_data(data, header.color_type, self.palette.as_mut())?;
      }
      PngChunk::IDAT(data) => {
        self.seen_idat = true;
        self.idat.try_reserve(data.len())?;
        self.idat.extend_from_slice(data);
      }
      PngChunk::IEND => self.seen_iend = true,
      PngChunk::Other(_) => (),
    }
    Ok(())
  }

  /// Checks that the chunks formed a complete image, giving back the header.
  pub fn finish(&self, config: &PngDecodeConfig) -> PngResult<IHDR> {
    let header = self.header.ok_or(PngError::MissingHeader)?;
    if config.require_iend && !self.seen_iend {
      return Err(PngError::MissingEnd);
    }
    Ok(header)
  }

  /// If an `IEND` chunk was seen.
  #[inline]
  #[must_use]
  pub const fn saw_end(&self) -> bool {
    self.seen_iend
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const IHDR_INDEX_2X1: [u8; 13] = [0, 0, 0, 2, 0, 0, 0, 1, 8, 3, 0, 0, 0];

  fn raw(tag: &[u8; 4], data: &'static [u8]) -> PngRawChunk<'static> {
    PngRawChunk { type_: PngChunkType(*tag), data, declared_crc: 0 }
  }

  #[test]
  fn test_header_must_be_first() {
    let cfg = PngDecodeConfig::new();
    let mut parts = PngImageParts::new();
    assert_eq!(parts.push_chunk(raw(b"PLTE", &[0, 0, 0]), &cfg), Err(PngError::MissingHeader));
    assert_eq!(PngImageParts::new().finish(&cfg), Err(PngError::MissingHeader));
  }

  #[test]
  fn test_duplicate_header() {
    let cfg = PngDecodeConfig::new();
    let mut parts = PngImageParts::new();
    parts.push_chunk(raw(b"IHDR", &IHDR_INDEX_2X1), &cfg).unwrap();
    assert_eq!(parts.push_chunk(raw(b"IHDR", &IHDR_INDEX_2X1), &cfg), Err(PngError::DuplicateHeader));
  }

  #[test]
  fn test_trns_before_plte() {
    let cfg = PngDecodeConfig::new();
    let mut parts = PngImageParts::new();
    parts.push_chunk(raw(b"IHDR", &IHDR_INDEX_2X1), &cfg).unwrap();
    assert_eq!(
      parts.push_chunk(raw(b"tRNS", &[0]), &cfg),
      Err(PngError::TransparencyBeforePalette)
    );
  }

  #[test]
  fn test_chunks_collected() {
    let cfg = PngDecodeConfig::new().with_require_iend(true);
    let mut parts = PngImageParts::new();
    parts.push_chunk(raw(b"IHDR", &IHDR_INDEX_2X1), &cfg).unwrap();
    parts.push_chunk(raw(b"teXt", b"ignored"), &cfg).unwrap();
    parts.push_chunk(raw(b"PLTE", &[1, 1, 1, 2, 2, 2]), &cfg).unwrap();
    parts.push_chunk(raw(b"tRNS", &[128]), &cfg).unwrap();
    parts.push_chunk(raw(b"IDAT", &[1, 2]), &cfg).unwrap();
    parts.push_chunk(raw(b"IDAT", &[3]), &cfg).unwrap();
    assert_eq!(parts.finish(&cfg), Err(PngError::MissingEnd));
    assert_eq!(
      parts.push_chunk(raw(b"PLTE", &[0, 0, 0]), &cfg),
      Err(PngError::ChunkOutOfOrder(*b"PLTE"))
    );
    parts.push_chunk(raw(b"IEND", &[]), &cfg).unwrap();
    // anything after IEND is ignored
    parts.push_chunk(raw(b"IDAT", &[4]), &cfg).unwrap();
    assert!(parts.saw_end());
    assert_eq!(parts.idat, [1, 2, 3]);
    assert_eq!(parts.transparency, Some(Transparency::Index));
    assert_eq!(parts.palette.as_ref().unwrap().entries()[0], RGBA8 { r: 1, g: 1, b: 1, a: 128 });
    assert_eq!(parts.finish(&cfg).unwrap().width, 2);
  }

  #[test]
  fn test_plte_checked_once() {
    let data: &[u8] = &[1, 2, 3, 4, 5, 6];
    let entries = match PngChunk::try_from(raw(b"PLTE", &[1, 2, 3, 4, 5, 6])).unwrap() {
      PngChunk::PLTE(entries) => entries,
      other => panic!("{other:?}"),
    };
    assert_eq!(Palette::from_entries(entries), Palette::from_plte_data(data));
    assert_eq!(PngChunk::try_from(raw(b"PLTE", &[1, 2, 3, 4])), Err(PngError::BadPalette));

    let cfg = PngDecodeConfig::new();
    let mut parts = PngImageParts::new();
    parts.push_chunk(raw(b"IHDR", &IHDR_INDEX_2X1), &cfg).unwrap();
    assert_eq!(parts.push_chunk(raw(b"PLTE", &[]), &cfg), Err(PngError::BadPalette));
    parts.push_chunk(raw(b"PLTE", &[1, 2, 3, 4, 5, 6]), &cfg).unwrap();
    assert_eq!(parts.palette.as_ref().unwrap().entries()[1], RGBA8::opaque(4, 5, 6));
  }

  #[test]
  fn test_header_limits() {
    let mut parts = PngImageParts::new();
    let cfg = PngDecodeConfig::new().with_max_pixels(Some(1));
    assert_eq!(
      parts.push_chunk(raw(b"IHDR", &IHDR_INDEX_2X1), &cfg),
      Err(PngError::DimensionsTooLarge { width: 2, height: 1 })
    );
    let mut parts = PngImageParts::new();
    let cfg = PngDecodeConfig::new();
    assert_eq!(
      parts.push_chunk(raw(b"IHDR", &[0, 0, 0, 2, 0, 0, 0, 1, 8, 3, 0, 0, 1]), &cfg),
      Err(PngError::InterlaceNotSupported)
    );
  }

  #[test]
  fn test_crc_verification() {
    let mut parts = PngImageParts::new();
    let cfg = PngDecodeConfig::new().with_verify_crc(true);
    assert!(matches!(
      parts.push_chunk(raw(b"IHDR", &IHDR_INDEX_2X1), &cfg),
      Err(PngError::CrcMismatch { chunk_type: [b'I', b'H', b'D', b'R'], declared: 0, .. })
    ));
  }
}
