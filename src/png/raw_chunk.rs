use super::*;

/// The 4-byte type tag of a chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl PngChunkType {
  /// Image header
  pub const IHDR: Self = Self(*b"IHDR");
  /// Palette
  pub const PLTE: Self = Self(*b"PLTE");
  /// Image data
  pub const IDAT: Self = Self(*b"IDAT");
  /// Image end
  pub const IEND: Self = Self(*b"IEND");
  /// Transparency
  pub const tRNS: Self = Self(*b"tRNS");

  /// Critical chunks have an uppercase first letter.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    self.0[0].is_ascii_uppercase()
  }
}
impl Debug for PngChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngRawChunk<'b> {
  pub(crate) type_: PngChunkType,
  pub(crate) data: &'b [u8],
  pub(crate) declared_crc: u32,
}
impl Debug for PngRawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngRawChunk")
      .field("type_", &self.type_)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> PngRawChunk<'b> {
  /// The chunk's type tag.
  #[inline]
  #[must_use]
  pub const fn chunk_type(&self) -> PngChunkType {
    self.type_
  }

  /// The chunk's payload.
  #[inline]
  #[must_use]
  pub const fn data(&self) -> &'b [u8] {
    self.data
  }

  /// The CRC stored in the chunk.
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }

  /// Computes the CRC of the type tag and payload.
  #[inline]
  #[must_use]
  pub fn compute_actual_crc(&self) -> u32 {
    chunk_crc(self.type_.0, self.data)
  }

  /// Errors if the declared CRC doesn't match the computed one.
  #[inline]
  pub fn check_crc(&self) -> PngResult<()> {
    let actual = self.compute_actual_crc();
    if actual == self.declared_crc {
      Ok(())
    } else {
      Err(PngError::CrcMismatch { chunk_type: self.type_.0, declared: self.declared_crc, actual })
    }
  }

  /// Splits one complete chunk (length, type, data, crc) off the front of
  /// `bytes`.
  ///
  /// * `Ok(None)` when `bytes` is empty.
  /// * An error if `bytes` ends part way through the chunk.
  pub(crate) fn split_from(bytes: &'b [u8]) -> PngResult<Option<(Self, &'b [u8])>> {
    if bytes.is_empty() {
      return Ok(None);
    }
    let (len_bytes, rest) = try_split_off_byte_array::<4>(bytes).ok_or(PngError::TruncatedChunk)?;
    let chunk_len = u32::from_be_bytes(len_bytes);
    if chunk_len > MAX_CHUNK_LEN {
      return Err(PngError::ChunkTooLong(chunk_len));
    }
    let (type_bytes, rest) = try_split_off_byte_array::<4>(rest).ok_or(PngError::TruncatedChunk)?;
    if rest.len() < chunk_len as usize {
      return Err(PngError::TruncatedChunk);
    }
    let (data, rest) = rest.split_at(chunk_len as usize);
    let (crc_bytes, rest) = try_split_off_byte_array::<4>(rest).ok_or(PngError::TruncatedChunk)?;
    let chunk =
      PngRawChunk { type_: PngChunkType(type_bytes), data, declared_crc: u32::from_be_bytes(crc_bytes) };
    Ok(Some((chunk, rest)))
  }
}

/// Chunk lengths are limited to `2^31 - 1` by the format.
pub(crate) const MAX_CHUNK_LEN: u32 = (1 << 31) - 1;

fn try_split_off_byte_array<const N: usize>(bytes: &[u8]) -> Option<([u8; N], &[u8])> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let a: [u8; N] = head.try_into().ok()?;
    Some((a, tail))
  } else {
    None
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// A truncated chunk produces a single error, and then the iterator is done.
/// The iterator never panics, no matter what bytes you give it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngRawChunkIter<'b>(&'b [u8]);
impl<'b> PngRawChunkIter<'b> {
  /// Pass the full PNG bytes, the signature is checked and then skipped.
  #[inline]
  pub fn new(bytes: &'b [u8]) -> PngResult<Self> {
    match bytes {
      [137, 80, 78, 71, 13, 10, 26, 10, rest @ ..] => Ok(Self(rest)),
      _ => Err(PngError::NotPng),
    }
  }

  /// Iterates chunks from bytes that *follow* the signature.
  #[inline]
  pub const fn after_signature(bytes: &'b [u8]) -> Self {
    Self(bytes)
  }
}
impl<'b> Iterator for PngRawChunkIter<'b> {
  type Item = PngResult<PngRawChunk<'b>>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    match PngRawChunk::split_from(self.0) {
      Ok(Some((chunk, rest))) => {
        self.0 = rest;
        Some(Ok(chunk))
      }
      Ok(None) => None,
      Err(e) => {
        self.0 = &[];
        Some(Err(e))
      }
    }
  }
}

#[test]
fn test_raw_chunk_iter() {
  let mut png = alloc::vec::Vec::from(PNG_SIGNATURE);
  png.extend_from_slice(&[0, 0, 0, 2, b'a', b'b', b'c', b'd', 7, 8, 0, 0, 0, 0]);
  png.extend_from_slice(&[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]);
  let chunks: alloc::vec::Vec<_> =
    PngRawChunkIter::new(&png).unwrap().collect::<PngResult<_>>().unwrap();
  assert_eq!(chunks.len(), 2);
  assert_eq!(chunks[0].chunk_type(), PngChunkType(*b"abcd"));
  assert!(!chunks[0].chunk_type().is_critical());
  assert_eq!(chunks[0].data(), &[7, 8]);
  assert_eq!(chunks[1].chunk_type(), PngChunkType::IEND);
  assert!(chunks[1].check_crc().is_ok());
  assert!(chunks[0].check_crc().is_err());

  // cut off in the middle of the IEND crc
  let mut it = PngRawChunkIter::new(&png[..png.len() - 1]).unwrap();
  assert!(it.next().unwrap().is_ok());
  assert_eq!(it.next(), Some(Err(PngError::TruncatedChunk)));
  assert_eq!(it.next(), None);

  assert_eq!(PngRawChunkIter::new(b"GIF89a").unwrap_err(), PngError::NotPng);
}

#[test]
fn test_raw_chunk_too_long() {
  let bytes = [0x80, 0, 0, 0, b'I', b'D', b'A', b'T'];
  let mut it = PngRawChunkIter::after_signature(&bytes);
  assert_eq!(it.next(), Some(Err(PngError::ChunkTooLong(0x8000_0000))));
}
