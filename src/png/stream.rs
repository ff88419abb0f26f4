//! Reading chunks out of a `Read + Seek` source.

use std::io::{Read, Seek, SeekFrom};

use super::*;

/// An owned chunk read from a stream.
///
/// The buffer holds the whole chunk as it was in the stream: length, type,
/// data, and CRC.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PngOwnedChunk {
  whole: Vec<u8>,
}
impl PngOwnedChunk {
  /// Borrows this as a raw chunk.
  #[inline]
  #[must_use]
  pub fn as_raw(&self) -> PngRawChunk<'_> {
    // `PngChunkReader` only builds this from a complete chunk.
    let len = self.whole.len() - 12;
    let mut type_ = [0; 4];
    type_.copy_from_slice(&self.whole[4..8]);
    let mut crc = [0; 4];
    crc.copy_from_slice(&self.whole[8 + len..]);
    PngRawChunk {
      type_: PngChunkType(type_),
      data: &self.whole[8..8 + len],
      declared_crc: u32::from_be_bytes(crc),
    }
  }
}
impl Debug for PngOwnedChunk {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    Debug::fmt(&self.as_raw(), f)
  }
}

/// Reads chunks one at a time from a seekable stream.
///
/// Each chunk is read by peeking the 4-byte length, seeking back, and then
/// reading up to `length + 12` bytes as a single unit. The stream is left positioned
/// just past the chunk.
#[derive(Debug)]
pub struct PngChunkReader<R> {
  reader: R,
  done: bool,
}
impl<R: Read + Seek> PngChunkReader<R> {
  /// Checks the PNG signature at the reader's current position.
  pub fn new(mut reader: R) -> PngResult<Self> {
    let mut signature = [0_u8; 8];
    match reader.read_exact(&mut signature) {
      Ok(()) => (),
      Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Err(PngError::NotPng),
      Err(e) => return Err(e.into()),
    }
    if signature != PNG_SIGNATURE {
      return Err(PngError::NotPng);
    }
    Ok(Self { reader, done: false })
  }

  /// Gives back the underlying reader.
  #[inline]
  pub fn into_inner(self) -> R {
    self.reader
  }

  /// Reads the next chunk, `Ok(None)` at a clean end of stream.
  pub fn read_chunk(&mut self) -> PngResult<Option<PngOwnedChunk>> {
    if self.done {
      return Ok(None);
    }
    let mut len_bytes = [0_u8; 4];
    let got = read_fully(&mut self.reader, &mut len_bytes)?;
    if got == 0 {
      self.done = true;
      return Ok(None);
    }
    if got < 4 {
      self.done = true;
      return Err(PngError::TruncatedChunk);
    }
    let chunk_len = u32::from_be_bytes(len_bytes);
    if chunk_len > MAX_CHUNK_LEN {
      self.done = true;
      return Err(PngError::ChunkTooLong(chunk_len));
    }
    self.reader.seek(SeekFrom::Current(-4))?;
    // the buffer only grows as bytes actually arrive
    let whole_len = u64::from(chunk_len) + 12;
    let mut whole = Vec::new();
    if let Err(e) = self.reader.by_ref().take(whole_len).read_to_end(&mut whole) {
      self.done = true;
      return Err(e.into());
    }
    if (whole.len() as u64) < whole_len {
      self.done = true;
      return Err(PngError::TruncatedChunk);
    }
    Ok(Some(PngOwnedChunk { whole }))
  }
}
impl<R: Read + Seek> Iterator for PngChunkReader<R> {
  type Item = PngResult<PngOwnedChunk>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.read_chunk().transpose()
  }
}

/// Like `read_exact`, but a short read at end of stream gives the count
/// instead of an error.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> PngResult<usize> {
  let mut got = 0;
  while got < buf.len() {
    match reader.read(&mut buf[got..]) {
      Ok(0) => break,
      Ok(n) => got += n,
      Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
      Err(e) => return Err(e.into()),
    }
  }
  Ok(got)
}
