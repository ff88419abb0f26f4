//! CRC-32 as PNG uses it (ISO 3309, reflected polynomial `0xEDB88320`).

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// One entry per low byte of the running value.
static CRC_TABLE: [u32; 256] = {
  let mut table = [0; 256];
  let mut i = 0;
  while i < table.len() {
    table[i] = byte_remainder(i as u8);
    i += 1;
  }
  table
};

/// Shifts one byte through the polynomial, a bit at a time.
const fn byte_remainder(byte: u8) -> u32 {
  let mut r = byte as u32;
  let mut bit = 0;
  while bit < 8 {
    let low_set = r & 1 != 0;
    r >>= 1;
    if low_set {
      r ^= POLYNOMIAL;
    }
    bit += 1;
  }
  r
}

/// A running CRC over bytes fed in pieces.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChunkCrc(u32);
impl ChunkCrc {
  #[inline]
  pub(crate) const fn new() -> Self {
    Self(u32::MAX)
  }

  #[inline]
  pub(crate) fn update(&mut self, bytes: &[u8]) {
    self.0 = bytes.iter().fold(self.0, |crc, &b| {
      CRC_TABLE[usize::from(crc as u8 ^ b)] ^ (crc >> 8)
    });
  }

  #[inline]
  pub(crate) const fn finish(self) -> u32 {
    !self.0
  }
}

/// The CRC stored after a chunk: it covers the type tag and the data, but not
/// the length.
#[inline]
pub(crate) fn chunk_crc(chunk_type: [u8; 4], data: &[u8]) -> u32 {
  let mut crc = ChunkCrc::new();
  crc.update(&chunk_type);
  crc.update(data);
  crc.finish()
}

#[test]
fn test_chunk_crc() {
  // every empty IEND chunk ends with this
  assert_eq!(chunk_crc(*b"IEND", &[]), 0xAE42_6082);
  assert_eq!(chunk_crc(*b"1234", b"56789"), 0xCBF4_3926);

  let mut split = ChunkCrc::new();
  split.update(b"IH");
  split.update(b"DR");
  split.update(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0]);
  assert_eq!(split.finish(), chunk_crc(*b"IHDR", &[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0]));
  assert_eq!(ChunkCrc::new().finish(), 0);
}
