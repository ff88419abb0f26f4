use super::*;

use miniz_oxide::inflate::decompress_to_vec_zlib_with_limit;

/// Decompresses the concatenated `IDAT` data.
///
/// * `expected` is how many bytes the header says the image needs. The output
///   is allowed to grow one filter line past that, enough to show that there's
///   too much data without letting a bad stream allocate without bound.
/// * Empty input gives empty output, which is correct for a zero-height image
///   and gets caught later for any other image.
pub fn inflate_idat(idat: &[u8], expected: usize, bytes_per_filterline: usize) -> PngResult<Vec<u8>> {
  if idat.is_empty() {
    return Ok(Vec::new());
  }
  let limit = expected.saturating_add(bytes_per_filterline);
  decompress_to_vec_zlib_with_limit(idat, limit).map_err(|e| PngError::Decompression(e.status))
}

#[test]
fn test_inflate_idat() {
  use miniz_oxide::{deflate::compress_to_vec_zlib, inflate::TINFLStatus};

  let raw: Vec<u8> = (0..=255).collect();
  let z = compress_to_vec_zlib(&raw, 6);
  assert_eq!(inflate_idat(&z, 256, 1).unwrap(), raw);
  assert!(inflate_idat(&[], 0, 1).unwrap().is_empty());
  assert!(matches!(inflate_idat(&z[..z.len() / 2], 256, 1), Err(PngError::Decompression(_))));
  assert!(matches!(inflate_idat(&[1, 2, 3, 4], 256, 1), Err(PngError::Decompression(_))));
  assert_eq!(
    inflate_idat(&z, 100, 1),
    Err(PngError::Decompression(TINFLStatus::HasMoreOutput))
  );
}
