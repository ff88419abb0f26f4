use super::*;

/// Decompressed image data, checked to be exactly `height` filter lines.
///
/// Each filter line is one filter type byte followed by the scanline's pixel
/// bytes.
#[derive(Debug)]
pub struct Scanlines<'d> {
  data: &'d mut [u8],
  bytes_per_filterline: usize,
}
impl<'d> Scanlines<'d> {
  /// Checks that `decompressed` fits the header's dimensions.
  ///
  /// ## Failure
  /// * The length isn't a multiple of the filter line size.
  /// * The number of lines isn't the image height.
  pub fn new(decompressed: &'d mut [u8], header: &IHDR) -> PngResult<Self> {
    let bytes_per_filterline = header.bytes_per_filterline();
    let len = decompressed.len();
    if len % bytes_per_filterline != 0 {
      return Err(PngError::MalformedPixelData { len, bytes_per_filterline });
    }
    let line_count = len / bytes_per_filterline;
    if line_count != header.height as usize {
      return Err(PngError::ScanlineCountMismatch { expected: header.height, actual: line_count });
    }
    Ok(Self { data: decompressed, bytes_per_filterline })
  }

  /// Number of filter lines.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.data.len() / self.bytes_per_filterline
  }

  /// If there are no lines at all.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Iterates `(filter_byte, pixels)` for each line, top to bottom.
  #[inline]
  pub fn lines_mut(&mut self) -> impl Iterator<Item = (&mut u8, &mut [u8])> + '_ {
    self.data.chunks_exact_mut(self.bytes_per_filterline).map(|chunk| {
      let (f, pixels) = chunk.split_at_mut(1);
      (&mut f[0], pixels)
    })
  }
}

#[test]
fn test_scanlines_sizes() {
  let header =
    IHDR { width: 2, height: 2, bit_depth: 8, color_type: PngColorType::RGB, is_interlaced: false };
  let mut data = [0_u8; 14];
  let mut lines = Scanlines::new(&mut data, &header).unwrap();
  assert_eq!(lines.len(), 2);
  assert!(lines.lines_mut().all(|(f, pixels)| *f == 0 && pixels.len() == 6));

  let mut data = [0_u8; 13];
  assert_eq!(
    Scanlines::new(&mut data, &header).unwrap_err(),
    PngError::MalformedPixelData { len: 13, bytes_per_filterline: 7 }
  );
  let mut data = [0_u8; 21];
  assert_eq!(
    Scanlines::new(&mut data, &header).unwrap_err(),
    PngError::ScanlineCountMismatch { expected: 2, actual: 3 }
  );

  let header = IHDR { height: 0, ..header };
  let mut data: [u8; 0] = [];
  assert!(Scanlines::new(&mut data, &header).unwrap().is_empty());
}
