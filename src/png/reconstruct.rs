use super::*;

use bitfrob::u8_replicate_bits;

/// Turns unfiltered lines into [`RGBA8`] pixels.
#[derive(Debug, Clone, Copy)]
pub struct PixelReconstructor<'p> {
  header: IHDR,
  palette: Option<&'p Palette>,
  transparency: Option<Transparency>,
}
impl<'p> PixelReconstructor<'p> {
  /// Prepares to convert lines for the image described by `header`.
  ///
  /// ## Failure
  /// * Index color images must have a palette.
  pub fn new(
    header: IHDR, palette: Option<&'p Palette>, transparency: Option<Transparency>,
  ) -> PngResult<Self> {
    if header.color_type == PngColorType::Index && palette.is_none() {
      return Err(PngError::MissingPalette);
    }
    Ok(Self { header, palette, transparency })
  }

  /// Converts one unfiltered line into `out`, which should be `width` pixels.
  ///
  /// Padding bits at the end of a line are ignored.
  ///
  /// ## Panics
  /// * If `pixels` is shorter than one scanline of the image.
  pub fn reconstruct_line(&self, pixels: &[u8], out: &mut [RGBA8]) -> PngResult<()> {
    let depth = self.header.bit_depth;
    match self.header.color_type {
      PngColorType::Y => {
        let key = match self.transparency {
          Some(Transparency::Y(key)) => Some(key),
          _ => None,
        };
        for (x, p) in out.iter_mut().enumerate() {
          let full = unpack_sample(pixels, x, depth);
          let y = match depth {
            16 => (full >> 8) as u8,
            8 => full as u8,
            _ => u8_replicate_bits(u32::from(depth), full as u8),
          };
          let a = if key == Some(full) { 0 } else { u8::MAX };
          *p = RGBA8::gray(y, a);
        }
      }
      PngColorType::Index => {
        // checked in `new`
        let palette = self.palette.ok_or(PngError::MissingPalette)?;
        for (x, p) in out.iter_mut().enumerate() {
          *p = palette.lookup(unpack_sample(pixels, x, depth) as u8)?;
        }
      }
      PngColorType::YA => {
        let step = if depth == 16 { 2 } else { 1 };
        for (data, p) in pixels.chunks_exact(2 * step).zip(out.iter_mut()) {
          *p = RGBA8::gray(data[0], data[step]);
        }
      }
      PngColorType::RGB => {
        let key = match self.transparency {
          Some(Transparency::RGB(key)) => Some(key),
          _ => None,
        };
        if depth == 16 {
          for (data, p) in pixels.chunks_exact(6).zip(out.iter_mut()) {
            let full = [
              u16::from_be_bytes([data[0], data[1]]),
              u16::from_be_bytes([data[2], data[3]]),
              u16::from_be_bytes([data[4], data[5]]),
            ];
            let a = if key == Some(full) { 0 } else { u8::MAX };
            *p = RGBA8 { r: data[0], g: data[2], b: data[4], a };
          }
        } else {
          for (data, p) in pixels.chunks_exact(3).zip(out.iter_mut()) {
            let full = [u16::from(data[0]), u16::from(data[1]), u16::from(data[2])];
            let a = if key == Some(full) { 0 } else { u8::MAX };
            *p = RGBA8 { r: data[0], g: data[1], b: data[2], a };
          }
        }
      }
      PngColorType::RGBA => {
        if depth == 16 {
          for (data, p) in pixels.chunks_exact(8).zip(out.iter_mut()) {
            *p = RGBA8 { r: data[0], g: data[2], b: data[4], a: data[6] };
          }
        } else {
          for (data, p) in pixels.chunks_exact(4).zip(out.iter_mut()) {
            *p = RGBA8 { r: data[0], g: data[1], b: data[2], a: data[3] };
          }
        }
      }
    }
    Ok(())
  }
}

/// Gets the `x`th sample of a single channel line.
///
/// Samples smaller than a byte are packed with the leftmost sample in the high
/// bits. 16-bit samples are big-endian.
#[inline]
#[must_use]
fn unpack_sample(pixels: &[u8], x: usize, depth: u8) -> u16 {
  match depth {
    16 => u16::from_be_bytes([pixels[2 * x], pixels[2 * x + 1]]),
    8 => u16::from(pixels[x]),
    _ => {
      let depth = usize::from(depth);
      let bit = x * depth;
      let shift = 8 - depth - (bit % 8);
      let mask = (1_u8 << depth) - 1;
      u16::from((pixels[bit / 8] >> shift) & mask)
    }
  }
}
