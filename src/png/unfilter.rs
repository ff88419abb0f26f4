use super::*;

/// The filter applied to one line before compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  /// Bytes are stored as-is.
  None = 0,
  /// Difference from the byte one pixel to the left.
  Sub = 1,
  /// Difference from the byte above.
  Up = 2,
  /// Difference from the average of left and above.
  Average = 3,
  /// Difference from the Paeth prediction of left, above, and upper left.
  Paeth = 4,
}
impl TryFrom<u8> for FilterType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      _ => return Err(PngError::UnknownFilterType(value)),
    })
  }
}

/// Picks whichever of `a` (left), `b` (up), or `c` (upper left) is closest to
/// `a + b - c`.
#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // The order of these tests is fixed by the format, ties go to `a` then `b`.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reverses `filter` on one line of pixel bytes, in place.
///
/// * `previous` is the already unfiltered line above, or `None` for the first
///   line (which acts like a line of zeroes).
/// * `filter_chunk_size` is the byte distance to the "left" neighbor, see
///   [`IHDR::filter_chunk_size`].
///
/// All math wraps at 256.
pub fn unfilter_line(
  filter: FilterType, line: &mut [u8], previous: Option<&[u8]>, filter_chunk_size: usize,
) {
  let up = |i: usize| previous.and_then(|p| p.get(i).copied()).unwrap_or(0);
  match filter {
    FilterType::None => (),
    FilterType::Sub => {
      for i in filter_chunk_size..line.len() {
        line[i] = line[i].wrapping_add(line[i - filter_chunk_size]);
      }
    }
    FilterType::Up => {
      if let Some(previous) = previous {
        line.iter_mut().zip(previous.iter().copied()).for_each(|(p, b)| *p = p.wrapping_add(b));
      }
    }
    FilterType::Average => {
      for i in 0..line.len() {
        let a = if i >= filter_chunk_size { line[i - filter_chunk_size] } else { 0 };
        let b = up(i);
        line[i] = line[i].wrapping_add(((u16::from(a) + u16::from(b)) / 2) as u8);
      }
    }
    FilterType::Paeth => {
      for i in 0..line.len() {
        let (a, c) = if i >= filter_chunk_size {
          (line[i - filter_chunk_size], up(i - filter_chunk_size))
        } else {
          (0, 0)
        };
        let b = up(i);
        line[i] = line[i].wrapping_add(paeth_predict(a, b, c));
      }
    }
  }
}

/// Unfilters all lines, top to bottom, calling `op(y, pixels)` with each line
/// once it's been unfiltered.
///
/// The data is unfiltered in place, and each filter byte is reset to "no
/// filter", so it's fine to walk the same lines again afterwards.
///
/// ## Failure
/// * A filter byte other than 0 through 4.
/// * Any error returned by `op`, which stops the unfiltering.
pub fn unfilter_scanlines<F>(
  lines: &mut Scanlines<'_>, filter_chunk_size: usize, mut op: F,
) -> PngResult<()>
where
  F: FnMut(u32, &[u8]) -> PngResult<()>,
{
  let mut previous: Option<&[u8]> = None;
  for (y, (f, pixels)) in lines.lines_mut().enumerate() {
    let filter = FilterType::try_from(*f)?;
    unfilter_line(filter, pixels, previous, filter_chunk_size);
    *f = FilterType::None as u8;
    op(y as u32, pixels)?;
    previous = Some(&*pixels);
  }
  Ok(())
}
