#![forbid(unsafe_code)]

//! Provides the heap-allocated image type.

use alloc::vec::Vec;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
///
/// You don't ever need to call this function yourself, but it's how [`Bitmap`]
/// converts 2d coordinates into index values within its pixel vector.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// A direct-color image.
///
/// Pixels are row-major, with the origin at the top left.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct Bitmap<P> {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<P>,
}
impl<P> Bitmap<P> {
  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x < self.width && y < self.height {
      self.pixels.get_mut(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Flips the image top to bottom.
  ///
  /// OpenGL style texture uploads expect the bottom row first.
  #[inline]
  pub fn vertical_flip(&mut self) {
    let width = self.width as usize;
    if width == 0 {
      return;
    }
    let mut data: &mut [P] = self.pixels.as_mut_slice();
    let mut temp_height = self.height;
    while temp_height > 1 {
      let (low, mid) = data.split_at_mut(width);
      let (mid, high) = mid.split_at_mut(mid.len() - width);
      low.swap_with_slice(high);
      data = mid;
      temp_height -= 2;
    }
  }
}

#[test]
fn test_vertical_flip() {
  let mut b = Bitmap { width: 2, height: 3, pixels: alloc::vec![1, 2, 3, 4, 5, 6] };
  b.vertical_flip();
  assert_eq!(b.pixels, [5, 6, 3, 4, 1, 2]);
  assert_eq!(b.get(1, 0), Some(&6));
  assert_eq!(b.get(2, 0), None);
  assert_eq!(b.get(0, 3), None);

  let mut empty: Bitmap<u8> = Bitmap { width: 0, height: 4, pixels: alloc::vec![] };
  empty.vertical_flip();
  assert!(empty.pixels.is_empty());
}
