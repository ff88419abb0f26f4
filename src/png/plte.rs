use super::*;

/// Palette data
///
/// Entries come from a `PLTE` chunk and always start fully opaque. If the
/// image has a transparency chunk, [`apply_alphas`](Palette::apply_alphas)
/// sets the alpha of the first entries.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Palette {
  entries: Vec<RGBA8>,
}
impl Debug for Palette {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // currently prints no more than 4 palette entries
    f.debug_tuple("Palette")
      .field(&&self.entries[..self.entries.len().min(4)])
      .field(&self.entries.len())
      .finish()
  }
}
impl Palette {
  /// Parses the payload of a `PLTE` chunk.
  pub fn from_plte_data(data: &[u8]) -> PngResult<Self> {
    match PngChunk::try_from_plte_data(data)? {
      PngChunk::PLTE(rgb) => Self::from_entries(rgb),
      _ => Err(PngError::BadPalette),
    }
  }

  /// Builds opaque entries from an already checked [`PngChunk::PLTE`].
  pub(crate) fn from_entries(rgb: &[RGB8]) -> PngResult<Self> {
    let mut entries = Vec::new();
    entries.try_reserve_exact(rgb.len())?;
    entries.extend(rgb.iter().copied().map(RGBA8::from));
    Ok(Self { entries })
  }

  /// Overwrites the alpha of entry `i` with `alphas[i]`.
  ///
  /// Entries past the end of `alphas` stay opaque. Having more alphas than
  /// entries is an error.
  pub fn apply_alphas(&mut self, alphas: &[u8]) -> PngResult<()> {
    if alphas.len() > self.entries.len() {
      return Err(PngError::BadTransparency);
    }
    self.entries.iter_mut().zip(alphas.iter().copied()).for_each(|(entry, a)| entry.a = a);
    Ok(())
  }

  /// Gets the entries as a slice.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &[RGBA8] {
    &self.entries
  }

  /// Looks up an index, which must be in range.
  #[inline]
  pub fn lookup(&self, index: u8) -> PngResult<RGBA8> {
    self
      .entries
      .get(usize::from(index))
      .copied()
      .ok_or(PngError::PaletteIndexOutOfRange { index, palette_len: self.entries.len() })
  }
}

#[test]
fn test_palette() {
  let mut pal = Palette::from_plte_data(&[1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
  assert_eq!(pal.entries().len(), 3);
  assert_eq!(pal.lookup(1), Ok(RGBA8 { r: 4, g: 5, b: 6, a: 255 }));
  pal.apply_alphas(&[10, 20]).unwrap();
  assert_eq!(pal.lookup(0), Ok(RGBA8 { r: 1, g: 2, b: 3, a: 10 }));
  assert_eq!(pal.lookup(1).unwrap().a, 20);
  assert_eq!(pal.lookup(2).unwrap().a, 255);
  assert_eq!(pal.lookup(3), Err(PngError::PaletteIndexOutOfRange { index: 3, palette_len: 3 }));
  assert_eq!(pal.apply_alphas(&[0; 4]), Err(PngError::BadTransparency));

  assert_eq!(Palette::from_plte_data(&[1, 2]), Err(PngError::BadPalette));
  assert_eq!(Palette::from_plte_data(&[]), Err(PngError::BadPalette));
  assert_eq!(Palette::from_plte_data(&[0; 257 * 3]), Err(PngError::BadPalette));
}
