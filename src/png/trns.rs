use super::*;

/// Transparency data, already checked against the image's color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transparency {
  /// Greyscale pixels exactly this value are fully transparent.
  Y(u16),
  /// RGB pixels exactly this value are fully transparent.
  RGB([u16; 3]),
  /// Palette alphas were applied directly to the palette.
  Index,
}
impl Transparency {
  /// Parses a `tRNS` payload for an image of the given color type.
  ///
  /// * Index images need the palette to already exist, since the alphas are
  ///   written into it.
  /// * `YA` and `RGBA` images can't have a transparency chunk, so you get
  ///   `Ok(None)` and the chunk is ignored.
  pub fn from_trns_data(
    data: &[u8], color_type: PngColorType, palette: Option<&mut Palette>,
  ) -> PngResult<Option<Self>> {
    Ok(Some(match (color_type, data) {
      (PngColorType::Y, [y0, y1]) => Self::Y(u16::from_be_bytes([*y0, *y1])),
      (PngColorType::RGB, [r0, r1, g0, g1, b0, b1]) => Self::RGB([
        u16::from_be_bytes([*r0, *r1]),
        u16::from_be_bytes([*g0, *g1]),
        u16::from_be_bytes([*b0, *b1]),
      ]),
      (PngColorType::Y | PngColorType::RGB, _) => return Err(PngError::BadTransparency),
      (PngColorType::Index, alphas) => {
        palette.ok_or(PngError::TransparencyBeforePalette)?.apply_alphas(alphas)?;
        Self::Index
      }
      (PngColorType::YA | PngColorType::RGBA, _) => return Ok(None),
    }))
  }
}

#[test]
fn test_transparency() {
  assert_eq!(
    Transparency::from_trns_data(&[1, 2], PngColorType::Y, None),
    Ok(Some(Transparency::Y(0x0102)))
  );
  assert_eq!(
    Transparency::from_trns_data(&[0, 1, 0, 2, 0, 3], PngColorType::RGB, None),
    Ok(Some(Transparency::RGB([1, 2, 3])))
  );
  assert_eq!(
    Transparency::from_trns_data(&[1, 2, 3], PngColorType::RGB, None),
    Err(PngError::BadTransparency)
  );
  assert_eq!(Transparency::from_trns_data(&[1, 2], PngColorType::RGBA, None), Ok(None));
  assert_eq!(
    Transparency::from_trns_data(&[0], PngColorType::Index, None),
    Err(PngError::TransparencyBeforePalette)
  );
  let mut pal = Palette::from_plte_data(&[9, 9, 9]).unwrap();
  assert_eq!(
    Transparency::from_trns_data(&[7], PngColorType::Index, Some(&mut pal)),
    Ok(Some(Transparency::Index))
  );
  assert_eq!(pal.entries()[0].a, 7);
}
