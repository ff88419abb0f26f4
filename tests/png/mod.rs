use std::io::Cursor;

use miniz_oxide::deflate::compress_to_vec_zlib;
use png_texture::{
  png::{PngRawChunkIter, PNG_SIGNATURE},
  *,
};
use walkdir::WalkDir;

/// Builds PNG bytes out of `(tag, data)` chunks, with correct CRCs.
fn png_bytes(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
  let mut out = Vec::from(PNG_SIGNATURE);
  for (tag, data) in chunks {
    let start = out.len();
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(*tag);
    out.extend_from_slice(data);
    out.extend_from_slice(&[0; 4]);
    let crc = PngRawChunkIter::after_signature(&out[start..]).next().unwrap().unwrap().compute_actual_crc();
    let end = out.len();
    out[end - 4..].copy_from_slice(&crc.to_be_bytes());
  }
  out
}

fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
  let mut v = Vec::new();
  v.extend_from_slice(&width.to_be_bytes());
  v.extend_from_slice(&height.to_be_bytes());
  v.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
  v
}

/// A whole PNG from a header and the (already filtered) filter lines.
fn simple_png(header: &[u8], filtered: &[u8]) -> Vec<u8> {
  let z = compress_to_vec_zlib(filtered, 6);
  png_bytes(&[(b"IHDR", header), (b"IDAT", &z), (b"IEND", &[])])
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
  let p = a as i16 + b as i16 - c as i16;
  let (pa, pb, pc) = ((p - a as i16).abs(), (p - b as i16).abs(), (p - c as i16).abs());
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Applies filter `f` to each raw line the way an encoder would.
fn filter_lines(raw: &[u8], line_len: usize, bpp: usize, filters: &[u8]) -> Vec<u8> {
  let mut out = Vec::new();
  let zero = vec![0; line_len];
  for (y, line) in raw.chunks_exact(line_len).enumerate() {
    let prev = if y == 0 { &zero[..] } else { &raw[(y - 1) * line_len..y * line_len] };
    let f = filters[y % filters.len()];
    out.push(f);
    for x in 0..line_len {
      let a = if x >= bpp { line[x - bpp] } else { 0 };
      let b = prev[x];
      let c = if x >= bpp { prev[x - bpp] } else { 0 };
      let predict = match f {
        0 => 0,
        1 => a,
        2 => b,
        3 => ((a as u16 + b as u16) / 2) as u8,
        4 => paeth(a, b, c),
        _ => unreachable!(),
      };
      out.push(line[x].wrapping_sub(predict));
    }
  }
  out
}

#[test]
fn test_2x2_rgb_no_filter() {
  let filtered = [
    0, 255, 0, 0, 0, 255, 0, //
    0, 0, 0, 255, 10, 20, 30,
  ];
  let png = simple_png(&ihdr(2, 2, 8, 2), &filtered);
  let image = decode_png(&png).unwrap();
  assert_eq!((image.width, image.height), (2, 2));
  assert_eq!(
    image.pixels,
    [
      RGBA8::opaque(255, 0, 0),
      RGBA8::opaque(0, 255, 0),
      RGBA8::opaque(0, 0, 255),
      RGBA8::opaque(10, 20, 30),
    ]
  );
}

#[test]
fn test_every_filter_rgba() {
  let (w, h) = (5_u32, 10_u32);
  let raw: Vec<u8> = (0..w * h * 4).map(|i| (i * 37 % 251) as u8).collect();
  let filtered = filter_lines(&raw, (w * 4) as usize, 4, &[0, 1, 2, 3, 4]);
  let image = decode_png(&simple_png(&ihdr(w, h, 8, 6), &filtered)).unwrap();
  assert_eq!(rgba8_as_bytes(&image.pixels), &raw[..]);
}

#[test]
fn test_every_filter_gray_1bit() {
  // 11 pixels wide, 2 bytes per line, the last 5 bits are padding
  let (w, h) = (11_u32, 6_u32);
  let raw: Vec<u8> = (0..h * 2).map(|i| if i % 2 == 0 { 0b1011_0011 } else { 0b0110_0000 }).collect();
  let filtered = filter_lines(&raw, 2, 1, &[4, 3, 2, 1, 0]);
  let image = decode_png(&simple_png(&ihdr(w, h, 1, 0), &filtered)).unwrap();
  let expected_row = [1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 1].map(|bit| RGBA8::gray(bit * 255, 255));
  for row in image.pixels.chunks_exact(w as usize) {
    assert_eq!(row, expected_row);
  }
}

#[test]
fn test_16_bit_rgb_with_key() {
  let filtered = [0, 0x12, 0x34, 0, 0, 0xFF, 0xFF, 0x12, 0x35, 0, 0, 0xFF, 0xFF];
  let trns = [0x12, 0x34, 0, 0, 0xFF, 0xFF];
  let z = compress_to_vec_zlib(&filtered, 6);
  let png = png_bytes(&[(b"IHDR", &ihdr(2, 1, 16, 2)), (b"tRNS", &trns), (b"IDAT", &z)]);
  let image = decode_png(&png).unwrap();
  assert_eq!(image.pixels, [RGBA8 { r: 0x12, g: 0, b: 0xFF, a: 0 }, RGBA8::opaque(0x12, 0, 0xFF)]);
}

#[test]
fn test_indexed_with_alpha() {
  let plte = [255, 0, 0, 0, 255, 0, 0, 0, 255];
  let trns = [128];
  let z = compress_to_vec_zlib(&[0, 0b0001_1000], 6);
  let png = png_bytes(&[
    (b"IHDR", &ihdr(3, 1, 2, 3)),
    (b"PLTE", &plte),
    (b"tRNS", &trns),
    (b"IDAT", &z),
    (b"IEND", &[]),
  ]);
  let image = decode_png(&png).unwrap();
  assert_eq!(
    image.pixels,
    [RGBA8 { r: 255, g: 0, b: 0, a: 128 }, RGBA8::opaque(0, 255, 0), RGBA8::opaque(0, 0, 255)]
  );
}

#[test]
fn test_palette_index_out_of_range() {
  let z = compress_to_vec_zlib(&[0, 0, 2], 6);
  let png = png_bytes(&[(b"IHDR", &ihdr(2, 1, 8, 3)), (b"PLTE", &[1, 2, 3, 4, 5, 6]), (b"IDAT", &z)]);
  assert_eq!(
    decode_png(&png),
    Err(PngError::PaletteIndexOutOfRange { index: 2, palette_len: 2 })
  );
}

#[test]
fn test_decode_is_repeatable() {
  let raw: Vec<u8> = (0..4 * 4 * 3).map(|i| (i * 11) as u8).collect();
  let png = simple_png(&ihdr(4, 4, 8, 2), &filter_lines(&raw, 12, 3, &[4, 1]));
  let a = decode_png(&png).unwrap();
  let b = decode_png(&png).unwrap();
  assert_eq!(a, b);
}

#[test]
fn test_zero_height_empty_idat() {
  let png = png_bytes(&[(b"IHDR", &ihdr(4, 0, 8, 2)), (b"IDAT", &[]), (b"IEND", &[])]);
  let image = decode_png(&png).unwrap();
  assert_eq!((image.width, image.height), (4, 0));
  assert!(image.pixels.is_empty());

  // a zlib stream holding zero bytes is the same thing
  let z = compress_to_vec_zlib(&[], 6);
  let png = png_bytes(&[(b"IHDR", &ihdr(4, 0, 8, 2)), (b"IDAT", &z)]);
  assert!(decode_png(&png).unwrap().pixels.is_empty());
}

#[test]
fn test_missing_signature() {
  let mut png = simple_png(&ihdr(1, 1, 8, 0), &[0, 9]);
  png[1] = b'Q';
  assert_eq!(decode_png(&png), Err(PngError::NotPng));
  assert_eq!(decode_png(&[]), Err(PngError::NotPng));
  assert_eq!(decode_png_reader(Cursor::new(&png)), Err(PngError::NotPng));
}

#[test]
fn test_truncated_file() {
  let png = simple_png(&ihdr(1, 1, 8, 0), &[0, 9]);
  assert_eq!(decode_png(&png[..png.len() - 2]), Err(PngError::TruncatedChunk));
  assert_eq!(decode_png_reader(Cursor::new(&png[..png.len() - 2])), Err(PngError::TruncatedChunk));
}

#[test]
fn test_malformed_pixel_data() {
  // 2x1 gray needs 3 bytes, give it 4
  let png = simple_png(&ihdr(2, 1, 8, 0), &[0, 1, 2, 3]);
  assert_eq!(
    decode_png(&png),
    Err(PngError::MalformedPixelData { len: 4, bytes_per_filterline: 3 })
  );
  let png = simple_png(&ihdr(2, 2, 8, 0), &[0, 1, 2]);
  assert_eq!(decode_png(&png), Err(PngError::ScanlineCountMismatch { expected: 2, actual: 1 }));
}

#[test]
fn test_bad_zlib_data() {
  let png = png_bytes(&[(b"IHDR", &ihdr(1, 1, 8, 0)), (b"IDAT", &[0xDE, 0xAD, 0xBE, 0xEF])]);
  let err = decode_png(&png).unwrap_err();
  assert!(matches!(err, PngError::Decompression(_)));
  assert!(err.to_string().starts_with("decompression failed"));
}

#[test]
fn test_unknown_filter_type() {
  let png = simple_png(&ihdr(1, 2, 8, 0), &[0, 1, 9, 1]);
  assert_eq!(decode_png(&png), Err(PngError::UnknownFilterType(9)));
}

#[test]
fn test_split_idat_and_ancillary_chunks() {
  let raw: Vec<u8> = (0..3 * 3 * 2).map(|i| (i * 29) as u8).collect();
  let z = compress_to_vec_zlib(&filter_lines(&raw, 6, 2, &[2, 3, 4]), 6);
  let (z0, rest) = z.split_at(3);
  let (z1, z2) = rest.split_at(rest.len() / 2);
  let png = png_bytes(&[
    (b"IHDR", &ihdr(3, 3, 8, 4)),
    (b"gAMA", &[0, 0, 0xB1, 0x8F]),
    (b"IDAT", z0),
    (b"IDAT", z1),
    (b"tEXt", b"Comment\0hello"),
    (b"IDAT", z2),
    (b"IEND", &[]),
  ]);
  let image = decode_png(&png).unwrap();
  let expected: Vec<RGBA8> = raw.chunks_exact(2).map(|ya| RGBA8::gray(ya[0], ya[1])).collect();
  assert_eq!(image.pixels, expected);
}

#[test]
fn test_reader_matches_slice() {
  let raw: Vec<u8> = (0..6 * 2 * 4).map(|i| (i * 7) as u8).collect();
  let png = simple_png(&ihdr(6, 2, 8, 6), &filter_lines(&raw, 24, 4, &[1, 4]));
  assert_eq!(decode_png_reader(Cursor::new(&png)).unwrap(), decode_png(&png).unwrap());
}

#[test]
fn test_sink_gets_pixels() {
  let png = simple_png(&ihdr(1, 1, 8, 4), &[0, 77, 99]);
  let mut sink: Vec<Bitmap<RGBA8>> = Vec::new();
  let handle = decode_png_to_sink(&png, &mut sink).unwrap();
  assert_eq!(sink[handle].pixels, [RGBA8::gray(77, 99)]);

  // a failed decode never creates a texture
  assert!(decode_png_to_sink(&png[..20], &mut sink).is_err());
  assert_eq!(sink.len(), 1);
}

#[test]
fn test_config_checks() {
  let mut png = simple_png(&ihdr(1, 1, 8, 0), &[0, 9]);
  let strict = PngDecodeConfig::new().with_verify_crc(true).with_require_iend(true);
  assert!(strict.decode(&png).is_ok());

  // flip a bit in the IEND crc
  let last = png.len() - 1;
  png[last] ^= 1;
  assert!(decode_png(&png).is_ok());
  assert!(matches!(strict.decode(&png), Err(PngError::CrcMismatch { chunk_type, .. }) if &chunk_type == b"IEND"));

  let no_end = png_bytes(&[(b"IHDR", &ihdr(1, 1, 8, 0)), (b"IDAT", &compress_to_vec_zlib(&[0, 9], 6))]);
  assert!(decode_png(&no_end).is_ok());
  assert_eq!(strict.decode(&no_end), Err(PngError::MissingEnd));

  let big = simple_png(&ihdr(20_000, 20_000, 8, 0), &[]);
  assert_eq!(decode_png(&big), Err(PngError::DimensionsTooLarge { width: 20_000, height: 20_000 }));
}

#[test]
fn test_order_errors() {
  let z = compress_to_vec_zlib(&[0, 0], 6);
  let png = png_bytes(&[(b"IHDR", &ihdr(1, 1, 8, 3)), (b"tRNS", &[0]), (b"PLTE", &[1, 2, 3]), (b"IDAT", &z)]);
  assert_eq!(decode_png(&png), Err(PngError::TransparencyBeforePalette));

  let png = png_bytes(&[(b"IDAT", &z), (b"IHDR", &ihdr(1, 1, 8, 0))]);
  assert_eq!(decode_png(&png), Err(PngError::MissingHeader));

  let png = png_bytes(&[]);
  assert_eq!(decode_png(&png), Err(PngError::MissingHeader));

  let png = png_bytes(&[(b"IHDR", &ihdr(1, 1, 8, 3)), (b"IDAT", &z)]);
  assert_eq!(decode_png(&png), Err(PngError::MissingPalette));

  let mut interlaced = ihdr(1, 1, 8, 0);
  interlaced[12] = 1;
  let png = png_bytes(&[(b"IHDR", &interlaced), (b"IDAT", &z)]);
  assert_eq!(decode_png(&png), Err(PngError::InterlaceNotSupported));
}

#[test]
fn test_PngRawChunkIter_no_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    for _ in PngRawChunkIter::after_signature(&v) {
      //
    }
    let _ = decode_png(&v);
  }
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    for _ in PngRawChunkIter::after_signature(&v) {
      //
    }
    let mut png = Vec::from(PNG_SIGNATURE);
    png.extend_from_slice(&v);
    let _ = decode_png(&png);
  }
}
