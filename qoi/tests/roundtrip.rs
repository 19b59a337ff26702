use pretty_assertions::assert_eq;
use qoi::{decode, decode_header, encode, Channels, Colorspace, Header};
use quickcheck::{quickcheck, TestResult};

fn roundtrip(pixels: &[u8], header: &Header) {
  let encoded = encode(pixels, header).expect("Failed to encode image");
  let (decoded_header, decoded) = decode(&encoded).expect("Failed to decode image");

  assert_eq!(&decoded_header, header);
  assert_eq!(decoded.as_slice(), pixels);
}

// A gradient with noise, runs, and repeated colors so every chunk type
// shows up in the encoded stream.
fn testcard(width: u32, height: u32, channels: Channels) -> Vec<u8> {
  let mut pixels = Vec::new();

  for y in 0..height {
    for x in 0..width {
      let band = x / 8;
      let mut px = [
        (x * 2) as u8,
        (y * 3 + band) as u8,
        (x ^ y) as u8,
        if band % 3 == 0 { 255 } else { (x * 5) as u8 },
      ];

      if y % 4 == 0 {
        px = [40, 80, 120, 255];
      } else if (x + y) % 7 == 0 {
        px = [(band * 13) as u8, 1, 2, 255];
      }

      pixels.extend_from_slice(&px[..channels.stride()]);
    }
  }

  pixels
}

#[test]
fn test_roundtrip_testcard() {
  for channels in [Channels::Rgb, Channels::Rgba] {
    for colorspace in [Colorspace::Srgb, Colorspace::Linear] {
      let header = Header::new(97, 61, channels, colorspace).expect("Invalid header");
      roundtrip(&testcard(97, 61, channels), &header);
    }
  }
}

#[test]
fn test_roundtrip_saturated_run() {
  let header = Header::new(10, 20, Channels::Rgba, Colorspace::Srgb).expect("Invalid header");
  let pixels = [0u8, 0, 0, 255].repeat(200);

  let encoded = encode(&pixels, &header).expect("Failed to encode image");
  let chunks = &encoded[14..encoded.len() - 8];

  // The seed pixel is already "previous", so the whole image is runs.
  assert!(chunks.iter().all(|byte| byte & 0xc0 == 0xc0 && *byte < 0xfe));
  assert!(chunks.len() > 1);

  roundtrip(&pixels, &header);
}

#[test]
fn test_roundtrip_extreme_deltas() {
  let pixels: Vec<u8> = [0u8, 255, 1, 254, 128, 127, 0, 2, 253]
    .iter()
    .flat_map(|&v| [v, v.wrapping_mul(3), v.wrapping_add(100)])
    .collect();
  let header = Header::new(9, 1, Channels::Rgb, Colorspace::Srgb).expect("Invalid header");

  roundtrip(&pixels, &header);
}

quickcheck! {
  fn prop_roundtrip_rgba(data: Vec<u8>, width: u8) -> TestResult {
    let width = u32::from(width % 16) + 1;
    let row = width as usize * 4;
    let height = (data.len() / row) as u32;

    if height == 0 {
      return TestResult::discard();
    }

    let pixels = &data[..row * height as usize];
    let header = Header::new(width, height, Channels::Rgba, Colorspace::Srgb).expect("Invalid header");
    let encoded = encode(pixels, &header).expect("Failed to encode image");

    match decode(&encoded) {
      Ok((decoded_header, decoded)) => TestResult::from_bool(decoded_header == header && decoded == pixels),
      Err(_) => TestResult::failed(),
    }
  }

  fn prop_roundtrip_rgb_quantized(data: Vec<u8>) -> TestResult {
    // Few distinct values so runs, index and diff chunks dominate.
    let pixels: Vec<u8> = data.iter().map(|v| v & 0b1100_0001).collect();
    let len = pixels.len() / 3;

    if len == 0 {
      return TestResult::discard();
    }

    let pixels = &pixels[..len * 3];
    let header = Header::new(len as u32, 1, Channels::Rgb, Colorspace::Linear).expect("Invalid header");
    let encoded = encode(pixels, &header).expect("Failed to encode image");

    match decode(&encoded) {
      Ok((_, decoded)) => TestResult::from_bool(decoded == pixels),
      Err(_) => TestResult::failed(),
    }
  }

  fn prop_header_roundtrip(width: u32, height: u32, rgba: bool, linear: bool) -> TestResult {
    let channels = if rgba { Channels::Rgba } else { Channels::Rgb };
    let colorspace = if linear { Colorspace::Linear } else { Colorspace::Srgb };

    match Header::new(width, height, channels, colorspace) {
      Ok(header) => TestResult::from_bool(decode_header(&header.to_bytes()).ok() == Some(header)),
      Err(_) => TestResult::discard(),
    }
  }
}
