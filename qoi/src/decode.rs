use log::{debug, warn};

use crate::cursor::Cursor;
use crate::error::{Error, FormatError, Result};
use crate::header::{decode_header, Channels, Header, QOI_BYTES_END, QOI_HEADER_LEN, QOI_MAX_RUN};
use crate::op::Op;
use crate::pixel::{Pixel, PixelDiff};
use crate::state::State;

/// Decodes a complete, fully buffered QOI image. Upon success the parsed
/// `Header` is returned along with the raw pixel data, laid out row-major
/// with as many bytes per pixel as the header declares channels.
///
/// Decoding stops once the header's pixel count has been produced, after
/// which the 8 byte end marker must follow. Any bytes after the end marker
/// are ignored.
pub fn decode(bytes: &[u8]) -> Result<(Header, Vec<u8>)> {
  let header = decode_header(bytes)?;
  let mut cursor = Cursor::new(bytes);
  cursor.skip(QOI_HEADER_LEN);

  let expected = header.num_pixels();
  let channels = header.channels();

  // Every byte describes at most one maximal run, so a short stream can't
  // trick us into reserving memory for an enormous declared image.
  let reachable = (cursor.remaining().len() as u64).saturating_mul(u64::from(QOI_MAX_RUN));
  let capacity = expected.min(reachable).saturating_mul(channels.stride() as u64);
  let mut pixels = Vec::with_capacity(usize::try_from(capacity).unwrap_or(0));

  let mut state = State::new();
  let mut decoded: u64 = 0;

  while decoded < expected {
    // Meeting the end marker at a chunk boundary means the stream ended early.
    if cursor.remaining() == QOI_BYTES_END {
      return Err(Error::PixelCountMismatch { expected, decoded });
    }

    let op = Op::read(&mut cursor)?.ok_or(Error::PixelCountMismatch { expected, decoded })?;
    let (pixel, count) = decode_op(&mut state, op);
    let count = u64::from(count);

    if decoded + count > expected {
      return Err(Error::PixelCountMismatch { expected, decoded: decoded + count });
    }

    for _ in 0..count {
      push_pixel(&mut pixels, pixel, channels);
    }

    decoded += count;
  }

  let end_offset = cursor.position();

  if cursor.take::<8>() != Some(QOI_BYTES_END) {
    return Err(FormatError::EndMarker(end_offset).into());
  }

  if !cursor.is_empty() {
    warn!(
      "ignoring {} trailing bytes after the QOI end marker",
      cursor.remaining().len()
    );
  }

  debug!(
    "decoded {}x{} image from {} bytes",
    header.width(),
    header.height(),
    bytes.len()
  );

  Ok((header, pixels))
}

// Applies a single `Op` to the decoding `state`, returning the pixel it
// produces and how many consecutive times that pixel is output.
fn decode_op(state: &mut State, op: Op) -> (Pixel, u8) {
  let prev = state.prev_pixel;

  let pixel = match op {
    Op::Run(count) => {
      return (prev, count);
    }
    Op::Index(index) => {
      // Already cached, by definition.
      let pixel = state.cached(index);
      state.prev_pixel = pixel;
      return (pixel, 1);
    }
    Op::Diff(dr, dg, db) => {
      Pixel::from_diff(PixelDiff::Small(dr, dg, db), &prev)
    }
    Op::Luma(dg, dr_dg, db_dg) => {
      Pixel::from_diff(PixelDiff::Luma(dg, dr_dg, db_dg), &prev)
    }
    Op::Rgb(r, g, b) => {
      Pixel { r, g, b, a: prev.a }
    }
    Op::Rgba(r, g, b, a) => {
      Pixel { r, g, b, a }
    }
  };

  state.cache_insert(pixel);
  state.prev_pixel = pixel;

  (pixel, 1)
}

fn push_pixel(dest: &mut Vec<u8>, pixel: Pixel, channels: Channels) {
  match channels {
    Channels::Rgb => dest.extend_from_slice(&[pixel.r, pixel.g, pixel.b]),
    Channels::Rgba => dest.extend_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]),
  }
}
