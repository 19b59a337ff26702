use std::io;

use log::{debug, trace};

use crate::error::{Result, ValidationError};
use crate::header::{max_encoded_len, Channels, Header, QOI_BYTES_END, QOI_MAX_RUN};
use crate::op::Op;
use crate::pixel::{Pixel, PixelDiff};
use crate::state::State;

/// Encodes an image's raw pixel data into a complete QOI byte stream: the
/// header, the chunk stream, and the end marker.
///
/// `pixels` must hold exactly `width * height` pixels in row-major order,
/// each made up of as many bytes as the header declares channels. For
/// `Channels::Rgb` images every pixel is treated as fully opaque.
pub fn encode(pixels: &[u8], header: &Header) -> Result<Vec<u8>> {
  check_input(pixels, header)?;

  let capacity = usize::try_from(max_encoded_len(header)).unwrap_or(pixels.len());
  let mut dest = Vec::with_capacity(capacity);

  encode_to_writer(pixels, header, &mut dest)?;
  dest.shrink_to_fit();

  debug!(
    "encoded {}x{} image into {} bytes",
    header.width(),
    header.height(),
    dest.len()
  );

  Ok(dest)
}

/// Same as [`encode`], but writes the encoded image into `writer` as it is
/// produced.
///
/// Chunks are written one at a time, so it's recommended to provide a
/// buffered writer such as `std::io::BufWriter` when writing to a file or
/// socket. Nothing is written if the input is rejected.
pub fn encode_to_writer<W: io::Write>(pixels: &[u8], header: &Header, mut writer: W) -> Result<()> {
  check_input(pixels, header)?;

  writer.write_all(&header.to_bytes())?;

  let mut state = State::new();
  let stride = header.channels().stride();

  for chunk in pixels.chunks_exact(stride) {
    let pixel = match header.channels() {
      Channels::Rgb => Pixel::from_rgb([chunk[0], chunk[1], chunk[2]]),
      Channels::Rgba => Pixel::from_rgba([chunk[0], chunk[1], chunk[2], chunk[3]]),
    };

    encode_pixel(&mut state, pixel, &mut writer)?;
    state.prev_pixel = pixel;
  }

  flush_run(&mut state, &mut writer)?;

  writer.write_all(&QOI_BYTES_END)?;
  writer.flush()?;

  debug!("encoded {} pixels", header.num_pixels());

  Ok(())
}

// Rejects headers the encoder can't represent and pixel buffers that don't
// match their header.
fn check_input(pixels: &[u8], header: &Header) -> Result<(), ValidationError> {
  header.validate()?;

  let expected = header.pixel_buffer_len()?;

  if pixels.len() != expected {
    return Err(ValidationError::BufferLength {
      expected: expected as u64,
      actual: pixels.len(),
    });
  }

  Ok(())
}

fn flush_run<W: io::Write>(state: &mut State, writer: W) -> Result<(), io::Error> {
  if state.run_count > 0 {
    trace!("flushing run of {}", state.run_count);
    Op::Run(state.run_count).write_to(writer)?;
    state.run_count = 0;
  }

  Ok(())
}

// Encodes and writes the provided pixel using the QOI chunk encoding scheme
// and the provided `state`. The caller advances `state.prev_pixel`.
fn encode_pixel<W: io::Write>(
  state: &mut State,
  pixel: Pixel,
  mut writer: W,
) -> Result<(), io::Error> {
  if pixel == state.prev_pixel {
    state.run_count += 1;

    if state.run_count == QOI_MAX_RUN {
      flush_run(state, &mut writer)?;
    }

    return Ok(());
  }

  flush_run(state, &mut writer)?;

  if let Some(index) = state.cache_match_or_replace(pixel) {
    return Op::Index(index).write_to(&mut writer);
  }

  let op = match pixel.diff(&state.prev_pixel) {
    Some(PixelDiff::Small(dr, dg, db)) => Op::Diff(dr, dg, db),
    Some(PixelDiff::Luma(dg, dr_dg, db_dg)) => Op::Luma(dg, dr_dg, db_dg),
    None if pixel.a == state.prev_pixel.a => Op::Rgb(pixel.r, pixel.g, pixel.b),
    None => Op::Rgba(pixel.r, pixel.g, pixel.b, pixel.a),
  };

  op.write_to(&mut writer)
}
