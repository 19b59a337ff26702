use log::debug;

use crate::error::{FormatError, Result, ValidationError};

pub const QOI_BYTES_END: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];
pub const QOI_BYTES_MAGIC: [u8; 4] = *b"qoif";
pub const QOI_HEADER_LEN: usize = 14;
pub const QOI_MAX_RUN: u8 = 62;

// Width and height must both stay below this value.
const QOI_DIMENSION_LIMIT: u32 = u32::MAX;

/// The number of color channels stored per pixel in the caller's buffer.
/// Color channels are assumed to not be pre-multiplied with the alpha
/// channel ("un-premultiplied alpha").
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Channels {
  Rgb = 3,
  Rgba = 4,
}

impl Channels {
  /// Bytes per pixel in a raw pixel buffer.
  pub fn stride(self) -> usize {
    self as usize
  }
}

impl TryFrom<u8> for Channels {
  type Error = ValidationError;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    match byte {
      3 => Ok(Channels::Rgb),
      4 => Ok(Channels::Rgba),
      _ => Err(ValidationError::Channels(byte)),
    }
  }
}

/// How an image's colors are meant to be interpreted. This is carried as a
/// tag only, pixel values are never converted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Colorspace {
  /// sRGB color channels with a linear alpha channel.
  Srgb = 0,
  /// All channels linear.
  Linear = 1,
}

impl TryFrom<u8> for Colorspace {
  type Error = ValidationError;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    match byte {
      0 => Ok(Colorspace::Srgb),
      1 => Ok(Colorspace::Linear),
      _ => Err(ValidationError::Colorspace(byte)),
    }
  }
}

/// The 14 byte QOI header describing an image. Immutable once constructed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Header {
  width: u32,
  height: u32,
  channels: Channels,
  colorspace: Colorspace,
}

impl Header {
  /// Creates a header for an image to be encoded. Both dimensions must be
  /// within `1..=4294967294`.
  pub fn new(
    width: u32,
    height: u32,
    channels: Channels,
    colorspace: Colorspace,
  ) -> Result<Self> {
    let header = Self { width, height, channels, colorspace };
    header.validate()?;
    Ok(header)
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn channels(&self) -> Channels {
    self.channels
  }

  pub fn colorspace(&self) -> Colorspace {
    self.colorspace
  }

  /// Returns the total number of pixels that make up the image.
  pub fn num_pixels(&self) -> u64 {
    u64::from(self.width) * u64::from(self.height)
  }

  /// Returns the length in bytes of the raw pixel buffer this header
  /// describes, or an error if it can't be addressed on this platform.
  pub fn pixel_buffer_len(&self) -> Result<usize, ValidationError> {
    self
      .num_pixels()
      .checked_mul(self.channels.stride() as u64)
      .and_then(|len| usize::try_from(len).ok())
      .ok_or(ValidationError::TooLarge { width: self.width, height: self.height })
  }

  /// Serializes the header into its wire representation.
  pub fn to_bytes(&self) -> [u8; QOI_HEADER_LEN] {
    let mut buf = [0; QOI_HEADER_LEN];
    buf[0..4].copy_from_slice(&QOI_BYTES_MAGIC);
    buf[4..8].copy_from_slice(&self.width.to_be_bytes());
    buf[8..12].copy_from_slice(&self.height.to_be_bytes());
    buf[12] = self.channels as u8;
    buf[13] = self.colorspace as u8;
    buf
  }

  // Checks the dimensions an encoder is willing to accept. Headers parsed
  // from a stream skip this.
  pub(crate) fn validate(&self) -> Result<(), ValidationError> {
    let in_range = |dim: u32| dim != 0 && dim < QOI_DIMENSION_LIMIT;

    if !in_range(self.width) || !in_range(self.height) {
      return Err(ValidationError::Dimensions { width: self.width, height: self.height });
    }

    Ok(())
  }
}

/// Parses the header at the start of `bytes`. Only the magic, channel count
/// and colorspace are checked, the dimensions are accepted as-is.
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
  let buf: &[u8; QOI_HEADER_LEN] = bytes
    .get(..QOI_HEADER_LEN)
    .and_then(|head| head.try_into().ok())
    .ok_or(FormatError::ShortHeader(bytes.len()))?;

  let mut magic = [0; 4];
  magic.copy_from_slice(&buf[0..4]);

  if magic != QOI_BYTES_MAGIC {
    return Err(FormatError::Magic(magic).into());
  }

  let channels = Channels::try_from(buf[12]).map_err(|_| FormatError::Channels(buf[12]))?;
  let colorspace = Colorspace::try_from(buf[13]).map_err(|_| FormatError::Colorspace(buf[13]))?;

  let header = Header {
    width: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
    height: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
    channels,
    colorspace,
  };

  debug!(
    "parsed QOI header: {}x{}, {:?}, {:?}",
    header.width, header.height, header.channels, header.colorspace
  );

  Ok(header)
}

/// Upper bound on the size of an encoded image: every pixel stored as a
/// full RGB or RGBA chunk, plus the header and end marker.
pub fn max_encoded_len(header: &Header) -> u64 {
  let per_pixel = header.channels.stride() as u64 + 1;

  header
    .num_pixels()
    .saturating_mul(per_pixel)
    .saturating_add((QOI_HEADER_LEN + QOI_BYTES_END.len()) as u64)
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::error::Error;

  #[test]
  fn test_header_wire_layout() {
    let header = Header::new(0x0102_0304, 7, Channels::Rgba, Colorspace::Linear)
      .expect("Failed to create header");

    assert_eq!(
      header.to_bytes(),
      [b'q', b'o', b'i', b'f', 1, 2, 3, 4, 0, 0, 0, 7, 4, 1]
    );
  }

  #[test]
  fn test_decoding_image_header() {
    let header = Header::new(640, 480, Channels::Rgb, Colorspace::Srgb)
      .expect("Failed to create header");

    assert_eq!(decode_header(&header.to_bytes()), Ok(header));
    assert_eq!(header.width(), 640);
    assert_eq!(header.height(), 480);
    assert_eq!(header.channels(), Channels::Rgb);
    assert_eq!(header.colorspace(), Colorspace::Srgb);
  }

  #[test]
  fn test_decoding_zero_sized_header() {
    let mut bytes = Vec::new();

    bytes.extend_from_slice(&QOI_BYTES_MAGIC);
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&[4, 0]);

    let header = decode_header(&bytes).expect("Failed to decode header");
    assert_eq!(header.num_pixels(), 0);
  }

  #[test]
  fn test_decoding_invalid_image_header() {
    let valid = Header::new(1, 1, Channels::Rgba, Colorspace::Srgb)
      .expect("Failed to create header")
      .to_bytes();

    let mut bad_magic = valid;
    bad_magic[0] = b'Q';
    assert_eq!(
      decode_header(&bad_magic),
      Err(Error::Format(FormatError::Magic(*b"Qoif")))
    );

    let mut bad_channels = valid;
    bad_channels[12] = 5;
    assert_eq!(decode_header(&bad_channels), Err(Error::Format(FormatError::Channels(5))));

    let mut bad_colorspace = valid;
    bad_colorspace[13] = 2;
    assert_eq!(
      decode_header(&bad_colorspace),
      Err(Error::Format(FormatError::Colorspace(2)))
    );

    assert_eq!(decode_header(&valid[..13]), Err(Error::Format(FormatError::ShortHeader(13))));
  }

  #[test]
  fn test_rejecting_bad_dimensions() {
    for (width, height) in [(0, 1), (1, 0), (u32::MAX, 1), (1, u32::MAX)] {
      assert_eq!(
        Header::new(width, height, Channels::Rgb, Colorspace::Srgb),
        Err(Error::Validation(ValidationError::Dimensions { width, height }))
      );
    }

    assert!(Header::new(u32::MAX - 1, 1, Channels::Rgb, Colorspace::Srgb).is_ok());
  }

  #[test]
  fn test_rejecting_bad_channels_and_colorspace() {
    assert_eq!(Channels::try_from(2), Err(ValidationError::Channels(2)));
    assert_eq!(Channels::try_from(4), Ok(Channels::Rgba));
    assert_eq!(Colorspace::try_from(7), Err(ValidationError::Colorspace(7)));
    assert_eq!(Colorspace::try_from(1), Ok(Colorspace::Linear));
  }

  #[test]
  fn test_max_encoded_len() {
    let header = Header::new(2, 3, Channels::Rgba, Colorspace::Srgb)
      .expect("Failed to create header");

    assert_eq!(max_encoded_len(&header), 6 * 5 + 14 + 8);
  }
}
