use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An enumeration of all error values this crate may produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Caller supplied image parameters were rejected before any work began.
  #[error("invalid image parameters: {0}")]
  Validation(#[from] ValidationError),
  /// An encoded QOI stream is malformed.
  #[error("malformed QOI stream: {0}")]
  Format(#[from] FormatError),
  /// The chunk stream is well formed so far, but doesn't describe exactly
  /// the number of pixels declared by the header.
  #[error("stream describes {decoded} pixels, but the header declares {expected}")]
  PixelCountMismatch { expected: u64, decoded: u64 },
  /// Writing the encoded image to its destination failed.
  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Coarse classification of an [`Error`], handy for callers that only need
/// to know which side of the boundary is at fault.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
  Validation,
  Format,
  Truncated,
  Io,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::Validation(_) => ErrorKind::Validation,
      Error::Format(_) => ErrorKind::Format,
      Error::PixelCountMismatch { .. } => ErrorKind::Truncated,
      Error::Io(_) => ErrorKind::Io,
    }
  }
}

/// Problems with image parameters handed to the encoder.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
  #[error("image dimensions {width}x{height} out of range, both must be within 1..=4294967294")]
  Dimensions { width: u32, height: u32 },
  #[error("unsupported channel count {0}, expected 3 (RGB) or 4 (RGBA)")]
  Channels(u8),
  #[error("unsupported colorspace {0}, expected 0 (sRGB) or 1 (linear)")]
  Colorspace(u8),
  #[error("pixel buffer holds {actual} bytes, but the header describes {expected}")]
  BufferLength { expected: u64, actual: usize },
  #[error("image of {width}x{height} pixels does not fit in memory")]
  TooLarge { width: u32, height: u32 },
}

/// Problems with the bytes of an encoded QOI stream.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FormatError {
  #[error("header needs 14 bytes, only {0} available")]
  ShortHeader(usize),
  #[error("bad magic {0:?}, expected \"qoif\"")]
  Magic([u8; 4]),
  #[error("invalid channel count {0} in header")]
  Channels(u8),
  #[error("invalid colorspace {0} in header")]
  Colorspace(u8),
  #[error("chunk `{tag:#010b}` at offset {offset} runs past the end of the stream")]
  UnexpectedEof { tag: u8, offset: usize },
  #[error("missing or corrupt end marker at offset {0}")]
  EndMarker(usize),
}

#[cfg(test)]
impl PartialEq for Error {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Error::Validation(a), Error::Validation(b)) => a == b,
      (Error::Format(a), Error::Format(b)) => a == b,
      (
        Error::PixelCountMismatch { expected: a, decoded: b },
        Error::PixelCountMismatch { expected: c, decoded: d },
      ) => a == c && b == d,
      (Error::Io(a), Error::Io(b)) => a.kind() == b.kind(),
      _ => false,
    }
  }
}
