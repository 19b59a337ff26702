//! This crate implements a lossless encoder and decoder for the
//! [QOI image format](https://qoiformat.org).
//!
//! The two primary exports are the [`encode`] and [`decode`] functions.
//! Encoding takes a raw, row-major pixel buffer plus a [`Header`] describing
//! it and returns the complete QOI byte stream. Decoding takes a complete,
//! fully buffered QOI byte stream and returns its header and pixel buffer.
//! [`encode_to_writer`] streams the encoded bytes into any `std::io::Write`
//! instead.
//!
//! To keep this crate simple, it does not support other image formats and
//! never converts between colorspaces: the colorspace is carried as a tag.
//! To encode an image, it will first need to be decoded using another
//! method. From there, the decoded pixel data can then be encoded.
//!
//! Diagnostics are emitted through the [`log`](https://docs.rs/log) facade,
//! install any logger to see them.
//!
//! # In-memory round trip example
//!
//! ```rust
//! use qoi::{decode, encode, Channels, Colorspace, Header};
//!
//! // A 2x1 image made up of an opaque red and a half transparent blue pixel.
//! let pixels = vec![255, 0, 0, 255, 0, 0, 255, 128];
//!
//! let header = Header::new(2, 1, Channels::Rgba, Colorspace::Srgb)
//!   .expect("Invalid image parameters");
//!
//! let encoded = encode(&pixels, &header).expect("Failed to encode image");
//! assert_eq!(&encoded[..4], b"qoif");
//!
//! let (decoded_header, decoded) = decode(&encoded).expect("Failed to decode image");
//! assert_eq!(decoded_header, header);
//! assert_eq!(decoded, pixels);
//! ```
//!
//! # Handling errors
//!
//! ```rust
//! use qoi::{decode, ErrorKind};
//!
//! match decode(b"not a qoi image") {
//!   Ok(_) => unreachable!(),
//!   Err(e) => {
//!     // See `error.rs` for all possible errors.
//!     assert_eq!(e.kind(), ErrorKind::Format);
//!     eprintln!("{}", e);
//!   }
//! }
//! ```

pub use crate::decode::decode;
pub use crate::encode::{encode, encode_to_writer};
pub use crate::error::{Error, ErrorKind, FormatError, Result, ValidationError};
pub use crate::header::{
  decode_header, max_encoded_len, Channels, Colorspace, Header, QOI_BYTES_END, QOI_BYTES_MAGIC,
  QOI_HEADER_LEN,
};

mod cursor;
mod decode;
mod encode;
mod error;
mod header;
mod op;
mod pixel;
mod state;
