use std::io;

use crate::cursor::Cursor;
use crate::error::FormatError;

// An enumeration of each possible QOI encoding "chunk", or Op.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
  // `QOI_OP_INDEX`, index into the state's pixel cache.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 0 0 |      index       |
  //
  Index(u8),

  // `QOI_OP_DIFF`, contains the red, green, and blue difference from the
  // previous pixel with a bias of +2.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 0 1 |  dr |  dg |  db  |
  //
  Diff(u8, u8, u8),

  // `QOI_OP_LUMA`, the green difference from the previous pixel with a bias
  // of +32, then the red-green and blue-green differences with a bias of +8.
  //
  // | 7 6   5  4  3  2  1  0 | 7  6  5  4   3  2  1  0 |
  // |------------------------|-------------------------|
  // | 1 0 |       dg         |   dr - dg  |   db - dg  |
  //
  Luma(u8, u8, u8),

  // `QOI_OP_RGB`, the red, green, and blue values of a pixel. Alpha is
  // carried over from the previous pixel.
  //
  // | 7  6  5  4  3  2  1  0 | 7..0 | 7..0 | 7..0 |
  // |------------------------|------|------|------|
  // | 1  1  1  1  1  1  1  0 |   r  |   g  |   b  |
  //
  Rgb(u8, u8, u8),

  // `QOI_OP_RGBA`, the red, green, blue, and alpha values of a pixel.
  //
  // | 7  6  5  4  3  2  1  0 | 7..0 | 7..0 | 7..0 | 7..0 |
  // |------------------------|------|------|------|------|
  // | 1  1  1  1  1  1  1  1 |   r  |   g  |   b  |   a  |
  //
  Rgba(u8, u8, u8, u8),

  // `QOI_OP_RUN`, repeats the previous pixel. Holds the unbiased length
  // (1..=62), stored on the wire with a bias of -1.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 1 1 |       run        |
  //
  Run(u8),
}

impl Op {
  const MASK_2: u8 = 0x03;
  const MASK_4: u8 = 0x0f;
  const MASK_6: u8 = 0x3f;
  const MASK_TAG: u8 = 0xc0;

  const TAG_INDEX: u8 = 0x00;
  const TAG_DIFF: u8 = 0x40;
  const TAG_LUMA: u8 = 0x80;
  const TAG_RUN: u8 = 0xc0;
  const TAG_RGB: u8 = 0xfe;
  const TAG_RGBA: u8 = 0xff;

  // Encodes the `Op` and writes it as bytes into the given writer.
  pub fn write_to<W: io::Write>(self, mut writer: W) -> Result<(), io::Error> {
    match self {
      Op::Index(index) => {
        writer.write_all(&[Op::TAG_INDEX | (index & Op::MASK_6)])
      }
      Op::Diff(dr, dg, db) => {
        writer.write_all(&[Op::TAG_DIFF | (dr & Op::MASK_2) << 4 | (dg & Op::MASK_2) << 2 | (db & Op::MASK_2)])
      }
      Op::Luma(dg, dr_dg, db_dg) => {
        writer.write_all(&[Op::TAG_LUMA | (dg & Op::MASK_6), (dr_dg & Op::MASK_4) << 4 | (db_dg & Op::MASK_4)])
      }
      Op::Rgb(r, g, b) => {
        writer.write_all(&[Op::TAG_RGB, r, g, b])
      }
      Op::Rgba(r, g, b, a) => {
        writer.write_all(&[Op::TAG_RGBA, r, g, b, a])
      }
      Op::Run(run_count) => {
        debug_assert!((1..=62).contains(&run_count));
        writer.write_all(&[Op::TAG_RUN | (run_count - 1)])
      }
    }
  }

  // Decodes the next `Op` from the cursor. Fails when a chunk's operands run
  // past the end of the input.
  pub fn read(cursor: &mut Cursor<'_>) -> Result<Option<Self>, FormatError> {
    let offset = cursor.position();
    let tag = match cursor.next_byte() {
      Some(tag) => tag,
      None => return Ok(None),
    };
    let eof = || FormatError::UnexpectedEof { tag, offset };

    let op = match tag {
      Op::TAG_RGB => {
        let [r, g, b] = cursor.take::<3>().ok_or_else(eof)?;
        Op::Rgb(r, g, b)
      }
      Op::TAG_RGBA => {
        let [r, g, b, a] = cursor.take::<4>().ok_or_else(eof)?;
        Op::Rgba(r, g, b, a)
      }
      _ => match tag & Op::MASK_TAG {
        Op::TAG_INDEX => Op::Index(tag & Op::MASK_6),
        Op::TAG_DIFF => Op::Diff(
          tag >> 4 & Op::MASK_2,
          tag >> 2 & Op::MASK_2,
          tag & Op::MASK_2,
        ),
        Op::TAG_LUMA => {
          let next = cursor.next_byte().ok_or_else(eof)?;
          Op::Luma(tag & Op::MASK_6, next >> 4 & Op::MASK_4, next & Op::MASK_4)
        }
        // Only the run tag is left, 0xfe and 0xff were matched above.
        _ => Op::Run((tag & Op::MASK_6) + 1),
      },
    };

    Ok(Some(op))
  }
}
