// An enumeration of the possible pixel "diffs", stored with their wire bias
// already applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PixelDiff {
  // A small `QOI_OP_DIFF` delta, each channel biased by +2.
  Small(u8, u8, u8),
  // A `QOI_OP_LUMA` delta: green biased by +32, red-green and blue-green
  // biased by +8.
  Luma(u8, u8, u8),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pixel {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Default for Pixel {
  fn default() -> Self {
    Self { r: 0, g: 0, b: 0, a: 255 }
  }
}

// Difference `a - b` wrapped modulo 256 and read back as a signed value in
// `-128..=127`. Shared by every delta computation in both directions.
pub fn signed_delta(a: u8, b: u8) -> i8 {
  a.wrapping_sub(b) as i8
}

// Adds a signed delta to a channel value, wrapping modulo 256.
fn apply_delta(value: u8, delta: i8) -> u8 {
  value.wrapping_add(delta as u8)
}

impl Pixel {
  pub fn from_rgb(rgb: [u8; 3]) -> Self {
    Self { r: rgb[0], g: rgb[1], b: rgb[2], a: 255 }
  }

  pub fn from_rgba(rgba: [u8; 4]) -> Self {
    Self { r: rgba[0], g: rgba[1], b: rgba[2], a: rgba[3] }
  }

  // Attempts to produce a `PixelDiff` against the provided `prev` pixel.
  // Alpha must be unchanged, and the smaller `Small` encoding is preferred.
  pub fn diff(&self, prev: &Pixel) -> Option<PixelDiff> {
    if self.a != prev.a {
      return None;
    }

    let dr = signed_delta(self.r, prev.r);
    let dg = signed_delta(self.g, prev.g);
    let db = signed_delta(self.b, prev.b);

    let small = -2..=1;

    if small.contains(&dr) && small.contains(&dg) && small.contains(&db) {
      return Some(PixelDiff::Small(bias(dr, 2), bias(dg, 2), bias(db, 2)));
    }

    // Red and blue are stored relative to the green delta.
    let dr_dg = i16::from(dr) - i16::from(dg);
    let db_dg = i16::from(db) - i16::from(dg);
    let luma = -8..=7;

    if (-32..=31).contains(&dg) && luma.contains(&dr_dg) && luma.contains(&db_dg) {
      return Some(PixelDiff::Luma(
        bias(dg, 32),
        (dr_dg + 8) as u8,
        (db_dg + 8) as u8,
      ));
    }

    None
  }

  // Recreates a `Pixel` from the provided `diff` and the `prev` pixel it was
  // computed against.
  pub fn from_diff(diff: PixelDiff, prev: &Pixel) -> Self {
    let (dr, dg, db) = match diff {
      PixelDiff::Small(dr, dg, db) => (unbias(dr, 2), unbias(dg, 2), unbias(db, 2)),
      PixelDiff::Luma(luma_g, luma_rg, luma_bg) => {
        let dg = unbias(luma_g, 32);
        let dr = unbias(luma_rg, 8).wrapping_add(dg);
        let db = unbias(luma_bg, 8).wrapping_add(dg);

        (dr, dg, db)
      }
    };

    Self {
      r: apply_delta(prev.r, dr),
      g: apply_delta(prev.g, dg),
      b: apply_delta(prev.b, db),
      a: prev.a,
    }
  }

  // QOI color hash, an index into the 64 slot color cache. Not implemented
  // via the `Hash` trait to keep things simple.
  pub fn qoi_hash(&self) -> usize {
    let r = usize::from(self.r);
    let g = usize::from(self.g);
    let b = usize::from(self.b);
    let a = usize::from(self.a);

    (r * 3 + g * 5 + b * 7 + a * 11) % 64
  }
}

fn bias(delta: i8, bias: i8) -> u8 {
  delta.wrapping_add(bias) as u8
}

fn unbias(value: u8, bias: i8) -> i8 {
  (value as i8).wrapping_sub(bias)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_signed_delta_wraps() {
    assert_eq!(signed_delta(0, 1), -1);
    assert_eq!(signed_delta(255, 0), -1);
    assert_eq!(signed_delta(0, 255), 1);
    assert_eq!(signed_delta(200, 50), -106);
    assert_eq!(signed_delta(10, 20), -10);
  }

  #[test]
  fn test_hash() {
    assert_eq!(Pixel::default().qoi_hash(), 53);
    assert_eq!(Pixel { r: 0, g: 0, b: 0, a: 0 }.qoi_hash(), 0);
    assert_eq!(Pixel { r: 101, g: 102, b: 103, a: 104 }.qoi_hash(), 54);
  }

  #[test]
  fn test_small_diff_wraps_around_zero() {
    let prev = Pixel { r: 0, g: 255, b: 1, a: 255 };
    let pixel = Pixel { r: 255, g: 0, b: 0, a: 255 };

    let diff = pixel.diff(&prev);
    assert_eq!(diff, Some(PixelDiff::Small(1, 3, 1)));
    assert_eq!(Pixel::from_diff(PixelDiff::Small(1, 3, 1), &prev), pixel);
  }

  #[test]
  fn test_luma_uses_green_relative_deltas() {
    let prev = Pixel { r: 100, g: 100, b: 100, a: 255 };
    let pixel = Pixel { r: 120, g: 125, b: 130, a: 255 };

    // dg = 25, dr - dg = -5, db - dg = 5
    assert_eq!(pixel.diff(&prev), Some(PixelDiff::Luma(57, 3, 13)));
    assert_eq!(Pixel::from_diff(PixelDiff::Luma(57, 3, 13), &prev), pixel);
  }

  #[test]
  fn test_no_diff_when_out_of_range() {
    let prev = Pixel { r: 100, g: 100, b: 100, a: 255 };

    assert_eq!(Pixel { r: 110, g: 100, b: 100, a: 255 }.diff(&prev), None);
    assert_eq!(Pixel { r: 100, g: 140, b: 140, a: 255 }.diff(&prev), None);
    assert_eq!(Pixel { r: 100, g: 100, b: 100, a: 0 }.diff(&prev), None);
  }
}
