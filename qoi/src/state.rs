use crate::pixel::Pixel;

// The rolling prediction state shared by the encoder and decoder. Both sides
// must apply the exact same transitions so their caches stay identical at
// every chunk boundary.
#[derive(Clone, Debug)]
pub struct State {
  // A cache of previously seen pixels, indexed by `Pixel::qoi_hash`.
  pub cache: [Pixel; 64],
  // The previously encoded/decoded pixel.
  pub prev_pixel: Pixel,
  // Length of the pending run (Op::Run), if any.
  pub run_count: u8,
}

impl Default for State {
  fn default() -> Self {
    Self::new()
  }
}

impl State {
  pub fn new() -> Self {
    Self {
      cache: [Pixel { r: 0, g: 0, b: 0, a: 0 }; 64],
      prev_pixel: Pixel::default(),
      run_count: 0,
    }
  }

  // Inserts the given pixel into the cache. Overwrites any pixel that was
  // previously cached at the computed index.
  pub fn cache_insert(&mut self, pixel: Pixel) {
    self.cache[pixel.qoi_hash()] = pixel;
  }

  pub fn cached(&self, index: u8) -> Pixel {
    self.cache[usize::from(index) % 64]
  }

  // Returns the cache index if the given pixel is already cached. Otherwise
  // the pixel replaces whatever occupied its slot and `None` is returned.
  pub fn cache_match_or_replace(&mut self, pixel: Pixel) -> Option<u8> {
    let index = pixel.qoi_hash();

    if self.cache[index] == pixel {
      return Some(index as u8);
    }

    self.cache[index] = pixel;

    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fresh_state() {
    let state = State::new();

    assert_eq!(state.prev_pixel, Pixel { r: 0, g: 0, b: 0, a: 255 });
    assert_eq!(state.run_count, 0);
    assert!(state.cache.iter().all(|p| *p == Pixel { r: 0, g: 0, b: 0, a: 0 }));
  }

  #[test]
  fn test_cache_match_or_replace() {
    let mut state = State::new();
    let pixel = Pixel { r: 101, g: 102, b: 103, a: 104 };

    assert_eq!(state.cache_match_or_replace(pixel), None);
    assert_eq!(state.cached(54), pixel);
    assert_eq!(state.cache_match_or_replace(pixel), Some(54));
  }

  #[test]
  fn test_transparent_black_is_cached_from_the_start() {
    let mut state = State::new();

    assert_eq!(state.cache_match_or_replace(Pixel { r: 0, g: 0, b: 0, a: 0 }), Some(0));
    assert_eq!(state.cache_match_or_replace(Pixel::default()), None);
  }
}
