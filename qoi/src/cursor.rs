// A forward-only read position over an immutable byte slice. Consuming
// bytes only advances an index, the underlying buffer is never copied.
pub struct Cursor<'a> {
  bytes: &'a [u8],
  pos: usize,
}

impl<'a> Cursor<'a> {
  pub fn new(bytes: &'a [u8]) -> Self {
    Self { bytes, pos: 0 }
  }

  // Offset of the next unread byte from the start of the slice.
  pub fn position(&self) -> usize {
    self.pos
  }

  pub fn remaining(&self) -> &'a [u8] {
    &self.bytes[self.pos..]
  }

  pub fn is_empty(&self) -> bool {
    self.pos >= self.bytes.len()
  }

  pub fn next_byte(&mut self) -> Option<u8> {
    let byte = *self.bytes.get(self.pos)?;
    self.pos += 1;
    Some(byte)
  }

  // Takes the next `N` bytes, or nothing at all if fewer remain.
  pub fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
    let end = self.pos.checked_add(N)?;
    let chunk: [u8; N] = self.bytes.get(self.pos..end)?.try_into().ok()?;
    self.pos = end;
    Some(chunk)
  }

  pub fn skip(&mut self, len: usize) {
    self.pos = self.pos.saturating_add(len).min(self.bytes.len());
  }
}
