//! Byte and nibble emission helpers for building flash-resident image blobs.

pub struct ByteWriter {
    pub data: Vec<u8>,
    offset: usize,
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            offset: 0,
        }
    }

    fn offset(&mut self, offset: usize) {
        self.offset += offset;
    }

    pub fn get_offset(&self) -> usize {
        self.offset
    }

    pub fn append_u8(&mut self, i: u8) {
        self.data.push(i);
        self.offset(1);
    }

    pub fn append_u16(&mut self, i: u16) {
        self.data.extend(i.to_le_bytes());
        self.offset(2);
    }

    pub fn append_u8_slice(&mut self, i: &[u8]) {
        self.data.extend_from_slice(i);
        self.offset(i.len());
    }

    pub fn replace(&mut self, start: usize, length: usize, slice: &[u8]) {
        self.data[start..(length + start)].copy_from_slice(&slice[..length]);
    }

    pub fn replace_with_u16(&mut self, start: usize, val: u16) {
        let bytes = val.to_le_bytes();
        self.replace(start, 2, &bytes);
    }
}

/// Accumulates 4-bit values and packs them two per byte, first nibble in the
/// high bits. An odd trailing nibble is left-shifted with a zero low nibble.
pub struct NibbleWriter {
    data: Vec<u8>,
    nibbles: usize,
}

impl Default for NibbleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl NibbleWriter {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            nibbles: 0,
        }
    }

    pub fn nibble_count(&self) -> usize {
        self.nibbles
    }

    /// Packed length in bytes so far, counting a pending half byte as one.
    pub fn byte_count(&self) -> usize {
        self.nibbles.div_ceil(2)
    }

    pub fn append_nibble(&mut self, i: u8) {
        debug_assert!(i <= 0xf);

        if self.nibbles % 2 == 0 {
            self.data.push(i << 4);
        } else {
            *self.data.last_mut().unwrap() |= i & 0xf;
        }

        self.nibbles += 1;
    }

    /// High nibble first, same order the unpacker consumes them.
    pub fn append_byte_as_nibbles(&mut self, i: u8) {
        self.append_nibble(i >> 4);
        self.append_nibble(i & 0xf);
    }

    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}
