/// Dictionary indices occupy nibbles 0x0..=0xB; 0xC..=0xF are escape tokens.
pub const DICTIONARY_MAX_LEN: usize = 12;

/// Directory entries carry a 15 bit offset; bit 15 flags a compressed frame.
pub const OFFSET_MASK: u16 = 0x7fff;
pub const COMPRESSED_FLAG: u16 = 0x8000;

/// Width and height bytes preceding the frame directory.
pub const SPRITE_HEADER_LEN: usize = 2;

/// Ordered table of the most frequent packed-byte values of a whole run,
/// shared by every sprite. Built once by the analysis phase and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    values: Vec<u8>,
}

impl Dictionary {
    /// The caller guarantees the values are distinct and at most
    /// [`DICTIONARY_MAX_LEN`] of them; the decode side reconstructs the
    /// table from the emitted bytes through here.
    pub fn from_values(values: Vec<u8>) -> Self {
        debug_assert!(values.len() <= DICTIONARY_MAX_LEN);

        Self { values }
    }

    pub fn index_of(&self, value: u8) -> Option<u8> {
        self.values.iter().position(|v| *v == value).map(|i| i as u8)
    }

    pub fn value(&self, index: u8) -> Option<u8> {
        self.values.get(index as usize).copied()
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDirectoryEntry {
    pub offset: u16,
    pub compressed: bool,
}

impl FrameDirectoryEntry {
    pub fn to_raw(self) -> u16 {
        if self.compressed {
            self.offset | COMPRESSED_FLAG
        } else {
            self.offset
        }
    }

    pub fn from_raw(raw: u16) -> Self {
        Self {
            offset: raw & OFFSET_MASK,
            compressed: raw & COMPRESSED_FLAG != 0,
        }
    }
}

/// One sprite after bitmap packing: every frame is a column-packed
/// monochrome array of `width * ceil(height/8)` bytes.
#[derive(Debug, Clone)]
pub struct MonoSprite {
    pub name: String,
    pub width: u8,
    pub height: u8,
    pub frames: Vec<Vec<u8>>,
}

impl MonoSprite {
    pub fn packed_frame_len(&self) -> usize {
        crate::pack::packed_len(self.width as usize, self.height as usize)
    }
}

/// The serialized form of one sprite:
/// `[width][height][directory u16 LE...][frame payloads...]`.
#[derive(Debug, Clone)]
pub struct SpriteBlob {
    pub width: u8,
    pub height: u8,
    pub entries: Vec<FrameDirectoryEntry>,
    pub payload: Vec<u8>,
}

impl SpriteBlob {
    pub fn total_len(&self) -> usize {
        SPRITE_HEADER_LEN + self.entries.len() * 2 + self.payload.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn directory_entry_raw_form() {
        let entry = FrameDirectoryEntry {
            offset: 0x1234,
            compressed: true,
        };

        assert_eq!(entry.to_raw(), 0x9234);
        assert_eq!(FrameDirectoryEntry::from_raw(0x9234), entry);

        let entry = FrameDirectoryEntry {
            offset: 0x7fff,
            compressed: false,
        };

        assert_eq!(entry.to_raw(), 0x7fff);
        assert_eq!(FrameDirectoryEntry::from_raw(0x7fff), entry);
    }

    #[test]
    fn dictionary_lookup() {
        let dict = Dictionary::from_values(vec![0x00, 0xff, 0x81]);

        assert_eq!(dict.index_of(0xff), Some(1));
        assert_eq!(dict.index_of(0x7e), None);
        assert_eq!(dict.value(2), Some(0x81));
        assert_eq!(dict.value(3), None);
    }
}
