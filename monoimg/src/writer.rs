use byte_writer::ByteWriter;

use crate::codec;
use crate::error::MonoImgError;
use crate::{Dictionary, FrameDirectoryEntry, MonoSprite, SpriteBlob, OFFSET_MASK, SPRITE_HEADER_LEN};

impl SpriteBlob {
    /// Encodes every frame against the shared dictionary and lays the
    /// sprite out. A frame is stored compressed only when the nibble stream
    /// is strictly shorter than the raw packed array; payload offsets are
    /// relative to the sprite start, directly past the header and the
    /// directory table.
    pub fn assemble(sprite: &MonoSprite, dict: &Dictionary) -> Result<SpriteBlob, MonoImgError> {
        let base = SPRITE_HEADER_LEN + sprite.frames.len() * 2;

        let mut entries = Vec::with_capacity(sprite.frames.len());
        let mut payload = Vec::new();

        for frame in &sprite.frames {
            let stream = codec::encode(frame, dict);

            let (data, compressed) = if stream.len() < frame.len() {
                (stream, true)
            } else {
                (frame.clone(), false)
            };

            let offset = base + payload.len();

            if offset > OFFSET_MASK as usize {
                return Err(MonoImgError::OffsetOverflow(offset));
            }

            entries.push(FrameDirectoryEntry {
                offset: offset as u16,
                compressed,
            });
            payload.extend_from_slice(&data);
        }

        Ok(SpriteBlob {
            width: sprite.width,
            height: sprite.height,
            entries,
            payload,
        })
    }

    pub fn write_to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();

        let Self {
            width,
            height,
            entries,
            payload,
        } = self;

        writer.append_u8(*width);
        writer.append_u8(*height);

        for entry in entries {
            writer.append_u16(entry.to_raw());
        }

        writer.append_u8_slice(payload);

        writer.data
    }
}
