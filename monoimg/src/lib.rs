//! Column-packed monochrome sprite blobs with shared-dictionary nibble
//! compression, as consumed by flash-resident image decoders on small
//! monochrome displays.

pub mod codec;
pub mod dict;
pub mod error;
pub mod pack;
pub mod parser;
mod types;
mod writer;

pub use types::*;

#[cfg(test)]
mod test {
    use crate::dict::Histogram;
    use crate::pack::pack_bitmap;
    use crate::parser::parse_sprite;
    use crate::{Dictionary, MonoSprite, SpriteBlob};

    // Full encode/layout/decode cycle over a couple of sprites sharing one
    // dictionary, the way a whole conversion run uses the crate.
    #[test]
    fn blob_round_trip_with_shared_dictionary() {
        let walker = MonoSprite {
            name: "walker".to_string(),
            width: 8,
            height: 16,
            frames: vec![
                pack_bitmap(8, 16, &checker(8, 16), 1).unwrap(),
                pack_bitmap(8, 16, &vec![1; 8 * 16], 1).unwrap(),
            ],
        };
        let blip = MonoSprite {
            name: "blip".to_string(),
            width: 4,
            height: 8,
            frames: vec![pack_bitmap(4, 8, &checker(4, 8), 1).unwrap()],
        };

        let mut histogram = Histogram::new();
        for sprite in [&walker, &blip] {
            for frame in &sprite.frames {
                histogram.accumulate(frame);
            }
        }
        let dictionary = Dictionary::build(&histogram);

        for sprite in [&walker, &blip] {
            let blob = SpriteBlob::assemble(sprite, &dictionary).unwrap();
            let bytes = blob.write_to_bytes();
            assert_eq!(bytes.len(), blob.total_len());

            let parsed = parse_sprite(&bytes, sprite.frames.len(), &dictionary).unwrap();
            assert_eq!(parsed.width, sprite.width);
            assert_eq!(parsed.height, sprite.height);
            assert_eq!(parsed.frames, sprite.frames);
        }
    }

    fn checker(width: usize, height: usize) -> Vec<u8> {
        (0..width * height)
            .map(|i| ((i % width + i / width) % 2) as u8)
            .collect()
    }
}
