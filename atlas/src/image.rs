use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::AtlasError;

/// An indexed-color raster, one palette index per pixel. The PNG is decoded
/// with identity transformations so the indices are never expanded to RGB.
#[derive(Debug, Clone)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl IndexedImage {
    pub fn open_from_file(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let file = File::open(path).map_err(|op| AtlasError::IOError { source: op })?;

        Self::decode_from_reader(BufReader::new(file))
    }

    pub fn decode_from_reader(r: impl Read) -> Result<Self, AtlasError> {
        let mut decoder = png::Decoder::new(r);
        decoder.set_transformations(png::Transformations::IDENTITY);

        let mut reader = decoder
            .read_info()
            .map_err(|op| AtlasError::PngError { source: op })?;

        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|op| AtlasError::PngError { source: op })?;

        if info.color_type != png::ColorType::Indexed {
            return Err(AtlasError::NotIndexed);
        }

        let depth = match info.bit_depth {
            png::BitDepth::One => 1usize,
            png::BitDepth::Two => 2,
            png::BitDepth::Four => 4,
            png::BitDepth::Eight => 8,
            png::BitDepth::Sixteen => return Err(AtlasError::UnsupportedBitDepth),
        };

        let pixels = unpack_rows(&buf, info.width, info.height, info.line_size, depth);

        Ok(Self {
            width: info.width,
            height: info.height,
            pixels,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Sub-byte indexed rows pack pixels most significant bits first.
fn unpack_rows(buf: &[u8], width: u32, height: u32, line_size: usize, depth: usize) -> Vec<u8> {
    let mask = ((1u16 << depth) - 1) as u8;
    let mut pixels = Vec::with_capacity((width * height) as usize);

    for y in 0..height as usize {
        let row = &buf[y * line_size..][..line_size];

        for x in 0..width as usize {
            let bit = x * depth;
            let shift = 8 - depth - bit % 8;

            pixels.push((row[bit / 8] >> shift) & mask);
        }
    }

    pixels
}
