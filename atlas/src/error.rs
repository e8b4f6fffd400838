#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("error reading atlas: {source}")]
    IOError {
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing atlas metadata: {source}")]
    JsonError {
        #[source]
        source: serde_json::Error,
    },
    #[error("error decoding atlas image: {source}")]
    PngError {
        #[source]
        source: png::DecodingError,
    },
    #[error("atlas image is not indexed color")]
    NotIndexed,
    #[error("unsupported bit depth for indexed atlas image")]
    UnsupportedBitDepth,
    #[error("atlas metadata has no frames")]
    NoFrames,
    #[error("atlas image is {image_w}x{image_h} but metadata says {meta_w}x{meta_h}")]
    SizeMismatch {
        image_w: u32,
        image_h: u32,
        meta_w: u32,
        meta_h: u32,
    },
    #[error("frame {index} at ({x}, {y}), {w}x{h}, does not fit the {image_w}x{image_h} atlas")]
    FrameOutOfBounds {
        index: usize,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        image_w: u32,
        image_h: u32,
    },
}
