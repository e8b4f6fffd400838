#[derive(Debug, thiserror::Error)]
pub enum MonoImgError {
    #[error("pixel buffer has {got} entries, expected {expected} for {width}x{height}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
    #[error("frame payload offset {0:#06x} does not fit the 15 bit directory field")]
    OffsetOverflow(usize),
    #[error("dictionary index {0:#x} is out of range")]
    BadDictIndex(u8),
    #[error("packed stream ended early")]
    Truncated,
    #[error("run token overruns the frame: produced {got} bytes, expected {expected}")]
    FrameOverrun { expected: usize, got: usize },
    #[error("frame payload at offset {offset:#06x} is shorter than {expected} bytes")]
    PayloadOutOfBounds { offset: usize, expected: usize },
    #[error("error parsing sprite blob: {source}")]
    NomError {
        #[source]
        source: nom::Err<nom::error::Error<Vec<u8>>>,
    },
}
