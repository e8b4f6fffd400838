//! The inverse of the writer: parses a sprite blob back into its packed
//! frames. The device decoder holds the same grammar; this side exists so
//! every emitted blob can be checked against the frames it came from.

use nom::multi::count;
use nom::number::complete::{le_u16, le_u8};
use nom::sequence::tuple;
use nom::IResult as _IResult;

use crate::error::MonoImgError;
use crate::pack::packed_len;
use crate::{
    codec::{TOKEN_DICT_RUN, TOKEN_RAW_BYTE, TOKEN_RAW_RUN, TOKEN_RUN},
    Dictionary, FrameDirectoryEntry,
};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

#[derive(Debug)]
pub struct ParsedSprite {
    pub width: u8,
    pub height: u8,
    pub entries: Vec<FrameDirectoryEntry>,
    pub frames: Vec<Vec<u8>>,
}

fn parse_header(i: &'_ [u8]) -> IResult<'_, (u8, u8)> {
    tuple((le_u8, le_u8))(i)
}

fn parse_directory(i: &'_ [u8], frame_count: usize) -> IResult<'_, Vec<FrameDirectoryEntry>> {
    count(
        nom::combinator::map(le_u16, FrameDirectoryEntry::from_raw),
        frame_count,
    )(i)
}

/// Pulls nibbles out of a packed stream, high nibble of each byte first.
struct NibbleReader<'a> {
    data: &'a [u8],
    nibble: usize,
}

impl<'a> NibbleReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, nibble: 0 }
    }

    fn next(&mut self) -> Result<u8, MonoImgError> {
        let byte = self
            .data
            .get(self.nibble / 2)
            .copied()
            .ok_or(MonoImgError::Truncated)?;

        let nibble = if self.nibble % 2 == 0 {
            byte >> 4
        } else {
            byte & 0xf
        };

        self.nibble += 1;

        Ok(nibble)
    }

    fn next_byte(&mut self) -> Result<u8, MonoImgError> {
        let hi = self.next()?;
        let lo = self.next()?;

        Ok((hi << 4) | lo)
    }
}

/// Decodes a packed nibble stream until `expected_len` bytes come out.
pub fn decode_stream(
    stream: &[u8],
    expected_len: usize,
    dict: &Dictionary,
) -> Result<Vec<u8>, MonoImgError> {
    let mut reader = NibbleReader::new(stream);
    let mut out = Vec::with_capacity(expected_len);

    while out.len() < expected_len {
        let token = reader.next()?;

        match token {
            TOKEN_RAW_BYTE => out.push(reader.next_byte()?),
            TOKEN_RUN => {
                let length = reader.next_byte()? as usize;
                let value = reader.next_byte()?;

                out.extend(std::iter::repeat(value).take(length));
            }
            TOKEN_DICT_RUN => {
                let length = reader.next_byte()? as usize;
                let index = reader.next()?;
                let value = dict.value(index).ok_or(MonoImgError::BadDictIndex(index))?;

                out.extend(std::iter::repeat(value).take(length));
            }
            TOKEN_RAW_RUN => {
                let length = reader.next_byte()? as usize;

                for _ in 0..length {
                    out.push(reader.next_byte()?);
                }
            }
            index => out.push(dict.value(index).ok_or(MonoImgError::BadDictIndex(index))?),
        }
    }

    if out.len() != expected_len {
        return Err(MonoImgError::FrameOverrun {
            expected: expected_len,
            got: out.len(),
        });
    }

    Ok(out)
}

/// Parses one sprite blob. The frame count is not on the wire; callers know
/// it from the metadata that produced the blob.
pub fn parse_sprite(
    bytes: &[u8],
    frame_count: usize,
    dict: &Dictionary,
) -> Result<ParsedSprite, MonoImgError> {
    let (i, (width, height)) = parse_header(bytes).map_err(to_owned_err)?;
    let (_, entries) = parse_directory(i, frame_count).map_err(to_owned_err)?;

    let frame_len = packed_len(width as usize, height as usize);
    let mut frames = Vec::with_capacity(frame_count);

    for entry in &entries {
        let offset = entry.offset as usize;
        let payload = bytes
            .get(offset..)
            .ok_or(MonoImgError::PayloadOutOfBounds {
                offset,
                expected: frame_len,
            })?;

        let frame = if entry.compressed {
            decode_stream(payload, frame_len, dict)?
        } else {
            payload
                .get(..frame_len)
                .ok_or(MonoImgError::PayloadOutOfBounds {
                    offset,
                    expected: frame_len,
                })?
                .to_vec()
        };

        frames.push(frame);
    }

    Ok(ParsedSprite {
        width,
        height,
        entries,
        frames,
    })
}

fn to_owned_err(err: nom::Err<nom::error::Error<&[u8]>>) -> MonoImgError {
    MonoImgError::NomError {
        source: err.to_owned(),
    }
}
