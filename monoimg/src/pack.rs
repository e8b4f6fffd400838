use crate::error::MonoImgError;

pub fn packed_len(width: usize, height: usize) -> usize {
    width * height.div_ceil(8)
}

/// Rasterizes one frame of palette indices into a column-packed monochrome
/// array. Byte `band * width + col` holds 8 vertical pixels; bit `h` is set
/// iff the pixel at row `band * 8 + h` equals `foreground`. Rows past the
/// true height stay 0.
pub fn pack_bitmap(
    width: usize,
    height: usize,
    pixels: &[u8],
    foreground: u8,
) -> Result<Vec<u8>, MonoImgError> {
    if pixels.len() != width * height {
        return Err(MonoImgError::ShapeMismatch {
            width,
            height,
            expected: width * height,
            got: pixels.len(),
        });
    }

    let bands = height.div_ceil(8);
    let mut packed = vec![0u8; width * bands];

    for band in 0..bands {
        for col in 0..width {
            let target = &mut packed[band * width + col];

            for h in 0..8 {
                let row = band * 8 + h;

                if row >= height {
                    break;
                }

                if pixels[row * width + col] == foreground {
                    *target |= 1 << h;
                }
            }
        }
    }

    Ok(packed)
}
