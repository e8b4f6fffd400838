use std::fmt::Write;

/// 12 hex bytes per line, tab indented, trailing comma on every value.
pub fn write_hex_array(out: &mut String, data: &[u8]) {
    out.push('\t');

    for (i, b) in data.iter().enumerate() {
        write!(out, "0x{:02x},", b).unwrap();

        if i == data.len() - 1 {
            break;
        }

        if (i + 1) % 12 == 0 {
            out.push_str("\n\t");
        } else {
            out.push(' ');
        }
    }

    out.push('\n');
}

/// ASCII rendering of one frame, foreground pixels as `*`, the rest as `_`.
pub fn write_frame_comment(
    out: &mut String,
    width: usize,
    height: usize,
    pixels: &[u8],
    foreground: u8,
    frame: usize,
) {
    write!(out, "/* [{}]", frame).unwrap();

    for row in 0..height {
        out.push_str("\n * ");

        for col in 0..width {
            out.push(if pixels[row * width + col] == foreground {
                '*'
            } else {
                '_'
            });
        }
    }

    out.push_str("\n */\n");
}

/// C identifier for a sprite's byte array.
pub fn sprite_symbol(name: &str) -> String {
    let mut symbol: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    if symbol.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        symbol.insert(0, '_');
    }

    format!("{}_img", symbol)
}

pub fn include_guard(base: &str) -> String {
    let upper: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();

    format!("__{}_H", upper)
}
