//! The conversion pipeline. Two phases, strictly ordered: every frame of
//! every atlas is packed and histogrammed first, then the dictionary is
//! frozen and each sprite is encoded and laid out against it.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use atlas::Atlas;
use eyre::WrapErr;

use monoimg::dict::Histogram;
use monoimg::pack::pack_bitmap;
use monoimg::{Dictionary, MonoSprite, SpriteBlob, SPRITE_HEADER_LEN};

use crate::config::Config;
use crate::err;
use crate::utils::c_stuffs::{include_guard, sprite_symbol, write_frame_comment, write_hex_array};
use crate::utils::misc::find_files_with_ext_in_folder;

/// C symbol of the shared dictionary table.
pub const DICTIONARY_SYMBOL: &str = "img_xlate";

pub struct AnalyzedSprite {
    pub sprite: MonoSprite,
    pub foreground: u8,
    /// Source palette indices per frame, kept for the ASCII comments.
    pub bitmaps: Vec<Vec<u8>>,
}

pub struct Analysis {
    pub sprites: Vec<AnalyzedSprite>,
    pub histogram: Histogram,
    pub dictionary: Dictionary,
}

/// Phase one over a whole folder: metadata files in lexicographic order,
/// frames in file order, so the dictionary tie-break is reproducible.
pub fn analyze(input_dir: &Path, config: &Config) -> eyre::Result<Analysis> {
    if !input_dir.is_dir() {
        return err!("{} is not a folder", input_dir.display());
    }

    let mut paths = find_files_with_ext_in_folder(input_dir, "json")?;

    if paths.is_empty() {
        return err!("no atlas metadata (.json) in {}", input_dir.display());
    }

    paths.sort();

    let mut histogram = Histogram::new();
    let mut sprites = Vec::new();

    for path in paths {
        let atlas = Atlas::open_from_file(&path)
            .wrap_err_with(|| format!("{}", path.display()))?;

        let (w, h) = atlas.frame_size();

        if w == 0 || h == 0 || w > 255 || h > 255 {
            return err!(
                "{}: frame size {}x{} does not fit the one byte header fields",
                path.display(),
                w,
                h
            );
        }

        let foreground = config.foreground_for(&atlas.name);

        let mut frames = Vec::with_capacity(atlas.frame_count());
        let mut bitmaps = Vec::with_capacity(atlas.frame_count());

        for index in 0..atlas.frame_count() {
            let pixels = atlas
                .frame_pixels(index)
                .wrap_err_with(|| format!("{}", path.display()))?;
            let packed = pack_bitmap(w as usize, h as usize, &pixels, foreground)
                .wrap_err_with(|| format!("{} frame {}", path.display(), index))?;

            histogram.accumulate(&packed);
            frames.push(packed);
            bitmaps.push(pixels);
        }

        sprites.push(AnalyzedSprite {
            sprite: MonoSprite {
                name: atlas.name,
                width: w as u8,
                height: h as u8,
                frames,
            },
            foreground,
            bitmaps,
        });
    }

    let dictionary = Dictionary::build(&histogram);

    Ok(Analysis {
        sprites,
        histogram,
        dictionary,
    })
}

pub fn assemble_blobs(analysis: &Analysis) -> eyre::Result<Vec<SpriteBlob>> {
    analysis
        .sprites
        .iter()
        .map(|analyzed| {
            SpriteBlob::assemble(&analyzed.sprite, &analysis.dictionary)
                .wrap_err_with(|| format!("sprite {}", analyzed.sprite.name))
        })
        .collect()
}

pub fn convert(input_dir: &Path, output_base: &Path, config: &Config) -> eyre::Result<()> {
    let analysis = analyze(input_dir, config)?;
    let blobs = assemble_blobs(&analysis)?;

    let base = output_base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "images".to_string());

    let declarations = emit_declarations(&base, &analysis, &blobs);
    let definitions = emit_definitions(&analysis, &blobs);

    write_text(&output_base.with_extension("h"), &declarations)?;
    write_text(&output_base.with_extension("c"), &definitions)?;

    let mut raw_total = 0;
    let mut packed_total = analysis.dictionary.len();

    for (analyzed, blob) in analysis.sprites.iter().zip(&blobs) {
        let sprite = &analyzed.sprite;
        let raw = SPRITE_HEADER_LEN + sprite.frames.len() * sprite.packed_frame_len();

        raw_total += raw;
        packed_total += blob.total_len();

        println!(
            "{:<40} {:3} frames  {:3}x{:<3}  raw {:5} bytes  packed {:5} bytes",
            sprite.name,
            sprite.frames.len(),
            sprite.width,
            sprite.height,
            raw,
            blob.total_len()
        );
    }

    println!("total image data        = {} bytes", raw_total);
    println!("total image data packed = {} bytes", packed_total);

    Ok(())
}

fn write_text(path: &Path, text: &str) -> eyre::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;

    file.write_all(text.as_bytes())?;
    file.flush()?;

    Ok(())
}

/// The `.h` side: one opaque byte array per sprite plus the dictionary.
pub fn emit_declarations(base: &str, analysis: &Analysis, blobs: &[SpriteBlob]) -> String {
    let guard = include_guard(base);
    let mut out = String::new();

    write!(
        out,
        "#ifndef {guard}\n#define {guard}\n\n#include <stdint.h>\n\n"
    )
    .unwrap();

    writeln!(
        out,
        "extern const uint8_t {}[{}];",
        DICTIONARY_SYMBOL,
        analysis.dictionary.len()
    )
    .unwrap();

    let mut total = analysis.dictionary.len();

    for (analyzed, blob) in analysis.sprites.iter().zip(blobs) {
        writeln!(
            out,
            "extern const uint8_t {}[{}];",
            sprite_symbol(&analyzed.sprite.name),
            blob.total_len()
        )
        .unwrap();

        total += blob.total_len();
    }

    write!(out, "\n/* total size {} bytes */\n\n#endif\n", total).unwrap();

    out
}

/// The `.c` side: dictionary bytes, then per sprite the header, directory
/// and payload, each frame rendered above its sprite as an ASCII comment.
pub fn emit_definitions(analysis: &Analysis, blobs: &[SpriteBlob]) -> String {
    let mut out = String::new();

    out.push_str(
        "#ifndef HOST_TEST\n#include <Arduino.h>\n#else\n#define PROGMEM\n#endif\n#include <stdint.h>\n",
    );

    write!(
        out,
        "\n/* shared dictionary of the most frequent packed bytes */\nconst uint8_t {}[{}] PROGMEM = {{\n",
        DICTIONARY_SYMBOL,
        analysis.dictionary.len()
    )
    .unwrap();
    write_hex_array(&mut out, analysis.dictionary.values());
    out.push_str("};\n");

    let mut total = analysis.dictionary.len();

    for (analyzed, blob) in analysis.sprites.iter().zip(blobs) {
        let sprite = &analyzed.sprite;
        let bytes = blob.write_to_bytes();

        write!(
            out,
            "\n/* {} width = {} height = {}, {} frames */\n",
            sprite.name,
            sprite.width,
            sprite.height,
            sprite.frames.len()
        )
        .unwrap();

        for (index, pixels) in analyzed.bitmaps.iter().enumerate() {
            write_frame_comment(
                &mut out,
                sprite.width as usize,
                sprite.height as usize,
                pixels,
                analyzed.foreground,
                index,
            );
        }

        write!(
            out,
            "const uint8_t {}[{}] PROGMEM = {{\n",
            sprite_symbol(&sprite.name),
            blob.total_len()
        )
        .unwrap();
        writeln!(out, "\t0x{:02x}, /* width */", sprite.width).unwrap();
        writeln!(out, "\t0x{:02x}, /* height */", sprite.height).unwrap();
        write_hex_array(&mut out, &bytes[SPRITE_HEADER_LEN..]);
        out.push_str("};\n");

        total += blob.total_len();
    }

    write!(out, "\n/* total size {} bytes */\n", total).unwrap();

    out
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fmt::Write as _;
    use std::fs;
    use std::path::PathBuf;

    fn temp_folder(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nibpack_{}_{}", tag, std::process::id()));

        if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }

        fs::create_dir_all(&dir).unwrap();

        dir
    }

    fn write_indexed_png(path: &Path, width: u32, height: u32, pixels: &[u8]) {
        let file = fs::File::create(path).unwrap();
        let mut encoder = png::Encoder::new(file, width, height);

        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(vec![0u8; 3 * 16]);

        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(pixels).unwrap();
    }

    fn write_atlas(dir: &Path, name: &str, frames: usize, fw: u32, fh: u32, pixel: u8) {
        let width = fw * frames as u32;
        let pixels: Vec<u8> = (0..width * fh).map(|_| pixel).collect();

        write_indexed_png(&dir.join(format!("{}.png", name)), width, fh, &pixels);

        let mut frames_json = String::new();

        for i in 0..frames {
            write!(
                frames_json,
                "{}\"{} {}.png\": {{ \"frame\": {{ \"x\": {}, \"y\": 0, \"w\": {fw}, \"h\": {fh} }}, \"spriteSourceSize\": {{ \"w\": {fw}, \"h\": {fh} }} }}",
                if i == 0 { "" } else { ", " },
                name,
                i,
                i as u32 * fw
            )
            .unwrap();
        }

        let json = format!(
            "{{ \"frames\": {{ {} }}, \"meta\": {{ \"image\": \"{}.png\", \"size\": {{ \"w\": {}, \"h\": {} }} }} }}",
            frames_json, name, width, fh
        );

        fs::write(dir.join(format!("{}.json", name)), json).unwrap();
    }

    #[test]
    fn sprites_come_out_in_filename_order() {
        let dir = temp_folder("order");

        write_atlas(&dir, "zebra", 1, 4, 8, 15);
        write_atlas(&dir, "apple", 1, 4, 8, 15);

        let analysis = analyze(&dir, &Config::default()).unwrap();

        assert_eq!(analysis.sprites[0].sprite.name, "apple");
        assert_eq!(analysis.sprites[1].sprite.name, "zebra");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn mask_sprites_pack_against_the_mask_color() {
        let dir = temp_folder("mask");

        // all pixels 14: foreground for the mask sprite, background for
        // the normal one
        write_atlas(&dir, "bomb", 1, 4, 8, 14);
        write_atlas(&dir, "bomb_mask", 1, 4, 8, 14);

        let analysis = analyze(&dir, &Config::default()).unwrap();

        assert_eq!(analysis.sprites[0].sprite.frames[0], vec![0x00; 4]);
        assert_eq!(analysis.sprites[1].sprite.frames[0], vec![0xff; 4]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn convert_writes_both_artifacts() {
        let dir = temp_folder("convert");

        write_atlas(&dir, "solid", 2, 8, 16, 15);
        write_atlas(&dir, "empty", 1, 8, 8, 0);

        let out_base = dir.join("images");

        convert(&dir, &out_base, &Config::default()).unwrap();

        let declarations = fs::read_to_string(dir.join("images.h")).unwrap();
        let definitions = fs::read_to_string(dir.join("images.c")).unwrap();

        assert!(declarations.starts_with("#ifndef __IMAGES_H"));
        assert!(declarations.contains("extern const uint8_t img_xlate["));
        assert!(declarations.contains("extern const uint8_t solid_img["));
        assert!(declarations.contains("extern const uint8_t empty_img["));

        assert!(definitions.contains("const uint8_t img_xlate["));
        assert!(definitions.contains("PROGMEM"));
        assert!(definitions.contains("/* width */"));
        assert!(definitions.contains("/* total size"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn emitted_blobs_decode_back_to_the_packed_frames() {
        let dir = temp_folder("roundtrip");

        write_atlas(&dir, "solid", 3, 8, 16, 15);
        write_atlas(&dir, "solid_mask", 3, 8, 16, 14);

        let analysis = analyze(&dir, &Config::default()).unwrap();
        let blobs = assemble_blobs(&analysis).unwrap();

        for (analyzed, blob) in analysis.sprites.iter().zip(&blobs) {
            let parsed = monoimg::parser::parse_sprite(
                &blob.write_to_bytes(),
                analyzed.sprite.frames.len(),
                &analysis.dictionary,
            )
            .unwrap();

            assert_eq!(parsed.frames, analyzed.sprite.frames);
        }

        fs::remove_dir_all(&dir).unwrap();
    }
}
