//! Dry run: the analysis phase only, reporting what a conversion would
//! produce without writing the C artifacts.

use std::path::Path;

use monoimg::SPRITE_HEADER_LEN;

use crate::config::Config;
use crate::modules::convert::{analyze, assemble_blobs};

pub fn stats(input_dir: &Path, config: &Config) -> eyre::Result<()> {
    let analysis = analyze(input_dir, config)?;
    let blobs = assemble_blobs(&analysis)?;

    println!(
        "dictionary ({} of {} distinct packed byte values):",
        analysis.dictionary.len(),
        analysis.histogram.distinct()
    );

    for (index, value) in analysis.dictionary.values().iter().enumerate() {
        println!(
            "  [{:x}] 0x{:02x}  count {}",
            index,
            value,
            analysis.histogram.count(*value)
        );
    }

    let mut raw_total = 0;
    let mut packed_total = analysis.dictionary.len();

    for (analyzed, blob) in analysis.sprites.iter().zip(&blobs) {
        let sprite = &analyzed.sprite;
        let raw = SPRITE_HEADER_LEN + sprite.frames.len() * sprite.packed_frame_len();
        let compressed = blob.entries.iter().filter(|e| e.compressed).count();

        raw_total += raw;
        packed_total += blob.total_len();

        println!(
            "{:<40} {:3} frames  {:3}x{:<3}  raw {:5} bytes  packed {:5} bytes  {:2} compressed",
            sprite.name,
            sprite.frames.len(),
            sprite.width,
            sprite.height,
            raw,
            blob.total_len(),
            compressed
        );
    }

    println!("total image data        = {} bytes", raw_total);
    println!("total image data packed = {} bytes", packed_total);

    Ok(())
}
