use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::AtlasError;
use crate::image::IndexedImage;

#[derive(Debug, Clone, Deserialize)]
pub struct AtlasMeta {
    pub image: String,
    pub size: AtlasSize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AtlasSize {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AtlasFrame {
    pub frame: FrameRect,
    #[serde(rename = "spriteSourceSize")]
    pub sprite_source_size: AtlasSize,
}

/// The packer's "hash" JSON layout: a `frames` object keyed by frame name
/// plus a `meta` block. `serde_json` runs with `preserve_order`, so
/// iteration order is file order.
#[derive(Debug, Deserialize)]
struct AtlasJson {
    frames: serde_json::Map<String, serde_json::Value>,
    meta: AtlasMeta,
}

/// One metadata file and its raster, ready for frame extraction. All frames
/// share the first frame's `spriteSourceSize`; the packer guarantees it and
/// nothing here re-validates it.
#[derive(Debug)]
pub struct Atlas {
    pub name: String,
    pub meta: AtlasMeta,
    pub frames: Vec<AtlasFrame>,
    pub image: IndexedImage,
}

impl Atlas {
    /// Reads `path` and the raster its metadata references (resolved next
    /// to the metadata file).
    pub fn open_from_file(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let text = fs::read_to_string(path.as_ref())
            .map_err(|op| AtlasError::IOError { source: op })?;

        let name = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let image_dir = path.as_ref().parent().unwrap_or(Path::new(""));

        Self::from_json_str(&text, name, |image_name| {
            IndexedImage::open_from_file(image_dir.join(image_name))
        })
    }

    /// Split out so tests can feed the raster without touching disk.
    pub fn from_json_str(
        text: &str,
        name: String,
        load_image: impl FnOnce(&str) -> Result<IndexedImage, AtlasError>,
    ) -> Result<Self, AtlasError> {
        let doc: AtlasJson =
            serde_json::from_str(text).map_err(|op| AtlasError::JsonError { source: op })?;

        if doc.frames.is_empty() {
            return Err(AtlasError::NoFrames);
        }

        let frames = doc
            .frames
            .into_iter()
            .map(|(_, value)| {
                serde_json::from_value(value).map_err(|op| AtlasError::JsonError { source: op })
            })
            .collect::<Result<Vec<AtlasFrame>, AtlasError>>()?;

        let image = load_image(&doc.meta.image)?;

        if image.width != doc.meta.size.w || image.height != doc.meta.size.h {
            return Err(AtlasError::SizeMismatch {
                image_w: image.width,
                image_h: image.height,
                meta_w: doc.meta.size.w,
                meta_h: doc.meta.size.h,
            });
        }

        Ok(Self {
            name,
            meta: doc.meta,
            frames,
            image,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame dimensions, uniform across the sprite.
    pub fn frame_size(&self) -> (u32, u32) {
        let size = self.frames[0].sprite_source_size;

        (size.w, size.h)
    }

    /// Cuts one frame's palette indices out of the atlas raster, row major.
    pub fn frame_pixels(&self, index: usize) -> Result<Vec<u8>, AtlasError> {
        let (w, h) = self.frame_size();
        let FrameRect { x, y } = self.frames[index].frame;

        if x + w > self.image.width || y + h > self.image.height {
            return Err(AtlasError::FrameOutOfBounds {
                index,
                x,
                y,
                w,
                h,
                image_w: self.image.width,
                image_h: self.image.height,
            });
        }

        let mut pixels = Vec::with_capacity((w * h) as usize);

        for row in y..y + h {
            for col in x..x + w {
                pixels.push(self.image.pixel(col, row));
            }
        }

        Ok(pixels)
    }
}
