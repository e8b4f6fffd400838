//! Sprite-atlas inputs: packer-generated JSON metadata paired with an
//! indexed-color PNG. Frame order and palette indices are preserved exactly
//! as they appear in the files.

pub mod error;
mod image;
mod types;

pub use image::IndexedImage;
pub use types::*;
