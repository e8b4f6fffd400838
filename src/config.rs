//! Parses config file

use std::{
    env,
    fs::OpenOptions,
    io::Read,
    path::{Path, PathBuf},
};

use eyre::eyre;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Palette index counted as a set pixel in normal sprites.
    pub foreground_color: u8,
    /// Palette index counted as a set pixel in mask sprites.
    pub mask_color: u8,
    /// Metadata file stems containing this pick the mask color.
    pub mask_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            foreground_color: 15,
            mask_color: 14,
            mask_suffix: "_mask".to_string(),
        }
    }
}

impl Config {
    pub fn foreground_for(&self, sprite_name: &str) -> u8 {
        if sprite_name.contains(&self.mask_suffix) {
            self.mask_color
        } else {
            self.foreground_color
        }
    }
}

pub static CONFIG_FILE_NAME: &str = "nibpack.toml";

/// `nibpack.toml` in the same folder as the binary; the file is optional
/// and its absence means defaults.
pub fn parse_config() -> eyre::Result<Config> {
    let path = match env::current_exe() {
        Ok(path) => path.parent().unwrap().join(CONFIG_FILE_NAME),
        Err(_) => PathBuf::from(CONFIG_FILE_NAME),
    };

    if !path.exists() {
        return Ok(Config::default());
    }

    parse_config_from_file(path.as_path())
}

pub fn parse_config_from_file(path: &Path) -> eyre::Result<Config> {
    let mut file = OpenOptions::new().read(true).open(path.as_os_str())?;
    let mut buffer = String::new();

    file.read_to_string(&mut buffer)?;

    parse_config_from_str(&buffer)
}

pub fn parse_config_from_str(s: &str) -> eyre::Result<Config> {
    let config: Config = toml::from_str(s)?;

    if config.foreground_color == config.mask_color {
        return Err(eyre!("foreground_color and mask_color must differ"));
    }

    Ok(config)
}
