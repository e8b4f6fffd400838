use std::path::{Path, PathBuf};

use super::{Cli, CliRes};
use crate::config;
use crate::modules::convert::convert;

pub struct Convert;
impl Cli for Convert {
    fn name(&self) -> &'static str {
        "convert"
    }

    // In: atlas folder, output basename, optional config
    fn cli(&self) -> CliRes {
        let args: Vec<String> = std::env::args().skip(2).collect();

        if args.len() < 2 || args.len() > 3 {
            self.cli_help();
            return CliRes::Err;
        }

        let config = match args.get(2) {
            Some(path) => config::parse_config_from_file(Path::new(path)),
            None => config::parse_config(),
        };

        let config = match config {
            Ok(config) => config,
            Err(err) => {
                println!("{}", err);
                return CliRes::Err;
            }
        };

        if let Err(err) = convert(
            PathBuf::from(&args[0]).as_path(),
            PathBuf::from(&args[1]).as_path(),
            &config,
        ) {
            println!("{}", err);
            return CliRes::Err;
        }

        CliRes::Ok
    }

    fn cli_help(&self) {
        println!(
            "\
Converts a folder of sprite atlases into packed monochrome C arrays

Writes <output basename>.h and <output basename>.c

<atlas folder> <output basename> [nibpack.toml]
"
        )
    }
}
