use std::path::{Path, PathBuf};

use super::{Cli, CliRes};
use crate::config;
use crate::modules::stats::stats;

pub struct Stats;
impl Cli for Stats {
    fn name(&self) -> &'static str {
        "stats"
    }

    // In: atlas folder, optional config
    fn cli(&self) -> CliRes {
        let args: Vec<String> = std::env::args().skip(2).collect();

        if args.is_empty() || args.len() > 2 {
            self.cli_help();
            return CliRes::Err;
        }

        let config = match args.get(1) {
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

        if let Err(err) = stats(PathBuf::from(&args[0]).as_path(), &config) {
            println!("{}", err);
            return CliRes::Err;
        }

        CliRes::Ok
    }

    fn cli_help(&self) {
        println!(
            "\
Dry run: prints the shared dictionary and projected sprite sizes without
writing any output

<atlas folder> [nibpack.toml]
"
        )
    }
}
