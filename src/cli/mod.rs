mod convert;
mod stats;

use convert::Convert;
use stats::Stats;

pub enum CliRes {
    Ok,
    Err,
}

pub trait Cli {
    fn name(&self) -> &'static str;
    /// `args[1]` selects the module.
    ///
    /// Arguments for the module start at `args[2]`.
    fn cli(&self) -> CliRes;
    fn cli_help(&self);
}

pub fn cli() -> CliRes {
    let modules: &[&dyn Cli] = &[&Convert, &Stats];

    let args: Vec<String> = std::env::args().collect();

    let help = || {
        println!(
            "\
nibpack

Available modules:"
        );
        for module in modules {
            println!("{}", module.name());
        }
    };

    if args.len() < 2 {
        help();
        return CliRes::Err;
    }

    for module in modules {
        if args[1] == module.name() {
            return module.cli();
        }
    }

    help();
    CliRes::Err
}
