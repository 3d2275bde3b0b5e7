use std::io;
use std::process::ExitCode;

use clap::Parser;

use timed_dense_mm::config::{Args, Config};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let result = Config::try_from(args).and_then(|config| {
        let stdout = io::stdout();
        timed_dense_mm::run(&config, stdout.lock())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("ERROR: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
