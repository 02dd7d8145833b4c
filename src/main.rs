use log::error;
use mandelbrot_bmp::config::{self, Command};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let config = match config::parse_args(std::env::args_os()) {
        Ok(Command::Generate(config)) => config,
        Ok(Command::Usage) => {
            println!("{}", config::usage());
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", config::error_summary(&e));
            eprintln!("{}", config::usage());
            return ExitCode::FAILURE;
        }
    };

    match mandelbrot_bmp::run(&config) {
        Ok(elapsed) => {
            let millis = elapsed.as_millis();
            println!(
                "{} saved, time elapsed: {}s {}ms",
                config.output.display(),
                millis / 1000,
                millis % 1000
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
