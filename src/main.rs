mod app;

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    if let Err(err) = app::run() {
        eprintln!("Error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
