use std::process::ExitCode;

mod error;
mod config;
mod formatting;
mod cli;

fn main() -> ExitCode {
    use tracing_subscriber::{FmtSubscriber, EnvFilter};
    use tracing_subscriber::filter::LevelFilter;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .expect("failed to initialize global tracing subscriber");

    let end_result = cli::start();

    if let Err(err) = end_result {
        eprintln!("ERROR: {}", err);

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
