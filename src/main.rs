use clap::Parser;
use tracing::debug;

use sceneboard::adapter::inbound::cli::command::Cli;
use sceneboard::adapter::inbound::cli::output::{self, OutputConfig};
use sceneboard::adapter::inbound::cli::run;
use sceneboard::infrastructure::config::{Config, LoggingConfig};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.color.enabled()));
    init_logging(&cli);
    debug!("sceneboard starting");

    if let Err(e) = run(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Set up tracing before the command runs.
///
/// A broken config file is reported by the command itself, so logging falls
/// back to defaults here.
fn init_logging(cli: &Cli) {
    let logging = Config::load_or_default(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_else(|_| LoggingConfig::default());

    let logging = match (cli.quiet, cli.verbose) {
        (true, _) => logging.with_level("error"),
        (false, 0) => logging,
        (false, 1) => logging.with_level("debug"),
        (false, _) => logging.with_level("trace"),
    };
    logging.init();
}
