mod cli;

use anyhow::Result;
use clap::Parser;
use kinetic_engine::logging::{LoggingConfig, init_logging};

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let config = cli.demo.to_config();

    match cli.command {
        Some(Command::Export { out, frames }) => kinetic_demo::write_svg(&config, frames, &out),
        None => {
            log::info!("keys: F1-F3 renderer, T/C/S/P/R shapes, F5-F8 ops, digits+Enter count, Esc quit");
            kinetic_demo::run(config)
        }
    }
}
