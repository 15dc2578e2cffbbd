mod cli;

use clap::Parser;
use cli::args::Cli;
use cli::dispatch::handle;
use log::error;
use paging_dialect::logger::setup_logger;
use paging_dialect::model::config::LoggingConfig;
use paging_dialect::Config;

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref(), cli.env.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            setup_logger(&LoggingConfig::default(), cli.verbose);
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    setup_logger(&config.logging, cli.verbose);
    handle(cli, config);
}
