use crate::model::config::LoggingConfig;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::env;
use std::io::Write;
use std::str::FromStr;

/// Initialize the global logger from the `[logging]` section.
///
/// `verbose` forces debug output; `RUST_LOG` overrides both.
pub fn setup_logger(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::from_str(&logging.level).unwrap_or(LevelFilter::Info)
    };

    let mut builder = Builder::new();
    builder.filter(None, level);
    builder.target(Target::Stdout);

    let colored = logging.colored;
    builder.format(move |buf, record| {
        let prefix = match (record.level(), colored) {
            (Level::Error, true) => "❌ ",
            (Level::Warn, true) => "⚠️  ",
            (Level::Error, false) => "ERROR: ",
            (Level::Warn, false) => "WARN: ",
            _ => "",
        };
        writeln!(buf, "{}{}", prefix, record.args())
    });

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    }

    // A second initialization (e.g. from tests) keeps the first logger
    let _ = builder.try_init();
}
