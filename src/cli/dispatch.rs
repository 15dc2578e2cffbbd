use crate::cli::args::{Cli, Commands};
use log::{debug, error, info};
use paging_dialect::dialects::{get_registry, Dialect, DialectError};
use paging_dialect::executor::{ConnectionManager, DbConnection};
use paging_dialect::model::{Config, Order, SqlBuilder};
use paging_dialect::resolver::{DatabaseIdentity, DialectResolver};

pub fn handle(cli: Cli, config: Config) {
    debug!("Loaded configuration: {:?}", config);

    match cli.command {
        Commands::Resolve { conn, no_detection } => {
            info!("Running RESOLVE command");
            let final_conn = require_connection(conn, &config);
            let mut config = config;
            if no_detection {
                config.detection.enabled = false;
            }

            if let Err(e) = run_resolve(&final_conn, &config) {
                error!("Resolve command failed: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Page {
            conn,
            query,
            orders,
            start,
            count,
        } => {
            info!("Running PAGE command");
            let final_conn = require_connection(conn, &config);

            let parsed = orders
                .iter()
                .map(|o| Order::parse(o).ok_or(o))
                .collect::<Result<Vec<Order>, _>>();
            let orders = match parsed {
                Ok(orders) => orders,
                Err(invalid) => {
                    error!("Invalid ordering '{}', expected column[:asc|desc]", invalid);
                    std::process::exit(1);
                }
            };

            if let Err(e) = run_page(&final_conn, &config, &query, &orders, start, count) {
                error!("Page command failed: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Strategies => {
            info!("Running STRATEGIES command");
            let registry = get_registry();
            match registry.ordered(&config.strategies.order) {
                Ok(strategies) => {
                    for (position, strategy) in strategies.iter().enumerate() {
                        let aliases = strategy.aliases().join(", ");
                        println!("{}. {} [{}]", position + 1, strategy.name(), aliases);
                    }
                    println!(
                        "Empirical detection: {}",
                        if config.detection.enabled { "enabled" } else { "disabled" }
                    );
                }
                Err(e) => {
                    error!("Invalid strategy configuration: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output, env } => {
            info!("Running CONFIG command");
            debug!("Output path: {}", output);

            match Config::generate_default_config(&output) {
                Ok(()) => {
                    info!("Generated default configuration file: {}", output);
                    if let Some(env_name) = env {
                        let env_path = format!("config/{}.toml", env_name);
                        match std::fs::create_dir_all("config") {
                            Ok(()) => match Config::generate_default_config(&env_path) {
                                Ok(()) => info!("Generated environment configuration file: {}", env_path),
                                Err(e) => error!("Failed to create environment config: {}", e),
                            },
                            Err(e) => error!("Failed to create config directory: {}", e),
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to generate configuration file: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn require_connection(conn: Option<String>, config: &Config) -> String {
    conn.or_else(|| config.database.connection_string.clone())
        .unwrap_or_else(|| {
            error!("No connection string provided via --conn flag or config file");
            std::process::exit(1);
        })
}

fn resolve_dialect(
    connection: &dyn DbConnection,
    config: &Config,
) -> Result<Box<dyn Dialect>, DialectError> {
    let resolver = DialectResolver::from_config(config)?;
    resolver.resolve(connection)
}

fn run_resolve(connection_string: &str, config: &Config) -> Result<(), DialectError> {
    let manager = ConnectionManager::new()?.with_login_timeout(config.database.timeout);
    let session = manager.open_session(connection_string)?;

    let dialect = resolve_dialect(&session, config)?;

    if let Ok(identity) = DatabaseIdentity::of(&session) {
        debug!("Database identity: {} ({:?})", identity, identity.source());
    }

    println!("Dialect: {}", dialect.name());
    println!("Identifier quote: {}", dialect.identifier_quote());
    println!(
        "Paging: {}",
        if dialect.supports_paging_sql() { "supported" } else { "unsupported" }
    );
    Ok(())
}

fn run_page(
    connection_string: &str,
    config: &Config,
    query: &str,
    orders: &[Order],
    start: u64,
    count: u32,
) -> Result<(), DialectError> {
    let manager = ConnectionManager::new()?.with_login_timeout(config.database.timeout);
    let session = manager.open_session(connection_string)?;

    let dialect = resolve_dialect(&session, config)?;
    debug!("Paging with dialect '{}'", dialect.name());

    let base = SqlBuilder::from_sql(query);
    match dialect.to_paging_query_sql(&base, orders, start, count) {
        Some(paging_sql) => {
            println!("{}", paging_sql);
            Ok(())
        }
        None => Err(DialectError::UnsupportedFeature(format!(
            "dialect '{}' cannot build paging SQL for this database",
            dialect.name()
        ))),
    }
}
