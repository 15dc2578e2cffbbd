use clap::{Parser, Subcommand};

/// CLI entry point for paging_dialect
#[derive(Parser, Debug)]
#[command(
    name = "paging_dialect",
    version,
    about = "Resolve pagination SQL dialects for ODBC connections"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Environment (loads config/{env}.toml)
    #[arg(long, global = true)]
    pub env: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the dialect for a connection and report paging support
    Resolve {
        /// ODBC connection string
        #[arg(long)]
        conn: Option<String>,

        /// Only match strategies by product name, never probe
        #[arg(long)]
        no_detection: bool,
    },

    /// Print the paginated form of a query
    Page {
        /// ODBC connection string
        #[arg(long)]
        conn: Option<String>,

        /// Base SELECT statement
        #[arg(long)]
        query: String,

        /// Ordering column, as `column`, `column:asc` or `column:desc` (repeatable)
        #[arg(long = "order")]
        orders: Vec<String>,

        /// First row of the page (1-based)
        #[arg(long, default_value_t = 1)]
        start: u64,

        /// Rows per page
        #[arg(long, default_value_t = 10)]
        count: u32,
    },

    /// List configured strategies in resolution order
    Strategies,

    /// Generate configuration file
    Config {
        /// Output path for config file
        #[arg(long, default_value = "config.toml")]
        output: String,

        /// Create environment-specific config
        #[arg(long)]
        env: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_help() {
        let result = Cli::try_parse_from(["paging_dialect", "--help"]);
        assert!(result.is_err()); // Help exits with error
    }

    #[test]
    fn test_resolve_command_defaults() {
        let cli = Cli::try_parse_from(["paging_dialect", "resolve"]).unwrap();
        match cli.command {
            Commands::Resolve { conn, no_detection } => {
                assert_eq!(conn, None);
                assert!(!no_detection);
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_resolve_command_with_flags() {
        let cli = Cli::try_parse_from([
            "paging_dialect",
            "resolve",
            "--conn",
            "Driver={SQLite3};Database=test.db;",
            "--no-detection",
        ])
        .unwrap();

        match cli.command {
            Commands::Resolve { conn, no_detection } => {
                assert_eq!(conn, Some("Driver={SQLite3};Database=test.db;".to_string()));
                assert!(no_detection);
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_page_command() {
        let cli = Cli::try_parse_from([
            "paging_dialect",
            "page",
            "--query",
            "SELECT * FROM users",
            "--order",
            "id:desc",
            "--order",
            "name",
            "--start",
            "21",
        ])
        .unwrap();

        match cli.command {
            Commands::Page {
                conn,
                query,
                orders,
                start,
                count,
            } => {
                assert_eq!(conn, None);
                assert_eq!(query, "SELECT * FROM users");
                assert_eq!(orders, vec!["id:desc".to_string(), "name".to_string()]);
                assert_eq!(start, 21);
                assert_eq!(count, 10);
            }
            _ => panic!("Expected Page command"),
        }
    }

    #[test]
    fn test_page_requires_query() {
        let result = Cli::try_parse_from(["paging_dialect", "page"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_command_defaults() {
        let cli = Cli::try_parse_from(["paging_dialect", "config"]).unwrap();
        match cli.command {
            Commands::Config { output, env } => {
                assert_eq!(output, "config.toml");
                assert_eq!(env, None);
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "paging_dialect",
            "--config",
            "custom-config.toml",
            "--env",
            "production",
            "strategies",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.config, Some("custom-config.toml".to_string()));
        assert_eq!(cli.env, Some("production".to_string()));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Strategies));
    }

    #[test]
    fn test_missing_required_subcommand() {
        let result = Cli::try_parse_from(["paging_dialect"]);
        assert!(result.is_err());
    }
}
