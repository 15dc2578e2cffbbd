use crate::executor::{ConnectionError, DbConnection};
use crate::model::{Order, SqlBuilder};
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration metadata for a strategy family, embedded as `dialect.toml`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialectConfig {
    pub metadata: DialectMetadata,
    pub detection: DetectionConfig,
    pub sql: SqlConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialectMetadata {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionConfig {
    /// Case-insensitive regexes matched against the DBMS product name
    pub product_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqlConfig {
    /// Quote used when the connection cannot report its own
    pub quote_identifier: String,
}

impl DialectConfig {
    /// Parse an embedded `dialect.toml`.
    pub fn parse(source: &str) -> Result<Self, DialectError> {
        toml::from_str(source).map_err(|e| DialectError::ConfigError(e.to_string()))
    }
}

/// Builds a paginated query: base query, orderings, 1-based start row, row count.
pub type PagingFn = fn(&SqlBuilder, &[Order], u64, u32) -> SqlBuilder;

/// Pagination-capable view of a database product, bound to one connection.
pub trait Dialect: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn identifier_quote(&self) -> &str;

    /// Quote an identifier, doubling any embedded quote characters
    fn quote(&self, identifier: &str) -> String {
        quote_identifier(self.identifier_quote(), identifier)
    }

    fn supports_paging_sql(&self) -> bool;

    /// Window `count` rows starting at the 1-based `start_row` of `query`
    /// ordered by `orders`. `None` when this dialect cannot page.
    fn to_paging_query_sql(
        &self,
        query: &SqlBuilder,
        orders: &[Order],
        start_row: u64,
        count: u32,
    ) -> Option<SqlBuilder>;
}

/// Capability contract every dialect strategy satisfies.
pub trait DialectStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn aliases(&self) -> &[String] {
        &[]
    }

    /// Whether this strategy recognizes the connection's database product.
    fn supports(&self, connection: &dyn DbConnection) -> Result<bool, DialectError>;

    /// Build a dialect bound to the connection's quoting convention.
    fn build(&self, connection: &dyn DbConnection) -> Result<Box<dyn Dialect>, DialectError>;
}

/// A dialect whose paging SQL comes from a family's free function.
#[derive(Debug, Clone)]
pub struct StandardDialect {
    name: String,
    identifier_quote: String,
    paging: Option<PagingFn>,
}

impl StandardDialect {
    pub fn new(name: &str, identifier_quote: &str, paging: Option<PagingFn>) -> Self {
        Self {
            name: name.to_string(),
            identifier_quote: identifier_quote.to_string(),
            paging,
        }
    }
}

impl Dialect for StandardDialect {
    fn name(&self) -> &str {
        &self.name
    }

    fn identifier_quote(&self) -> &str {
        &self.identifier_quote
    }

    fn supports_paging_sql(&self) -> bool {
        self.paging.is_some()
    }

    fn to_paging_query_sql(
        &self,
        query: &SqlBuilder,
        orders: &[Order],
        start_row: u64,
        count: u32,
    ) -> Option<SqlBuilder> {
        self.paging
            .map(|paging| paging(query, orders, start_row, count))
    }
}

/// Strategy for one database product family, matched by product name.
pub struct ProductStrategy {
    config: &'static DialectConfig,
    product_patterns: Vec<Regex>,
    paging: PagingFn,
}

impl ProductStrategy {
    /// Product patterns are compiled here; invalid ones are logged and skipped.
    pub fn new(config: &'static DialectConfig, paging: PagingFn) -> Self {
        let product_patterns = config
            .detection
            .product_patterns
            .iter()
            .filter_map(|pattern| {
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!(
                            "Ignoring invalid product pattern '{}' for '{}': {}",
                            pattern, config.metadata.name, e
                        );
                        None
                    }
                }
            })
            .collect();

        Self {
            config,
            product_patterns,
            paging,
        }
    }

    pub fn config(&self) -> &DialectConfig {
        self.config
    }

    fn matches_product(&self, product: &str) -> bool {
        self.product_patterns.iter().any(|re| re.is_match(product))
    }
}

impl DialectStrategy for ProductStrategy {
    fn name(&self) -> &str {
        &self.config.metadata.name
    }

    fn aliases(&self) -> &[String] {
        &self.config.metadata.aliases
    }

    fn supports(&self, connection: &dyn DbConnection) -> Result<bool, DialectError> {
        if self.product_patterns.is_empty() {
            return Ok(false);
        }
        let product = connection.product_name()?;
        let matched = self.matches_product(&product);
        debug!(
            "Strategy '{}' {} product '{}'",
            self.name(),
            if matched { "matches" } else { "does not match" },
            product
        );
        Ok(matched)
    }

    fn build(&self, connection: &dyn DbConnection) -> Result<Box<dyn Dialect>, DialectError> {
        let quote = identifier_quote_or(connection, &self.config.sql.quote_identifier);
        Ok(Box::new(StandardDialect::new(
            self.name(),
            &quote,
            Some(self.paging),
        )))
    }
}

/// The connection's identifier quote, or `fallback` when it cannot be read.
pub fn identifier_quote_or(connection: &dyn DbConnection, fallback: &str) -> String {
    match connection.identifier_quote() {
        Ok(quote) => quote,
        Err(e) => {
            debug!("Using default identifier quote '{}': {}", fallback, e);
            fallback.to_string()
        }
    }
}

/// Wrap `identifier` in `quote`, doubling any embedded quote characters.
pub fn quote_identifier(quote: &str, identifier: &str) -> String {
    if quote.is_empty() {
        return identifier.to_string();
    }
    let escaped = identifier.replace(quote, &quote.repeat(2));
    format!("{}{}{}", quote, escaped, quote)
}

/// ` ORDER BY a ASC, b DESC`, or an empty string without orderings.
pub fn order_by_clause(orders: &[Order]) -> String {
    if orders.is_empty() {
        return String::new();
    }
    let terms: Vec<String> = orders
        .iter()
        .map(|order| format!("{} {}", order.name, order.direction.keyword()))
        .collect();
    format!(" ORDER BY {}", terms.join(", "))
}

/// Zero-based offset of a 1-based start row.
pub fn offset_of(start_row: u64) -> u64 {
    start_row.saturating_sub(1)
}

/// Best-effort description of a connection for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub product: Option<String>,
    pub url: Option<String>,
    pub driver_type: String,
}

impl ConnectionSummary {
    pub fn of(connection: &dyn DbConnection) -> Self {
        Self {
            product: connection.product_name().ok(),
            url: connection.url().ok().flatten(),
            driver_type: connection.type_name().to_string(),
        }
    }
}

impl fmt::Display for ConnectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "product={}, url={}, driver={}",
            self.product.as_deref().unwrap_or("unknown"),
            self.url.as_deref().unwrap_or("unknown"),
            self.driver_type
        )
    }
}

/// Error types for dialect operations
#[derive(Debug, thiserror::Error)]
pub enum DialectError {
    #[error("Unsupported dialect for connection: {0}")]
    Unsupported(ConnectionSummary),

    #[error("Failed to resolve database identity: {0}")]
    Identity(#[source] ConnectionError),

    /// A strategy recognized the product but cannot produce a dialect for this
    /// session. Raised when a detected paging delegate fails to rebuild, and
    /// available to strategies implemented outside this crate.
    #[error("Failed to build dialect '{dialect}': {reason}")]
    Build { dialect: String, reason: String },

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Dialect not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Feature not supported: {0}")]
    UnsupportedFeature(String),
}
