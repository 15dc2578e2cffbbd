//! Dialect strategies for paginated SQL.
//!
//! Each product family is configured from an embedded `dialect.toml` and
//! contributes a [`ProductStrategy`] with its own paging SQL builder.

pub mod base;
pub mod combined;
pub mod registry;

// Strategy families
pub mod ansi;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;
pub mod sqlserver;

pub use base::{
    ConnectionSummary, Dialect, DialectError, DialectStrategy, ProductStrategy, StandardDialect,
};
pub use combined::{CombinedDialect, CombinedStrategy};
pub use registry::{get_registry, StrategyRegistry};
