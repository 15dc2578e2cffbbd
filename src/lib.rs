//! Resolve pagination-capable SQL dialects for arbitrary database connections.
//!
//! Strategies are first matched by product name. Connections no strategy
//! recognizes are probed empirically: each candidate's paging SQL is run
//! against a real table and the first one that works is remembered per
//! database endpoint.

pub mod dialects;
pub mod executor;
pub mod logger;
pub mod model;
pub mod resolver;

pub use dialects::{CombinedStrategy, Dialect, DialectError, DialectStrategy};
pub use executor::{ConnectionError, ConnectionManager, DbConnection, OdbcSession};
pub use model::{
    Config, ConfigError, Direction, Order, ProbeSample, SqlArg, SqlBuilder, TableName,
};
pub use resolver::{
    CatalogProbe, DatabaseIdentity, DetectionCache, DetectionOptions, DialectResolver,
    MetadataCatalogProbe, PaginationProbe, ProbeOutcome,
};
