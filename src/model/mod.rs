pub mod config;
pub mod sql;

pub use config::{Config, ConfigError};
pub use sql::{Direction, Order, ProbeSample, SqlArg, SqlBuilder, TableName};
