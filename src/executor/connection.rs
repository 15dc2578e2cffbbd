use crate::model::{SqlBuilder, TableName};
use log::{debug, error, info};
use odbc_api::{Connection, ConnectionOptions, Environment, Error as OdbcError};
use std::sync::Arc;

use super::odbc_session::OdbcSession;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("ODBC error: {0}")]
    Odbc(#[from] OdbcError),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),
}

/// A live database session as seen by dialect resolution.
///
/// Implementations are owned by the caller; resolution only borrows them.
pub trait DbConnection {
    /// DBMS product name reported by the driver.
    fn product_name(&self) -> Result<String, ConnectionError>;

    /// Canonical endpoint URL, if the driver exposes one.
    ///
    /// Two sessions against the same endpoint must return the same value.
    fn url(&self) -> Result<Option<String>, ConnectionError>;

    /// Concrete implementation type, used as the identity of last resort.
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// String used to quote identifiers, e.g. `"` or `` ` ``.
    fn identifier_quote(&self) -> Result<String, ConnectionError>;

    /// Execute a query and discard its rows.
    fn execute_query(&self, query: &SqlBuilder) -> Result<(), ConnectionError>;

    /// Tables and views in the session's current catalog, with their schema.
    fn table_names(&self) -> Result<Vec<TableName>, ConnectionError>;

    /// Column names of exactly `table`, in declaration order.
    fn column_names(&self, table: &TableName) -> Result<Vec<String>, ConnectionError>;
}

pub struct ConnectionManager {
    environment: Arc<Environment>,
    login_timeout_sec: Option<u32>,
}

impl ConnectionManager {
    pub fn new() -> Result<Self, ConnectionError> {
        let environment = Environment::new()?;
        Ok(Self {
            environment: Arc::new(environment),
            login_timeout_sec: None,
        })
    }

    pub fn with_login_timeout(mut self, seconds: u32) -> Self {
        self.login_timeout_sec = Some(seconds);
        self
    }

    pub fn connect(&self, connection_string: &str) -> Result<Connection<'_>, ConnectionError> {
        debug!("Opening ODBC connection (timeout: {:?}s)", self.login_timeout_sec);

        let options = ConnectionOptions {
            login_timeout_sec: self.login_timeout_sec,
            ..ConnectionOptions::default()
        };

        self.environment
            .connect_with_connection_string(connection_string, options)
            .map_err(|e| {
                error!("ODBC connection failed: {}", e);
                ConnectionError::ConnectionFailed(e.to_string())
            })
    }

    /// Connect and wrap the connection for dialect resolution.
    pub fn open_session(&self, connection_string: &str) -> Result<OdbcSession<'_>, ConnectionError> {
        let connection = self.connect(connection_string)?;
        Ok(OdbcSession::new(connection, connection_string))
    }

    /// Connect and read the DBMS name, without running any SQL.
    pub fn test_connection(&self, connection_string: &str) -> Result<String, ConnectionError> {
        let session = self.open_session(connection_string)?;
        let product = session.product_name()?;
        info!("Connected to {}", product);
        Ok(product)
    }
}
