pub mod connection;
pub mod odbc_session;

pub use connection::{ConnectionError, ConnectionManager, DbConnection};
pub use odbc_session::OdbcSession;
