use crate::executor::{ConnectionError, DbConnection};
use std::fmt;

/// Where a [`DatabaseIdentity`] key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentitySource {
    /// The driver's canonical URL for the endpoint.
    Url,
    /// The connection implementation's type name.
    DriverType,
}

/// Key that scopes detection results to one logical database endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseIdentity {
    key: String,
    source: IdentitySource,
}

impl DatabaseIdentity {
    pub fn new(key: impl Into<String>, source: IdentitySource) -> Self {
        Self {
            key: key.into(),
            source,
        }
    }

    /// URL when the driver exposes one, otherwise the connection type name.
    pub fn of(connection: &dyn DbConnection) -> Result<Self, ConnectionError> {
        match connection.url()? {
            Some(url) if !url.is_empty() => Ok(Self::new(url, IdentitySource::Url)),
            _ => Ok(Self::new(connection.type_name(), IdentitySource::DriverType)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> IdentitySource {
        self.source
    }
}

impl fmt::Display for DatabaseIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
