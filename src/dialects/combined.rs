use crate::dialects::base::{identifier_quote_or, Dialect, DialectError, DialectStrategy};
use crate::executor::DbConnection;
use crate::model::{Order, SqlBuilder};
use std::sync::Arc;

const DEFAULT_QUOTE: &str = "\"";

/// Strategy synthesized by empirical detection.
///
/// Never claims a connection statically. Wraps the strategy whose paging SQL
/// was proven against the live database, or nothing if no candidate worked.
/// The delegate is fixed at construction.
#[derive(Clone, Default)]
pub struct CombinedStrategy {
    paging_delegate: Option<Arc<dyn DialectStrategy>>,
}

impl CombinedStrategy {
    pub fn new(paging_delegate: Option<Arc<dyn DialectStrategy>>) -> Self {
        Self { paging_delegate }
    }

    /// Represents "pagination unsupported for this endpoint".
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn paging_delegate(&self) -> Option<&Arc<dyn DialectStrategy>> {
        self.paging_delegate.as_ref()
    }

    pub fn delegate_name(&self) -> Option<&str> {
        self.paging_delegate.as_ref().map(|delegate| delegate.name())
    }
}

impl std::fmt::Debug for CombinedStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedStrategy")
            .field("paging_delegate", &self.delegate_name())
            .finish()
    }
}

impl DialectStrategy for CombinedStrategy {
    fn name(&self) -> &str {
        "combined"
    }

    fn supports(&self, _connection: &dyn DbConnection) -> Result<bool, DialectError> {
        Ok(false)
    }

    fn build(&self, connection: &dyn DbConnection) -> Result<Box<dyn Dialect>, DialectError> {
        let identifier_quote = identifier_quote_or(connection, DEFAULT_QUOTE);

        let paging_dialect = match &self.paging_delegate {
            Some(delegate) => Some(delegate.build(connection).map_err(|e| DialectError::Build {
                dialect: format!("combined({})", delegate.name()),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Box::new(CombinedDialect {
            identifier_quote,
            paging_dialect,
        }))
    }
}

/// Dialect built by [`CombinedStrategy`].
#[derive(Debug)]
pub struct CombinedDialect {
    identifier_quote: String,
    paging_dialect: Option<Box<dyn Dialect>>,
}

impl CombinedDialect {
    /// Name of the dialect paging is delegated to.
    pub fn paging_dialect_name(&self) -> Option<&str> {
        self.paging_dialect.as_ref().map(|dialect| dialect.name())
    }
}

impl Dialect for CombinedDialect {
    fn name(&self) -> &str {
        match &self.paging_dialect {
            Some(dialect) => dialect.name(),
            None => "combined",
        }
    }

    fn identifier_quote(&self) -> &str {
        &self.identifier_quote
    }

    fn supports_paging_sql(&self) -> bool {
        self.paging_dialect.is_some()
    }

    fn to_paging_query_sql(
        &self,
        query: &SqlBuilder,
        orders: &[Order],
        start_row: u64,
        count: u32,
    ) -> Option<SqlBuilder> {
        self.paging_dialect
            .as_ref()?
            .to_paging_query_sql(query, orders, start_row, count)
    }
}
