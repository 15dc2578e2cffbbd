use crate::dialects::base::quote_identifier;
use crate::dialects::{Dialect, DialectStrategy};
use crate::executor::DbConnection;
use crate::model::{Order, ProbeSample, SqlBuilder};
use log::debug;

/// First row of the probe window (1-based).
pub const PROBE_START_ROW: u64 = 1;
/// Rows requested by the probe query.
pub const PROBE_ROW_COUNT: u32 = 5;

/// Verdict of probing one candidate strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The paginated probe query executed cleanly.
    Passed,
    /// The strategy could not build a dialect for this connection.
    BuildFailed(String),
    /// The dialect declined to produce paging SQL.
    Declined,
    /// The paging SQL was produced but failed to execute.
    ExecutionFailed(String),
}

impl ProbeOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ProbeOutcome::Passed)
    }
}

/// Checks a strategy's paging SQL against a real table.
pub struct PaginationProbe<'a> {
    connection: &'a dyn DbConnection,
    sample: &'a ProbeSample,
    identifier_quote: String,
}

impl<'a> PaginationProbe<'a> {
    pub fn new(connection: &'a dyn DbConnection, sample: &'a ProbeSample, identifier_quote: &str) -> Self {
        Self {
            connection,
            sample,
            identifier_quote: identifier_quote.to_string(),
        }
    }

    /// `SELECT * FROM <table>` ordered ascending by the sampled column.
    ///
    /// The table is schema-qualified when the catalog reported a schema.
    pub fn probe_query(&self) -> (SqlBuilder, Vec<Order>) {
        let quote = &self.identifier_quote;
        let table = &self.sample.table;
        let mut from = quote_identifier(quote, &table.name);
        if let Some(schema) = &table.schema {
            from = format!("{}.{}", quote_identifier(quote, schema), from);
        }
        let column = quote_identifier(quote, &self.sample.column_name);

        let query = SqlBuilder::new().sql("SELECT * FROM ").sql(&from);
        (query, vec![Order::asc(column)])
    }

    /// Build the strategy's dialect and run its paging SQL once.
    pub fn check(&self, strategy: &dyn DialectStrategy) -> ProbeOutcome {
        let dialect = match strategy.build(self.connection) {
            Ok(dialect) => dialect,
            Err(e) => {
                debug!("Strategy '{}' could not build a dialect: {}", strategy.name(), e);
                return ProbeOutcome::BuildFailed(e.to_string());
            }
        };

        self.check_dialect(dialect.as_ref())
    }

    pub fn check_dialect(&self, dialect: &dyn Dialect) -> ProbeOutcome {
        let (query, orders) = self.probe_query();

        let Some(paging_sql) =
            dialect.to_paging_query_sql(&query, &orders, PROBE_START_ROW, PROBE_ROW_COUNT)
        else {
            debug!("Dialect '{}' declined to build paging SQL", dialect.name());
            return ProbeOutcome::Declined;
        };

        match self.connection.execute_query(&paging_sql) {
            Ok(()) => {
                debug!("Dialect '{}' passed the paging probe", dialect.name());
                ProbeOutcome::Passed
            }
            Err(e) => {
                debug!("Dialect '{}' failed the paging probe: {}", dialect.name(), e);
                ProbeOutcome::ExecutionFailed(e.to_string())
            }
        }
    }
}
