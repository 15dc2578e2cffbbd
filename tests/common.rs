#![allow(dead_code)]

use assert_cmd::Command;
use paging_dialect::dialects::{Dialect, DialectError, DialectStrategy};
use paging_dialect::executor::{ConnectionError, DbConnection};
use paging_dialect::model::{Order, SqlBuilder, TableName};
use paging_dialect::resolver::{CatalogProbe, MetadataCatalogProbe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns a configured Command for `paging_dialect`
pub fn paging_dialect_cmd() -> Command {
    Command::cargo_bin("paging_dialect").expect("Binary not found")
}

/// In-memory connection with a fixed catalog.
///
/// A query executes successfully when its SQL contains one of the accepted
/// fragments.
pub struct MockConnection {
    pub product: Option<String>,
    pub url: Option<String>,
    pub url_fails: bool,
    pub tables: Vec<(TableName, Vec<String>)>,
    pub accepted_fragments: Vec<String>,
    pub executed: Mutex<Vec<String>>,
}

impl MockConnection {
    pub fn new(product: &str, url: &str) -> Self {
        Self {
            product: Some(product.to_string()),
            url: Some(url.to_string()),
            url_fails: false,
            tables: vec![(TableName::new("T"), vec!["C".to_string()])],
            accepted_fragments: Vec::new(),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn without_url(mut self) -> Self {
        self.url = None;
        self
    }

    pub fn with_tables(mut self, tables: &[(&str, &[&str])]) -> Self {
        self.tables = tables
            .iter()
            .map(|(t, cols)| (TableName::new(*t), cols.iter().map(|c| c.to_string()).collect()))
            .collect();
        self
    }

    /// Catalog of `(schema, table, columns)` entries.
    pub fn with_schema_tables(mut self, tables: &[(&str, &str, &[&str])]) -> Self {
        self.tables = tables
            .iter()
            .map(|(schema, t, cols)| {
                (
                    TableName::qualified(*schema, *t),
                    cols.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect();
        self
    }

    pub fn accepting(mut self, fragment: &str) -> Self {
        self.accepted_fragments.push(fragment.to_string());
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl DbConnection for MockConnection {
    fn product_name(&self) -> Result<String, ConnectionError> {
        self.product
            .clone()
            .ok_or_else(|| ConnectionError::MetadataUnavailable("no product name".to_string()))
    }

    fn url(&self) -> Result<Option<String>, ConnectionError> {
        if self.url_fails {
            return Err(ConnectionError::MetadataUnavailable("connection closed".to_string()));
        }
        Ok(self.url.clone())
    }

    fn identifier_quote(&self) -> Result<String, ConnectionError> {
        Ok("\"".to_string())
    }

    fn execute_query(&self, query: &SqlBuilder) -> Result<(), ConnectionError> {
        let sql = query.sql_string().to_string();
        self.executed.lock().unwrap().push(sql.clone());

        if self.accepted_fragments.iter().any(|f| sql.contains(f.as_str())) {
            Ok(())
        } else {
            Err(ConnectionError::QueryFailed(format!("syntax error near: {}", sql)))
        }
    }

    fn table_names(&self) -> Result<Vec<TableName>, ConnectionError> {
        Ok(self.tables.iter().map(|(t, _)| t.clone()).collect())
    }

    fn column_names(&self, table: &TableName) -> Result<Vec<String>, ConnectionError> {
        Ok(self
            .tables
            .iter()
            .find(|(t, _)| t == table)
            .map(|(_, cols)| cols.clone())
            .unwrap_or_default())
    }
}

/// Dialect that tags its paging SQL with the strategy name.
#[derive(Debug)]
pub struct TaggedDialect {
    name: String,
}

impl Dialect for TaggedDialect {
    fn name(&self) -> &str {
        &self.name
    }

    fn identifier_quote(&self) -> &str {
        "\""
    }

    fn supports_paging_sql(&self) -> bool {
        true
    }

    fn to_paging_query_sql(
        &self,
        query: &SqlBuilder,
        _orders: &[Order],
        start_row: u64,
        count: u32,
    ) -> Option<SqlBuilder> {
        Some(
            SqlBuilder::new()
                .append(query)
                .sql(&format!(" /* {} {} {} */", self.name, start_row, count)),
        )
    }
}

/// Strategy with scripted answers and call counters.
pub struct MockStrategy {
    name: String,
    supports: Result<bool, String>,
    build_fails: bool,
    pub supports_calls: AtomicUsize,
    pub build_calls: AtomicUsize,
}

impl MockStrategy {
    pub fn new(name: &str, supports: bool) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            supports: Ok(supports),
            build_fails: false,
            supports_calls: AtomicUsize::new(0),
            build_calls: AtomicUsize::new(0),
        })
    }

    pub fn failing_supports(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            supports: Err("driver metadata unavailable".to_string()),
            build_fails: false,
            supports_calls: AtomicUsize::new(0),
            build_calls: AtomicUsize::new(0),
        })
    }

    pub fn failing_build(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            supports: Ok(false),
            build_fails: true,
            supports_calls: AtomicUsize::new(0),
            build_calls: AtomicUsize::new(0),
        })
    }

    /// SQL marker its dialect appends to probe queries.
    pub fn probe_marker(&self) -> String {
        format!("/* {} 1 5 */", self.name)
    }

    pub fn supports_count(&self) -> usize {
        self.supports_calls.load(Ordering::SeqCst)
    }

    pub fn build_count(&self) -> usize {
        self.build_calls.load(Ordering::SeqCst)
    }
}

impl DialectStrategy for MockStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, _connection: &dyn DbConnection) -> Result<bool, DialectError> {
        self.supports_calls.fetch_add(1, Ordering::SeqCst);
        self.supports
            .clone()
            .map_err(|e| DialectError::Connection(ConnectionError::MetadataUnavailable(e)))
    }

    fn build(&self, _connection: &dyn DbConnection) -> Result<Box<dyn Dialect>, DialectError> {
        self.build_calls.fetch_add(1, Ordering::SeqCst);
        if self.build_fails {
            return Err(DialectError::Build {
                dialect: self.name.clone(),
                reason: "unsupported driver".to_string(),
            });
        }
        Ok(Box::new(TaggedDialect {
            name: self.name.clone(),
        }))
    }
}

/// Catalog probe that counts how often it is consulted.
pub struct CountingCatalog {
    inner: MetadataCatalogProbe,
    pub calls: Arc<AtomicUsize>,
}

impl CountingCatalog {
    pub fn new() -> (Box<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let catalog = Box::new(Self {
            inner: MetadataCatalogProbe::new(),
            calls: calls.clone(),
        });
        (catalog, calls)
    }
}

impl CatalogProbe for CountingCatalog {
    fn sample_table(&self, connection: &dyn DbConnection) -> Result<Option<TableName>, ConnectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sample_table(connection)
    }

    fn sample_column(
        &self,
        connection: &dyn DbConnection,
        table: &TableName,
    ) -> Result<Option<String>, ConnectionError> {
        self.inner.sample_column(connection, table)
    }
}

pub fn strategies(list: &[&Arc<MockStrategy>]) -> Vec<Arc<dyn DialectStrategy>> {
    list.iter()
        .map(|s| (*s).clone() as Arc<dyn DialectStrategy>)
        .collect()
}
