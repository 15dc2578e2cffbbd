use crate::model::{SqlBuilder, TableName};
use log::debug;
use odbc_api::{buffers::TextRowSet, parameter::VarCharBox, Connection, Cursor};

use super::connection::{ConnectionError, DbConnection};

/// Table types sampled from the catalog.
const TABLE_TYPES: &str = "TABLE,VIEW,ALIAS";

// Column positions in the SQLTables / SQLColumns result sets
const TABLE_SCHEM_INDEX: usize = 1;
const TABLE_NAME_INDEX: usize = 2;
const COLUMN_NAME_INDEX: usize = 3;

/// Escape character for catalog search patterns (`SQL_SEARCH_PATTERN_ESCAPE`).
const SEARCH_ESCAPE: char = '\\';

/// Connection string keys that never take part in the endpoint identity.
const CREDENTIAL_KEYS: &[&str] = &["PWD", "PASSWORD", "TOKEN", "AUTH_ACCESSTOKEN"];

/// A [`DbConnection`] backed by an ODBC connection.
pub struct OdbcSession<'env> {
    connection: Connection<'env>,
    canonical_url: String,
}

impl<'env> OdbcSession<'env> {
    pub fn new(connection: Connection<'env>, connection_string: &str) -> Self {
        Self {
            connection,
            canonical_url: canonical_connection_string(connection_string),
        }
    }

    /// Values of the given result columns, row by row. SQL NULL reads as `None`.
    fn read_columns<C: Cursor>(
        mut cursor: C,
        indices: &[usize],
    ) -> Result<Vec<Vec<Option<String>>>, ConnectionError> {
        let mut buffer = TextRowSet::for_cursor(64, &mut cursor, Some(1024))?;
        let mut row_set_cursor = cursor.bind_buffer(&mut buffer)?;
        let mut rows = Vec::new();

        while let Some(row_set) = row_set_cursor.fetch()? {
            if let Some(missing) = indices.iter().find(|&&index| index >= row_set.num_cols()) {
                return Err(ConnectionError::MetadataUnavailable(format!(
                    "catalog result has {} columns, expected more than {}",
                    row_set.num_cols(),
                    missing
                )));
            }
            for row_index in 0..row_set.num_rows() {
                rows.push(
                    indices
                        .iter()
                        .map(|&index| {
                            row_set
                                .at(index, row_index)
                                .map(|value| String::from_utf8_lossy(value).to_string())
                        })
                        .collect(),
                );
            }
        }

        Ok(rows)
    }

    /// Catalog the session is attached to; empty when the driver has none.
    fn current_catalog(&self) -> String {
        match self.connection.current_catalog() {
            Ok(catalog) => catalog,
            Err(e) => {
                debug!("Current catalog unavailable, searching all catalogs: {}", e);
                String::new()
            }
        }
    }
}

impl DbConnection for OdbcSession<'_> {
    fn product_name(&self) -> Result<String, ConnectionError> {
        Ok(self.connection.database_management_system_name()?)
    }

    fn url(&self) -> Result<Option<String>, ConnectionError> {
        if self.canonical_url.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.canonical_url.clone()))
    }

    fn identifier_quote(&self) -> Result<String, ConnectionError> {
        let product = self.product_name()?;
        Ok(quote_for_product(&product).to_string())
    }

    fn execute_query(&self, query: &SqlBuilder) -> Result<(), ConnectionError> {
        debug!("Executing SQL statement: {}", query);

        let mut prepared = self
            .connection
            .prepare(query.sql_string())
            .map_err(|e| ConnectionError::QueryFailed(e.to_string()))?;

        let params: Vec<VarCharBox> = query
            .args()
            .iter()
            .map(|arg| VarCharBox::from_string(arg.as_text()))
            .collect();

        // Statement and cursor handles are released when dropped, on every path
        match prepared.execute(params.as_slice()) {
            Ok(Some(mut cursor)) => {
                let mut buffer = TextRowSet::for_cursor(16, &mut cursor, Some(4096))?;
                let mut row_set_cursor = cursor.bind_buffer(&mut buffer)?;
                while row_set_cursor.fetch()?.is_some() {}
                debug!("Statement executed successfully with results");
                Ok(())
            }
            Ok(None) => {
                debug!("Statement executed successfully (no results)");
                Ok(())
            }
            Err(e) => {
                debug!("Statement execution failed: {}", e);
                Err(ConnectionError::QueryFailed(e.to_string()))
            }
        }
    }

    fn table_names(&self) -> Result<Vec<TableName>, ConnectionError> {
        let catalog = self.current_catalog();
        let cursor = self
            .connection
            .tables(&catalog, "%", "%", TABLE_TYPES)
            .map_err(|e| ConnectionError::MetadataUnavailable(e.to_string()))?;

        let rows = Self::read_columns(cursor, &[TABLE_SCHEM_INDEX, TABLE_NAME_INDEX])?;
        Ok(rows
            .into_iter()
            .filter_map(|mut row| {
                let name = row.pop().flatten()?;
                let schema = row.pop().flatten().filter(|schema| !schema.is_empty());
                Some(TableName { schema, name })
            })
            .collect())
    }

    fn column_names(&self, table: &TableName) -> Result<Vec<String>, ConnectionError> {
        let catalog = self.current_catalog();
        let schema = table
            .schema
            .as_deref()
            .map(escape_search_pattern)
            .unwrap_or_else(|| "%".to_string());

        let cursor = self
            .connection
            .columns(&catalog, &schema, &escape_search_pattern(&table.name), "%")
            .map_err(|e| ConnectionError::MetadataUnavailable(e.to_string()))?;

        let rows = Self::read_columns(cursor, &[COLUMN_NAME_INDEX])?;
        Ok(rows.into_iter().filter_map(|mut row| row.pop().flatten()).collect())
    }
}

/// Escape `_`, `%` and the escape character so `name` matches only itself in
/// a catalog search pattern.
pub fn escape_search_pattern(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '_' || c == '%' || c == SEARCH_ESCAPE {
            escaped.push(SEARCH_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Identifier quote used by a DBMS product.
pub fn quote_for_product(product: &str) -> &'static str {
    let product = product.to_lowercase();
    if ["mysql", "mariadb", "databricks", "spark"]
        .iter()
        .any(|name| product.contains(name))
    {
        "`"
    } else {
        "\""
    }
}

/// Normalize an ODBC connection string into an endpoint key.
///
/// Keys are upper-cased and sorted, values trimmed, and credentials dropped,
/// so `Driver=x;Server=h;PWD=a` and `server=h; driver=x; pwd=b` agree.
pub fn canonical_connection_string(connection_string: &str) -> String {
    let mut pairs: Vec<(String, String)> = connection_string
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            let key = key.trim().to_uppercase();
            if key.is_empty() || CREDENTIAL_KEYS.contains(&key.as_str()) {
                return None;
            }
            Some((key, value.trim().to_string()))
        })
        .collect();

    pairs.sort();
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(";")
}
