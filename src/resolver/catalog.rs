use crate::executor::{ConnectionError, DbConnection};
use crate::model::{ProbeSample, TableName};
use log::debug;
use regex::Regex;

/// Supplies an existing table and column to build probe queries against.
pub trait CatalogProbe: Send + Sync {
    /// Some existing table, or `None` when the database has none to offer.
    fn sample_table(&self, connection: &dyn DbConnection) -> Result<Option<TableName>, ConnectionError>;

    /// Some existing column of `table`, or `None` when it has none.
    fn sample_column(
        &self,
        connection: &dyn DbConnection,
        table: &TableName,
    ) -> Result<Option<String>, ConnectionError>;

    /// Table and column pair, or `None` if either call comes up empty.
    fn sample(&self, connection: &dyn DbConnection) -> Result<Option<ProbeSample>, ConnectionError> {
        let Some(table) = self.sample_table(connection)? else {
            return Ok(None);
        };
        let Some(column) = self.sample_column(connection, &table)? else {
            return Ok(None);
        };
        Ok(Some(ProbeSample::new(table, column)))
    }
}

/// [`CatalogProbe`] over the connection's catalog metadata.
///
/// Takes the first table whose name matches none of the exclusion patterns,
/// then that table's first column.
#[derive(Debug, Default)]
pub struct MetadataCatalogProbe {
    excluded_tables: Vec<Regex>,
}

impl MetadataCatalogProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip tables matching any of `patterns`. Invalid patterns are an error.
    pub fn with_excluded_tables(patterns: &[String]) -> Result<Self, regex::Error> {
        let excluded_tables = patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { excluded_tables })
    }

    fn is_excluded(&self, table: &str) -> bool {
        self.excluded_tables.iter().any(|re| re.is_match(table))
    }
}

impl CatalogProbe for MetadataCatalogProbe {
    fn sample_table(&self, connection: &dyn DbConnection) -> Result<Option<TableName>, ConnectionError> {
        let tables = connection.table_names()?;
        debug!("Catalog lists {} tables", tables.len());

        Ok(tables
            .into_iter()
            .find(|table| !table.name.is_empty() && !self.is_excluded(&table.name)))
    }

    fn sample_column(
        &self,
        connection: &dyn DbConnection,
        table: &TableName,
    ) -> Result<Option<String>, ConnectionError> {
        Ok(connection
            .column_names(table)?
            .into_iter()
            .find(|column| !column.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SqlBuilder;
    use std::collections::HashMap;

    struct CatalogOnly {
        tables: Vec<TableName>,
        columns: HashMap<TableName, Vec<String>>,
    }

    impl DbConnection for CatalogOnly {
        fn product_name(&self) -> Result<String, ConnectionError> {
            Ok("Test".to_string())
        }
        fn url(&self) -> Result<Option<String>, ConnectionError> {
            Ok(None)
        }
        fn identifier_quote(&self) -> Result<String, ConnectionError> {
            Ok("\"".to_string())
        }
        fn execute_query(&self, _query: &SqlBuilder) -> Result<(), ConnectionError> {
            Ok(())
        }
        fn table_names(&self) -> Result<Vec<TableName>, ConnectionError> {
            Ok(self.tables.clone())
        }
        fn column_names(&self, table: &TableName) -> Result<Vec<String>, ConnectionError> {
            Ok(self.columns.get(table).cloned().unwrap_or_default())
        }
    }

    fn catalog(tables: &[&str], columns: &[(&str, &[&str])]) -> CatalogOnly {
        CatalogOnly {
            tables: tables.iter().map(|t| TableName::new(*t)).collect(),
            columns: columns
                .iter()
                .map(|(t, cols)| (TableName::new(*t), cols.iter().map(|c| c.to_string()).collect()))
                .collect(),
        }
    }

    #[test]
    fn test_sample_skips_excluded_tables() {
        let probe = MetadataCatalogProbe::with_excluded_tables(&["^pg_".to_string()]).unwrap();
        let connection = catalog(&["pg_stats", "users"], &[("users", &["id", "name"])]);

        let sample = probe.sample(&connection).unwrap();
        assert_eq!(sample, Some(ProbeSample::new("users", "id")));
    }

    #[test]
    fn test_sample_empty_database() {
        let probe = MetadataCatalogProbe::new();
        let connection = catalog(&[], &[]);
        assert_eq!(probe.sample(&connection).unwrap(), None);
    }

    #[test]
    fn test_sample_table_without_columns() {
        let probe = MetadataCatalogProbe::new();
        let connection = catalog(&["empty"], &[]);
        assert_eq!(probe.sample(&connection).unwrap(), None);
    }

    #[test]
    fn test_invalid_exclusion_pattern() {
        assert!(MetadataCatalogProbe::with_excluded_tables(&["(".to_string()]).is_err());
    }

    #[test]
    fn test_sample_keeps_schema_of_table() {
        let probe = MetadataCatalogProbe::new();
        let table = TableName::qualified("SALES", "ORDERS");
        let connection = CatalogOnly {
            tables: vec![table.clone()],
            columns: HashMap::from([
                (table.clone(), vec!["ORDER_ID".to_string()]),
                (TableName::new("ORDERS"), vec!["WRONG".to_string()]),
            ]),
        };

        let sample = probe.sample(&connection).unwrap();
        assert_eq!(sample, Some(ProbeSample::new(table, "ORDER_ID")));
    }
}
