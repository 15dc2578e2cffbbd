//! Live ODBC checks, run with `cargo test --features integration`.
//!
//! `PAGING_DIALECT_TEST_CONN` must point at a writable database.
#![cfg(feature = "integration")]

use paging_dialect::executor::{ConnectionManager, DbConnection};
use paging_dialect::model::{Config, SqlBuilder};
use paging_dialect::resolver::DialectResolver;
use serial_test::serial;

fn test_connection_string() -> Option<String> {
    std::env::var("PAGING_DIALECT_TEST_CONN").ok()
}

#[test]
#[serial]
fn test_resolved_dialect_pages_live_table() {
    let Some(conn) = test_connection_string() else {
        eprintln!("PAGING_DIALECT_TEST_CONN not set, skipping");
        return;
    };

    let manager = ConnectionManager::new().unwrap();
    manager.test_connection(&conn).unwrap();
    let session = manager.open_session(&conn).unwrap();

    let _ = session.execute_query(&SqlBuilder::from_sql("DROP TABLE paging_probe_items"));
    session
        .execute_query(&SqlBuilder::from_sql(
            "CREATE TABLE paging_probe_items (id INTEGER, label VARCHAR(20))",
        ))
        .unwrap();

    let resolver = DialectResolver::from_config(&Config::default()).unwrap();
    let dialect = resolver.resolve(&session).unwrap();
    assert!(dialect.supports_paging_sql());

    let page = dialect
        .to_paging_query_sql(
            &SqlBuilder::from_sql("SELECT * FROM paging_probe_items"),
            &[paging_dialect::Order::asc("id")],
            1,
            10,
        )
        .unwrap();
    session.execute_query(&page).unwrap();

    session
        .execute_query(&SqlBuilder::from_sql("DROP TABLE paging_probe_items"))
        .unwrap();
}
