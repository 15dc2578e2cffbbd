use crate::dialects::base::{offset_of, order_by_clause, DialectConfig, ProductStrategy};
use crate::model::{Order, SqlBuilder};
use std::sync::OnceLock;

static CONFIG: OnceLock<DialectConfig> = OnceLock::new();

pub fn strategy() -> ProductStrategy {
    let config = CONFIG.get_or_init(|| {
        DialectConfig::parse(include_str!("dialect.toml"))
            .expect("Failed to parse SQL Server dialect config")
    });

    ProductStrategy::new(config, paging_sql)
}

/// `OFFSET .. FETCH NEXT`, available since SQL Server 2012.
///
/// `OFFSET` is only valid after `ORDER BY`, so an unordered query is given a
/// no-op ordering.
pub fn paging_sql(query: &SqlBuilder, orders: &[Order], start_row: u64, count: u32) -> SqlBuilder {
    let order_by = if orders.is_empty() {
        " ORDER BY (SELECT NULL)".to_string()
    } else {
        order_by_clause(orders)
    };

    SqlBuilder::new()
        .append(query)
        .sql(&order_by)
        .sql(&format!(
            " OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
            offset_of(start_row),
            count
        ))
}
