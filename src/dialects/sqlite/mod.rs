use crate::dialects::base::{offset_of, order_by_clause, DialectConfig, ProductStrategy};
use crate::model::{Order, SqlBuilder};
use std::sync::OnceLock;

static CONFIG: OnceLock<DialectConfig> = OnceLock::new();

pub fn strategy() -> ProductStrategy {
    let config = CONFIG.get_or_init(|| {
        DialectConfig::parse(include_str!("dialect.toml"))
            .expect("Failed to parse SQLite dialect config")
    });

    ProductStrategy::new(config, paging_sql)
}

pub fn paging_sql(query: &SqlBuilder, orders: &[Order], start_row: u64, count: u32) -> SqlBuilder {
    SqlBuilder::new()
        .append(query)
        .sql(&order_by_clause(orders))
        .sql(&format!(" LIMIT {} OFFSET {}", count, offset_of(start_row)))
}
