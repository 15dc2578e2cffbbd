use crate::dialects::base::{offset_of, order_by_clause, DialectConfig, ProductStrategy};
use crate::model::{Order, SqlBuilder};
use std::sync::OnceLock;

static CONFIG: OnceLock<DialectConfig> = OnceLock::new();

pub fn strategy() -> ProductStrategy {
    let config = CONFIG.get_or_init(|| {
        DialectConfig::parse(include_str!("dialect.toml"))
            .expect("Failed to parse MySQL dialect config")
    });

    ProductStrategy::new(config, paging_sql)
}

/// MySQL takes the offset first: `LIMIT offset, count`.
pub fn paging_sql(query: &SqlBuilder, orders: &[Order], start_row: u64, count: u32) -> SqlBuilder {
    SqlBuilder::new()
        .append(query)
        .sql(&order_by_clause(orders))
        .sql(&format!(" LIMIT {}, {}", offset_of(start_row), count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_sql() {
        let query = SqlBuilder::from_sql("SELECT * FROM `orders`");
        let sql = paging_sql(&query, &[Order::desc("`created`")], 1, 5);
        assert_eq!(
            sql.sql_string(),
            "SELECT * FROM `orders` ORDER BY `created` DESC LIMIT 0, 5"
        );
    }
}
