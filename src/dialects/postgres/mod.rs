use crate::dialects::base::{offset_of, order_by_clause, DialectConfig, ProductStrategy};
use crate::model::{Order, SqlBuilder};
use std::sync::OnceLock;

static CONFIG: OnceLock<DialectConfig> = OnceLock::new();

pub fn strategy() -> ProductStrategy {
    let config = CONFIG.get_or_init(|| {
        DialectConfig::parse(include_str!("dialect.toml"))
            .expect("Failed to parse PostgreSQL dialect config")
    });

    ProductStrategy::new(config, paging_sql)
}

/// `... ORDER BY .. LIMIT n OFFSET m`
pub fn paging_sql(query: &SqlBuilder, orders: &[Order], start_row: u64, count: u32) -> SqlBuilder {
    SqlBuilder::new()
        .append(query)
        .sql(&order_by_clause(orders))
        .sql(&format!(" LIMIT {} OFFSET {}", count, offset_of(start_row)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialects::base::DialectStrategy;

    #[test]
    fn test_paging_sql() {
        let query = SqlBuilder::from_sql("SELECT * FROM \"users\"");
        let sql = paging_sql(&query, &[Order::asc("\"id\"")], 21, 10);
        assert_eq!(
            sql.sql_string(),
            "SELECT * FROM \"users\" ORDER BY \"id\" ASC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_config_metadata() {
        let strategy = strategy();
        assert_eq!(strategy.name(), "postgres");
        assert!(strategy.aliases().contains(&"postgresql".to_string()));
    }
}
