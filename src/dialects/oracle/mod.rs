use crate::dialects::base::{offset_of, order_by_clause, DialectConfig, ProductStrategy};
use crate::model::{Order, SqlBuilder};
use std::sync::OnceLock;

static CONFIG: OnceLock<DialectConfig> = OnceLock::new();

pub fn strategy() -> ProductStrategy {
    let config = CONFIG.get_or_init(|| {
        DialectConfig::parse(include_str!("dialect.toml"))
            .expect("Failed to parse Oracle dialect config")
    });

    ProductStrategy::new(config, paging_sql)
}

/// `ROWNUM` window over the ordered query. Works on releases before 12c,
/// which lack `OFFSET .. FETCH`.
pub fn paging_sql(query: &SqlBuilder, orders: &[Order], start_row: u64, count: u32) -> SqlBuilder {
    let offset = offset_of(start_row);
    let end_row = offset.saturating_add(u64::from(count));

    SqlBuilder::new()
        .sql("SELECT * FROM (SELECT pq_.*, ROWNUM rn_ FROM (")
        .append(query)
        .sql(&order_by_clause(orders))
        .sql(&format!(
            ") pq_ WHERE ROWNUM <= {}) WHERE rn_ > {}",
            end_row, offset
        ))
}
