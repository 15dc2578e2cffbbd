//! Dialect resolution for arbitrary connections.
//!
//! Resolution first asks each configured strategy whether it recognizes the
//! connection's product. When none does, and detection is enabled, the
//! resolver samples a real table and runs each strategy's paging SQL against
//! it until one executes cleanly. The outcome is cached per database identity.

pub mod cache;
pub mod catalog;
pub mod identity;
pub mod probe;

pub use cache::{CachedDetection, DetectionCache};
pub use catalog::{CatalogProbe, MetadataCatalogProbe};
pub use identity::{DatabaseIdentity, IdentitySource};
pub use probe::{PaginationProbe, ProbeOutcome};

use crate::dialects::base::identifier_quote_or;
use crate::dialects::{
    get_registry, CombinedStrategy, ConnectionSummary, Dialect, DialectError, DialectStrategy,
};
use crate::executor::DbConnection;
use crate::model::{Config, ProbeSample};
use log::{debug, info, warn};
use std::sync::Arc;

const DEFAULT_QUOTE: &str = "\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionOptions {
    /// Probe the live database when no strategy matches statically
    pub enabled: bool,
    /// Cache "no table to probe" outcomes like any other
    pub cache_empty_outcomes: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_empty_outcomes: true,
        }
    }
}

/// What a detection pass had to work with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionBasis {
    /// Candidates were probed against this table and column.
    Sampled(ProbeSample),
    /// The catalog offered no table or no column.
    NoSchema,
    /// The catalog could not be read.
    CatalogUnavailable(String),
}

#[derive(Debug, Clone)]
pub struct Detection {
    pub strategy: CombinedStrategy,
    pub basis: DetectionBasis,
}

pub struct DialectResolver {
    strategies: Vec<Arc<dyn DialectStrategy>>,
    catalog: Box<dyn CatalogProbe>,
    options: DetectionOptions,
    cache: DetectionCache,
}

impl DialectResolver {
    /// `strategies` are tried in order; the first match wins.
    pub fn new(
        strategies: Vec<Arc<dyn DialectStrategy>>,
        catalog: Box<dyn CatalogProbe>,
        options: DetectionOptions,
    ) -> Self {
        Self {
            strategies,
            catalog,
            options,
            cache: DetectionCache::new(),
        }
    }

    /// Build a resolver from the `[strategies]` and `[detection]` sections.
    pub fn from_config(config: &Config) -> Result<Self, DialectError> {
        let strategies = get_registry().ordered(&config.strategies.order)?;
        let catalog = MetadataCatalogProbe::with_excluded_tables(&config.detection.excluded_tables)
            .map_err(|e| DialectError::ConfigError(format!("invalid excluded_tables pattern: {}", e)))?;

        let options = DetectionOptions {
            enabled: config.detection.enabled,
            cache_empty_outcomes: config.detection.cache_empty_outcomes,
        };

        debug!(
            "Resolver configured with strategies {:?}, detection {:?}",
            config.strategies.order, options
        );
        Ok(Self::new(strategies, Box::new(catalog), options))
    }

    pub fn strategies(&self) -> &[Arc<dyn DialectStrategy>] {
        &self.strategies
    }

    pub fn options(&self) -> DetectionOptions {
        self.options
    }

    pub fn cache(&self) -> &DetectionCache {
        &self.cache
    }

    /// Resolve a dialect for `connection`.
    ///
    /// A dialect produced through detection may lack paging support; check
    /// [`Dialect::supports_paging_sql`] before relying on it.
    pub fn resolve(&self, connection: &dyn DbConnection) -> Result<Box<dyn Dialect>, DialectError> {
        if let Some(strategy) = self.match_static(connection) {
            info!("Resolved dialect '{}' by product match", strategy.name());
            return strategy.build(connection);
        }

        if !self.options.enabled {
            let summary = ConnectionSummary::of(connection);
            warn!("No strategy supports connection ({}) and detection is disabled", summary);
            return Err(DialectError::Unsupported(summary));
        }

        let identity = DatabaseIdentity::of(connection).map_err(DialectError::Identity)?;

        if let Some(cached) = self.cache.get(&identity) {
            debug!(
                "Using cached detection for '{}' (paging via {:?})",
                identity,
                cached.delegate_name()
            );
            return cached.build(connection);
        }

        let detection = self.detect(connection);
        let strategy = Arc::new(detection.strategy);

        let strategy = match detection.basis {
            DetectionBasis::Sampled(_) => self.cache.insert_if_absent(identity, strategy),
            DetectionBasis::NoSchema if self.options.cache_empty_outcomes => {
                self.cache.insert_if_absent(identity, strategy)
            }
            DetectionBasis::NoSchema | DetectionBasis::CatalogUnavailable(_) => {
                debug!("Not caching detection for '{}'", identity);
                strategy
            }
        };

        strategy.build(connection)
    }

    /// First configured strategy whose `supports` check passes.
    ///
    /// A failing check counts as "no" and does not stop the scan.
    fn match_static(&self, connection: &dyn DbConnection) -> Option<&Arc<dyn DialectStrategy>> {
        self.strategies
            .iter()
            .find(|strategy| match strategy.supports(connection) {
                Ok(supported) => supported,
                Err(e) => {
                    warn!("Strategy '{}' failed its supports check: {}", strategy.name(), e);
                    false
                }
            })
    }

    /// Probe every configured strategy, in order, until one pages a real table.
    ///
    /// Never fails: probing errors only disqualify the candidate at hand.
    pub fn detect(&self, connection: &dyn DbConnection) -> Detection {
        let sample = match self.catalog.sample(connection) {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                info!("No table available to probe; pagination is unsupported for now");
                return Detection {
                    strategy: CombinedStrategy::empty(),
                    basis: DetectionBasis::NoSchema,
                };
            }
            Err(e) => {
                warn!("Catalog sampling failed: {}", e);
                return Detection {
                    strategy: CombinedStrategy::empty(),
                    basis: DetectionBasis::CatalogUnavailable(e.to_string()),
                };
            }
        };

        debug!(
            "Probing paging strategies against {}.{}",
            sample.table, sample.column_name
        );

        let quote = identifier_quote_or(connection, DEFAULT_QUOTE);
        let probe = PaginationProbe::new(connection, &sample, &quote);

        let mut winner = None;
        for strategy in &self.strategies {
            let outcome = probe.check(strategy.as_ref());
            debug!("Probe of '{}': {:?}", strategy.name(), outcome);
            if outcome.is_passed() {
                winner = Some(strategy.clone());
                break;
            }
        }

        match &winner {
            Some(strategy) => info!("Detected paging dialect '{}'", strategy.name()),
            None => warn!("No configured strategy produced a working paging query"),
        }

        Detection {
            strategy: CombinedStrategy::new(winner),
            basis: DetectionBasis::Sampled(sample),
        }
    }
}
