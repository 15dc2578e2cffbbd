use crate::dialects::base::{DialectError, DialectStrategy};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Central registry of the available dialect strategies
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn DialectStrategy>>,
    names: HashMap<String, usize>, // name or alias -> index into `strategies`
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            names: HashMap::new(),
        }
    }

    /// Register a strategy under its name and aliases
    pub fn register(&mut self, strategy: Arc<dyn DialectStrategy>) {
        let name = strategy.name().to_string();
        debug!("Registering strategy: {}", name);

        let index = self.strategies.len();
        for alias in strategy.aliases() {
            self.names.insert(alias.to_lowercase(), index);
        }
        self.names.insert(name.to_lowercase(), index);
        self.strategies.push(strategy);
    }

    /// Get a strategy by name or alias, case-insensitively
    pub fn get(&self, name: &str) -> Option<Arc<dyn DialectStrategy>> {
        self.names
            .get(&name.to_lowercase())
            .map(|index| self.strategies[*index].clone())
    }

    /// Resolve configured names into an ordered strategy list.
    ///
    /// Duplicates keep their first position.
    pub fn ordered(&self, names: &[String]) -> Result<Vec<Arc<dyn DialectStrategy>>, DialectError> {
        let mut ordered: Vec<Arc<dyn DialectStrategy>> = Vec::with_capacity(names.len());

        for name in names {
            let strategy = self
                .get(name)
                .ok_or_else(|| DialectError::NotFound(name.clone()))?;

            if ordered.iter().any(|s| s.name() == strategy.name()) {
                debug!("Skipping duplicate strategy '{}' in configured order", name);
                continue;
            }
            ordered.push(strategy);
        }

        Ok(ordered)
    }

    /// Registered strategy names in registration order
    pub fn list_strategies(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.name().to_string()).collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_REGISTRY: OnceLock<StrategyRegistry> = OnceLock::new();

/// Get the global strategy registry (initialized lazily)
pub fn get_registry() -> &'static StrategyRegistry {
    GLOBAL_REGISTRY.get_or_init(create_default_registry)
}

/// Create registry with all built-in strategies
fn create_default_registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::new();

    registry.register(Arc::new(crate::dialects::postgres::strategy()));
    registry.register(Arc::new(crate::dialects::mysql::strategy()));
    registry.register(Arc::new(crate::dialects::sqlite::strategy()));
    registry.register(Arc::new(crate::dialects::sqlserver::strategy()));
    registry.register(Arc::new(crate::dialects::oracle::strategy()));
    registry.register(Arc::new(crate::dialects::ansi::strategy()));

    registry
}
