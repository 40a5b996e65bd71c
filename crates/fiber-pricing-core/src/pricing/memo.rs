//! Optional memoization of proposal calculations.

use std::collections::HashMap;

use crate::config::PricingConfig;
use crate::pricing::input::CalculationInput;
use crate::pricing::proposal::{calculate_proposal, ProposalOutput};
use crate::types::ComputationOutput;
use crate::PricingResult;

/// Default number of cached proposals before the cache is flushed.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Caches proposal outputs by resolved input. Config edits go through
/// [`MemoizedCalculator::update_config`], which drops every cached entry.
/// When the cache reaches its capacity it is flushed before the next insert.
#[derive(Debug)]
pub struct MemoizedCalculator {
    config: PricingConfig,
    capacity: usize,
    cache: HashMap<CalculationInput, ComputationOutput<ProposalOutput>>,
}

impl Default for MemoizedCalculator {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

impl MemoizedCalculator {
    pub fn new(config: PricingConfig) -> Self {
        Self::with_capacity(config, DEFAULT_CACHE_CAPACITY)
    }

    /// A capacity of 0 disables caching.
    pub fn with_capacity(config: PricingConfig, capacity: usize) -> Self {
        Self {
            config,
            capacity,
            cache: HashMap::new(),
        }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn calculate(
        &mut self,
        input: &CalculationInput,
    ) -> PricingResult<ComputationOutput<ProposalOutput>> {
        let key = self.config.resolve_input(input);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }
        let output = calculate_proposal(&self.config, &key)?;
        if self.capacity == 0 {
            return Ok(output);
        }
        if self.cache.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "proposal cache full; flushing");
            self.cache.clear();
        }
        self.cache.insert(key, output.clone());
        Ok(output)
    }

    /// Edit the configuration and invalidate the cache. The cache is kept
    /// when the edit fails and leaves the config untouched.
    pub fn update_config<F>(&mut self, edit: F) -> PricingResult<()>
    where
        F: FnOnce(&mut PricingConfig) -> PricingResult<()>,
    {
        let mut next = self.config.clone();
        edit(&mut next)?;
        next.validate()?;
        self.config = next;
        self.cache.clear();
        Ok(())
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
