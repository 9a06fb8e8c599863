use crate::cache::DiscoveryCache;
use crate::config::DiscoveryConfig;
use crate::error::{Result, TrellisError};
use crate::project::ClassEnumerator;
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};
use trellis_api::{CacheStrategy, ClassName, HostRegistry, Phase, UnitSummary};
use trellis_plugin::{CacheEnvelope, DiscoveryUnit, UnitCache};

struct RegisteredUnit {
    phase: Phase,
    unit: Box<dyn DiscoveryUnit>,
}

pub struct DiscoveryRunnerBuilder {
    config: DiscoveryConfig,
    enumerator: ClassEnumerator,
    cache: DiscoveryCache,
    units: Vec<RegisteredUnit>,
}

impl DiscoveryRunnerBuilder {
    /// Register a unit. Units are discovered in registration order and
    /// applied in registration order within their phase.
    pub fn with_unit(mut self, phase: Phase, unit: impl DiscoveryUnit + 'static) -> Self {
        self.units.push(RegisteredUnit {
            phase,
            unit: Box::new(unit),
        });
        self
    }

    pub fn build(self) -> Result<DiscoveryRunner> {
        let mut seen = HashSet::new();
        for entry in &self.units {
            if !seen.insert(entry.unit.id()) {
                return Err(TrellisError::Config(format!(
                    "discovery unit '{}' registered twice",
                    entry.unit.id()
                )));
            }
        }

        Ok(DiscoveryRunner {
            config: self.config,
            enumerator: self.enumerator,
            cache: self.cache,
            units: self.units,
            discovered: false,
            ran: BTreeSet::new(),
        })
    }
}

/// Outcome of a cache warm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmReport {
    pub strategy: CacheStrategy,
    pub units: Vec<UnitSummary>,
    /// Units written to the envelope, `None` when the strategy stores nothing.
    pub stored_units: Option<usize>,
}

impl WarmReport {
    pub fn total_findings(&self) -> usize {
        self.units.iter().map(|u| u.findings).sum()
    }

    pub fn stored(&self) -> bool {
        self.stored_units.is_some()
    }
}

/// Drives the discovery units through one request.
///
/// Discovery happens at most once: from the cache where the strategy covers a
/// unit and the cache is valid, otherwise by scanning the application
/// directory and the opt-in classes. Each phase applies its units at most once.
pub struct DiscoveryRunner {
    config: DiscoveryConfig,
    enumerator: ClassEnumerator,
    cache: DiscoveryCache,
    units: Vec<RegisteredUnit>,
    discovered: bool,
    ran: BTreeSet<Phase>,
}

impl DiscoveryRunner {
    pub fn builder(
        config: DiscoveryConfig,
        enumerator: ClassEnumerator,
        cache: DiscoveryCache,
    ) -> DiscoveryRunnerBuilder {
        DiscoveryRunnerBuilder {
            config,
            enumerator,
            cache,
            units: Vec::new(),
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn cache(&self) -> &DiscoveryCache {
        &self.cache
    }

    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    pub fn has_run(&self, phase: Phase) -> bool {
        self.ran.contains(&phase)
    }

    pub fn unit(&self, id: &str) -> Option<&dyn DiscoveryUnit> {
        self.units
            .iter()
            .find(|entry| entry.unit.id() == id)
            .map(|entry| entry.unit.as_ref())
    }

    pub fn unit_summaries(&self) -> Vec<UnitSummary> {
        self.units
            .iter()
            .map(|entry| UnitSummary {
                unit: entry.unit.id().to_string(),
                phase: entry.phase,
                findings: entry.unit.item_count(),
                restored: entry.unit.was_restored_from_cache(),
            })
            .collect()
    }

    /// Fill every unit with findings, once.
    pub fn discover(&mut self) -> Result<()> {
        if self.discovered {
            return Ok(());
        }
        let start = Instant::now();
        let pending = self.restore_from_cache();
        if !pending.is_empty() {
            self.scan(&pending)?;
        }
        self.discovered = true;

        info!(
            "Discovery finished: {} units, {} rescanned in {:?}",
            self.units.len(),
            pending.len(),
            start.elapsed()
        );
        Ok(())
    }

    /// Restore what the cache covers; returns indices of units still to scan.
    fn restore_from_cache(&mut self) -> Vec<usize> {
        let all: Vec<usize> = (0..self.units.len()).collect();
        let Some(mut envelope) = self.cache.restore() else {
            return all;
        };
        let strategy = self.cache.strategy();

        let mut pending = Vec::new();
        for (index, entry) in self.units.iter_mut().enumerate() {
            let unit = &mut entry.unit;
            if !strategy.covers(unit.cache_scope()) {
                pending.push(index);
                continue;
            }
            // Warm only stores units with findings.
            let data = envelope.take(unit.id()).unwrap_or_default();
            match unit.restore_from_cache(data) {
                Ok(()) => debug!("Restored {} findings for {}", unit.item_count(), unit.id()),
                Err(e) => {
                    warn!("Cached data for {} is unusable, rescanning: {}", unit.id(), e);
                    unit.reset();
                    pending.push(index);
                }
            }
        }
        pending
    }

    fn scan(&mut self, pending: &[usize]) -> Result<()> {
        let Self {
            config,
            enumerator,
            units,
            ..
        } = self;

        let mut scanned: HashSet<ClassName> = HashSet::new();
        let app_path = config.app_path();
        match enumerator.resolve_location(&app_path) {
            Some(location) => {
                for class in enumerator.scan(&location) {
                    for &index in pending {
                        units[index].unit.discover(&location, &class)?;
                    }
                    scanned.insert(class.name.clone());
                }
            }
            None => info!("Application directory {} not found; nothing to scan", app_path.display()),
        }

        for name in &config.opt_in_classes {
            if scanned.contains(name) {
                continue;
            }
            let class = match enumerator.resolve_class(name) {
                Ok(class) => class,
                Err(e) => {
                    if config.debug {
                        debug!("Skipping opt-in class {}: {}", name, e);
                    }
                    continue;
                }
            };
            let location = enumerator.location_of(&class);
            for &index in pending {
                units[index].unit.discover(&location, &class)?;
            }
            scanned.insert(class.name.clone());
        }
        Ok(())
    }

    /// Discover if needed, then apply the phase's units. Repeat calls are no-ops.
    pub fn run_phase(&mut self, phase: Phase, host: &mut dyn HostRegistry) -> Result<()> {
        if self.has_run(phase) {
            debug!("Phase {} already ran", phase);
            return Ok(());
        }
        self.discover()?;

        for entry in self.units.iter_mut().filter(|entry| entry.phase == phase) {
            entry.unit.apply(host);
            debug!(
                "Applied {} ({} findings) in phase {}",
                entry.unit.id(),
                entry.unit.item_count(),
                phase
            );
        }
        self.ran.insert(phase);
        Ok(())
    }

    pub fn run_early(&mut self, host: &mut dyn HostRegistry) -> Result<()> {
        self.run_phase(Phase::Early, host)
    }

    pub fn run_main(&mut self, host: &mut dyn HostRegistry) -> Result<()> {
        self.run_phase(Phase::Main, host)
    }

    pub fn run_late(&mut self, host: &mut dyn HostRegistry) -> Result<()> {
        self.run_phase(Phase::Late, host)
    }

    /// Clear the cache, discover from scratch, run every phase against `host`
    /// and store what the strategy covers.
    pub fn warm(&mut self, host: &mut dyn HostRegistry) -> Result<WarmReport> {
        self.cache.clear()?;
        for entry in &mut self.units {
            entry.unit.reset();
        }
        self.discovered = false;
        self.ran.clear();

        for phase in Phase::ALL {
            self.run_phase(phase, host)?;
        }

        let strategy = self.cache.strategy();
        let stored_units = if strategy.is_none() {
            info!("Cache strategy is none; nothing stored");
            None
        } else {
            let envelope = self.envelope(strategy)?;
            self.cache.store(&envelope)?;
            Some(envelope.len())
        };

        Ok(WarmReport {
            strategy,
            units: self.unit_summaries(),
            stored_units,
        })
    }

    fn envelope(&self, strategy: CacheStrategy) -> Result<CacheEnvelope> {
        let mut envelope = CacheEnvelope::new();
        for entry in &self.units {
            let unit = &entry.unit;
            if strategy.covers(unit.cache_scope()) && unit.has_items() {
                let data: UnitCache = unit.cacheable_data()?;
                envelope.insert(unit.id(), data);
            }
        }
        Ok(envelope)
    }
}
