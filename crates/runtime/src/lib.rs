use std::path::Path;
use std::sync::Arc;
use trellis_api::Phase;
use trellis_core::cache::DiscoveryCache;
use trellis_core::project::{ClassEnumerator, enumerator_from_config};
use trellis_core::units::{
    ContentTypeDiscovery, ExtensionDiscovery, HookDiscovery, RouteDiscovery,
    TemplateControllerDiscovery,
};
use trellis_core::{DiscoveryConfig, DiscoveryRunner, Result};
use trellis_plugin::Container;

/// Assembles a runner with every built-in discovery unit.
///
/// Early runs hooks, then content types, then rendering extensions, since
/// later registrations may rely on earlier ones being active. Routes belong to
/// the main phase and template controllers to the late one.
pub fn build_default_runner(
    config: DiscoveryConfig,
    enumerator: ClassEnumerator,
    container: Arc<Container>,
) -> Result<DiscoveryRunner> {
    let cache = DiscoveryCache::from_config(&config);
    DiscoveryRunner::builder(config, enumerator, cache)
        .with_unit(Phase::Early, HookDiscovery::new())
        .with_unit(Phase::Early, ContentTypeDiscovery::new())
        .with_unit(Phase::Early, ExtensionDiscovery::new())
        .with_unit(Phase::Main, RouteDiscovery::new())
        .with_unit(Phase::Late, TemplateControllerDiscovery::new(container))
        .build()
}

/// Load the project's configuration, module map and class catalog, then build
/// the default runner.
pub fn load_runner(project_root: &Path, container: Arc<Container>) -> Result<DiscoveryRunner> {
    let config = DiscoveryConfig::load(project_root)?;
    tracing::debug!(
        "Loaded configuration for {} (strategy {})",
        project_root.display(),
        config.cache_strategy
    );
    let enumerator = enumerator_from_config(&config)?;
    build_default_runner(config, enumerator, container)
}

/// Cache handle for a project, without scanning anything.
pub fn open_cache(project_root: &Path) -> Result<DiscoveryCache> {
    let config = DiscoveryConfig::load(project_root)?;
    Ok(DiscoveryCache::from_config(&config))
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(trellis_core::logging::init_logging(component, to_stderr))
}
