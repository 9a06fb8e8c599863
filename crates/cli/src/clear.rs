use std::path::Path;
use tracing::info;

pub fn run(project: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let cache = trellis_runtime::open_cache(project)?;
    info!("Clearing discovery cache at {}", cache.cache_dir().display());

    if cache.clear()? {
        println!("Discovery cache cleared: {}", cache.cache_dir().display());
    } else {
        println!("No discovery cache at {}", cache.cache_dir().display());
    }
    Ok(())
}
