mod discovery_cache;

pub use discovery_cache::{CACHE_VERSION, CacheFile, DATA_FILE, DiscoveryCache, STRATEGY_FILE};
