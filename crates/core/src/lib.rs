pub mod cache;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod project;
pub mod runtime;
pub mod units;

pub use cache::DiscoveryCache;
pub use config::DiscoveryConfig;
pub use error::{Result, TrellisError};
pub use host::{HostCall, RecordingHost};
pub use project::{ClassCatalog, ClassEnumerator, ModuleMap};
pub use runtime::{DiscoveryRunner, WarmReport};
