//! Discovery runner: scan once, apply each phase once.

mod runner;

pub use runner::{DiscoveryRunner, DiscoveryRunnerBuilder, WarmReport};
