pub mod class;
pub mod location;
pub mod marker;
pub mod phase;
pub mod strategy;

pub use class::*;
pub use location::*;
pub use marker::*;
pub use phase::*;
pub use strategy::*;
