//! Engine adapter implementations.
//!
//! Each module provides a struct implementing [`crate::engine::EngineAdapter`]
//! that speaks one upstream provider's wire format.

pub mod alexandria;
pub mod bing;
pub mod duckduckgo;

pub use alexandria::AlexandriaEngine;
pub use bing::BingEngine;
pub use duckduckgo::DuckDuckGoEngine;
