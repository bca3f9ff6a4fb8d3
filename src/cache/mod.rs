//! Incremental per-date caches
//!
//! Every cache is a [`node::CacheTree`] over one [`node::CacheLayer`].
//! Buckets are built on first query and recomputed only after they have
//! been invalidated.

pub mod eras;
pub mod events;
pub mod moons;
pub mod node;
pub mod seasons;
pub mod weather;

pub use eras::EraCache;
pub use events::{CalEvent, EventCache, EventDate, EventStore};
pub use moons::MoonCache;
pub use node::{Bucket, CacheLayer, CacheNode, CacheStats, CacheTree};
pub use seasons::SeasonCache;
pub use weather::WeatherCache;
