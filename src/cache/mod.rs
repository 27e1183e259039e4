mod cache;

pub use cache::{CacheKey, CorridorCache};
