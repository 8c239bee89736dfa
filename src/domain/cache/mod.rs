//! Fuzzy response caching

pub mod response_cache;
pub mod similarity;

pub use response_cache::{CacheConfig, CacheStats, ResponseCache};
pub use similarity::{key_for, normalize, similarity_ratio};
