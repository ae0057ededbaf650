pub mod errors;
pub mod persistence;
pub mod remote;
pub mod store;
pub mod types;

pub use errors::CacheError;
pub use persistence::{load_cache, render_cache, save_cache};
pub use remote::DescriptionFetcher;
pub use store::RemoteMetadataCache;
pub use types::{CacheEntries, CacheEntry, default_cache_ttl};
