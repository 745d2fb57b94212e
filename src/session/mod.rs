// Session module - the application-state container and its persistence
// adapters (local cache file, remote profile row)

pub mod cache;
pub mod store;

pub use cache::{FileSessionCache, SessionCache, SessionCacheError};
pub use store::{ProfileSync, SessionStore};
