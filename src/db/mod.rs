//! Local persistence: the cookie jar and the key/value store.

pub mod cookies;
pub mod local_store;

pub use cookies::{CookieSnapshot, SessionCookies};
pub use local_store::{CachedUserStore, LocalStore};

/// Local storage key prefixes.
pub mod keys {
    /// `lastSync_<userId>` holds the calendar day of the last successful sync.
    pub const LAST_SYNC_PREFIX: &str = "lastSync_";
}
