//! Session middleware configuration.
//!
//! The session only carries the visitor's shopper id; the stores themselves
//! are persisted through the key-value store, so an in-memory session store
//! is enough. A lost session starts a fresh, empty shopper.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "marche_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Session keys.
pub mod keys {
    /// Key for the visitor's shopper id.
    pub const SHOPPER_ID: &str = "shopper_id";
}

/// Create the session layer.
///
/// # Arguments
///
/// * `secure` - Whether to mark the cookie `Secure` (HTTPS deployments)
#[must_use]
pub fn create_session_layer(secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
