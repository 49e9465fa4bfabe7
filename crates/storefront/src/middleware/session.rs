//! Session middleware configuration.
//!
//! Sets up in-memory sessions with signed cookies using tower-sessions.

use secrecy::ExposeSecret;
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer, cookie::Key, service::SignedCookie,
};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "me_session";

/// Session expiry time in seconds (1 day of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Session layer type used by the storefront.
pub type StorefrontSessionLayer = SessionManagerLayer<MemoryStore, SignedCookie>;

/// Create the session layer with an in-memory store.
///
/// Sessions live as long as the process; a restart logs everyone out and
/// empties every cart.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> StorefrontSessionLayer {
    let store = MemoryStore::default();

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config))
}

/// Cookie signing key from the configured secret, or a random one.
fn signing_key(config: &StorefrontConfig) -> Key {
    let Some(secret) = &config.session_secret else {
        tracing::warn!("MARKET_SESSION_SECRET not set; using a random session signing key");
        return Key::generate();
    };

    match Key::try_from(secret.expose_secret().as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            tracing::error!(error = %e, "Invalid session secret; using a random signing key");
            Key::generate()
        }
    }
}
