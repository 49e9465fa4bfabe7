//! Visitor extractor.
//!
//! Loads the visitor's [`market_eaze_core::Session`] out of the tower session
//! so handlers can pass it explicitly into market commands.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use market_eaze_core::{CurrentUser, Role, Session as MarketSession};

use crate::error::{AppError, Result};
use crate::models::session_keys;

/// The current visitor: their tower session handle plus the market session
/// loaded from it.
///
/// Mutations to `market` are only kept after [`Visitor::save`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut visitor: Visitor) -> Result<impl IntoResponse> {
///     market::logout(&mut visitor.market);
///     visitor.save().await?;
///     Ok(Redirect::to("/login"))
/// }
/// ```
pub struct Visitor {
    session: Session,
    pub market: MarketSession,
}

impl Visitor {
    /// Persist `market` back into the session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self) -> Result<()> {
        self.session
            .insert(session_keys::MARKET_SESSION, &self.market)
            .await?;
        Ok(())
    }

    /// Issue a fresh session id, e.g. after login.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn cycle_id(&self) -> Result<()> {
        self.session.cycle_id().await?;
        Ok(())
    }

    /// Drop the whole session, cookie included.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn flush(self) -> Result<()> {
        self.session.flush().await?;
        Ok(())
    }

    /// The logged-in user if they hold `role`.
    ///
    /// # Errors
    ///
    /// Rejects logged-out visitors and visitors of the other role; the
    /// resulting [`AppError`] renders as a redirect.
    pub fn require(&self, role: Role) -> Result<&CurrentUser> {
        Ok(self.market.require(role)?)
    }
}

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;

        let market = session
            .get::<MarketSession>(session_keys::MARKET_SESSION)
            .await?
            .unwrap_or_default();

        Ok(Self { session, market })
    }
}
