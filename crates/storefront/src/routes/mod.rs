//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to login or the role's home page
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /login                  - Login page (role select + username)
//! POST /login                  - Login action
//! POST /logout                 - Logout action
//!
//! # Buyer
//! GET  /market?q=              - Browse/search the catalog
//! POST /market/{id}/buy        - Buy one unit now
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one unit to the cart
//! POST /checkout               - Check out, renders the receipt
//!
//! # Vendor
//! GET  /stall                  - Save form and own listings
//! POST /stall/products         - Create or update a product
//! POST /stall/products/{id}/delete - Delete own product
//! ```
//!
//! Form handlers follow post/redirect/get. Messages for the next page travel
//! in the `success`, `info` and `error` query parameters.

pub mod auth;
pub mod cart;
pub mod market;
pub mod stall;

use axum::{
    Router,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;

use market_eaze_core::{Role, Session as MarketSession};

use crate::error::{AppError, Result};
use crate::state::AppState;

// =============================================================================
// Messages
// =============================================================================

/// Query parameters carrying a message from the previous action.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub success: Option<String>,
    pub info: Option<String>,
    pub error: Option<String>,
}

/// Kind of message shown at the top of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Info,
    Error,
}

impl MessageKind {
    /// Query parameter and CSS class name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A message rendered by `partials/messages.html`.
#[derive(Debug, Clone)]
pub struct Message {
    pub kind: &'static str,
    pub text: String,
}

impl MessageQuery {
    /// Messages to render, in display order.
    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        [
            (MessageKind::Error, self.error),
            (MessageKind::Success, self.success),
            (MessageKind::Info, self.info),
        ]
        .into_iter()
        .filter_map(|(kind, text)| {
            text.filter(|t| !t.is_empty()).map(|text| Message {
                kind: kind.as_str(),
                text,
            })
        })
        .collect()
    }
}

/// Redirect to `path` with a message for the next page.
#[must_use]
pub fn redirect_with(path: &str, kind: MessageKind, text: &str) -> Redirect {
    let separator = if path.contains('?') { '&' } else { '?' };
    Redirect::to(&format!(
        "{path}{separator}{}={}",
        kind.as_str(),
        urlencoding::encode(text)
    ))
}

/// Turn a failed action into a response.
///
/// Mistakes the user can fix go back to `path` as an error message; anything
/// else propagates as an [`AppError`].
///
/// # Errors
///
/// Returns the error unchanged when it is not user-facing.
pub fn report(path: &str, err: impl Into<AppError>) -> Result<Response> {
    let err = err.into();
    if err.is_user_facing() {
        tracing::info!(error = %err, "action rejected");
        return Ok(redirect_with(path, MessageKind::Error, &err.to_string()).into_response());
    }
    Err(err)
}

// =============================================================================
// Page Context
// =============================================================================

/// Header and message data shared by every full page.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub logged_in: bool,
    pub is_buyer: bool,
    pub is_vendor: bool,
    pub username: String,
    pub role: String,
    pub cart_count: u32,
    pub messages: Vec<Message>,
}

impl PageContext {
    /// Build the page context for `session`.
    #[must_use]
    pub fn new(session: &MarketSession, query: MessageQuery) -> Self {
        let (username, role) = session
            .user()
            .map(|u| (u.username.clone(), u.role.to_string()))
            .unwrap_or_default();
        Self {
            logged_in: session.logged_in(),
            is_buyer: session.role() == Some(Role::Buyer),
            is_vendor: session.role() == Some(Role::Vendor),
            username,
            role,
            cart_count: session.cart().item_count(),
            messages: query.into_messages(),
        }
    }
}

/// Landing page for each role.
#[must_use]
pub const fn home_path(role: Option<Role>) -> &'static str {
    match role {
        None => "/login",
        Some(Role::Buyer) => "/market",
        Some(Role::Vendor) => "/stall",
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the buyer routes router.
pub fn buyer_routes() -> Router<AppState> {
    Router::new()
        .route("/market", get(market::index))
        .route("/market/{id}/buy", post(market::buy_now))
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/checkout", post(cart::checkout))
}

/// Create the vendor routes router.
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stall::index))
        .route("/products", post(stall::save))
        .route("/products/{id}/delete", post(stall::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::home))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(buyer_routes())
        .nest("/stall", vendor_routes())
}
