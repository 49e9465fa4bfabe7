//! Login and logout route handlers.
//!
//! There are no passwords: a visitor picks a role, and vendors name the stall
//! their products are listed under.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use market_eaze_core::{MarketError, Role, ValidationError, market};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::Visitor;
use crate::routes::{MessageKind, MessageQuery, PageContext, home_path, redirect_with, report};

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub role: String,
    #[serde(default)]
    pub username: String,
}

/// Role option in the login form.
pub struct RoleOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub roles: Vec<RoleOption>,
}

/// Send the visitor to their role's landing page.
pub async fn home(visitor: Visitor) -> Redirect {
    Redirect::to(home_path(visitor.market.role()))
}

/// Display the login page.
pub async fn login_page(visitor: Visitor, Query(query): Query<MessageQuery>) -> Response {
    if visitor.market.logged_in() {
        return Redirect::to(home_path(visitor.market.role())).into_response();
    }

    LoginTemplate {
        page: PageContext::new(&visitor.market, query),
        roles: Role::ALL
            .iter()
            .map(|role| RoleOption {
                value: role.label(),
                selected: *role == Role::default(),
            })
            .collect(),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(visitor, form), fields(role = %form.role))]
pub async fn login(mut visitor: Visitor, Form(form): Form<LoginForm>) -> Result<Response> {
    let Ok(role) = form.role.parse::<Role>() else {
        return report(
            "/login",
            MarketError::from(ValidationError::InvalidRole(form.role)),
        );
    };

    match market::login(&mut visitor.market, role, &form.username) {
        Ok(user) => set_sentry_user(&user.username),
        Err(e) => return report("/login", e),
    }

    // New identity, new session id.
    visitor.cycle_id().await?;
    visitor.save().await?;

    Ok(Redirect::to(home_path(Some(role))).into_response())
}

/// Handle logout.
///
/// Drops the session along with its cart. Units in the cart are not
/// returned to stock.
#[instrument(skip(visitor))]
pub async fn logout(mut visitor: Visitor) -> Result<Response> {
    market::logout(&mut visitor.market);
    clear_sentry_user();
    visitor.flush().await?;

    Ok(redirect_with("/login", MessageKind::Info, "You have been logged out.").into_response())
}
