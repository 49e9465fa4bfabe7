//! Vendor stall route handlers.
//!
//! A vendor manages only their own listings. Saving a product whose name they
//! already list updates it in place; anything else adds a new record.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use market_eaze_core::{ProductId, SaveOutcome, market, market::ProductInput};

use crate::error::Result;
use crate::filters;
use crate::middleware::Visitor;
use crate::routes::market::ProductView;
use crate::routes::{MessageKind, MessageQuery, PageContext, redirect_with, report};
use crate::state::AppState;

const STALL_PATH: &str = "/stall";

/// Product save form data.
///
/// Every field is text so bad input reaches validation instead of failing
/// deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub image_url: String,
}

impl From<ProductForm> for ProductInput {
    fn from(form: ProductForm) -> Self {
        Self {
            name: form.name,
            price: form.price,
            quantity: form.quantity,
            image_url: form.image_url,
        }
    }
}

/// Stall page template.
#[derive(Template, WebTemplate)]
#[template(path = "stall/index.html")]
pub struct StallTemplate {
    pub page: PageContext,
    pub products: Vec<ProductView>,
}

/// Display the vendor's listings and the save form.
#[instrument(skip(state, visitor, messages))]
pub async fn index(
    State(state): State<AppState>,
    visitor: Visitor,
    Query(messages): Query<MessageQuery>,
) -> Result<Response> {
    let listings = {
        let catalog = state.catalog().await;
        market::vendor_listings(&catalog, &visitor.market)?
    };

    Ok(StallTemplate {
        page: PageContext::new(&visitor.market, messages),
        products: listings.iter().map(ProductView::from).collect(),
    }
    .into_response())
}

/// Create or update one of the vendor's products.
#[instrument(skip(state, visitor, form), fields(name = %form.name))]
pub async fn save(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let input = ProductInput::from(form);

    let saved = {
        let mut catalog = state.catalog_mut().await;
        market::vendor_save_product(&mut catalog, &visitor.market, &input)
    };

    let message = match saved {
        Ok(SaveOutcome::Created(product)) => format!("Added {} to the market!", product.name),
        Ok(SaveOutcome::Updated(product)) => format!("Updated {}!", product.name),
        Err(e) => return report(STALL_PATH, e),
    };

    Ok(redirect_with(STALL_PATH, MessageKind::Success, &message).into_response())
}

/// Delete one of the vendor's products.
///
/// Ids the vendor does not own are ignored without a message.
#[instrument(skip(state, visitor), fields(product_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(id): Path<String>,
) -> Result<Response> {
    let product_id = ProductId::new(id);

    let removed = {
        let mut catalog = state.catalog_mut().await;
        market::vendor_delete_product(&mut catalog, &visitor.market, &product_id)?
    };

    Ok(match removed {
        Some(product) => redirect_with(
            STALL_PATH,
            MessageKind::Success,
            &format!("Removed {} from your listings.", product.name),
        )
        .into_response(),
        None => Redirect::to(STALL_PATH).into_response(),
    })
}

