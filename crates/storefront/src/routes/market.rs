//! Buyer market route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use market_eaze_core::{Product, ProductId, Role, market};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Visitor;
use crate::routes::{MessageKind, MessageQuery, PageContext, redirect_with, report};
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Form posted by the product card buttons.
///
/// Carries the current search so the buyer lands back on the same results.
#[derive(Debug, Default, Deserialize)]
pub struct ProductActionForm {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub q: String,
}

/// Product card display data.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub vendor: String,
    pub image_url: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            quantity: product.quantity,
            vendor: product.vendor_id.to_string(),
            image_url: product.image_url.clone(),
            in_stock: product.in_stock(),
        }
    }
}

/// Market page template.
#[derive(Template, WebTemplate)]
#[template(path = "market/index.html")]
pub struct MarketTemplate {
    pub page: PageContext,
    pub query: String,
    pub products: Vec<ProductView>,
    pub empty_message: String,
}

/// Path back to the market with the search term kept.
pub(crate) fn market_path(q: &str) -> String {
    let q = q.trim();
    if q.is_empty() {
        "/market".to_string()
    } else {
        format!("/market?q={}", urlencoding::encode(q))
    }
}

/// Display the catalog, filtered by `q`.
#[instrument(skip(state, visitor, messages))]
pub async fn index(
    State(state): State<AppState>,
    visitor: Visitor,
    Query(messages): Query<MessageQuery>,
    Query(search): Query<SearchQuery>,
) -> Result<Response> {
    visitor.require(Role::Buyer)?;

    let products: Vec<ProductView> = {
        let catalog = state.catalog().await;
        market::browse(&catalog, &search.q)
            .iter()
            .map(ProductView::from)
            .collect()
    };

    let query = search.q.trim().to_string();
    let empty_message = if query.is_empty() {
        "No products are listed yet.".to_string()
    } else {
        format!("No products match \"{query}\".")
    };

    Ok(MarketTemplate {
        page: PageContext::new(&visitor.market, messages),
        query,
        products,
        empty_message,
    }
    .into_response())
}

/// Buy one unit of a product straight away.
#[instrument(skip(state, visitor, form), fields(product_id = %id))]
pub async fn buy_now(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(id): Path<String>,
    Form(form): Form<ProductActionForm>,
) -> Result<Response> {
    let back = market_path(&form.q);
    let product_id = ProductId::new(id);

    let bought = {
        let mut catalog = state.catalog_mut().await;
        market::buy_now(&mut catalog, &visitor.market, &product_id)
    };

    match bought {
        Ok(product) => {
            add_breadcrumb("market", "Bought now", Some(&[("product_id", product_id.as_str())]));
            Ok(redirect_with(
                &back,
                MessageKind::Success,
                &format!("You bought 1 {}!", product.name),
            )
            .into_response())
        }
        Err(e) => report(&back, e),
    }
}
