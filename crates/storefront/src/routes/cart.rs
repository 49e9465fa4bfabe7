//! Cart and checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use market_eaze_core::{
    CartError, CartItem, Catalog, MarketError, ProductId, Receipt, Role, format_money, market,
};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Visitor;
use crate::routes::market::{ProductActionForm, market_path};
use crate::routes::{MessageKind, MessageQuery, PageContext, redirect_with, report};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub name: String,
    pub vendor: String,
    pub image_url: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl TryFrom<&CartItem> for CartLineView {
    type Error = CartError;

    fn try_from(item: &CartItem) -> std::result::Result<Self, CartError> {
        Ok(Self {
            name: item.name.clone(),
            vendor: item.vendor_id.to_string(),
            image_url: item.image_url.clone(),
            price: item.price.to_string(),
            quantity: item.quantity,
            line_total: format_money(item.subtotal()?),
        })
    }
}

fn line_views(items: &[CartItem]) -> std::result::Result<Vec<CartLineView>, MarketError> {
    Ok(items
        .iter()
        .map(CartLineView::try_from)
        .collect::<std::result::Result<_, _>>()?)
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub page: PageContext,
    pub lines: Vec<CartLineView>,
    pub total: String,
}

/// Receipt page template, rendered straight from checkout.
#[derive(Template, WebTemplate)]
#[template(path = "cart/receipt.html")]
pub struct ReceiptTemplate {
    pub page: PageContext,
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub total: String,
}

impl ReceiptTemplate {
    fn new(page: PageContext, receipt: &Receipt) -> std::result::Result<Self, MarketError> {
        Ok(Self {
            page,
            lines: line_views(&receipt.items)?,
            item_count: receipt.item_count(),
            total: format_money(receipt.total),
        })
    }
}

/// Await the session save for a unit just taken from stock.
///
/// If the save fails the unit is in no cart, so it goes back on the shelf.
async fn keep_or_restock(
    catalog: &mut Catalog,
    product_id: &ProductId,
    save: impl Future<Output = Result<()>>,
) -> Result<()> {
    let Err(err) = save.await else {
        return Ok(());
    };
    if let Err(restock) = catalog.restock(product_id, 1) {
        tracing::error!(%product_id, error = %restock, "could not return unit to stock");
    }
    Err(err)
}

/// Display the cart.
#[instrument(skip(visitor, messages))]
pub async fn show(visitor: Visitor, Query(messages): Query<MessageQuery>) -> Result<Response> {
    visitor.require(Role::Buyer)?;

    let cart = visitor.market.cart();
    let total = cart.compute_total().map_err(MarketError::from)?;
    Ok(CartTemplate {
        lines: line_views(cart.items())?,
        total: format_money(total),
        page: PageContext::new(&visitor.market, messages),
    }
    .into_response())
}

/// Add one unit of a product to the cart.
#[instrument(skip(state, visitor, form), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<ProductActionForm>,
) -> Result<Response> {
    let back = market_path(&form.q);
    let product_id = ProductId::new(form.product_id);

    // Hold the catalog until the cart is saved.
    let name = {
        let mut catalog = state.catalog_mut().await;
        let name = match market::buyer_add_to_cart(&mut catalog, &mut visitor.market, &product_id)
        {
            Ok(item) => item.name.clone(),
            Err(e) => return report(&back, e),
        };
        keep_or_restock(&mut catalog, &product_id, visitor.save()).await?;
        name
    };

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));
    Ok(redirect_with(
        &back,
        MessageKind::Success,
        &format!("Added {name} to your cart."),
    )
    .into_response())
}

/// Check out the cart and show the receipt.
#[instrument(skip(visitor))]
pub async fn checkout(mut visitor: Visitor) -> Result<Response> {
    let Some(receipt) = market::checkout(&mut visitor.market)? else {
        return Ok(
            redirect_with("/cart", MessageKind::Info, "Your cart is already empty.")
                .into_response(),
        );
    };
    visitor.save().await?;
    add_breadcrumb("cart", "Checked out", None);

    let page = PageContext::new(
        &visitor.market,
        MessageQuery {
            success: Some("Thank you for your purchase!".to_string()),
            ..MessageQuery::default()
        },
    );
    Ok(ReceiptTemplate::new(page, &receipt)?.into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use market_eaze_core::Session;

    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_receipt_lines_and_total() {
        let mut catalog = Catalog::seeded();
        let mut session = Session::new();
        market::login(&mut session, Role::Buyer, "").unwrap();
        let tomato = ProductId::new("tomato-vendora");
        market::buyer_add_to_cart(&mut catalog, &mut session, &tomato).unwrap();
        market::buyer_add_to_cart(&mut catalog, &mut session, &tomato).unwrap();

        let receipt = market::checkout(&mut session).unwrap().unwrap();
        let template = ReceiptTemplate::new(PageContext::default(), &receipt).unwrap();
        assert_eq!(template.lines.len(), 1);
        assert_eq!(template.item_count, 2);
        assert_eq!(template.lines[0].line_total, "$5.00");
        assert_eq!(template.total, "$5.00");
    }

    #[tokio::test]
    async fn test_failed_save_returns_unit_to_stock() {
        let mut catalog = Catalog::seeded();
        let mut session = Session::new();
        market::login(&mut session, Role::Buyer, "").unwrap();
        let lettuce = ProductId::new("lettuce-vendora");
        market::buyer_add_to_cart(&mut catalog, &mut session, &lettuce).unwrap();
        assert_eq!(catalog.find(&lettuce).unwrap().quantity, 39);

        let result = keep_or_restock(&mut catalog, &lettuce, async {
            Err(AppError::Internal("session store unavailable".to_string()))
        })
        .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(catalog.find(&lettuce).unwrap().quantity, 40);
    }

    #[tokio::test]
    async fn test_successful_save_keeps_unit_taken() {
        let mut catalog = Catalog::seeded();
        let lettuce = ProductId::new("lettuce-vendora");
        catalog.decrement_stock(&lettuce, 1).unwrap();

        keep_or_restock(&mut catalog, &lettuce, async { Ok(()) })
            .await
            .unwrap();
        assert_eq!(catalog.find(&lettuce).unwrap().quantity, 39);
    }
}
