//! Checkout command
//!
//! Runs the detail-to-checkout flow and prints what the payment element
//! would be mounted and confirmed with.

use crate::context::AppContext;
use crate::output::{print_json, Status};
use crate::OutputFormat;
use anyhow::{bail, Result};
use homecook_app::checkout::CheckoutSession;
use homecook_app::format::format_price;
use homecook_app::listing::{FoodDetailView, ViewState};
use serde_json::json;

/// Prepare payment for `quantity` portions of listing `food_id`
pub async fn run(ctx: &AppContext, food_id: i64, quantity: &str, format: OutputFormat) -> Result<()> {
    ctx.require_session().await?;

    let view = FoodDetailView::new(ctx.client.clone(), ctx.notifier.clone());
    let ViewState::Ready(mut detail) = view.load(food_id).await else {
        bail!("Could not load listing {food_id}");
    };
    if detail.sold_out() {
        bail!("{} is sold out", detail.food().name);
    }

    detail.quantity_mut().set_input(quantity);
    if let Some(error) = detail.quantity().error() {
        bail!("{error}");
    }

    let order = detail.order(ctx.history.as_ref())?;
    let checkout = CheckoutSession::start(
        order,
        ctx.client.clone(),
        ctx.notifier.clone(),
        ctx.config.schema.payments.clone(),
    )
    .await;

    if !checkout.can_place_order() {
        bail!("Payment could not be prepared");
    }
    let confirm = checkout.confirm_params()?;
    let options = checkout.payment_options();

    if format == OutputFormat::Json {
        return print_json(&json!({
            "order": checkout.order(),
            "total": checkout.total(),
            "paymentOptions": options,
            "confirmParams": confirm,
        }));
    }

    let order = checkout.order();
    Status::header("Checkout");
    Status::field("Food", &order.name);
    Status::field("Quantity", &order.quantity.to_string());
    Status::field("Unit price", &format_price(order.unit_price));
    if let Some(total) = checkout.total() {
        Status::field("Total", &format_price(total));
    }
    if let Some(options) = options {
        Status::field(
            "Charge",
            &format!("{} {} ({})", options.amount, options.currency, options.mode),
        );
    }
    Status::field("Return URL", &confirm.return_url);
    println!();
    Status::success("Payment intent ready");
    Ok(())
}
