//! Checkout quantity and payment reconciliation
//!
//! The buyer picks a quantity in `[1, quantity_available]`. Stepping
//! clamps at the bounds; typed input is kept as entered and flagged
//! instead. Every accepted quantity asks the backend for a payment intent
//! sized to the new total, and the first client secret returned is the
//! one the payment element confirms against.

use crate::backend::MarketplaceApi;
use crate::error::{AppError, AppResult};
use crate::notify::{Notification, Notifier};
use homecook_api_client::endpoints::CreatePaymentIntent;
use homecook_core::config::PaymentsSection;
use homecook_core::validation::Validator;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

const MISSING: &str = "Quantity is missing.";
const NOT_INTEGER: &str = "Please add an integer.";
const TOO_SMALL: &str = "Quantity must be at least 1.";

/// Price of `quantity` portions at `unit_price`, to the penny
#[must_use]
pub fn order_total(unit_price: Decimal, quantity: u32) -> Decimal {
    (unit_price * Decimal::from(quantity))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Amount in minor units (pence) as the payment processor expects it
#[must_use]
pub fn minor_units(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Bounded quantity input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityField {
    value: Option<i64>,
    max: u32,
    error: Option<String>,
}

impl QuantityField {
    /// Field starting at 1 with `max` portions available
    #[must_use]
    pub fn new(max: u32) -> Self {
        Self::with_value(1, max)
    }

    /// Field starting at `value`
    #[must_use]
    pub fn with_value(value: u32, max: u32) -> Self {
        let mut field = Self {
            value: Some(i64::from(value)),
            max,
            error: None,
        };
        field.validate();
        field
    }

    /// Current value, if one parses
    #[must_use]
    pub fn value(&self) -> Option<i64> {
        self.value
    }

    /// Upper bound
    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Message shown under the field
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the value is inside `[1, max]`
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid_quantity().is_some()
    }

    /// The value as an orderable quantity
    #[must_use]
    pub fn valid_quantity(&self) -> Option<u32> {
        self.value
            .filter(|v| *v >= 1 && *v <= i64::from(self.max))
            .and_then(|v| u32::try_from(v).ok())
    }

    /// Step up by one, clamping at `max`
    ///
    /// Returns whether the value moved.
    pub fn increment(&mut self) -> bool {
        let next = self.value.unwrap_or(0) + 1;
        let max = i64::from(self.max);
        if next > max {
            let moved = self.value != Some(max.max(1));
            self.value = Some(max.max(1));
            self.error = Some(too_large(self.max));
            return moved;
        }
        self.step_to(next)
    }

    /// Step down by one, clamping at 1
    ///
    /// Returns whether the value moved.
    pub fn decrement(&mut self) -> bool {
        let next = self.value.unwrap_or(2) - 1;
        if next < 1 {
            let moved = self.value != Some(1);
            self.value = Some(1);
            self.error = Some(TOO_SMALL.to_string());
            return moved;
        }
        self.step_to(next)
    }

    /// Take typed input as-is, flagging anything out of range
    pub fn set_input(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            self.value = None;
            self.error = Some(MISSING.to_string());
            return;
        }

        match input.parse::<i64>() {
            Ok(v) => {
                self.value = Some(v);
                self.validate();
            }
            Err(_) => {
                self.value = None;
                self.error = Some(NOT_INTEGER.to_string());
            }
        }
    }

    /// Order total for the current value, when it is valid
    #[must_use]
    pub fn total(&self, unit_price: Decimal) -> Option<Decimal> {
        self.valid_quantity().map(|q| order_total(unit_price, q))
    }

    fn step_to(&mut self, next: i64) -> bool {
        let moved = self.value != Some(next);
        self.value = Some(next);
        self.validate();
        moved
    }

    fn validate(&mut self) {
        let Some(value) = self.value else {
            self.error = Some(MISSING.to_string());
            return;
        };
        self.error = Validator::new()
            .min("quantity", value, 1, TOO_SMALL)
            .max("quantity", value, i64::from(self.max), &too_large(self.max))
            .validate()
            .message_for("quantity")
            .map(str::to_string);
    }
}

fn too_large(max: u32) -> String {
    format!("Quantity must be less than or equal to {max}.")
}

/// What the buyer wants, carried from the detail view to checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderIntent {
    /// Listing id
    pub food_id: i64,
    /// Listing name
    pub name: String,
    /// Requested portions
    pub quantity: u32,
    /// Price per portion
    pub unit_price: Decimal,
    /// Portions the listing had when ordered
    pub quantity_available: u32,
}

impl OrderIntent {
    /// Total for the requested quantity
    #[must_use]
    pub fn total(&self) -> Decimal {
        order_total(self.unit_price, self.quantity)
    }
}

/// Options the payment element is mounted with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOptions {
    /// Always `payment`
    pub mode: &'static str,
    /// Lowercase ISO currency
    pub currency: String,
    /// Amount in minor units
    pub amount: i64,
}

/// Parameters for confirming the payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmParams {
    /// Secret of the payment intent
    pub client_secret: String,
    /// Where the processor sends the buyer afterwards
    pub return_url: String,
}

/// A checkout in progress
pub struct CheckoutSession {
    api: Arc<dyn MarketplaceApi>,
    notifier: Arc<dyn Notifier>,
    payments: PaymentsSection,
    order: OrderIntent,
    quantity: QuantityField,
    client_secret: Option<String>,
}

impl CheckoutSession {
    /// Open checkout for `order` and request the first payment intent
    pub async fn start(
        order: OrderIntent,
        api: Arc<dyn MarketplaceApi>,
        notifier: Arc<dyn Notifier>,
        payments: PaymentsSection,
    ) -> Self {
        let quantity = QuantityField::with_value(order.quantity, order.quantity_available);
        let mut session = Self {
            api,
            notifier,
            payments,
            order,
            quantity,
            client_secret: None,
        };
        session.request_intent().await;
        session
    }

    /// Order being paid for, with the current quantity
    #[must_use]
    pub fn order(&self) -> &OrderIntent {
        &self.order
    }

    /// Quantity input
    #[must_use]
    pub fn quantity(&self) -> &QuantityField {
        &self.quantity
    }

    /// Client secret kept for confirmation
    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// Step the quantity up
    pub async fn increment(&mut self) {
        if self.quantity.increment() {
            self.quantity_changed().await;
        }
    }

    /// Step the quantity down
    pub async fn decrement(&mut self) {
        if self.quantity.decrement() {
            self.quantity_changed().await;
        }
    }

    /// Apply typed quantity input
    pub async fn set_quantity(&mut self, input: &str) {
        let before = self.quantity.value();
        self.quantity.set_input(input);
        if self.quantity.value() != before {
            self.quantity_changed().await;
        }
    }

    /// Total for the current quantity, when it is valid
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.quantity.total(self.order.unit_price)
    }

    /// Whether the order can be placed right now
    #[must_use]
    pub fn can_place_order(&self) -> bool {
        self.quantity.is_valid() && self.client_secret.is_some()
    }

    /// Options for mounting the payment element
    #[must_use]
    pub fn payment_options(&self) -> Option<PaymentOptions> {
        self.total().map(|total| PaymentOptions {
            mode: "payment",
            currency: self.payments.currency.clone(),
            amount: minor_units(total),
        })
    }

    /// Parameters for confirming the payment
    pub fn confirm_params(&self) -> AppResult<ConfirmParams> {
        if !self.quantity.is_valid() {
            return Err(AppError::NotReady("Quantity is not valid"));
        }
        let client_secret = self
            .client_secret
            .clone()
            .ok_or(AppError::NotReady("Payment is not ready yet"))?;

        Ok(ConfirmParams {
            client_secret,
            return_url: self.payments.success_url.clone(),
        })
    }

    async fn quantity_changed(&mut self) {
        if let Some(q) = self.quantity.valid_quantity() {
            self.order.quantity = q;
            self.request_intent().await;
        }
    }

    async fn request_intent(&mut self) {
        let Some(quantity) = self.quantity.valid_quantity() else {
            return;
        };

        let request = CreatePaymentIntent {
            amount: order_total(self.order.unit_price, quantity),
            quantity,
            food_id: self.order.food_id,
        };

        match self.api.create_payment_intent(&request).await {
            Ok(intent) => {
                debug!(food = self.order.food_id, quantity, "Payment intent created");
                if self.client_secret.is_none() {
                    self.client_secret = intent.client_secret;
                }
            }
            Err(e) => {
                warn!(error = %e, "Payment intent failed");
                self.notifier.notify(Notification::error(
                    "paymentIntent-fail-toast",
                    "Failed to create payment intent.",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, Harness};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn price(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_increment_clamps_at_available() {
        let mut field = QuantityField::new(5);
        for _ in 0..4 {
            assert!(field.increment());
        }
        assert_eq!(field.value(), Some(5));
        assert!(field.error().is_none());

        assert!(!field.increment());
        assert_eq!(field.value(), Some(5));
        assert_eq!(field.error(), Some("Quantity must be less than or equal to 5."));
        assert!(field.is_valid());
    }

    #[test]
    fn test_decrement_clamps_at_one() {
        let mut field = QuantityField::with_value(2, 5);
        assert!(field.decrement());
        assert!(!field.decrement());
        assert_eq!(field.value(), Some(1));
        assert_eq!(field.error(), Some("Quantity must be at least 1."));

        assert!(field.increment());
        assert!(field.error().is_none());
    }

    #[test]
    fn test_typed_input_is_not_clamped() {
        let mut field = QuantityField::new(5);

        field.set_input("9");
        assert_eq!(field.value(), Some(9));
        assert!(!field.is_valid());
        assert_eq!(field.error(), Some("Quantity must be less than or equal to 5."));

        field.set_input("0");
        assert_eq!(field.error(), Some("Quantity must be at least 1."));

        field.set_input("");
        assert_eq!(field.error(), Some("Quantity is missing."));

        field.set_input("2.5");
        assert_eq!(field.error(), Some("Please add an integer."));
        assert!(field.total(price("3")).is_none());

        field.set_input(" 3 ");
        assert!(field.is_valid());
        assert_eq!(field.total(price("2.10")), Some(price("6.30")));
    }

    #[test]
    fn test_sold_out_is_never_valid() {
        let mut field = QuantityField::new(0);
        assert!(!field.is_valid());
        field.increment();
        assert!(!field.is_valid());
    }

    #[test]
    fn test_totals_are_exact() {
        assert_eq!(order_total(price("0.10"), 3), price("0.30"));
        assert_eq!(order_total(price("19.99"), 7), price("139.93"));
        assert_eq!(order_total(price("0.125"), 1), price("0.13"));
        assert_eq!(minor_units(price("139.93")), 13993);
    }

    proptest! {
        #[test]
        fn prop_out_of_range_is_invalid(max in 0u32..50, q in -100i64..200) {
            let mut field = QuantityField::new(max);
            field.set_input(&q.to_string());
            let in_range = q >= 1 && q <= i64::from(max);
            prop_assert_eq!(field.is_valid(), in_range);
            prop_assert_eq!(field.error().is_none(), in_range);
        }

        #[test]
        fn prop_total_is_price_times_quantity(pence in 1i64..1_000_000, q in 1u32..100) {
            let unit = Decimal::new(pence, 2);
            let total = order_total(unit, q);
            prop_assert_eq!(total, unit * Decimal::from(q));
            prop_assert_eq!(minor_units(total), pence * i64::from(q));
        }
    }

    fn order(quantity: u32, available: u32) -> OrderIntent {
        OrderIntent {
            food_id: 8,
            name: "Dish 8".into(),
            quantity,
            unit_price: price("4.50"),
            quantity_available: available,
        }
    }

    async fn start(h: &Harness, quantity: u32, available: u32) -> CheckoutSession {
        CheckoutSession::start(
            order(quantity, available),
            h.api.clone(),
            h.notifications.clone(),
            PaymentsSection::default(),
        )
        .await
    }

    #[tokio::test]
    async fn test_start_requests_intent() {
        let h = Harness::new(FakeApi::new());
        let checkout = start(&h, 2, 5).await;

        let intents = h.api.intents.lock().unwrap().clone();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].amount, price("9.00"));
        assert_eq!(intents[0].quantity, 2);
        assert_eq!(intents[0].food_id, 8);

        assert_eq!(checkout.client_secret(), Some("pi_secret_1"));
        assert!(checkout.can_place_order());
        assert_eq!(
            checkout.payment_options(),
            Some(PaymentOptions {
                mode: "payment",
                currency: "gbp".into(),
                amount: 900,
            })
        );
    }

    #[tokio::test]
    async fn test_quantity_changes_refresh_intent_but_keep_first_secret() {
        let h = Harness::new(FakeApi::new());
        let mut checkout = start(&h, 1, 3).await;

        checkout.increment().await;
        checkout.increment().await;
        checkout.increment().await;

        let intents = h.api.intents.lock().unwrap().clone();
        assert_eq!(intents.iter().map(|i| i.quantity).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(checkout.client_secret(), Some("pi_secret_1"));
        assert_eq!(checkout.order().quantity, 3);
        assert_eq!(checkout.total(), Some(price("13.50")));

        let params = checkout.confirm_params().unwrap();
        assert_eq!(params.return_url, "http://localhost:5173/payment-success");
    }

    #[tokio::test]
    async fn test_invalid_quantity_blocks_order() {
        let h = Harness::new(FakeApi::new());
        let mut checkout = start(&h, 1, 3).await;

        checkout.set_quantity("7").await;

        assert!(!checkout.can_place_order());
        assert!(checkout.payment_options().is_none());
        assert!(matches!(checkout.confirm_params(), Err(AppError::NotReady(_))));
        assert_eq!(h.api.calls_to("create_payment_intent"), 1);
    }

    #[tokio::test]
    async fn test_intent_failure_notifies_and_blocks() {
        let h = Harness::new(FakeApi::new());
        h.api.fail("create_payment_intent");

        let checkout = start(&h, 1, 3).await;

        assert!(checkout.client_secret().is_none());
        assert!(!checkout.can_place_order());
        assert_eq!(h.error_messages(), vec!["Failed to create payment intent."]);
    }
}
