//! Payment endpoints

use crate::client::HomeCookClient;
use crate::error::ApiResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request for a payment intent
///
/// The backend binds these with PascalCase names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePaymentIntent {
    /// Order total in pounds
    #[serde(rename = "Amount", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Portions ordered
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    /// Listing being bought
    #[serde(rename = "FoodId")]
    pub food_id: i64,
}

/// A created payment intent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Secret the payment element confirms against
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Payments API interface
#[derive(Clone)]
pub struct PaymentsApi {
    client: HomeCookClient,
}

impl PaymentsApi {
    /// Create a new payments API interface
    pub(crate) fn new(client: HomeCookClient) -> Self {
        Self { client }
    }

    /// Create a payment intent for an order
    ///
    /// POST /CreatePaymentIntent
    pub async fn create_intent(&self, request: &CreatePaymentIntent) -> ApiResult<PaymentIntent> {
        self.client.post("CreatePaymentIntent", request).await
    }
}
