//! Food listing endpoints
//!
//! Maps to the backend's listing routes:
//! - List every listing
//! - List a single category
//! - Fetch one listing with its ingredients
//! - Free-text search
//! - Create a listing

use super::categories::Category;
use crate::client::HomeCookClient;
use crate::error::ApiResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A food listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    /// Listing id
    pub id: i64,
    /// Dish name
    pub name: String,
    /// Unit price in pounds
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Seller's description
    #[serde(default)]
    pub description: String,
    /// Photos, first one is the cover
    #[serde(default)]
    pub food_image_urls: Vec<String>,
    /// Portions still for sale
    #[serde(default)]
    pub quantity_available: u32,
    /// When the food can be collected (ISO 8601)
    #[serde(default)]
    pub available_date: Option<String>,
    /// Category the listing belongs to
    #[serde(default)]
    pub category: Option<Category>,
    /// Seller's user id
    #[serde(default)]
    pub seller_id: i64,
    /// Ingredients (only sent with the detail view)
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl Food {
    /// Cover image, if any
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.food_image_urls.first().map(String::as_str)
    }
}

/// Body of a new listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFood {
    /// Dish name
    pub name: String,
    /// Description
    pub description: String,
    /// Ingredients, blank entries already removed
    pub ingredients: Vec<String>,
    /// Unit price in pounds
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Portions for sale
    pub quantity_available: u32,
    /// Collection date and time, RFC 3339 in UTC
    pub available_date: String,
    /// Uploaded photo URLs
    pub food_image_urls: Vec<String>,
    /// Optional category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// Foods API interface
#[derive(Clone)]
pub struct FoodsApi {
    client: HomeCookClient,
}

impl FoodsApi {
    /// Create a new foods API interface
    pub(crate) fn new(client: HomeCookClient) -> Self {
        Self { client }
    }

    /// List every listing
    ///
    /// GET /food
    pub async fn list(&self) -> ApiResult<Vec<Food>> {
        self.client.get("food").await
    }

    /// List the listings of one category
    ///
    /// GET /food/food-category/{id}
    pub async fn by_category(&self, category_id: i64) -> ApiResult<Vec<Food>> {
        self.client
            .get(&format!("food/food-category/{category_id}"))
            .await
    }

    /// Fetch one listing
    ///
    /// GET /food/{id}
    pub async fn get(&self, id: i64) -> ApiResult<Food> {
        self.client.get(&format!("food/{id}")).await
    }

    /// Free-text search over listings
    ///
    /// GET /FoodSearch?foodSearchTerm=<term>
    pub async fn search(&self, term: &str) -> ApiResult<Vec<Food>> {
        self.client
            .get_with_query("FoodSearch", &[("foodSearchTerm", term)])
            .await
    }

    /// Create a listing
    ///
    /// POST /food
    pub async fn create(&self, food: &NewFood) -> ApiResult<Food> {
        let created: Food = self.client.post("food", food).await?;
        info!(id = created.id, name = %created.name, "Listing created");
        Ok(created)
    }
}
