//! New listing form
//!
//! The form keeps raw user input and only turns it into a [`NewFood`]
//! once every field validates. Photos come from an [`ImageUploader`]
//! shared with the form.

use crate::backend::MarketplaceApi;
use crate::error::{AppError, AppResult};
use crate::images::ImageUploader;
use crate::navigation::{Navigator, Redirect, Route};
use crate::notify::{Notification, Notifier};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use homecook_api_client::endpoints::{Food, NewFood};
use homecook_core::validation::{ValidationResult, Validator};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

const INVALID_AVAILABILITY: &str = "Please select a valid future date and time.";

/// Raw input of the listing form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFoodForm {
    /// Dish name
    pub name: String,
    /// Description
    pub description: String,
    /// Ingredient tags
    pub ingredients: Vec<String>,
    /// Price as typed
    pub price: String,
    /// Portions as typed
    pub quantity: String,
    /// Collection day
    pub date: Option<NaiveDate>,
    /// Collection time, `HH:MM` or `HH:MM:SS`
    pub time: String,
    /// Optional category
    pub category_id: Option<i64>,
}

impl NewFoodForm {
    /// Add an ingredient tag; blank and repeated tags are ignored
    pub fn add_ingredient(&mut self, ingredient: &str) {
        let ingredient = ingredient.trim();
        if !ingredient.is_empty() && !self.ingredients.iter().any(|i| i == ingredient) {
            self.ingredients.push(ingredient.to_string());
        }
    }

    /// Remove an ingredient tag
    pub fn remove_ingredient(&mut self, ingredient: &str) {
        self.ingredients.retain(|i| i != ingredient.trim());
    }

    fn ingredient_list(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .map(String::from)
            .collect()
    }

    /// Collection date and time as entered, when both parse
    #[must_use]
    pub fn available_on(&self) -> Option<NaiveDateTime> {
        let date = self.date?;
        let time = parse_time(&self.time)?;
        Some(date.and_time(time))
    }

    /// Collection instant in UTC, reading the input in `tz`
    pub fn available_at<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        let local = self.available_on()?;
        tz.from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn parsed_price(&self) -> Option<Decimal> {
        Decimal::from_str(self.price.trim()).ok()
    }

    fn parsed_quantity(&self) -> Option<u32> {
        self.quantity.trim().parse().ok()
    }

    /// Validate against the local calendar
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        self.validate_on(Local::now().date_naive())
    }

    /// Validate, treating `today` as the current day
    #[must_use]
    pub fn validate_on(&self, today: NaiveDate) -> ValidationResult {
        let ingredients = self.ingredient_list();
        let availability_missing = self.date.is_none() || self.time.trim().is_empty();

        Validator::new()
            .required("name", &self.name, "Name is required.")
            .min_length("name", self.name.trim(), 2, "Name must be at least 2 characters.")
            .required("description", &self.description, "Description is required.")
            .min_length(
                "description",
                self.description.trim(),
                20,
                "Description must be at least 20 characters.",
            )
            .min_items("ingredients", ingredients.len(), 1, "At least one ingredient is required")
            .required("foodPrice", &self.price, "Price is required.")
            .custom("foodPrice", || match self.parsed_price() {
                None => Some("Price must be a number.".to_string()),
                Some(p) if p <= Decimal::ZERO => Some("Price must be greater than 0.".to_string()),
                Some(_) => None,
            })
            .required("foodQuantity", &self.quantity, "Quantity is required.")
            .custom("foodQuantity", || match self.parsed_quantity() {
                None => Some("Quantity must be a whole number.".to_string()),
                Some(0) => Some("Quantity must be greater than 0.".to_string()),
                Some(_) => None,
            })
            .custom("availableOn", || {
                availability_missing.then(|| "Date/time is required.".to_string())
            })
            .custom("availableOn", || match self.available_on() {
                Some(at) if at.date() > today => None,
                _ => Some(INVALID_AVAILABILITY.to_string()),
            })
            .validate()
    }

    /// Build the request body; `None` unless the form validates
    #[must_use]
    pub fn to_new_food(&self, today: NaiveDate, food_image_urls: Vec<String>) -> Option<NewFood> {
        if !self.validate_on(today).is_valid() {
            return None;
        }

        let available = self.available_at(&Local)?;
        Some(NewFood {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            ingredients: self.ingredient_list(),
            price: self.parsed_price()?,
            quantity_available: self.parsed_quantity()?,
            available_date: available.to_rfc3339_opts(SecondsFormat::Millis, true),
            food_image_urls,
            category_id: self.category_id,
        })
    }
}

fn parse_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .ok()
}

/// Listing creation flow
pub struct AddFoodView {
    api: Arc<dyn MarketplaceApi>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    uploader: Arc<ImageUploader>,
}

impl AddFoodView {
    /// Create the view around a shared uploader
    pub fn new(
        api: Arc<dyn MarketplaceApi>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        uploader: Arc<ImageUploader>,
    ) -> Self {
        Self {
            api,
            notifier,
            navigator,
            uploader,
        }
    }

    /// Photo uploader backing the form
    #[must_use]
    pub fn uploader(&self) -> &Arc<ImageUploader> {
        &self.uploader
    }

    /// Whether the submit button is enabled
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.uploader.is_uploading() && !self.uploader.images().is_empty()
    }

    /// Validate and post the listing
    pub async fn submit(&self, form: &NewFoodForm) -> AppResult<Food> {
        if self.uploader.is_uploading() {
            return Err(AppError::NotReady("Images are still uploading"));
        }

        let today = Local::now().date_naive();
        let image_urls = self.uploader.secure_urls();

        let mut result = form.validate_on(today);
        result.merge(
            Validator::new()
                .min_items("foodImageUrls", image_urls.len(), 1, "At least one image is required.")
                .validate(),
        );
        if !result.is_valid() {
            return Err(AppError::Validation(result));
        }

        // Local times skipped by a DST change have no instant
        let Some(new_food) = form.to_new_food(today, image_urls) else {
            return Err(AppError::Validation(
                Validator::new()
                    .custom("availableOn", || Some(INVALID_AVAILABILITY.to_string()))
                    .validate(),
            ));
        };

        match self.api.create_food(&new_food).await {
            Ok(food) => {
                info!(id = food.id, name = %food.name, "Listing created");
                self.notifier.notify(Notification::success(
                    "addFood-success-toast",
                    "Food added successfully.",
                ));
                self.navigator.navigate(Redirect::to(Route::FoodList));
                Ok(food)
            }
            Err(e) => {
                warn!(error = %e, "Failed to create listing");
                self.notifier.notify(Notification::error(
                    "addFood-fail-toast",
                    "Failed to add food, please try again.",
                ));
                Err(e.into())
            }
        }
    }
}
