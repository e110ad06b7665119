//! Food grid and detail views

use crate::backend::MarketplaceApi;
use crate::catalog::CategoryStore;
use crate::checkout::{OrderIntent, QuantityField};
use crate::error::{AppError, AppResult};
use crate::format::{format_date, format_price};
use crate::navigation::{Navigator, Redirect, Route};
use crate::notify::{Notification, Notifier};
use homecook_api_client::endpoints::{Category, Food};
use std::sync::Arc;
use tracing::{debug, warn};

/// Load state of a view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// Request in flight
    Loading,
    /// Data arrived
    Ready(T),
    /// Request failed; a notification has been shown
    Failed,
}

impl<T> ViewState<T> {
    /// Data, when ready
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Loading | Self::Failed => None,
        }
    }

    /// Whether the load failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> (Self, Option<E>) {
        match result {
            Ok(value) => (Self::Ready(value), None),
            Err(e) => (Self::Failed, Some(e)),
        }
    }
}

/// Which listings the grid shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoodFilter {
    /// Every listing
    All,
    /// One category
    Category(i64),
    /// Free-text search
    Search(String),
}

impl FoodFilter {
    /// Search filter, falling back to [`FoodFilter::All`] for blank terms
    #[must_use]
    pub fn search(term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() {
            Self::All
        } else {
            Self::Search(term.to_string())
        }
    }

    fn normalized(self) -> Self {
        match self {
            Self::Search(term) => Self::search(&term),
            other => other,
        }
    }
}

/// The listing grid together with its category carousel
pub struct FoodGrid {
    api: Arc<dyn MarketplaceApi>,
    notifier: Arc<dyn Notifier>,
    categories: Arc<CategoryStore>,
    filter: FoodFilter,
    state: ViewState<Vec<Food>>,
}

impl FoodGrid {
    /// Create a grid showing every listing
    pub fn new(
        api: Arc<dyn MarketplaceApi>,
        notifier: Arc<dyn Notifier>,
        categories: Arc<CategoryStore>,
    ) -> Self {
        Self {
            api,
            notifier,
            categories,
            filter: FoodFilter::All,
            state: ViewState::Loading,
        }
    }

    /// Fetch the listings for `filter`
    pub async fn load(&mut self, filter: FoodFilter) -> &ViewState<Vec<Food>> {
        self.filter = filter.normalized();
        self.state = ViewState::Loading;

        let result = match &self.filter {
            FoodFilter::All => self.api.foods().await,
            FoodFilter::Category(id) => self.api.foods_by_category(*id).await,
            FoodFilter::Search(term) => self.api.search_foods(term).await,
        };

        let (state, error) = ViewState::from_result(result);
        if let Some(e) = error {
            warn!(error = %e, filter = ?self.filter, "Failed to load listings");
            self.notifier.notify(Notification::error(
                "fetching-error-toast",
                "Error fetching food list from database.",
            ));
        } else {
            debug!(filter = ?self.filter, "Listings loaded");
        }
        self.state = state;
        &self.state
    }

    /// Categories for the carousel; `None` renders nothing
    pub async fn categories(&self) -> Option<Vec<Category>> {
        self.categories.load().await
    }

    /// Current filter
    #[must_use]
    pub fn filter(&self) -> &FoodFilter {
        &self.filter
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> &ViewState<Vec<Food>> {
        &self.state
    }
}

/// A loaded listing with its order controls
#[derive(Debug, Clone)]
pub struct FoodDetail {
    food: Food,
    quantity: QuantityField,
}

impl FoodDetail {
    /// Wrap a fetched listing
    #[must_use]
    pub fn new(food: Food) -> Self {
        let quantity = QuantityField::new(food.quantity_available);
        Self { food, quantity }
    }

    /// The listing
    #[must_use]
    pub fn food(&self) -> &Food {
        &self.food
    }

    /// Quantity input
    #[must_use]
    pub fn quantity(&self) -> &QuantityField {
        &self.quantity
    }

    /// Mutable quantity input
    pub fn quantity_mut(&mut self) -> &mut QuantityField {
        &mut self.quantity
    }

    /// Nothing left to sell
    #[must_use]
    pub fn sold_out(&self) -> bool {
        self.food.quantity_available == 0
    }

    /// Whether the order button is enabled
    #[must_use]
    pub fn can_order(&self) -> bool {
        !self.sold_out() && self.quantity.is_valid()
    }

    /// Availability as `MM/DD/YYYY`
    #[must_use]
    pub fn available_on(&self) -> Option<String> {
        format_date(self.food.available_date.as_deref())
    }

    /// Unit price as `£x.yy`
    #[must_use]
    pub fn price_label(&self) -> String {
        format_price(self.food.price)
    }

    /// Build the order and go to checkout
    pub fn order(&self, navigator: &dyn Navigator) -> AppResult<OrderIntent> {
        let quantity = self
            .quantity
            .valid_quantity()
            .filter(|_| !self.sold_out())
            .ok_or(AppError::NotReady("Quantity is not valid"))?;

        let intent = OrderIntent {
            food_id: self.food.id,
            name: self.food.name.clone(),
            quantity,
            unit_price: self.food.price,
            quantity_available: self.food.quantity_available,
        };
        navigator.navigate(Redirect::to(Route::Checkout));
        Ok(intent)
    }
}

/// Detail view of one listing
pub struct FoodDetailView {
    api: Arc<dyn MarketplaceApi>,
    notifier: Arc<dyn Notifier>,
}

impl FoodDetailView {
    /// Create the view
    pub fn new(api: Arc<dyn MarketplaceApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Fetch listing `id`
    pub async fn load(&self, id: i64) -> ViewState<FoodDetail> {
        let (state, error) = ViewState::from_result(self.api.food(id).await.map(FoodDetail::new));
        if let Some(e) = error {
            warn!(error = %e, id, "Failed to load listing");
            self.notifier.notify(Notification::error(
                "fetching-error-toast",
                "Error fetching food detail from database.",
            ));
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{food, FakeApi, Harness};
    use homecook_api_client::endpoints::Category;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn foods() -> Vec<Food> {
        let mut dessert = food(2, Decimal::from(3), 4);
        dessert.name = "Sticky toffee pudding".into();
        dessert.category = Some(Category { id: 2, name: "Desserts".into() });
        vec![food(1, Decimal::from(5), 2), dessert]
    }

    fn grid(h: &Harness) -> FoodGrid {
        let categories = Arc::new(CategoryStore::new(h.api.clone(), h.notifications.clone()));
        FoodGrid::new(h.api.clone(), h.notifications.clone(), categories)
    }

    #[tokio::test]
    async fn test_filters() {
        let h = Harness::new(FakeApi::new().with_foods(foods()));
        let mut grid = grid(&h);

        let all = grid.load(FoodFilter::All).await.ready().unwrap().len();
        assert_eq!(all, 2);

        let desserts = grid.load(FoodFilter::Category(2)).await.ready().unwrap().clone();
        assert_eq!(desserts.len(), 1);
        assert_eq!(desserts[0].id, 2);

        let found = grid.load(FoodFilter::search("toffee")).await.ready().unwrap().clone();
        assert_eq!(found[0].name, "Sticky toffee pudding");
    }

    #[tokio::test]
    async fn test_blank_search_lists_everything() {
        let h = Harness::new(FakeApi::new().with_foods(foods()));
        let mut grid = grid(&h);

        grid.load(FoodFilter::Search("   ".into())).await;

        assert_eq!(grid.filter(), &FoodFilter::All);
        assert_eq!(h.api.calls_to("search_foods"), 0);
        assert_eq!(grid.state().ready().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_category_failure_does_not_affect_grid() {
        let h = Harness::new(FakeApi::new().with_foods(foods()));
        h.api.fail("categories");
        let mut grid = grid(&h);

        assert!(grid.categories().await.is_none());
        let state = grid.load(FoodFilter::All).await;

        assert_eq!(state.ready().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_list_failure() {
        let h = Harness::new(FakeApi::new());
        h.api.fail("foods");
        let mut grid = grid(&h);

        assert!(grid.load(FoodFilter::All).await.is_failed());
        assert_eq!(h.error_messages(), vec!["Error fetching food list from database."]);
    }

    #[tokio::test]
    async fn test_detail_and_order() {
        let h = Harness::new(FakeApi::new().with_foods(foods()));
        let view = FoodDetailView::new(h.api.clone(), h.notifications.clone());

        let ViewState::Ready(mut detail) = view.load(1).await else {
            panic!("detail should load");
        };
        assert_eq!(detail.available_on().as_deref(), Some("11/02/2026"));
        assert_eq!(detail.price_label(), "£5.00");
        assert!(!detail.sold_out());

        detail.quantity_mut().increment();
        let intent = detail.order(h.history.as_ref()).unwrap();

        assert_eq!(intent.quantity, 2);
        assert_eq!(intent.total(), Decimal::from_str("10.00").unwrap());
        assert_eq!(h.history.current(), Some(Route::Checkout));
    }

    #[tokio::test]
    async fn test_invalid_quantity_cannot_order() {
        let h = Harness::new(FakeApi::new().with_foods(foods()));
        let mut detail = FoodDetail::new(foods().remove(0));

        detail.quantity_mut().set_input("3");
        assert!(!detail.can_order());
        assert!(detail.order(h.history.as_ref()).is_err());
        assert!(h.history.is_empty());
    }

    #[test]
    fn test_sold_out() {
        let detail = FoodDetail::new(food(3, Decimal::ONE, 0));
        assert!(detail.sold_out());
        assert!(!detail.can_order());
    }

    #[tokio::test]
    async fn test_detail_failure() {
        let h = Harness::new(FakeApi::new());
        let view = FoodDetailView::new(h.api.clone(), h.notifications.clone());

        assert!(view.load(99).await.is_failed());
        assert_eq!(h.error_messages(), vec!["Error fetching food detail from database."]);
    }
}
