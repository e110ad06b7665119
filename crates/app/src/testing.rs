//! In-memory doubles for the backend and the image host

use crate::backend::{ImageHost, MarketplaceApi};
use crate::images::PendingFile;
use crate::navigation::History;
use crate::notify::NotificationCenter;
use async_trait::async_trait;
use homecook_api_client::endpoints::{
    Category, CreatePaymentIntent, Credentials, Food, ImageFile, NewFood, PaymentIntent, Profile,
    ProfilePayload, UploadSignature, UploadedImage, UserInfo,
};
use homecook_api_client::{ApiError, ApiResult};
use homecook_core::storage::MemoryStore;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn user(profile_complete: bool) -> UserInfo {
    UserInfo {
        id: 42,
        user_email: "cook@example.com".into(),
        user_name: None,
        is_profile_complete: profile_complete,
        user_image_url: None,
    }
}

pub fn food(id: i64, price: Decimal, quantity_available: u32) -> Food {
    Food {
        id,
        name: format!("Dish {id}"),
        price,
        description: "Home cooked".into(),
        food_image_urls: vec![format!("https://img.example.com/{id}.jpg")],
        quantity_available,
        available_date: Some("2026-11-02T18:00:00".into()),
        category: Some(Category {
            id: 1,
            name: "Mains".into(),
        }),
        seller_id: 9,
        ingredients: vec!["rice".into()],
    }
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    unauthorized: Mutex<HashSet<&'static str>>,
    pub user: Mutex<Option<UserInfo>>,
    pub categories: Mutex<Vec<Category>>,
    pub foods: Mutex<Vec<Food>>,
    pub profile: Mutex<Profile>,
    pub intents: Mutex<Vec<CreatePaymentIntent>>,
    pub created: Mutex<Vec<NewFood>>,
    pub profile_writes: Mutex<Vec<(&'static str, ProfilePayload)>>,
    pub deleted: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: UserInfo) -> Self {
        *self.user.lock().unwrap() = Some(user);
        self
    }

    pub fn with_foods(self, foods: Vec<Food>) -> Self {
        *self.foods.lock().unwrap() = foods;
        self
    }

    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        *self.categories.lock().unwrap() = categories;
        self
    }

    /// Make `op` answer 500
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Make `op` answer 401
    pub fn reject(&self, op: &'static str) {
        self.unauthorized.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
        self.unauthorized.lock().unwrap().remove(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == op).count()
    }

    fn enter(&self, op: &'static str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(op.to_string());
        if self.unauthorized.lock().unwrap().contains(op) {
            return Err(ApiError::Unauthorized);
        }
        if self.failing.lock().unwrap().contains(op) {
            return Err(ApiError::api_response(500, "Internal Server Error"));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketplaceApi for FakeApi {
    async fn login(&self, _credentials: &Credentials) -> ApiResult<()> {
        self.enter("login")
    }

    async fn register(&self, _credentials: &Credentials) -> ApiResult<()> {
        self.enter("register")
    }

    async fn user_info(&self) -> ApiResult<UserInfo> {
        self.enter("user_info")?;
        self.user.lock().unwrap().clone().ok_or(ApiError::Unauthorized)
    }

    async fn logout(&self) -> ApiResult<()> {
        self.enter("logout")
    }

    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.enter("categories")?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn foods(&self) -> ApiResult<Vec<Food>> {
        self.enter("foods")?;
        Ok(self.foods.lock().unwrap().clone())
    }

    async fn foods_by_category(&self, category_id: i64) -> ApiResult<Vec<Food>> {
        self.enter("foods_by_category")?;
        Ok(self
            .foods
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.category.as_ref().is_some_and(|c| c.id == category_id))
            .cloned()
            .collect())
    }

    async fn food(&self, id: i64) -> ApiResult<Food> {
        self.enter("food")?;
        self.foods
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| ApiError::api_response(404, "Not Found"))
    }

    async fn search_foods(&self, term: &str) -> ApiResult<Vec<Food>> {
        self.enter("search_foods")?;
        let term = term.to_lowercase();
        Ok(self
            .foods
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&term))
            .cloned()
            .collect())
    }

    async fn create_food(&self, food: &NewFood) -> ApiResult<Food> {
        self.enter("create_food")?;
        self.created.lock().unwrap().push(food.clone());
        Ok(Food {
            id: 100,
            name: food.name.clone(),
            price: food.price,
            description: food.description.clone(),
            food_image_urls: food.food_image_urls.clone(),
            quantity_available: food.quantity_available,
            available_date: Some(food.available_date.clone()),
            category: None,
            seller_id: 42,
            ingredients: food.ingredients.clone(),
        })
    }

    async fn profile(&self, _user_id: i64) -> ApiResult<Profile> {
        self.enter("profile")?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn create_profile(&self, payload: &ProfilePayload) -> ApiResult<()> {
        self.enter("create_profile")?;
        self.profile_writes.lock().unwrap().push(("create", payload.clone()));
        Ok(())
    }

    async fn update_profile(&self, payload: &ProfilePayload) -> ApiResult<()> {
        self.enter("update_profile")?;
        self.profile_writes.lock().unwrap().push(("update", payload.clone()));
        Ok(())
    }

    async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntent,
    ) -> ApiResult<PaymentIntent> {
        self.enter("create_payment_intent")?;
        let mut intents = self.intents.lock().unwrap();
        intents.push(request.clone());
        Ok(PaymentIntent {
            client_secret: Some(format!("pi_secret_{}", intents.len())),
        })
    }

    async fn upload_signature(&self) -> ApiResult<UploadSignature> {
        self.enter("upload_signature")?;
        Ok(UploadSignature {
            timestamp: "1730000000".into(),
            signature: "signed".into(),
        })
    }

    async fn delete_image(&self, public_id: &str) -> ApiResult<()> {
        self.enter("delete_image")?;
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeHost {
    failing: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub uploads: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make uploads of `file_name` fail
    pub fn fail_file(&self, file_name: &str) {
        self.failing.lock().unwrap().insert(file_name.to_string());
    }

    /// Hold uploads of `file_name` until the returned gate is notified
    pub fn hold_file(&self, file_name: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(file_name.to_string(), gate.clone());
        gate
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageHost for FakeHost {
    async fn upload(
        &self,
        signature: &UploadSignature,
        file: ImageFile,
    ) -> ApiResult<UploadedImage> {
        assert_eq!(signature.signature, "signed");
        self.uploads.lock().unwrap().push(file.file_name.clone());
        let gate = self.gates.lock().unwrap().get(&file.file_name).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(&file.file_name) {
            return Err(ApiError::upload(400, "Invalid image file"));
        }
        Ok(UploadedImage {
            public_id: format!("homecook/{}", file.file_name),
            url: format!("http://res.example.com/{}", file.file_name),
            secure_url: format!("https://res.example.com/{}", file.file_name),
            format: None,
            width: None,
            height: None,
            bytes: Some(file.bytes.len() as u64),
        })
    }
}

/// Shared collaborators of a view under test
pub struct Harness {
    pub api: Arc<FakeApi>,
    pub storage: Arc<MemoryStore>,
    pub history: Arc<History>,
    pub notifications: Arc<NotificationCenter>,
}

impl Harness {
    pub fn new(api: FakeApi) -> Self {
        Self {
            api: Arc::new(api),
            storage: Arc::new(MemoryStore::new()),
            history: Arc::new(History::new()),
            notifications: Arc::new(NotificationCenter::new()),
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.notifications
            .errors()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }
}

pub fn jpeg(name: &str) -> PendingFile {
    PendingFile {
        file_name: name.to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'],
    }
}
