//! Seams between the application state and the network
//!
//! Views talk to [`MarketplaceApi`] and [`ImageHost`] rather than to
//! [`HomeCookClient`] directly, so the flows can run against in-memory
//! doubles.

use async_trait::async_trait;
use homecook_api_client::endpoints::{
    Category, CreatePaymentIntent, Credentials, Food, ImageFile, NewFood, PaymentIntent, Profile,
    ProfilePayload, UploadSignature, UploadedImage, UserInfo,
};
use homecook_api_client::{ApiResult, HomeCookClient};

/// Marketplace backend operations
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// POST /login
    async fn login(&self, credentials: &Credentials) -> ApiResult<()>;
    /// POST /register
    async fn register(&self, credentials: &Credentials) -> ApiResult<()>;
    /// GET /user
    async fn user_info(&self) -> ApiResult<UserInfo>;
    /// POST /logout
    async fn logout(&self) -> ApiResult<()>;

    /// GET /category
    async fn categories(&self) -> ApiResult<Vec<Category>>;

    /// GET /food
    async fn foods(&self) -> ApiResult<Vec<Food>>;
    /// GET /food/food-category/{id}
    async fn foods_by_category(&self, category_id: i64) -> ApiResult<Vec<Food>>;
    /// GET /food/{id}
    async fn food(&self, id: i64) -> ApiResult<Food>;
    /// GET /FoodSearch
    async fn search_foods(&self, term: &str) -> ApiResult<Vec<Food>>;
    /// POST /food
    async fn create_food(&self, food: &NewFood) -> ApiResult<Food>;

    /// GET /profile/{userId}
    async fn profile(&self, user_id: i64) -> ApiResult<Profile>;
    /// POST /profile
    async fn create_profile(&self, payload: &ProfilePayload) -> ApiResult<()>;
    /// PUT /profile/update-profile
    async fn update_profile(&self, payload: &ProfilePayload) -> ApiResult<()>;

    /// POST /CreatePaymentIntent
    async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntent,
    ) -> ApiResult<PaymentIntent>;

    /// POST /Cloudinary/signature
    async fn upload_signature(&self) -> ApiResult<UploadSignature>;
    /// DELETE /Cloudinary?publicId=
    async fn delete_image(&self, public_id: &str) -> ApiResult<()>;
}

/// Direct uploads to the third-party image host
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload one file with a backend-issued signature
    async fn upload(
        &self,
        signature: &UploadSignature,
        file: ImageFile,
    ) -> ApiResult<UploadedImage>;
}

#[async_trait]
impl MarketplaceApi for HomeCookClient {
    async fn login(&self, credentials: &Credentials) -> ApiResult<()> {
        self.auth().login(credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> ApiResult<()> {
        self.auth().register(credentials).await
    }

    async fn user_info(&self) -> ApiResult<UserInfo> {
        self.auth().user_info().await
    }

    async fn logout(&self) -> ApiResult<()> {
        self.auth().logout().await
    }

    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.categories().list().await
    }

    async fn foods(&self) -> ApiResult<Vec<Food>> {
        self.foods().list().await
    }

    async fn foods_by_category(&self, category_id: i64) -> ApiResult<Vec<Food>> {
        self.foods().by_category(category_id).await
    }

    async fn food(&self, id: i64) -> ApiResult<Food> {
        self.foods().get(id).await
    }

    async fn search_foods(&self, term: &str) -> ApiResult<Vec<Food>> {
        self.foods().search(term).await
    }

    async fn create_food(&self, food: &NewFood) -> ApiResult<Food> {
        self.foods().create(food).await
    }

    async fn profile(&self, user_id: i64) -> ApiResult<Profile> {
        self.profiles().get(user_id).await
    }

    async fn create_profile(&self, payload: &ProfilePayload) -> ApiResult<()> {
        self.profiles().create(payload).await
    }

    async fn update_profile(&self, payload: &ProfilePayload) -> ApiResult<()> {
        self.profiles().update(payload).await
    }

    async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntent,
    ) -> ApiResult<PaymentIntent> {
        self.payments().create_intent(request).await
    }

    async fn upload_signature(&self) -> ApiResult<UploadSignature> {
        self.images().signature().await
    }

    async fn delete_image(&self, public_id: &str) -> ApiResult<()> {
        self.images().delete(public_id).await
    }
}

#[async_trait]
impl ImageHost for HomeCookClient {
    async fn upload(
        &self,
        signature: &UploadSignature,
        file: ImageFile,
    ) -> ApiResult<UploadedImage> {
        self.images().upload(signature, file).await
    }
}
