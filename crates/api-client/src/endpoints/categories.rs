//! Category endpoints

use crate::client::HomeCookClient;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};

/// A food category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Category {
    /// Category id
    pub id: i64,
    /// Display name
    pub name: String,
}

/// Categories API interface
#[derive(Clone)]
pub struct CategoriesApi {
    client: HomeCookClient,
}

impl CategoriesApi {
    /// Create a new categories API interface
    pub(crate) fn new(client: HomeCookClient) -> Self {
        Self { client }
    }

    /// List all categories
    ///
    /// GET /category
    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        self.client.get("category").await
    }
}
