//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a specific set of backend endpoints.
//!
//! ## Mapping to the marketplace backend
//!
//! | Module | Backend Route | Description |
//! |--------|---------------|-------------|
//! | `auth` | `login`, `register`, `user`, `logout` | Cookie session lifecycle |
//! | `categories` | `category` | Food categories |
//! | `foods` | `food`, `food/food-category/{id}`, `FoodSearch` | Listings |
//! | `profiles` | `profile/{userId}`, `profile`, `profile/update-profile` | Delivery profile |
//! | `payments` | `CreatePaymentIntent` | Checkout payment intents |
//! | `images` | `Cloudinary/signature`, `Cloudinary`, image host upload | Listing photos |

pub mod auth;
pub mod categories;
pub mod foods;
pub mod images;
pub mod payments;
pub mod profiles;

pub use auth::{AuthApi, Credentials, UserInfo};
pub use categories::{CategoriesApi, Category};
pub use foods::{Food, FoodsApi, NewFood};
pub use images::{ImageFile, ImagesApi, UploadSignature, UploadedImage};
pub use payments::{CreatePaymentIntent, PaymentIntent, PaymentsApi};
pub use profiles::{Profile, ProfilePayload, ProfilesApi};
