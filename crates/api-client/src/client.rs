//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{AuthApi, CategoriesApi, FoodsApi, ImagesApi, PaymentsApi, ProfilesApi};
use crate::error::{ApiError, ApiResult, ErrorContext};
use crate::middleware::{InterceptorSlot, ResponseInterceptor};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Query parameter asking the backend to authenticate with its cookie
const USE_COOKIES: (&str, &str) = ("useCookies", "true");

/// HomeCook API client
///
/// This client wraps `reqwest` and adds:
/// - A cookie jar holding the backend session cookie
/// - The `useCookies=true` flag on every backend request
/// - Request correlation IDs for tracing
/// - A [`ResponseInterceptor`] hook that hears about every 401
#[derive(Clone)]
pub struct HomeCookClient {
    inner: Client,
    config: Arc<ClientConfig>,
    cookies: Arc<Jar>,
    interceptor: InterceptorSlot,
}

impl HomeCookClient {
    /// Create a new client with configuration from file and environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static("homecook-api-client/0.3"));

        let cookies = Arc::new(Jar::default());
        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .cookie_provider(cookies.clone())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            cookies,
            interceptor: InterceptorSlot::default(),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Cookies the backend has set, as a `Cookie` header value
    #[must_use]
    pub fn session_cookies(&self) -> Option<String> {
        let url = Url::parse(&self.config.base_url).ok()?;
        self.cookies
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(String::from))
    }

    /// Put back cookies saved from [`Self::session_cookies`]
    pub fn restore_cookies(&self, header: &str) -> ApiResult<()> {
        let url = Url::parse(&self.config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.config.base_url)))?;
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.cookies.add_cookie_str(pair, &url);
        }
        Ok(())
    }

    /// Install the response interceptor shared by all clones of this client
    ///
    /// Only a weak reference is kept; the caller owns the interceptor.
    pub fn set_interceptor<I: ResponseInterceptor + 'static>(&self, interceptor: &Arc<I>) {
        self.interceptor.set(interceptor);
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access login, registration and session endpoints
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access category endpoints
    #[must_use]
    pub fn categories(&self) -> CategoriesApi {
        CategoriesApi::new(self.clone())
    }

    /// Access food listing endpoints
    #[must_use]
    pub fn foods(&self) -> FoodsApi {
        FoodsApi::new(self.clone())
    }

    /// Access seller/buyer profile endpoints
    #[must_use]
    pub fn profiles(&self) -> ProfilesApi {
        ProfilesApi::new(self.clone())
    }

    /// Access payment endpoints
    #[must_use]
    pub fn payments(&self) -> PaymentsApi {
        PaymentsApi::new(self.clone())
    }

    /// Access image signing, upload and deletion
    #[must_use]
    pub fn images(&self) -> ImagesApi {
        ImagesApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods
    // -------------------------------------------------------------------------

    /// Perform a GET request
    #[instrument(skip(self), fields(request_id))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::GET, path, &[], Option::<&()>::None).await
    }

    /// Perform a GET request with extra query parameters
    #[instrument(skip(self), fields(request_id))]
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        self.request(Method::GET, path, query, Option::<&()>::None).await
    }

    /// Perform a POST request
    #[instrument(skip(self, body), fields(request_id))]
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// Perform a PUT request
    #[instrument(skip(self, body), fields(request_id))]
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// Perform a DELETE request with extra query parameters
    #[instrument(skip(self), fields(request_id))]
    pub async fn delete_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        self.request(Method::DELETE, path, query, Option::<&()>::None)
            .await
    }

    /// POST a multipart form to an absolute URL outside the backend
    ///
    /// Third-party hosts get neither the cookie flag nor the interceptor.
    #[instrument(skip(self, form), fields(request_id))]
    pub async fn post_multipart_url<T: DeserializeOwned>(
        &self,
        url: &str,
        form: Form,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let response = self
            .inner
            .post(url)
            .header(X_REQUEST_ID, &request_id)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await?;
        debug!(
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "Multipart upload finished"
        );

        if status.is_success() {
            decode_body(&text)
        } else {
            Err(ApiError::upload(status.as_u16(), text))
        }
    }

    /// Build a request builder for custom backend requests
    pub fn request_builder(&self, method: Method, path: &str) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();

        self.inner
            .request(method, self.url(path))
            .query(&[USE_COOKIES])
            .header(X_REQUEST_ID, &request_id)
    }

    /// Full backend URL for `path`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        let context = ErrorContext {
            request_id: Some(request_id.clone()),
            endpoint: path.to_string(),
            method: method.to_string(),
        };

        let mut request = self
            .inner
            .request(method, self.url(path))
            .header(X_REQUEST_ID, &request_id)
            .query(&[USE_COOKIES]);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(b) = body {
            request = request.json(b);
        }

        let start = Instant::now();
        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let result = self.handle_response(&context, response).await;

        match &result {
            Ok(_) => debug!(
                request_id = %request_id,
                elapsed_ms = start.elapsed().as_millis(),
                "Request succeeded"
            ),
            Err(e) => debug!(
                request_id = %request_id,
                elapsed_ms = start.elapsed().as_millis(),
                error = %e,
                "Request failed"
            ),
        }

        result
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(
        &self,
        context: &ErrorContext,
        response: Response,
    ) -> ApiResult<T> {
        let status = response.status();

        if self.interceptor.inspect(status.as_u16()) {
            warn!(context = %context, "Backend rejected the session");
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await?;

        if status.is_success() {
            decode_body(&text)
        } else {
            warn!(context = %context, status = status.as_u16(), "Request rejected");
            let message = if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                text
            };
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.config.timeout)
        } else {
            ApiError::Request(error)
        }
    }
}

/// Join a base URL and a relative path with exactly one slash
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Decode a response body, treating an empty body as JSON `null`
fn decode_body<T: DeserializeOwned>(text: &str) -> ApiResult<T> {
    let body = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(body).map_err(ApiError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::IgnoredAny;
    use serde::Deserialize;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://localhost:7145/api/", "/food/3"),
            "https://localhost:7145/api/food/3"
        );
        assert_eq!(
            join_url("https://localhost:7145/api", "category"),
            "https://localhost:7145/api/category"
        );
    }

    #[test]
    fn test_decode_empty_body() {
        decode_body::<()>("").unwrap();

        let ignored: ApiResult<IgnoredAny> = decode_body("  ");
        assert!(ignored.is_ok());

        let missing: Option<u32> = decode_body("").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_decode_json_body() {
        #[derive(Deserialize)]
        struct Item {
            id: i64,
        }

        let item: Item = decode_body(r#"{"id": 4}"#).unwrap();
        assert_eq!(item.id, 4);

        let bad: ApiResult<Item> = decode_body("<html>");
        assert!(matches!(bad, Err(ApiError::Json(_))));
    }

    #[test]
    fn test_client_creation() {
        let config = ClientConfig::development();
        let client = HomeCookClient::with_config(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_cookie_round_trip() {
        let client = HomeCookClient::with_config(ClientConfig::development()).unwrap();
        assert!(client.session_cookies().is_none());

        client
            .restore_cookies(".AspNetCore.Identity.Application=abc123; ")
            .unwrap();
        assert_eq!(
            client.session_cookies().as_deref(),
            Some(".AspNetCore.Identity.Application=abc123")
        );

        let clone = client.clone();
        assert!(clone.session_cookies().is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::development().with_base_url("ftp://nope");
        assert!(HomeCookClient::with_config(config).is_err());
    }

    #[test]
    fn test_request_builder_adds_cookie_flag() {
        let client = HomeCookClient::with_config(ClientConfig::development()).unwrap();
        let request = client
            .request_builder(Method::GET, "user")
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/api/user");
        assert_eq!(request.url().query(), Some("useCookies=true"));
        assert!(request.headers().contains_key(X_REQUEST_ID));
    }
}
