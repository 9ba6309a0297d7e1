//! Resource client for the inventory REST API
//!
//! One round trip per call: no retries, no caching, no timeouts. Failures are
//! classified into [`ApiError`] and handed back untouched; recovering from
//! them is the caller's business.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::core::error::{ApiError, ApiResult, FieldErrors};
use crate::entities::{Event, Item, ItemFields, ItemId};

const USER_AGENT_VALUE: &str = concat!("stockpile/", env!("CARGO_PKG_VERSION"));

/// The six remote operations the engine depends on
#[async_trait]
pub trait ItemsApi: Send + Sync {
    /// `GET /items`
    async fn list_items(&self) -> ApiResult<Vec<Item>>;

    /// `GET /items/{id}`
    async fn get_item(&self, id: ItemId) -> ApiResult<Item>;

    /// `POST /items`
    async fn create_item(&self, fields: &ItemFields) -> ApiResult<Item>;

    /// `PUT /items/{id}`
    async fn update_item(&self, id: ItemId, fields: &ItemFields) -> ApiResult<Item>;

    /// `DELETE /items/{id}`
    async fn delete_item(&self, id: ItemId) -> ApiResult<()>;

    /// `GET /items/{id}/events`
    async fn item_events(&self, id: ItemId) -> ApiResult<Vec<Event>>;
}

/// Error body shape shared by 404/422/5xx responses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: FieldErrors,
}

/// [`ItemsApi`] over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpItemsApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpItemsApi {
    /// Create a client rooted at `base_url` (e.g. `https://host/api`)
    pub fn new(base_url: Url) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                tracing::error!("failed to create HTTP client: {}", e);
                ApiError::server(None, None)
            })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, keeping any base path
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn item_endpoint(&self, id: ItemId) -> Url {
        self.endpoint(&["items", &id.to_string()])
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        request.send().await.map_err(|e| {
            tracing::warn!("request failed before a response arrived: {}", e);
            ApiError::from(e)
        })
    }

    /// Check the status and decode a JSON body
    async fn handle_json<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let response = Self::check_status(response).await?;
        let status = response.status();
        response.json::<T>().await.map_err(|e| {
            tracing::warn!("failed to decode response body: {}", e);
            ApiError::server(Some(status.as_u16()), None)
        })
    }

    /// Classify a non-2xx response into the error taxonomy
    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
        tracing::debug!(status = status.as_u16(), message = ?body.message, "request rejected");

        Err(match status {
            StatusCode::NOT_FOUND => ApiError::NotFound {
                message: body.message,
            },
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::ValidationFailed {
                message: body.message,
                errors: body.errors,
            },
            _ => ApiError::server(Some(status.as_u16()), body.message),
        })
    }
}

#[async_trait]
impl ItemsApi for HttpItemsApi {
    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        let url = self.endpoint(&["items"]);
        tracing::debug!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        self.handle_json(response).await
    }

    async fn get_item(&self, id: ItemId) -> ApiResult<Item> {
        let url = self.item_endpoint(id);
        tracing::debug!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        self.handle_json(response).await
    }

    async fn create_item(&self, fields: &ItemFields) -> ApiResult<Item> {
        let url = self.endpoint(&["items"]);
        tracing::debug!("POST {}", url);
        let response = self.send(self.client.post(url).json(fields)).await?;
        self.handle_json(response).await
    }

    async fn update_item(&self, id: ItemId, fields: &ItemFields) -> ApiResult<Item> {
        let url = self.item_endpoint(id);
        tracing::debug!("PUT {}", url);
        let response = self.send(self.client.put(url).json(fields)).await?;
        self.handle_json(response).await
    }

    async fn delete_item(&self, id: ItemId) -> ApiResult<()> {
        let url = self.item_endpoint(id);
        tracing::debug!("DELETE {}", url);
        let response = self.send(self.client.delete(url)).await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn item_events(&self, id: ItemId) -> ApiResult<Vec<Event>> {
        let url = self.endpoint(&["items", &id.to_string(), "events"]);
        tracing::debug!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        self.handle_json(response).await
    }
}
