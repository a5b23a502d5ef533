use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::ApiError;

/// Thin HTTP client for the DORA REST API.
///
/// Every request carries the session cookie held in a shared jar, the way a
/// browser sends credentials with `withCredentials`. Failed responses are
/// normalised into [`ApiError`] so callers only ever see one error shape.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl ApiClient {
    /// Build a client rooted at `base_url`. A trailing `/` is added when
    /// missing so that relative paths such as `releases/` join under it.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .user_agent(concat!("dora-dash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            http,
            base_url,
            jar,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Load a saved `Cookie` header (`a=1; b=2`) into the jar.
    pub fn restore_cookies(&self, cookie_header: &str) {
        for pair in cookie_header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, &self.base_url);
        }
    }

    /// The `Cookie` header the jar would send to the API, if any.
    pub fn cookie_header(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .filter(|s| !s.is_empty())
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// `{collection}{id}` with `id` percent-encoded as a single path segment.
    pub fn item_url(&self, collection: &str, id: &str) -> Result<Url, ApiError> {
        let mut url = self.url(collection)?;
        let url_display = url.to_string();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{}: not a base URL", url_display)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        Ok(self.request_to(method, url))
    }

    fn request_to(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "api request");
        self.http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = check_response(req.send().await?).await?;
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send and decode loosely: an empty body becomes `null`.
    async fn send_value(&self, req: RequestBuilder) -> Result<serde_json::Value, ApiError> {
        let resp = check_response(req.send().await?).await?;
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send and discard the body.
    async fn send_empty(&self, req: RequestBuilder) -> Result<(), ApiError> {
        check_response(req.send().await?).await?;
        Ok(())
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let req = self.request(Method::GET, path)?.query(query);
        self.send_json(req).await
    }

    pub async fn get_value(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        let req = self.request(Method::GET, path)?;
        self.send_value(req).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let req = self.request(Method::POST, path)?.json(body);
        self.send_json(req).await
    }

    pub async fn post_value<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<serde_json::Value, ApiError> {
        let req = self.request(Method::POST, path)?.json(body);
        self.send_value(req).await
    }

    pub async fn post_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let mut req = self.request(Method::POST, path)?;
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send_empty(req).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let req = self.request_to(Method::PUT, url).json(body);
        self.send_json(req).await
    }

    pub async fn delete(&self, url: Url) -> Result<(), ApiError> {
        let req = self.request_to(Method::DELETE, url);
        self.send_empty(req).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Parse a base URL and make sure it ends with `/`.
pub fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    let url = Url::parse(&with_slash).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(format!("{}: not a base URL", raw)));
    }
    Ok(url)
}

/// Map a non-2xx response to an [`ApiError`].
///
/// The JSON `error` field wins over `message`; a 401 without either becomes
/// `Unauthorized`; anything else without a message keeps only its status.
async fn check_response(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = extract_error_message(&body);
    tracing::debug!(status = status.as_u16(), message = ?message, "api error response");

    Err(match (status, message) {
        (_, Some(message)) => ApiError::Server { status, message },
        (StatusCode::UNAUTHORIZED, None) => ApiError::Unauthorized,
        (_, None) => ApiError::Status { status },
    })
}

/// Pull `error` (preferred) or `message` out of a JSON error body.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}
