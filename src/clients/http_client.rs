//! HTTP client for WordPress REST API communication.
//!
//! This module provides the [`HttpClient`] type, the transport every
//! [`Resource`](crate::rest::Resource) issues its requests through.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::clients::cancel::Timeout;
use crate::clients::errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{BaseUrl, ClientConfig};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to a WordPress site.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Default headers including User-Agent and `X-WP-Nonce`
/// - Request deadlines and cancellation signals
/// - An opt-in in-memory cache for GET responses
///
/// Redirects are never followed: WordPress answers `users/me` with a 302
/// for authenticated users, and callers need to see that status.
///
/// The client does not retry. A failed request is reported once.
///
/// The GET cache is unbounded: entries live until [`HttpClient::clear_cache`]
/// is called or the client is dropped. Only opt in for a small, fixed set of
/// URLs such as menus.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use wp_resource::{ClientConfig, BaseUrl};
/// use wp_resource::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://blog.example.com")?)
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/wordpress/wp-json/posts").build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL (e.g., `https://blog.example.com`).
    base_url: BaseUrl,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Cached GET responses keyed by path and query.
    cache: Mutex<HashMap<String, HttpResponse>>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client
    /// cannot be created (e.g. TLS initialization failure).
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!("{user_agent_prefix}wp-resource v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert(
            "Accept".to_string(),
            "application/json, text/plain, */*".to_string(),
        );
        if let Some(nonce) = config.nonce() {
            default_headers.insert("X-WP-Nonce".to_string(), nonce.as_ref().to_string());
        }
        for (key, value) in config.default_headers() {
            default_headers.insert(key.clone(), value.clone());
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            default_headers,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Drops every cached response.
    ///
    /// This is the only eviction the cache performs.
    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Sends a request.
    ///
    /// This method handles:
    /// - Request validation
    /// - URL construction and header merging
    /// - Deadlines and cancellation
    /// - Response parsing
    /// - Cache lookup and storage for cacheable GET requests
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - A network error occurs (`Network`)
    /// - A non-2xx response is received (`Response`)
    /// - The deadline elapses (`TimedOut`) or the signal fires (`Cancelled`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let cache_key = (request.cache && request.http_method == HttpMethod::Get)
            .then(|| request.cache_key());
        if let Some(key) = &cache_key {
            let cached = self
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned();
            if let Some(response) = cached {
                tracing::debug!("Serving {} from response cache", key);
                return Ok(response);
            }
        }

        let url = self.base_url.join(&request.path);

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert(
                "Content-Type".to_string(),
                "application/json;charset=utf-8".to_string(),
            );
        }
        for (key, value) in &request.extra_headers {
            headers.insert(key.clone(), value.clone());
        }

        let mut req_builder = self.client.request(Self::reqwest_method(request.http_method), &url);
        for (key, value) in &headers {
            let name = reqwest::header::HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                InvalidHttpRequestError::InvalidHeader { name: key.clone() }
            })?;
            req_builder = req_builder.header(name, value);
        }
        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!("{} {}", request.http_method, url);

        let exchange = async move {
            let res = req_builder.send().await?;
            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await?;
            Ok::<_, reqwest::Error>((code, res_headers, body_text))
        };

        let (code, res_headers, body_text) = match &request.timeout {
            None => exchange.await?,
            Some(Timeout::After(after)) => tokio::time::timeout(*after, exchange)
                .await
                .map_err(|_| HttpError::TimedOut { after: *after })??,
            Some(Timeout::Signal(signal)) => {
                tokio::select! {
                    result = exchange => result?,
                    () = signal.cancelled() => return Err(HttpError::Cancelled),
                }
            }
        };

        let body = Self::parse_body(&body_text);
        let response = HttpResponse::new(code, res_headers, body);

        if let Some(reason) = response.deprecation_reason() {
            tracing::warn!(
                "Deprecated request to WordPress REST API at {}, received reason: {}",
                request.path,
                reason
            );
        }

        if !response.is_ok() {
            tracing::warn!("{} {} failed with status {}", request.http_method, url, code);
            return Err(HttpError::Response(Self::response_error(response, &body_text)));
        }

        if let Some(key) = cache_key {
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key, response.clone());
        }

        Ok(response)
    }

    const fn reqwest_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Parses a body as JSON, keeping non-JSON text as a string value.
    fn parse_body(body_text: &str) -> Option<serde_json::Value> {
        if body_text.trim().is_empty() {
            return None;
        }
        Some(
            serde_json::from_str(body_text)
                .unwrap_or_else(|_| serde_json::Value::String(body_text.to_string())),
        )
    }

    /// Builds the error for a non-2xx response from the WordPress error shape.
    fn response_error(response: HttpResponse, body_text: &str) -> HttpResponseError {
        let error_object = match &response.body {
            Some(serde_json::Value::Array(items)) => items.first(),
            Some(value @ serde_json::Value::Object(_)) => Some(value),
            _ => None,
        };

        let message = error_object
            .and_then(|e| e.get("message"))
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_else(|| {
                if body_text.is_empty() {
                    format!("Request failed with status {}", response.code)
                } else {
                    body_text.to_string()
                }
            });
        let error_code = error_object
            .and_then(|e| e.get("code"))
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);

        HttpResponseError {
            code: response.code,
            message,
            error_code,
            body: response.body,
            headers: response.headers,
        }
    }
}
