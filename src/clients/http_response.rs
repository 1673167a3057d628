//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type and the WordPress
//! pagination metadata parsed from its headers.

use std::collections::HashMap;

/// Pagination information parsed from WordPress response headers.
///
/// WordPress reports collection sizes in `X-WP-Total` and `X-WP-TotalPages`,
/// and links neighbouring pages in the `Link` header with a `page` query
/// parameter.
///
/// # Example
///
/// ```rust
/// use wp_resource::clients::PaginationInfo;
///
/// let info = PaginationInfo::parse_link_header(
///     r#"<https://example.com/wp-json/posts?page=1>; rel="prev", <https://example.com/wp-json/posts?page=3>; rel="next""#,
/// );
/// assert_eq!(info.prev_page, Some(1));
/// assert_eq!(info.next_page, Some(3));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationInfo {
    /// Total number of items in the collection (`X-WP-Total`).
    pub total: Option<u64>,
    /// Total number of pages (`X-WP-TotalPages`).
    pub total_pages: Option<u64>,
    /// The previous page number, if linked.
    pub prev_page: Option<u32>,
    /// The next page number, if linked.
    pub next_page: Option<u32>,
}

impl PaginationInfo {
    /// Parses page links from a `Link` header value.
    ///
    /// The header format is `<url>; rel="next", <url>; rel="prev"`.
    #[must_use]
    pub fn parse_link_header(header_value: &str) -> Self {
        let mut result = Self::default();

        for link in header_value.split(',') {
            let link = link.trim();

            let rel = link.split(';').find_map(|part| {
                let part = part.trim();
                part.strip_prefix("rel=").map(|rel| rel.trim_matches('"'))
            });

            let url = link
                .split(';')
                .next()
                .map(|s| s.trim().trim_start_matches('<').trim_end_matches('>'));

            if let (Some(rel), Some(url)) = (rel, url) {
                if let Some(page) = Self::extract_page(url) {
                    match rel {
                        "prev" | "previous" => result.prev_page = Some(page),
                        "next" => result.next_page = Some(page),
                        _ => {}
                    }
                }
            }
        }

        result
    }

    /// Extracts the `page` parameter from a URL. A link without one points at page 1.
    fn extract_page(url: &str) -> Option<u32> {
        let Some(query_start) = url.find('?') else {
            return Some(1);
        };
        let query = &url[query_start + 1..];

        for param in query.split('&') {
            let mut parts = param.splitn(2, '=');
            if let (Some("page"), Some(value)) = (parts.next(), parts.next()) {
                return value.parse().ok();
            }
        }

        Some(1)
    }
}

/// An HTTP response from the WordPress REST API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (lowercased names, possibly multi-valued).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed JSON body; `None` when the body was empty.
    pub body: Option<serde_json::Value>,
    /// Pagination metadata from `X-WP-*` and `Link` headers.
    pub pagination: PaginationInfo,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing pagination headers.
    #[must_use]
    pub fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: Option<serde_json::Value>,
    ) -> Self {
        let mut pagination = headers
            .get("link")
            .and_then(|values| values.first())
            .map(|link| PaginationInfo::parse_link_header(link))
            .unwrap_or_default();

        pagination.total = Self::first_header(&headers, "x-wp-total").and_then(|v| v.parse().ok());
        pagination.total_pages =
            Self::first_header(&headers, "x-wp-totalpages").and_then(|v| v.parse().ok());

        Self {
            code,
            headers,
            body,
            pagination,
        }
    }

    fn first_header<'a>(headers: &'a HashMap<String, Vec<String>>, name: &str) -> Option<&'a str> {
        headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        Self::first_header(&self.headers, &name.to_ascii_lowercase())
    }

    /// Returns the deprecation notice WordPress attaches in debug mode, if any.
    ///
    /// WordPress sends `X-WP-DeprecatedFunction` or `X-WP-DeprecatedParam`
    /// when a request touches deprecated behaviour.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-wp-deprecatedfunction")
            .or_else(|| self.header("x-wp-deprecatedparam"))
    }
}
