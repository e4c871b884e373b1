//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! `RestClient::build_*` methods produce an `HttpRequest` and the
//! `parse_*` methods consume an `HttpResponse`; whatever executes the
//! round-trip in between (a `Transport`, or a test harness) is outside the
//! mapping layer.
//!
//! All fields use owned types so requests can be recorded and compared in
//! tests without lifetime concerns.

use std::fmt;

use reqwest::Url;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// `https` in production, `http` against a local mock server.
    pub scheme: String,
    /// Host (and optional port) of the shop, e.g. `test-shop.myshopify.io`.
    pub domain: String,
    /// Absolute path, e.g. `/admin/api/2023-01/products.json`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Full URL with the query string percent-encoded.
    pub fn url(&self) -> String {
        let base = format!("{}://{}{}", self.scheme, self.domain, self.path);
        match Url::parse(&base) {
            Ok(mut url) => {
                if !self.query.is_empty() {
                    url.query_pairs_mut().extend_pairs(self.query.iter());
                }
                url.to_string()
            }
            Err(_) => base,
        }
    }

    /// Query string without the leading `?`; empty when there is none.
    pub fn query_string(&self) -> String {
        Url::parse(&self.url())
            .ok()
            .and_then(|url| url.query().map(str::to_string))
            .unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
