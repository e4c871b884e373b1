//! Recording transport for request/response assertions.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use resource_core::{HttpRequest, HttpResponse, Session, Transport, TransportError};
use serde_json::Value;

pub const DOMAIN: &str = "test-shop.myshopify.io";
pub const TOKEN: &str = "this_is_a_test_token";

pub fn session() -> Session {
    Session::new("1234", DOMAIN).with_access_token(TOKEN)
}

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_response(&self, status: u16, body: Value) {
        self.queue(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        });
    }

    pub fn queue(&self, response: HttpResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was made")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Network("no mock response queued".to_string()))
    }
}

/// Check method, domain, path, query, token header and JSON body of a
/// recorded request.
pub fn assert_request(
    request: &HttpRequest,
    method: &str,
    path: &str,
    query: &str,
    body: Option<Value>,
) {
    assert_eq!(request.method.as_str(), method, "method");
    assert_eq!(request.domain, DOMAIN, "domain");
    assert_eq!(request.path, path, "path");
    assert_eq!(request.query_string(), query, "query");
    assert_eq!(
        request.header("X-Shopify-Access-Token"),
        Some(TOKEN),
        "access token header"
    );
    let sent = request
        .body
        .as_deref()
        .map(|b| serde_json::from_str::<Value>(b).unwrap());
    assert_eq!(sent, body, "body");
}
