//! The shop a request is addressed to and the credential it carries.

/// Header carrying the Admin API access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// A shop session. Token acquisition and storage happen elsewhere; this is
/// only what a request needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Caller-side handle for telling sessions apart, e.g. when storing them.
    /// Never sent with a request.
    pub id: String,
    /// Shop host, e.g. `test-shop.myshopify.io`. A port may be included when
    /// talking to a local server.
    pub shop: String,
    pub access_token: Option<String>,
}

impl Session {
    pub fn new(id: &str, shop: &str) -> Self {
        Self {
            id: id.to_string(),
            shop: shop.to_string(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }
}
