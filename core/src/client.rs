//! Resource operations: `save`, `all`, `find`, `delete` and `count`.
//!
//! # Design
//! `RestClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`, both free of I/O. The async methods compose the two
//! through a `Transport` passed in by the caller, and only touch the
//! resource instance after the whole round-trip has succeeded.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::deserialize;
use crate::error::{ResourceError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::pagination::{Page, PageInfo};
use crate::path::{self, Params, ResolvedPath};
use crate::resource::Resource;
use crate::schema::{Operation, ResourceDef};
use crate::serialize;
use crate::session::{Session, ACCESS_TOKEN_HEADER};
use crate::transport::Transport;

#[derive(Debug, Clone, Default)]
pub struct RestClient {
    config: ClientConfig,
}

impl RestClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ---- request builders ----

    /// POST to the collection path for a new instance, PUT to the item path
    /// when the primary key is set. The body holds only assigned, writable
    /// fields.
    pub fn build_save(
        &self,
        session: &Session,
        resource: &Resource,
        params: &Params,
    ) -> Result<HttpRequest, ResourceError> {
        let (operation, method) = if resource.is_new() {
            (Operation::Create, HttpMethod::Post)
        } else {
            (Operation::Update, HttpMethod::Put)
        };
        let resolved = path::resolve(resource.def(), operation, params, Some(resource))?;
        let body = serde_json::to_string(&serialize::to_body(resource))
            .map_err(|e| ResourceError::Serialization(e.to_string()))?;
        Ok(self.request(session, method, &resolved, Vec::new(), Some(body)))
    }

    /// GET the collection path. Parameters the path does not consume are
    /// sent as query parameters.
    pub fn build_all(
        &self,
        session: &Session,
        def: &ResourceDef,
        params: &Params,
    ) -> Result<HttpRequest, ResourceError> {
        let resolved = path::resolve(def, Operation::All, params, None)?;
        let query = leftover_query(params, &resolved);
        Ok(self.request(session, HttpMethod::Get, &resolved, query, None))
    }

    pub fn build_find(
        &self,
        session: &Session,
        def: &ResourceDef,
        params: &Params,
    ) -> Result<HttpRequest, ResourceError> {
        let resolved = path::resolve(def, Operation::Find, params, None)?;
        let query = leftover_query(params, &resolved);
        Ok(self.request(session, HttpMethod::Get, &resolved, query, None))
    }

    pub fn build_count(
        &self,
        session: &Session,
        def: &ResourceDef,
        params: &Params,
    ) -> Result<HttpRequest, ResourceError> {
        let resolved = path::resolve(def, Operation::Count, params, None)?;
        let query = leftover_query(params, &resolved);
        Ok(self.request(session, HttpMethod::Get, &resolved, query, None))
    }

    /// DELETE the item path, resolved from `params` first and the instance
    /// second.
    pub fn build_delete(
        &self,
        session: &Session,
        resource: &Resource,
        params: &Params,
    ) -> Result<HttpRequest, ResourceError> {
        let resolved = path::resolve(resource.def(), Operation::Delete, params, Some(resource))?;
        Ok(self.request(session, HttpMethod::Delete, &resolved, Vec::new(), None))
    }

    // ---- response parsers ----

    pub fn parse_save(
        &self,
        def: &'static ResourceDef,
        response: HttpResponse,
    ) -> Result<Resource, ResourceError> {
        check_status(&response)?;
        let body = deserialize::parse_body(&response.body, def.singular)?;
        deserialize::one(def, &body)
    }

    pub fn parse_all(
        &self,
        def: &'static ResourceDef,
        response: HttpResponse,
    ) -> Result<Page, ResourceError> {
        check_status(&response)?;
        let body = deserialize::parse_body(&response.body, def.plural)?;
        let items = deserialize::many(def, &body)?;
        let page_info = PageInfo::from_link_header(response.header("link"));
        tracing::debug!(resource = def.name, count = items.len(), "parsed list response");
        Ok(Page { items, page_info })
    }

    /// A 404 becomes `ResourceError::NotFound`; every other failure passes
    /// through unchanged.
    pub fn parse_find(
        &self,
        def: &'static ResourceDef,
        response: HttpResponse,
    ) -> Result<Resource, ResourceError> {
        match check_status(&response) {
            Err(TransportError::NotFound { .. }) => return Err(ResourceError::NotFound(def.name)),
            other => other?,
        }
        let body = deserialize::parse_body(&response.body, def.singular)?;
        deserialize::one(def, &body)
    }

    pub fn parse_count(&self, response: HttpResponse) -> Result<u64, ResourceError> {
        check_status(&response)?;
        let body = deserialize::parse_body(&response.body, "count")?;
        body.get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| ResourceError::UnexpectedShape {
                root_key: "count".to_string(),
                detail: "expected a non-negative integer".to_string(),
            })
    }

    /// The response body is discarded.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ResourceError> {
        check_status(&response)?;
        Ok(())
    }

    // ---- round-trips ----

    /// Create or update `resource`. On success every field is replaced by
    /// the server's copy; on failure the instance is left as it was.
    pub async fn save<T: Transport + ?Sized>(
        &self,
        transport: &T,
        session: &Session,
        resource: &mut Resource,
        params: &Params,
    ) -> Result<(), ResourceError> {
        let request = self.build_save(session, resource, params)?;
        let response = transport.execute(request).await?;
        let saved = self.parse_save(resource.def(), response)?;
        resource.replace_fields(saved.into_fields());
        Ok(())
    }

    pub async fn all<T: Transport + ?Sized>(
        &self,
        transport: &T,
        session: &Session,
        def: &'static ResourceDef,
        params: &Params,
    ) -> Result<Page, ResourceError> {
        let request = self.build_all(session, def, params)?;
        let response = transport.execute(request).await?;
        self.parse_all(def, response)
    }

    pub async fn find<T: Transport + ?Sized>(
        &self,
        transport: &T,
        session: &Session,
        def: &'static ResourceDef,
        params: &Params,
    ) -> Result<Resource, ResourceError> {
        let request = self.build_find(session, def, params)?;
        let response = transport.execute(request).await?;
        self.parse_find(def, response)
    }

    pub async fn count<T: Transport + ?Sized>(
        &self,
        transport: &T,
        session: &Session,
        def: &'static ResourceDef,
        params: &Params,
    ) -> Result<u64, ResourceError> {
        let request = self.build_count(session, def, params)?;
        let response = transport.execute(request).await?;
        self.parse_count(response)
    }

    pub async fn delete<T: Transport + ?Sized>(
        &self,
        transport: &T,
        session: &Session,
        resource: &Resource,
        params: &Params,
    ) -> Result<(), ResourceError> {
        let request = self.build_delete(session, resource, params)?;
        let response = transport.execute(request).await?;
        self.parse_delete(response)
    }

    // ---- private helpers ----

    fn request(
        &self,
        session: &Session,
        method: HttpMethod,
        resolved: &ResolvedPath,
        query: Vec<(String, String)>,
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), self.config.user_agent.clone()),
        ];
        if let Some(token) = &session.access_token {
            headers.push((ACCESS_TOKEN_HEADER.to_string(), token.clone()));
        }
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let path = format!("/admin/api/{}/{}", self.config.api_version, resolved.path);
        tracing::debug!(%method, session = %session.id, shop = %session.shop, %path, "built request");

        HttpRequest {
            method,
            scheme: self.config.scheme.clone(),
            domain: session.shop.clone(),
            path,
            query,
            headers,
            body,
        }
    }
}

fn leftover_query(params: &Params, resolved: &ResolvedPath) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(name, _)| !resolved.consumed.iter().any(|c| c == name))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Map non-2xx status codes to the matching `TransportError` variant.
fn check_status(response: &HttpResponse) -> Result<(), TransportError> {
    if response.is_success() {
        return Ok(());
    }
    tracing::warn!(status = response.status, "request failed");
    let body = response.body.clone();
    Err(match response.status {
        404 => TransportError::NotFound { body },
        401 | 403 => TransportError::Unauthorized {
            status: response.status,
            body,
        },
        429 => TransportError::RateLimited {
            retry_after: response
                .header("retry-after")
                .and_then(|v| v.trim().parse().ok()),
            body,
        },
        status @ 500..=599 => TransportError::Server { status, body },
        status => TransportError::Http { status, body },
    })
}
