//! Typed REST resource mapping for the Admin API.
//!
//! # Overview
//! Maps schema-described resource instances onto REST endpoints: path
//! templating, partial-field request bodies, and response bodies parsed back
//! into the same typed shape.
//!
//! # Design
//! - `RestClient` is stateless apart from its `ClientConfig`.
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), so the I/O boundary is explicit.
//!   The async `save`/`all`/`find`/`delete`/`count` methods run the pair
//!   through a caller-supplied `Transport`.
//! - Session and transport are passed to every operation; nothing is global.
//! - Root keys, read-only flags and path templates are data on the
//!   `ResourceDef`, declared in `resources`.

pub mod client;
pub mod config;
pub mod deserialize;
pub mod error;
pub mod http;
pub mod pagination;
pub mod path;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod serialize;
pub mod session;
pub mod transport;
pub mod value;

pub use client::RestClient;
pub use config::{ApiVersion, ClientConfig};
pub use error::{ConfigError, ResourceError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pagination::{Page, PageInfo};
pub use path::Params;
pub use resource::Resource;
pub use schema::{FieldDef, FieldType, Operation, PathDef, ResourceDef};
pub use session::Session;
pub use transport::{ReqwestTransport, Transport};
pub use value::{FieldValue, Fields, Timestamp};
