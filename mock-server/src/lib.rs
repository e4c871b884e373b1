//! In-memory Admin API used by integration tests.
//!
//! Serves products (full CRUD, count, cursor pagination) and per-product
//! resource feedback under `/admin/api/{version}/`. Every route requires an
//! `X-Shopify-Access-Token` header.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 250;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    pub handle: String,
    pub status: String,
    pub tags: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Writable product attributes. Absent fields are left unchanged on update.
#[derive(Debug, Default, Deserialize)]
pub struct ProductInput {
    pub title: Option<String>,
    pub body_html: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub handle: Option<String>,
    pub status: Option<String>,
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub product: ProductInput,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResourceFeedback {
    pub created_at: String,
    pub updated_at: String,
    pub resource_id: i64,
    pub resource_type: String,
    pub resource_updated_at: Option<String>,
    pub messages: Vec<String>,
    pub feedback_generated_at: Option<String>,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackInput {
    pub state: Option<String>,
    #[serde(default)]
    pub messages: Vec<String>,
    pub resource_updated_at: Option<String>,
    pub feedback_generated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
    pub resource_feedback: FeedbackInput,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    pub page_info: Option<String>,
}

#[derive(Debug)]
pub struct Store {
    products: BTreeMap<i64, Product>,
    /// Latest feedback per product id.
    feedback: HashMap<i64, ResourceFeedback>,
    next_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            products: BTreeMap::new(),
            feedback: HashMap::new(),
            next_id: 632910392,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route(
            "/admin/api/{version}/products.json",
            get(list_products).post(create_product),
        )
        .route("/admin/api/{version}/products/count.json", get(count_products))
        .route(
            "/admin/api/{version}/products/{product_id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route(
            "/admin/api/{version}/products/{product_id}/resource_feedback.json",
            get(list_feedback).post(create_feedback),
        )
        .layer(middleware::from_fn(require_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_token(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.is_empty());
    if !authorized {
        return error(
            StatusCode::UNAUTHORIZED,
            json!("[API] Invalid API key or access token (unrecognized login or wrong password)"),
        );
    }
    next.run(request).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn error(status: StatusCode, errors: Value) -> Response {
    (status, Json(json!({ "errors": errors }))).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, json!("Not Found"))
}

/// `632910392.json` -> `632910392`.
fn parse_item_id(file: &str) -> Option<i64> {
    file.strip_suffix(".json")?.parse().ok()
}

fn handle_for(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

async fn list_products(
    State(db): State<Db>,
    Path(version): Path<String>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let after = params
        .page_info
        .as_deref()
        .and_then(|cursor| cursor.parse::<i64>().ok());

    let store = db.read().await;
    let mut remaining = store
        .products
        .range(after.map_or(i64::MIN, |id| id.saturating_add(1))..)
        .map(|(_, p)| p.clone());
    let page: Vec<Product> = remaining.by_ref().take(limit).collect();
    let has_more = remaining.next().is_some();

    let mut response = Json(json!({ "products": page })).into_response();
    if let (true, Some(last)) = (has_more, page.last()) {
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");
        let link = format!(
            "<http://{host}/admin/api/{version}/products.json?limit={limit}&page_info={}>; rel=\"next\"",
            last.id
        );
        if let Ok(value) = link.parse() {
            response.headers_mut().insert(header::LINK, value);
        }
    }
    response
}

async fn count_products(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    Json(json!({ "count": store.products.len() }))
}

async fn create_product(State(db): State<Db>, Json(body): Json<ProductBody>) -> Response {
    let input = body.product;
    let Some(title) = input.title.filter(|t| !t.trim().is_empty()) else {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "title": ["can't be blank"] }),
        );
    };

    let mut store = db.write().await;
    let id = store.next_id;
    store.next_id += 1;
    let timestamp = now();
    let product = Product {
        id,
        handle: input.handle.unwrap_or_else(|| handle_for(&title)),
        title,
        body_html: input.body_html,
        vendor: input.vendor,
        product_type: input.product_type,
        status: input.status.unwrap_or_else(|| "active".to_string()),
        tags: input.tags.unwrap_or_default(),
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    store.products.insert(id, product.clone());
    tracing::info!(id, "product created");
    (StatusCode::CREATED, Json(json!({ "product": product }))).into_response()
}

async fn get_product(State(db): State<Db>, Path((_version, file)): Path<(String, String)>) -> Response {
    let Some(id) = parse_item_id(&file) else {
        return not_found();
    };
    let store = db.read().await;
    match store.products.get(&id) {
        Some(product) => Json(json!({ "product": product })).into_response(),
        None => not_found(),
    }
}

async fn update_product(
    State(db): State<Db>,
    Path((_version, file)): Path<(String, String)>,
    Json(body): Json<ProductBody>,
) -> Response {
    let Some(id) = parse_item_id(&file) else {
        return not_found();
    };
    let mut store = db.write().await;
    let Some(product) = store.products.get_mut(&id) else {
        return not_found();
    };
    let input = body.product;
    if let Some(title) = input.title {
        product.title = title;
    }
    if input.body_html.is_some() {
        product.body_html = input.body_html;
    }
    if input.vendor.is_some() {
        product.vendor = input.vendor;
    }
    if input.product_type.is_some() {
        product.product_type = input.product_type;
    }
    if let Some(handle) = input.handle {
        product.handle = handle;
    }
    if let Some(status) = input.status {
        product.status = status;
    }
    if let Some(tags) = input.tags {
        product.tags = tags;
    }
    product.updated_at = now();
    tracing::info!(id, "product updated");
    Json(json!({ "product": product })).into_response()
}

async fn delete_product(
    State(db): State<Db>,
    Path((_version, file)): Path<(String, String)>,
) -> Response {
    let Some(id) = parse_item_id(&file) else {
        return not_found();
    };
    let mut store = db.write().await;
    if store.products.remove(&id).is_none() {
        return not_found();
    }
    store.feedback.remove(&id);
    tracing::info!(id, "product deleted");
    Json(json!({})).into_response()
}

async fn list_feedback(
    State(db): State<Db>,
    Path((_version, product_id)): Path<(String, i64)>,
) -> Response {
    let store = db.read().await;
    if !store.products.contains_key(&product_id) {
        return not_found();
    }
    let feedback: Vec<&ResourceFeedback> = store.feedback.get(&product_id).into_iter().collect();
    Json(json!({ "resource_feedback": feedback })).into_response()
}

/// Replaces any earlier feedback for the product.
async fn create_feedback(
    State(db): State<Db>,
    Path((_version, product_id)): Path<(String, i64)>,
    Json(body): Json<FeedbackBody>,
) -> Response {
    let input = body.resource_feedback;
    let state = match input.state.as_deref() {
        Some(state @ ("requires_action" | "success")) => state.to_string(),
        _ => {
            return error(
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "state": ["is not included in the list"] }),
            )
        }
    };
    if state == "requires_action" && input.messages.is_empty() {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "messages": ["can't be blank when state is requires_action"] }),
        );
    }

    let mut store = db.write().await;
    if !store.products.contains_key(&product_id) {
        return not_found();
    }
    let timestamp = now();
    let feedback = ResourceFeedback {
        created_at: timestamp.clone(),
        updated_at: timestamp.clone(),
        resource_id: product_id,
        resource_type: "Product".to_string(),
        resource_updated_at: input.resource_updated_at,
        messages: input.messages,
        feedback_generated_at: input.feedback_generated_at.or(Some(timestamp)),
        state,
    };
    store.feedback.insert(product_id, feedback.clone());
    tracing::info!(product_id, state = %feedback.state, "resource feedback recorded");
    (
        StatusCode::ACCEPTED,
        Json(json!({ "resource_feedback": feedback })),
    )
        .into_response()
}
