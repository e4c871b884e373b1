use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Product, ResourceFeedback};
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "this_is_a_test_token";
const BASE: &str = "/admin/api/2023-01";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Shopify-Access-Token", TOKEN)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Shopify-Access-Token", TOKEN)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri(format!("{BASE}/products.json"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert!(body["errors"].as_str().unwrap().contains("access token"));
}

// --- products ---

#[tokio::test]
async fn list_products_empty() {
    let resp = app()
        .oneshot(request("GET", &format!("{BASE}/products.json")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(http::header::LINK).is_none());
    let body: Value = body_json(resp).await;
    assert_eq!(body["products"], serde_json::json!([]));
}

#[tokio::test]
async fn create_product_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("{BASE}/products.json"),
            r#"{"product":{"title":"Burton Custom Freestyle 151","vendor":"Burton"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    let product: Product = serde_json::from_value(body["product"].clone()).unwrap();
    assert_eq!(product.id, 632910392);
    assert_eq!(product.handle, "burton-custom-freestyle-151");
    assert_eq!(product.vendor.as_deref(), Some("Burton"));
    assert_eq!(product.created_at, product.updated_at);
}

#[tokio::test]
async fn create_product_without_title_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("{BASE}/products.json"),
            r#"{"product":{"vendor":"Burton"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"]["title"][0], "can't be blank");
}

#[tokio::test]
async fn get_product_not_found() {
    let resp = app()
        .oneshot(request("GET", &format!("{BASE}/products/1.json")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_product_without_json_suffix_is_not_found() {
    let resp = app()
        .oneshot(request("GET", &format!("{BASE}/products/1")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_product_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            &format!("{BASE}/products/1.json"),
            r#"{"product":{"title":"Nope"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_product_not_found() {
    let resp = app()
        .oneshot(request("DELETE", &format!("{BASE}/products/1.json")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- resource feedback ---

#[tokio::test]
async fn feedback_for_unknown_product_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("{BASE}/products/1/resource_feedback.json"),
            r#"{"resource_feedback":{"state":"success"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn product_and_feedback_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two products
    for title in ["Snowboard", "Wax"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                &format!("{BASE}/products.json"),
                &format!(r#"{{"product":{{"title":"{title}"}}}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    let id = 632910392;

    // count
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("{BASE}/products/count.json")))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["count"], 2);

    // first page of one, with a next link
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("{BASE}/products.json?limit=1")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let link = resp.headers()[http::header::LINK].to_str().unwrap().to_string();
    assert!(link.contains(&format!("page_info={id}")));
    assert!(link.ends_with("rel=\"next\""));
    let body: Value = body_json(resp).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 1);
    assert_eq!(body["products"][0]["title"], "Snowboard");

    // second page, no further link
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request(
            "GET",
            &format!("{BASE}/products.json?limit=1&page_info={id}"),
        ))
        .await
        .unwrap();
    assert!(resp.headers().get(http::header::LINK).is_none());
    let body: Value = body_json(resp).await;
    assert_eq!(body["products"][0]["title"], "Wax");

    // partial update keeps other fields
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("{BASE}/products/{id}.json"),
            r#"{"product":{"vendor":"Burton"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    let updated: Product = serde_json::from_value(body["product"].clone()).unwrap();
    assert_eq!(updated.title, "Snowboard");
    assert_eq!(updated.vendor.as_deref(), Some("Burton"));

    // feedback: invalid state
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("{BASE}/products/{id}/resource_feedback.json"),
            r#"{"resource_feedback":{"state":"broken"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // feedback: requires_action with a message
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("{BASE}/products/{id}/resource_feedback.json"),
            r#"{"resource_feedback":{"state":"requires_action","messages":["Needs at least one image."],"resource_updated_at":"2023-01-03T12:21:36-05:00"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body: Value = body_json(resp).await;
    let feedback: ResourceFeedback =
        serde_json::from_value(body["resource_feedback"].clone()).unwrap();
    assert_eq!(feedback.resource_id, id);
    assert_eq!(feedback.resource_type, "Product");
    assert_eq!(feedback.messages, vec!["Needs at least one image."]);
    assert!(feedback.feedback_generated_at.is_some());

    // feedback list holds the latest entry only
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request(
            "GET",
            &format!("{BASE}/products/{id}/resource_feedback.json"),
        ))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    let list: Vec<ResourceFeedback> =
        serde_json::from_value(body["resource_feedback"].clone()).unwrap();
    assert_eq!(list, vec![feedback]);

    // delete, then the product and its feedback are gone
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("{BASE}/products/{id}.json")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"{}");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request(
            "GET",
            &format!("{BASE}/products/{id}/resource_feedback.json"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
