//! Built-in resource definitions for the `2023-01` Admin API.

use crate::schema::{FieldDef, FieldType, Operation, PathDef, ResourceDef};

pub static ALL: &[&ResourceDef] = &[&PRODUCT_RESOURCE_FEEDBACK, &PRODUCT, &IMAGE];

/// Feedback a sales channel reports against a product. Create and list
/// only, nested under the owning product.
pub static PRODUCT_RESOURCE_FEEDBACK: ResourceDef = ResourceDef {
    name: "product_resource_feedback",
    singular: "resource_feedback",
    plural: "resource_feedback",
    primary_key: None,
    fields: &[
        FieldDef::read_only("created_at", FieldType::Timestamp),
        FieldDef::read_only("updated_at", FieldType::Timestamp),
        FieldDef::read_only("resource_id", FieldType::Integer),
        FieldDef::read_only("resource_type", FieldType::String),
        FieldDef::writable("resource_updated_at", FieldType::Timestamp),
        FieldDef::writable("messages", FieldType::List(&FieldType::String)),
        FieldDef::writable("feedback_generated_at", FieldType::Timestamp),
        FieldDef::writable("state", FieldType::String),
    ],
    paths: &[
        PathDef::new(Operation::All, "products/<product_id>/resource_feedback.json"),
        PathDef::new(Operation::Create, "products/<product_id>/resource_feedback.json"),
    ],
};

pub static PRODUCT: ResourceDef = ResourceDef {
    name: "product",
    singular: "product",
    plural: "products",
    primary_key: Some("id"),
    fields: &[
        FieldDef::read_only("id", FieldType::Integer),
        FieldDef::writable("title", FieldType::String),
        FieldDef::writable("body_html", FieldType::String),
        FieldDef::writable("vendor", FieldType::String),
        FieldDef::writable("product_type", FieldType::String),
        FieldDef::writable("handle", FieldType::String),
        FieldDef::writable("status", FieldType::String),
        FieldDef::writable("tags", FieldType::String),
        FieldDef::writable("published_at", FieldType::Timestamp),
        FieldDef::writable("images", FieldType::List(&FieldType::Object("image"))),
        FieldDef::writable("image", FieldType::Object("image")),
        FieldDef::read_only("created_at", FieldType::Timestamp),
        FieldDef::read_only("updated_at", FieldType::Timestamp),
    ],
    paths: &[
        PathDef::new(Operation::All, "products.json"),
        PathDef::new(Operation::Count, "products/count.json"),
        PathDef::new(Operation::Find, "products/<id>.json"),
        PathDef::new(Operation::Create, "products.json"),
        PathDef::new(Operation::Update, "products/<id>.json"),
        PathDef::new(Operation::Delete, "products/<id>.json"),
    ],
};

pub static IMAGE: ResourceDef = ResourceDef {
    name: "image",
    singular: "image",
    plural: "images",
    primary_key: Some("id"),
    fields: &[
        FieldDef::read_only("id", FieldType::Integer),
        FieldDef::read_only("product_id", FieldType::Integer),
        FieldDef::writable("position", FieldType::Integer),
        FieldDef::writable("src", FieldType::String),
        FieldDef::writable("alt", FieldType::String),
        FieldDef::read_only("width", FieldType::Integer),
        FieldDef::read_only("height", FieldType::Integer),
        FieldDef::read_only("created_at", FieldType::Timestamp),
        FieldDef::read_only("updated_at", FieldType::Timestamp),
    ],
    paths: &[
        PathDef::new(Operation::All, "products/<product_id>/images.json"),
        PathDef::new(Operation::Count, "products/<product_id>/images/count.json"),
        PathDef::new(Operation::Find, "products/<product_id>/images/<id>.json"),
        PathDef::new(Operation::Create, "products/<product_id>/images.json"),
        PathDef::new(Operation::Update, "products/<product_id>/images/<id>.json"),
        PathDef::new(Operation::Delete, "products/<product_id>/images/<id>.json"),
    ],
};
