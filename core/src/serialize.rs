//! Request body serialization.
//!
//! Emits `{ <singular>: { ... } }` with exactly the explicitly-set,
//! non-read-only fields. Nested objects are emitted without a root key and
//! follow their own definition's read-only flags.

use serde_json::{Map, Value};

use crate::resource::Resource;
use crate::schema::{self, FieldType, ResourceDef};
use crate::value::{FieldValue, Fields};

/// Serialize a resource into its wrapped request body.
pub fn to_body(resource: &Resource) -> Value {
    let def = resource.def();
    let mut root = Map::new();
    root.insert(
        def.singular.to_string(),
        Value::Object(writable_fields(def, resource.fields())),
    );
    Value::Object(root)
}

fn writable_fields(def: &ResourceDef, fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|(name, value)| {
            let field = def.field(name)?;
            if field.read_only {
                return None;
            }
            Some((name.to_string(), value_to_json(&field.ty, value)))
        })
        .collect()
}

fn value_to_json(ty: &FieldType, value: &FieldValue) -> Value {
    match (ty, value) {
        (FieldType::Object(nested), FieldValue::Object(fields)) => match schema::lookup(nested) {
            Ok(nested_def) => Value::Object(writable_fields(nested_def, fields)),
            Err(_) => value.to_json(),
        },
        (FieldType::List(inner), FieldValue::List(items)) => {
            Value::Array(items.iter().map(|item| value_to_json(inner, item)).collect())
        }
        _ => value.to_json(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resources::{PRODUCT, PRODUCT_RESOURCE_FEEDBACK};

    #[test]
    fn only_assigned_fields_are_emitted() {
        let mut feedback = Resource::new(&PRODUCT_RESOURCE_FEEDBACK);
        feedback.set_path_param("product_id", 632910392);
        feedback.set("state", "requires_action").unwrap();
        feedback
            .set("messages", vec!["Needs at least one image."])
            .unwrap();

        assert_eq!(
            to_body(&feedback),
            json!({
                "resource_feedback": {
                    "state": "requires_action",
                    "messages": ["Needs at least one image."]
                }
            })
        );
    }

    #[test]
    fn read_only_fields_are_never_emitted() {
        let mut feedback = Resource::new(&PRODUCT_RESOURCE_FEEDBACK);
        feedback.set("created_at", "2023-01-03T12:45:42-05:00").unwrap();
        feedback.set("resource_id", 632910392).unwrap();
        feedback.set("state", "success").unwrap();

        assert_eq!(
            to_body(&feedback),
            json!({ "resource_feedback": { "state": "success" } })
        );
    }

    #[test]
    fn empty_instance_serializes_to_empty_object() {
        let product = Resource::new(&PRODUCT);
        assert_eq!(to_body(&product), json!({ "product": {} }));
    }

    #[test]
    fn explicit_null_is_emitted() {
        let mut product = Resource::new(&PRODUCT);
        product.set("vendor", FieldValue::Null).unwrap();
        assert_eq!(to_body(&product), json!({ "product": { "vendor": null } }));
    }

    #[test]
    fn nested_objects_drop_their_read_only_fields() {
        let mut product = Resource::new(&PRODUCT);
        product.set("title", "Burton Custom Freestyle 151").unwrap();
        product
            .set(
                "images",
                vec![Fields::new()
                    .with("id", 850703190)
                    .with("src", "https://cdn.example/board.jpg")
                    .with("position", 1)],
            )
            .unwrap();

        assert_eq!(
            to_body(&product),
            json!({
                "product": {
                    "title": "Burton Custom Freestyle 151",
                    "images": [{ "src": "https://cdn.example/board.jpg", "position": 1 }]
                }
            })
        );
    }

    #[test]
    fn timestamps_are_emitted_verbatim() {
        let mut feedback = Resource::new(&PRODUCT_RESOURCE_FEEDBACK);
        feedback
            .set("feedback_generated_at", "2023-01-03T17:45:40.928568Z")
            .unwrap();
        feedback
            .set("resource_updated_at", "2023-01-03T12:21:36-05:00")
            .unwrap();

        let body = to_body(&feedback);
        assert_eq!(
            body["resource_feedback"]["feedback_generated_at"],
            "2023-01-03T17:45:40.928568Z"
        );
        assert_eq!(
            body["resource_feedback"]["resource_updated_at"],
            "2023-01-03T12:21:36-05:00"
        );
    }

    #[test]
    fn utc_offset_and_short_fraction_are_not_rewritten() {
        let mut feedback = Resource::new(&PRODUCT_RESOURCE_FEEDBACK);
        feedback
            .set("resource_updated_at", "2023-01-03T12:21:36+00:00")
            .unwrap();
        feedback
            .set("feedback_generated_at", "2023-01-03T17:45:40.5Z")
            .unwrap();

        assert_eq!(
            to_body(&feedback),
            json!({
                "resource_feedback": {
                    "resource_updated_at": "2023-01-03T12:21:36+00:00",
                    "feedback_generated_at": "2023-01-03T17:45:40.5Z"
                }
            })
        );
    }
}
