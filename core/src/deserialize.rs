//! Response body deserialization into resource instances.

use serde_json::{Map, Value};

use crate::error::ResourceError;
use crate::resource::Resource;
use crate::schema::{self, FieldType, ResourceDef};
use crate::value::{FieldValue, Fields, Timestamp};

/// Parse a response body into JSON, treating an empty body as a shape error
/// for `root_key`.
pub fn parse_body(body: &str, root_key: &str) -> Result<Value, ResourceError> {
    if body.trim().is_empty() {
        return Err(shape_error(root_key, "empty response body"));
    }
    serde_json::from_str(body).map_err(|e| shape_error(root_key, &e.to_string()))
}

/// Deserialize `{ <singular>: { ... } }` into one fully populated instance.
pub fn one(def: &'static ResourceDef, body: &Value) -> Result<Resource, ResourceError> {
    let root = root_value(body, def.singular)?;
    let object = root
        .as_object()
        .ok_or_else(|| shape_error(def.singular, &format!("expected object, got {}", json_kind(root))))?;
    let fields = fields_from_json(def, object).map_err(|detail| shape_error(def.singular, &detail))?;
    Ok(Resource::from_fields(def, fields))
}

/// Deserialize `{ <plural>: [ ... ] }` into one instance per element, in
/// response order.
pub fn many(def: &'static ResourceDef, body: &Value) -> Result<Vec<Resource>, ResourceError> {
    let root = root_value(body, def.plural)?;
    let items = root
        .as_array()
        .ok_or_else(|| shape_error(def.plural, &format!("expected array, got {}", json_kind(root))))?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| -> Result<Resource, ResourceError> {
            let object = item.as_object().ok_or_else(|| {
                shape_error(def.plural, &format!("element {index} is {}", json_kind(item)))
            })?;
            let fields = fields_from_json(def, object)
                .map_err(|detail| shape_error(def.plural, &format!("element {index}: {detail}")))?;
            Ok(Resource::from_fields(def, fields))
        })
        .collect()
}

fn root_value<'a>(body: &'a Value, root_key: &str) -> Result<&'a Value, ResourceError> {
    let object = body
        .as_object()
        .ok_or_else(|| shape_error(root_key, &format!("body is {}", json_kind(body))))?;
    object
        .get(root_key)
        .ok_or_else(|| shape_error(root_key, "root key missing"))
}

/// Declared keys are converted to their schema type; undeclared keys are
/// kept as raw JSON.
fn fields_from_json(def: &ResourceDef, object: &Map<String, Value>) -> Result<Fields, String> {
    let mut fields = Fields::new();
    for (name, json) in object {
        let value = match def.field(name) {
            Some(field) => json_to_value(&field.ty, json)
                .ok_or_else(|| format!("field {name} expects {}, got {}", field.ty, json_kind(json)))?,
            None => FieldValue::Raw(json.clone()),
        };
        fields.insert(name.clone(), value);
    }
    Ok(fields)
}

fn json_to_value(ty: &FieldType, json: &Value) -> Option<FieldValue> {
    if json.is_null() {
        return Some(FieldValue::Null);
    }
    match ty {
        FieldType::String => json.as_str().map(FieldValue::from),
        FieldType::Integer => json.as_i64().map(FieldValue::Integer),
        FieldType::Float => json.as_f64().map(FieldValue::Float),
        FieldType::Boolean => json.as_bool().map(FieldValue::Boolean),
        FieldType::Timestamp => json.as_str().and_then(Timestamp::parse).map(FieldValue::Timestamp),
        FieldType::Object(nested) => {
            let nested_def = schema::lookup(nested).ok()?;
            let object = json.as_object()?;
            fields_from_json(nested_def, object).ok().map(FieldValue::Object)
        }
        FieldType::List(inner) => json
            .as_array()?
            .iter()
            .map(|item| json_to_value(inner, item))
            .collect::<Option<Vec<_>>>()
            .map(FieldValue::List),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn shape_error(root_key: &str, detail: &str) -> ResourceError {
    ResourceError::UnexpectedShape {
        root_key: root_key.to_string(),
        detail: detail.to_string(),
    }
}
