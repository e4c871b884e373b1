//! Resource instances: schema-checked field assignment plus path parameters.

use std::fmt;

use crate::error::ResourceError;
use crate::path::Params;
use crate::schema::{self, FieldType, ResourceDef};
use crate::value::{FieldValue, Fields};

/// A mutable instance of a resource definition.
///
/// Only explicitly assigned fields are tracked. Path parameters such as
/// `product_id` address the URL and are kept apart from the fields, so they
/// survive a `save` that replaces every field.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    def: &'static ResourceDef,
    fields: Fields,
    path_params: Params,
}

impl Resource {
    pub fn new(def: &'static ResourceDef) -> Self {
        Self {
            def,
            fields: Fields::new(),
            path_params: Params::new(),
        }
    }

    /// Construct an empty instance of a built-in resource by name.
    pub fn named(name: &str) -> Result<Self, ResourceError> {
        Ok(Self::new(schema::lookup(name)?))
    }

    pub(crate) fn from_fields(def: &'static ResourceDef, fields: Fields) -> Self {
        Self {
            def,
            fields,
            path_params: Params::new(),
        }
    }

    pub fn def(&self) -> &'static ResourceDef {
        self.def
    }

    /// Assign a field. The value must match the declared type; RFC 3339
    /// strings are accepted for timestamps. Read-only fields may be set but
    /// are never serialized.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<&mut Self, ResourceError> {
        let field = self.def.field(name).ok_or_else(|| ResourceError::UnknownField {
            resource: self.def.name,
            field: name.to_string(),
        })?;
        let value = validate(self.def, name, &field.ty, value.into())?;
        self.fields.insert(name.to_string(), value);
        Ok(self)
    }

    pub fn unset(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn set_path_param(&mut self, name: &str, value: impl fmt::Display) -> &mut Self {
        self.path_params.insert(name, value);
        self
    }

    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// The primary key value, if the definition has one and it is set to a
    /// non-null value.
    pub fn id(&self) -> Option<&FieldValue> {
        let key = self.def.primary_key?;
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// Whether `save` would create rather than update.
    pub fn is_new(&self) -> bool {
        self.id().is_none()
    }

    pub(crate) fn replace_fields(&mut self, fields: Fields) {
        self.fields = fields;
    }

    pub(crate) fn into_fields(self) -> Fields {
        self.fields
    }
}

/// Coerce and type-check `value`, recursing into nested objects and lists
/// with the nested definition's field types.
fn validate(
    def: &'static ResourceDef,
    name: &str,
    ty: &FieldType,
    value: FieldValue,
) -> Result<FieldValue, ResourceError> {
    let value = value.coerce(ty);
    if !value.matches(ty) {
        return Err(ResourceError::TypeMismatch {
            resource: def.name,
            field: name.to_string(),
            expected: ty.to_string(),
            found: value.kind().to_string(),
        });
    }
    match (ty, value) {
        (FieldType::Object(nested), FieldValue::Object(fields)) => {
            let nested_def = schema::lookup(nested)?;
            let mut checked = Fields::new();
            for (key, inner) in fields.iter() {
                let field = nested_def.field(key).ok_or_else(|| ResourceError::UnknownField {
                    resource: nested_def.name,
                    field: key.to_string(),
                })?;
                let inner = validate(nested_def, key, &field.ty, inner.clone())?;
                checked.insert(key.to_string(), inner);
            }
            Ok(FieldValue::Object(checked))
        }
        (FieldType::List(inner_ty), FieldValue::List(items)) => items
            .into_iter()
            .map(|item| validate(def, name, inner_ty, item))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::List),
        (_, value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{PRODUCT, PRODUCT_RESOURCE_FEEDBACK};

    #[test]
    fn new_instance_has_no_fields() {
        let feedback = Resource::new(&PRODUCT_RESOURCE_FEEDBACK);
        assert!(feedback.fields().is_empty());
        assert!(!feedback.is_set("state"));
    }

    #[test]
    fn set_tracks_assigned_fields() {
        let mut feedback = Resource::new(&PRODUCT_RESOURCE_FEEDBACK);
        feedback
            .set("state", "requires_action")
            .unwrap()
            .set("messages", vec!["Needs at least one image."])
            .unwrap();
        assert_eq!(feedback.get("state").and_then(FieldValue::as_str), Some("requires_action"));
        assert_eq!(feedback.fields().len(), 2);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut feedback = Resource::new(&PRODUCT_RESOURCE_FEEDBACK);
        let err = feedback.set("colour", "red").unwrap_err();
        assert!(matches!(err, ResourceError::UnknownField { field, .. } if field == "colour"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let mut feedback = Resource::new(&PRODUCT_RESOURCE_FEEDBACK);
        let err = feedback.set("state", 3).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::TypeMismatch { ref expected, ref found, .. }
                if expected == "string" && found == "integer"
        ));
        assert!(!feedback.is_set("state"));
    }

    #[test]
    fn timestamp_strings_are_parsed() {
        let mut feedback = Resource::new(&PRODUCT_RESOURCE_FEEDBACK);
        feedback
            .set("resource_updated_at", "2023-01-03T12:21:36-05:00")
            .unwrap();
        assert!(feedback.get("resource_updated_at").unwrap().as_timestamp().is_some());

        let err = feedback.set("resource_updated_at", "soon").unwrap_err();
        assert!(matches!(err, ResourceError::TypeMismatch { .. }));
    }

    #[test]
    fn nested_objects_are_checked_against_their_definition() {
        let mut product = Resource::new(&PRODUCT);
        product
            .set("images", vec![Fields::new().with("src", "https://cdn/a.png")])
            .unwrap();

        let err = product
            .set("image", Fields::new().with("src", 42))
            .unwrap_err();
        assert!(matches!(err, ResourceError::TypeMismatch { resource: "image", .. }));
    }

    #[test]
    fn id_decides_new_or_existing() {
        let mut product = Resource::new(&PRODUCT);
        assert!(product.is_new());
        product.set("id", FieldValue::Null).unwrap();
        assert!(product.is_new());
        product.set("id", 632910392).unwrap();
        assert!(!product.is_new());
        assert!(Resource::new(&PRODUCT_RESOURCE_FEEDBACK).is_new());
    }

    #[test]
    fn named_looks_up_definition() {
        let product = Resource::named("product").unwrap();
        assert_eq!(product.def().plural, "products");
        assert!(Resource::named("nope").is_err());
    }
}
