//! Path templating for resource URLs.
//!
//! Templates use `<name>` placeholders, e.g.
//! `products/<product_id>/resource_feedback.json`. A placeholder resolves
//! from the explicit call parameters first, then the instance's path
//! parameters, then the instance's fields.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ResourceError;
use crate::resource::Resource;
use crate::schema::{Operation, ResourceDef};

/// Named parameters supplied at call time. Entries not consumed by the path
/// template become query parameters on reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl fmt::Display) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// A parsed `<name>` template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> PathTemplate<'a> {
    pub fn parse(template: &'a str) -> Self {
        let mut segments = Vec::new();
        let mut rest = template;
        while let Some(start) = rest.find('<') {
            let Some(len) = rest[start..].find('>') else {
                break;
            };
            if start > 0 {
                segments.push(Segment::Literal(&rest[..start]));
            }
            segments.push(Segment::Placeholder(&rest[start + 1..start + len]));
            rest = &rest[start + len + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest));
        }
        Self { segments }
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(*name),
            Segment::Literal(_) => None,
        })
    }

    /// Resolve every placeholder or fail with the first missing name.
    pub fn resolve(
        &self,
        params: &Params,
        instance: Option<&Resource>,
    ) -> Result<String, ResourceError> {
        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Placeholder(name) => {
                    let value = lookup_param(name, params, instance)
                        .ok_or_else(|| ResourceError::MissingParameter(name.to_string()))?;
                    path.push_str(&encode_segment(name, &value)?);
                }
            }
        }
        Ok(path)
    }
}

/// Percent-encode `value` so it stays one path segment. Empty and dot
/// segments are rejected since URL normalization would move the request.
fn encode_segment(name: &str, value: &str) -> Result<String, ResourceError> {
    if matches!(value, "" | "." | "..") {
        return Err(ResourceError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(urlencoding::encode(value).into_owned())
}

fn lookup_param(name: &str, params: &Params, instance: Option<&Resource>) -> Option<String> {
    if let Some(value) = params.get(name) {
        return Some(value.to_string());
    }
    let instance = instance?;
    if let Some(value) = instance.path_params().get(name) {
        return Some(value.to_string());
    }
    instance.get(name).and_then(|v| v.to_param())
}

/// A resolved path plus the names of the placeholders it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: String,
    pub consumed: Vec<String>,
}

/// Pick the first template declared for `operation` whose placeholders all
/// resolve. When none do, the error names the first candidate's missing
/// parameter.
pub fn resolve(
    def: &ResourceDef,
    operation: Operation,
    params: &Params,
    instance: Option<&Resource>,
) -> Result<ResolvedPath, ResourceError> {
    let mut first_error = None;
    for path_def in def.paths_for(operation) {
        let template = PathTemplate::parse(path_def.template);
        match template.resolve(params, instance) {
            Ok(path) => {
                return Ok(ResolvedPath {
                    path,
                    consumed: template.placeholders().map(str::to_string).collect(),
                })
            }
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }
    Err(first_error.unwrap_or(ResourceError::UnsupportedOperation {
        resource: def.name,
        operation: operation.as_str(),
    }))
}
