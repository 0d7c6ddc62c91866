// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Type resolution shared by all readers
//!
//! The type of a value is taken from, in order:
//! 1. the explicit type on the wire (`@odata.type`, `m:type`);
//! 2. the schema declaration of the property in its owning structured
//!    type, when a schema was supplied;
//! 3. the shape of the value ([`guess_json`]; Atom text is a string).
//!
//! The third tier is lossy: without a schema a JSON `0` stored in an
//! `Int64` property reads as `Int32`.

use crate::edm::EdmPrimitiveKind;
use crate::edm::EdmSchema;
use crate::edm::EdmType;
use crate::edm::TypeKind;
use crate::geo::geojson;
use crate::odata::collection_item_type;
use crate::odata::normalize_type_name;
use crate::odata::primitive_kind;
use serde_json::Value as JsonValue;

/// Shape of a JSON value without type information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    /// `null`.
    Null,
    /// Primitive of the guessed kind.
    Primitive(EdmPrimitiveKind),
    /// GeoJSON object.
    Geospatial,
    /// Any other object.
    Complex,
    /// Array.
    Collection,
}

/// Guess the type of an untyped JSON value.
#[must_use]
pub fn guess_json(value: &JsonValue) -> JsonShape {
    match value {
        JsonValue::Null => JsonShape::Null,
        JsonValue::Bool(_) => JsonShape::Primitive(EdmPrimitiveKind::Boolean),
        JsonValue::Number(n) => {
            let kind = match n.as_i64() {
                Some(v) if i32::try_from(v).is_ok() => EdmPrimitiveKind::Int32,
                Some(_) => EdmPrimitiveKind::Int64,
                None => EdmPrimitiveKind::Double,
            };
            JsonShape::Primitive(kind)
        }
        JsonValue::String(_) => JsonShape::Primitive(EdmPrimitiveKind::String),
        JsonValue::Object(_) if geojson::is_geojson(value) => JsonShape::Geospatial,
        JsonValue::Object(_) => JsonShape::Complex,
        JsonValue::Array(_) => JsonShape::Collection,
    }
}

/// Resolves types from explicit names, the optional schema and context
/// URLs.
#[derive(Clone, Copy, Default)]
pub struct TypeResolver<'s> {
    schema: Option<&'s dyn EdmSchema>,
}

impl<'s> TypeResolver<'s> {
    /// Create resolver over the schema.
    #[must_use]
    pub fn new(schema: Option<&'s dyn EdmSchema>) -> Self {
        Self { schema }
    }

    /// Whether a schema is available.
    #[must_use]
    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    /// Type named on the wire, in any spelling. Named types the schema
    /// does not know are taken as complex; readers treat a complex type
    /// with text content as an enumeration.
    #[must_use]
    pub fn named(&self, wire_name: &str) -> EdmType {
        let name = normalize_type_name(wire_name);
        if let Some(inner) = collection_item_type(&name) {
            return EdmType::Collection(Box::new(self.named(inner)));
        }
        if let Some(kind) = primitive_kind(&name) {
            return EdmType::Primitive(kind);
        }
        match self
            .schema
            .and_then(|s| s.resolve_type(&name))
            .map(|d| d.kind)
        {
            Some(TypeKind::Entity) => EdmType::Entity(name),
            Some(TypeKind::Enum) => EdmType::Enum(name),
            Some(TypeKind::Definition(kind)) => EdmType::Primitive(kind),
            Some(TypeKind::Complex) | None => EdmType::Complex(name),
        }
    }

    /// Whether the schema declares the name as an entity or complex type.
    /// Text content is never an enumeration member of such a type.
    #[must_use]
    pub fn is_structured(&self, name: &str) -> bool {
        matches!(
            self.schema.and_then(|s| s.resolve_type(name)).map(|d| d.kind),
            Some(TypeKind::Entity | TypeKind::Complex)
        )
    }

    /// Declared type of the property of the structured type.
    #[must_use]
    pub fn declared(&self, owner: Option<&str>, property: &str) -> Option<EdmType> {
        let owner = owner?;
        self.schema?.resolve_property_type(owner, property)
    }

    /// Explicit type if present, otherwise the declared type.
    #[must_use]
    pub fn resolve(
        &self,
        explicit: Option<&str>,
        owner: Option<&str>,
        property: &str,
    ) -> Option<EdmType> {
        match explicit {
            Some(name) => Some(self.named(name)),
            None => self.declared(owner, property),
        }
    }

    /// Type described by the context URL fragment: an entity set
    /// (`#People`, `#People/$entity`), a navigation or property path
    /// (`#People(1)/Friends`, `#People(1)/Name`) or a type name
    /// (`#NS.Person`, `#Collection(Edm.String)`).
    #[must_use]
    pub fn context_type(&self, context_url: &str) -> Option<EdmType> {
        let (_, fragment) = context_url.split_once('#')?;
        if fragment.starts_with("Collection(") || primitive_kind(fragment).is_some() {
            return Some(self.named(fragment));
        }
        let mut segments = fragment
            .split('/')
            .filter(|s| !s.is_empty() && !s.starts_with('$'));
        let first = strip_parens(segments.next()?);
        let mut current = match self.schema.and_then(|s| s.resolve_entity_set(first)) {
            Some(entity_type) => EdmType::Collection(Box::new(EdmType::Entity(entity_type))),
            None if first.contains('.') => self.named(first),
            None => return None,
        };
        for segment in segments {
            let owner = match &current {
                EdmType::Entity(name) | EdmType::Complex(name) => name.clone(),
                EdmType::Collection(inner) => match inner.as_ref() {
                    EdmType::Entity(name) | EdmType::Complex(name) => name.clone(),
                    _ => return None,
                },
                _ => return None,
            };
            current = self.declared(Some(&owner), strip_parens(segment))?;
        }
        match current {
            // `#People/$entity` names a single entity of the set.
            EdmType::Collection(inner) if fragment.ends_with("/$entity") => Some(*inner),
            current => Some(current),
        }
    }

    /// Entity type named by the context URL, for single entities and
    /// entity sets alike.
    #[must_use]
    pub fn context_entity_type(&self, context_url: &str) -> Option<String> {
        match self.context_type(context_url)? {
            EdmType::Entity(name) => Some(name),
            EdmType::Collection(inner) => match *inner {
                EdmType::Entity(name) => Some(name),
                _ => None,
            },
            EdmType::Complex(name) if self.schema.is_none() => Some(name),
            _ => None,
        }
    }
}

/// Property name at the end of a context URL path (`#People(1)/Name`).
#[must_use]
pub fn context_property_name(context_url: &str) -> Option<&str> {
    let (_, fragment) = context_url.split_once('#')?;
    let (_, last) = fragment.rsplit_once('/')?;
    (!last.is_empty() && !last.starts_with('$') && !last.contains('(')).then_some(last)
}

fn strip_parens(segment: &str) -> &str {
    segment.split('(').next().unwrap_or(segment)
}

/// Entity type of the navigation target, single or collection valued.
#[must_use]
pub fn navigation_target(t: &EdmType) -> Option<&str> {
    match t {
        EdmType::Entity(name) => Some(name),
        EdmType::Collection(inner) => navigation_target(inner),
        _ => None,
    }
}
