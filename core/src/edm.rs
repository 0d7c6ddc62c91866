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

//! Entity Data Model lookup
//!
//! The codec never parses `$metadata` itself. It consults an
//! [`EdmSchema`] supplied by the caller (if any) to recover property types
//! that the wire payload does not state. [`MapSchema`] is a small
//! in-memory implementation that can be filled by hand or by a CSDL reader.
//!
//! References:
//! - OASIS OData 4.01 CSDL: Primitive types, structured types
//!

use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;

/// EDM primitive type taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum EdmPrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    TimeOfDay,
    Geography,
    GeographyPoint,
    GeographyLineString,
    GeographyPolygon,
    GeographyMultiPoint,
    GeographyMultiLineString,
    GeographyMultiPolygon,
    GeographyCollection,
    Geometry,
    GeometryPoint,
    GeometryLineString,
    GeometryPolygon,
    GeometryMultiPoint,
    GeometryMultiLineString,
    GeometryMultiPolygon,
    GeometryCollection,
}

const ALL_KINDS: [EdmPrimitiveKind; 33] = [
    EdmPrimitiveKind::Binary,
    EdmPrimitiveKind::Boolean,
    EdmPrimitiveKind::Byte,
    EdmPrimitiveKind::Date,
    EdmPrimitiveKind::DateTimeOffset,
    EdmPrimitiveKind::Decimal,
    EdmPrimitiveKind::Double,
    EdmPrimitiveKind::Duration,
    EdmPrimitiveKind::Guid,
    EdmPrimitiveKind::Int16,
    EdmPrimitiveKind::Int32,
    EdmPrimitiveKind::Int64,
    EdmPrimitiveKind::SByte,
    EdmPrimitiveKind::Single,
    EdmPrimitiveKind::Stream,
    EdmPrimitiveKind::String,
    EdmPrimitiveKind::TimeOfDay,
    EdmPrimitiveKind::Geography,
    EdmPrimitiveKind::GeographyPoint,
    EdmPrimitiveKind::GeographyLineString,
    EdmPrimitiveKind::GeographyPolygon,
    EdmPrimitiveKind::GeographyMultiPoint,
    EdmPrimitiveKind::GeographyMultiLineString,
    EdmPrimitiveKind::GeographyMultiPolygon,
    EdmPrimitiveKind::GeographyCollection,
    EdmPrimitiveKind::Geometry,
    EdmPrimitiveKind::GeometryPoint,
    EdmPrimitiveKind::GeometryLineString,
    EdmPrimitiveKind::GeometryPolygon,
    EdmPrimitiveKind::GeometryMultiPoint,
    EdmPrimitiveKind::GeometryMultiLineString,
    EdmPrimitiveKind::GeometryMultiPolygon,
    EdmPrimitiveKind::GeometryCollection,
];

impl EdmPrimitiveKind {
    /// Simple name without the `Edm.` namespace.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Date => "Date",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Decimal => "Decimal",
            Self::Double => "Double",
            Self::Duration => "Duration",
            Self::Guid => "Guid",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::SByte => "SByte",
            Self::Single => "Single",
            Self::Stream => "Stream",
            Self::String => "String",
            Self::TimeOfDay => "TimeOfDay",
            Self::Geography => "Geography",
            Self::GeographyPoint => "GeographyPoint",
            Self::GeographyLineString => "GeographyLineString",
            Self::GeographyPolygon => "GeographyPolygon",
            Self::GeographyMultiPoint => "GeographyMultiPoint",
            Self::GeographyMultiLineString => "GeographyMultiLineString",
            Self::GeographyMultiPolygon => "GeographyMultiPolygon",
            Self::GeographyCollection => "GeographyCollection",
            Self::Geometry => "Geometry",
            Self::GeometryPoint => "GeometryPoint",
            Self::GeometryLineString => "GeometryLineString",
            Self::GeometryPolygon => "GeometryPolygon",
            Self::GeometryMultiPoint => "GeometryMultiPoint",
            Self::GeometryMultiLineString => "GeometryMultiLineString",
            Self::GeometryMultiPolygon => "GeometryMultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
        }
    }

    /// Fully qualified name, e.g. `Edm.Int32`.
    #[must_use]
    pub fn qualified_name(self) -> String {
        format!("Edm.{}", self.name())
    }

    /// Geography and geometry kinds.
    #[must_use]
    pub fn is_geospatial(self) -> bool {
        self.name().starts_with("Geo")
    }

    /// Kinds whose JSON representation is a number.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Byte
                | Self::SByte
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Single
                | Self::Double
                | Self::Decimal
        )
    }
}

impl Display for EdmPrimitiveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Edm.{}", self.name())
    }
}

/// Unknown primitive type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPrimitiveKind(pub String);

impl Display for UnknownPrimitiveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "unknown primitive type: {}", self.0)
    }
}

impl FromStr for EdmPrimitiveKind {
    type Err = UnknownPrimitiveKind;

    /// Accepts `Edm.Int32`, `Int32` and `#Edm.Int32` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim_start_matches('#');
        let name = name.strip_prefix("Edm.").unwrap_or(name);
        ALL_KINDS
            .iter()
            .copied()
            .find(|k| k.name() == name)
            .ok_or_else(|| UnknownPrimitiveKind(s.to_string()))
    }
}

/// Type of a property as declared by the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdmType {
    /// Primitive kind.
    Primitive(EdmPrimitiveKind),
    /// Complex type by qualified name.
    Complex(String),
    /// Enumeration type by qualified name.
    Enum(String),
    /// Entity type by qualified name (navigation properties).
    Entity(String),
    /// Collection of the inner type.
    Collection(Box<EdmType>),
}

impl EdmType {
    /// Wire name of the type, `Collection(...)` for collections.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.qualified_name(),
            Self::Complex(name) | Self::Enum(name) | Self::Entity(name) => name.clone(),
            Self::Collection(inner) => format!("Collection({})", inner.type_name()),
        }
    }

    /// Whether the type refers to entities (single or collection).
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        match self {
            Self::Entity(_) => true,
            Self::Collection(inner) => inner.is_navigation(),
            _ => false,
        }
    }
}

/// Kind of a named type known to the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Entity type.
    Entity,
    /// Complex type.
    Complex,
    /// Enumeration type.
    Enum,
    /// Type definition over the primitive kind.
    Definition(EdmPrimitiveKind),
}

/// Named type known to the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Qualified name.
    pub name: String,
    /// Kind of the type.
    pub kind: TypeKind,
    /// Qualified name of the base type.
    pub base_type: Option<String>,
}

/// Read-only EDM lookup service consumed by the codec.
///
/// Implementations must be safe to share between threads; the codec never
/// mutates the schema.
pub trait EdmSchema: Send + Sync {
    /// Resolve named type (entity, complex, enum or type definition).
    fn resolve_type(&self, qualified_name: &str) -> Option<TypeDescriptor>;

    /// Resolve declared type of the property (structural or navigation)
    /// of the structured type, base types included.
    fn resolve_property(&self, type_name: &str, property: &str) -> Option<EdmType>;

    /// Resolve entity type of the entity set or singleton.
    fn resolve_entity_set(&self, _name: &str) -> Option<String> {
        None
    }

    /// Resolve property and map type definitions to their underlying kind.
    fn resolve_property_type(&self, type_name: &str, property: &str) -> Option<EdmType> {
        let declared = self.resolve_property(type_name, property)?;
        Some(resolve_definitions(self, declared))
    }
}

fn resolve_definitions<S: EdmSchema + ?Sized>(schema: &S, t: EdmType) -> EdmType {
    match t {
        EdmType::Collection(inner) => {
            EdmType::Collection(Box::new(resolve_definitions(schema, *inner)))
        }
        EdmType::Complex(name) | EdmType::Enum(name) | EdmType::Entity(name) => {
            match schema.resolve_type(&name).map(|d| d.kind) {
                Some(TypeKind::Definition(kind)) => EdmType::Primitive(kind),
                Some(TypeKind::Entity) => EdmType::Entity(name),
                Some(TypeKind::Enum) => EdmType::Enum(name),
                _ => EdmType::Complex(name),
            }
        }
        primitive => primitive,
    }
}

#[derive(Debug, Default)]
struct StructuredType {
    descriptor: Option<TypeDescriptor>,
    properties: HashMap<String, EdmType>,
}

/// Hash map backed schema.
///
/// ```rust
/// use odata_codec::edm::{EdmPrimitiveKind, EdmSchema, EdmType, MapSchema};
///
/// let schema = MapSchema::new()
///     .entity_type("NS.Person", None)
///     .property("NS.Person", "Age", EdmType::Primitive(EdmPrimitiveKind::Int64))
///     .entity_set("People", "NS.Person");
/// assert_eq!(
///     schema.resolve_property("NS.Person", "Age"),
///     Some(EdmType::Primitive(EdmPrimitiveKind::Int64))
/// );
/// assert_eq!(schema.resolve_entity_set("People").as_deref(), Some("NS.Person"));
/// ```
#[derive(Debug, Default)]
pub struct MapSchema {
    types: HashMap<String, StructuredType>,
    entity_sets: HashMap<String, String>,
    aliases: HashMap<String, String>,
}

impl MapSchema {
    /// Create empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn declare(mut self, name: &str, kind: TypeKind, base_type: Option<&str>) -> Self {
        let entry = self.types.entry(name.to_string()).or_default();
        entry.descriptor = Some(TypeDescriptor {
            name: name.to_string(),
            kind,
            base_type: base_type.map(ToString::to_string),
        });
        self
    }

    /// Declare entity type.
    #[must_use]
    pub fn entity_type(self, name: &str, base_type: Option<&str>) -> Self {
        self.declare(name, TypeKind::Entity, base_type)
    }

    /// Declare complex type.
    #[must_use]
    pub fn complex_type(self, name: &str, base_type: Option<&str>) -> Self {
        self.declare(name, TypeKind::Complex, base_type)
    }

    /// Declare enumeration type.
    #[must_use]
    pub fn enum_type(self, name: &str) -> Self {
        self.declare(name, TypeKind::Enum, None)
    }

    /// Declare type definition.
    #[must_use]
    pub fn type_definition(self, name: &str, underlying: EdmPrimitiveKind) -> Self {
        self.declare(name, TypeKind::Definition(underlying), None)
    }

    /// Declare property of the structured type.
    #[must_use]
    pub fn property(mut self, type_name: &str, property: &str, ptype: EdmType) -> Self {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .properties
            .insert(property.to_string(), ptype);
        self
    }

    /// Declare entity set or singleton.
    #[must_use]
    pub fn entity_set(mut self, name: &str, entity_type: &str) -> Self {
        self.entity_sets
            .insert(name.to_string(), entity_type.to_string());
        self
    }

    /// Declare namespace alias (`Alias.Type` resolves as `Namespace.Type`).
    #[must_use]
    pub fn alias(mut self, alias: &str, namespace: &str) -> Self {
        self.aliases.insert(alias.to_string(), namespace.to_string());
        self
    }

    fn canonical(&self, name: &str) -> String {
        let name = name.trim_start_matches('#');
        if let Some((ns, simple)) = name.rsplit_once('.') {
            if let Some(full) = self.aliases.get(ns) {
                return format!("{full}.{simple}");
            }
        }
        name.to_string()
    }

    fn canonical_type(&self, t: &EdmType) -> EdmType {
        match t {
            EdmType::Complex(n) => EdmType::Complex(self.canonical(n)),
            EdmType::Enum(n) => EdmType::Enum(self.canonical(n)),
            EdmType::Entity(n) => EdmType::Entity(self.canonical(n)),
            EdmType::Collection(inner) => EdmType::Collection(Box::new(self.canonical_type(inner))),
            EdmType::Primitive(k) => EdmType::Primitive(*k),
        }
    }
}

impl EdmSchema for MapSchema {
    fn resolve_type(&self, qualified_name: &str) -> Option<TypeDescriptor> {
        self.types
            .get(&self.canonical(qualified_name))
            .and_then(|t| t.descriptor.clone())
    }

    fn resolve_property(&self, type_name: &str, property: &str) -> Option<EdmType> {
        let mut current = Some(self.canonical(type_name));
        // Inheritance chains are short; the bound protects against cycles.
        for _ in 0..32 {
            let name = current?;
            let t = self.types.get(&name)?;
            if let Some(p) = t.properties.get(property) {
                return Some(self.canonical_type(p));
            }
            current = t
                .descriptor
                .as_ref()
                .and_then(|d| d.base_type.as_deref())
                .map(|b| self.canonical(b));
        }
        None
    }

    fn resolve_entity_set(&self, name: &str) -> Option<String> {
        self.entity_sets.get(name).map(|t| self.canonical(t))
    }
}
