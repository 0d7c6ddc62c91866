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

//! Property values
//!
//! [`Value`] is a closed sum over everything a property can hold. Type
//! names are canonical qualified names (`Edm.Int32`, `NS.Address`,
//! `Collection(Edm.String)`); codecs translate to and from the wire
//! spellings.
//!
//! ```rust
//! use odata_codec::value::{CollectionValue, Property, Value};
//!
//! let mut tags = CollectionValue::new(Some("Edm.String".into()));
//! tags.try_push(Value::from("red")).unwrap();
//! tags.try_push(Value::Null(None)).unwrap();
//! let p = Property::new("Tags", Value::Collection(tags));
//! assert_eq!(p.type_name.as_deref(), Some("Collection(Edm.String)"));
//! ```

use crate::error::ParseError;
use crate::geo::Geometry;
use crate::primitive::PrimitiveValue;

/// Annotation (instance annotation) with a namespace-qualified term.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Term, e.g. `com.contoso.rating`.
    pub term: String,
    /// Value.
    pub value: Value,
}

impl Annotation {
    /// Create annotation.
    pub fn new(term: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            term: term.into(),
            value: value.into(),
        }
    }
}

/// Named value owned by an entity or a complex value.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Qualified type name, if known.
    pub type_name: Option<String>,
    /// Value.
    pub value: Value,
    /// Annotations targeting the property.
    pub annotations: Vec<Annotation>,
}

impl Property {
    /// Create property; type is taken from the value.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            type_name: value.type_name(),
            value,
            annotations: Vec::new(),
        }
    }

    /// Add annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Structured value with ordered properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexValue {
    /// Qualified complex type name, if known.
    pub type_name: Option<String>,
    /// Properties in document order.
    pub properties: Vec<Property>,
}

impl ComplexValue {
    /// Create empty complex value.
    pub fn new(type_name: Option<String>) -> Self {
        Self {
            type_name,
            properties: Vec::new(),
        }
    }

    /// Add property.
    #[must_use]
    pub fn with(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Wire kind of collection items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Primitive or enumeration values.
    Primitive,
    /// Complex values.
    Complex,
    /// Geospatial values.
    Geospatial,
}

/// Homogeneous ordered collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionValue {
    /// Qualified item type name, if known.
    pub item_type: Option<String>,
    items: Vec<Value>,
}

impl CollectionValue {
    /// Create empty collection.
    pub fn new(item_type: Option<String>) -> Self {
        Self {
            item_type,
            items: Vec::new(),
        }
    }

    /// Items in order.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Consume into items.
    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    /// Wire kind of the items, from the first non-null item.
    #[must_use]
    pub fn item_kind(&self) -> Option<ItemKind> {
        self.items.iter().find_map(Value::item_kind)
    }

    /// Append item.
    ///
    /// # Errors
    ///
    /// Returns error if the item is a collection or its wire kind differs
    /// from the items already present. Nulls are accepted anywhere.
    pub fn try_push(&mut self, item: Value) -> Result<(), ParseError> {
        if matches!(item, Value::Collection(_)) {
            return Err(ParseError::new("collection items cannot be collections"));
        }
        if let (Some(have), Some(got)) = (self.item_kind(), item.item_kind()) {
            if have != got {
                return Err(ParseError::new(format!(
                    "collection mixes {have:?} and {got:?} items"
                )));
            }
        }
        self.items.push(item);
        Ok(())
    }

    /// Build collection from items.
    ///
    /// # Errors
    ///
    /// Same as [`CollectionValue::try_push`].
    pub fn try_from_items(
        item_type: Option<String>,
        items: impl IntoIterator<Item = Value>,
    ) -> Result<Self, ParseError> {
        let mut c = Self::new(item_type);
        for item in items {
            c.try_push(item)?;
        }
        Ok(c)
    }
}

/// Enumeration member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Qualified enumeration type name, if known.
    pub type_name: Option<String>,
    /// Member name(s), comma separated for flags.
    pub member: String,
}

/// Property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null, with the declared type if known.
    Null(Option<String>),
    /// Primitive value.
    Primitive(PrimitiveValue),
    /// Complex value.
    Complex(ComplexValue),
    /// Collection.
    Collection(CollectionValue),
    /// Geography or geometry.
    Geospatial(Geometry),
    /// Enumeration member.
    Enum(EnumValue),
}

impl Value {
    /// Qualified type name of the value, if known.
    #[must_use]
    pub fn type_name(&self) -> Option<String> {
        match self {
            Self::Null(t) => t.clone(),
            Self::Primitive(p) => Some(p.kind().qualified_name()),
            Self::Complex(c) => c.type_name.clone(),
            Self::Collection(c) => c.item_type.as_ref().map(|t| format!("Collection({t})")),
            Self::Geospatial(g) => Some(g.kind().qualified_name()),
            Self::Enum(e) => e.type_name.clone(),
        }
    }

    /// Wire kind as a collection item; `None` for nulls and collections.
    #[must_use]
    pub const fn item_kind(&self) -> Option<ItemKind> {
        match self {
            Self::Primitive(_) | Self::Enum(_) => Some(ItemKind::Primitive),
            Self::Complex(_) => Some(ItemKind::Complex),
            Self::Geospatial(_) => Some(ItemKind::Geospatial),
            Self::Null(_) | Self::Collection(_) => None,
        }
    }

    /// Whether the value is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    /// Primitive value, if any.
    #[must_use]
    pub const fn as_primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            Self::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Complex value, if any.
    #[must_use]
    pub const fn as_complex(&self) -> Option<&ComplexValue> {
        match self {
            Self::Complex(c) => Some(c),
            _ => None,
        }
    }

    /// Collection, if any.
    #[must_use]
    pub const fn as_collection(&self) -> Option<&CollectionValue> {
        match self {
            Self::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Geospatial value, if any.
    #[must_use]
    pub const fn as_geospatial(&self) -> Option<&Geometry> {
        match self {
            Self::Geospatial(g) => Some(g),
            _ => None,
        }
    }
}

impl From<PrimitiveValue> for Value {
    fn from(v: PrimitiveValue) -> Self {
        Self::Primitive(v)
    }
}

impl From<ComplexValue> for Value {
    fn from(v: ComplexValue) -> Self {
        Self::Complex(v)
    }
}

impl From<CollectionValue> for Value {
    fn from(v: CollectionValue) -> Self {
        Self::Collection(v)
    }
}

impl From<Geometry> for Value {
    fn from(v: Geometry) -> Self {
        Self::Geospatial(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Primitive(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Primitive(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Primitive(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Primitive(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Primitive(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Primitive(v.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Dimension;
    use crate::geo::Shape;

    #[test]
    fn collections_reject_mixed_wire_kinds() {
        let mut c = CollectionValue::new(None);
        c.try_push(Value::from(1)).unwrap();
        c.try_push(Value::Enum(EnumValue {
            type_name: Some("NS.Color".into()),
            member: "Red".into(),
        }))
        .unwrap();
        c.try_push(Value::Null(None)).unwrap();
        assert!(c.try_push(Value::Complex(ComplexValue::default())).is_err());
        assert!(c
            .try_push(Value::Geospatial(Geometry::new(Dimension::Geography, Shape::Point(None))))
            .is_err());
        assert!(c.try_push(Value::Collection(CollectionValue::default())).is_err());
        assert_eq!(c.items().len(), 3);
        assert_eq!(c.item_kind(), Some(ItemKind::Primitive));
    }

    #[test]
    fn property_type_comes_from_value() {
        assert_eq!(Property::new("Age", 3).type_name.as_deref(), Some("Edm.Int32"));
        assert_eq!(Property::new("Missing", Value::Null(None)).type_name, None);
        let home = ComplexValue::new(Some("NS.Address".into())).with(Property::new("City", "Oslo"));
        let p = Property::new("Home", home);
        assert_eq!(p.type_name.as_deref(), Some("NS.Address"));
        assert_eq!(
            p.value.as_complex().and_then(|c| c.property("City")).map(|c| &c.value),
            Some(&Value::from("Oslo"))
        );
    }
}
