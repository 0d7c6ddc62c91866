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

use super::as_count;
use super::null_control;
use super::Field;
use super::Members;
use crate::config::Config;
use crate::edm::EdmPrimitiveKind;
use crate::edm::EdmType;
use crate::entity::Entity;
use crate::entity::EntitySet;
use crate::entity::Inline;
use crate::entity::Link;
use crate::entity::LinkKind;
use crate::entity::Operation;
use crate::entity::OperationKind;
use crate::entity::Payload;
use crate::error::PayloadKind;
use crate::error::PrimitiveTypeError;
use crate::geo::geojson;
use crate::geo::Dimension;
use crate::infer::context_property_name;
use crate::infer::guess_json;
use crate::infer::navigation_target;
use crate::infer::JsonShape;
use crate::infer::TypeResolver;
use crate::odata::normalize_type_name;
use crate::primitive::BinaryEncoding;
use crate::primitive::PrimitiveValue;
use crate::value::Annotation;
use crate::value::CollectionValue;
use crate::value::ComplexValue;
use crate::value::EnumValue;
use crate::value::Property;
use crate::value::Value;
use crate::version::JsonNames;
use crate::version::Names;
use crate::Error;
use serde_json::Map;
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use tracing::trace;

type Object = Map<String, JsonValue>;

/// Reader of JSON entity, entity set and property payloads.
#[derive(Clone, Copy)]
pub struct JsonReader<'s> {
    pub(crate) config: Config,
    pub(crate) names: &'static Names,
    pub(crate) types: TypeResolver<'s>,
}

impl<'s> JsonReader<'s> {
    /// Create reader.
    #[must_use]
    pub fn new(config: Config, types: TypeResolver<'s>) -> Self {
        Self {
            config,
            names: config.version.names(),
            types,
        }
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<(), Error> {
        if depth > self.config.max_depth {
            Err(Error::Depth(self.config.max_depth))
        } else {
            Ok(())
        }
    }

    fn is_meta_key(&self, key: &str) -> bool {
        key.starts_with('@') || key.starts_with('#') || self.names.json.is_control(key) || key.contains('@')
    }

    /// Kind of the top-level payload.
    #[must_use]
    pub fn payload_kind(&self, doc: &JsonValue) -> PayloadKind {
        let json = &self.names.json;
        let Some(obj) = doc.as_object() else {
            return PayloadKind::Unknown;
        };
        let data: Vec<&str> = obj
            .keys()
            .map(String::as_str)
            .filter(|k| !self.is_meta_key(k))
            .collect();
        if let [key] = data.as_slice() {
            if matches!(*key, "error" | "odata.error") && obj[*key].is_object() {
                return PayloadKind::Error;
            }
        }
        if data.is_empty() && obj.contains_key(&null_control(json)) {
            return PayloadKind::Property;
        }
        let context = obj.get(json.context).and_then(JsonValue::as_str);
        let context_type = context.and_then(|c| self.types.context_type(c));
        let property_context = context_type.as_ref().map_or(false, |t| {
            !t.is_navigation() && (self.types.has_schema() || !matches!(t, EdmType::Complex(_)))
        });
        if data.as_slice() == ["value"] {
            let Some(items) = obj["value"].as_array() else {
                return PayloadKind::Property;
            };
            if property_context {
                return PayloadKind::Property;
            }
            if let Some(context) = context {
                if context.contains("/$delta") || context.ends_with("#$delta") {
                    return PayloadKind::Delta;
                }
                if !context.contains('#') {
                    return PayloadKind::ServiceDocument;
                }
            } else if !items.is_empty() && items.iter().all(is_service_item) {
                return PayloadKind::ServiceDocument;
            }
            if obj.contains_key(json.delta_link) && items.iter().any(|i| self.is_delta_record(i)) {
                return PayloadKind::Delta;
            }
            return PayloadKind::EntitySet;
        }
        if property_context {
            PayloadKind::Property
        } else {
            PayloadKind::Entity
        }
    }

    pub(crate) fn is_delta_record(&self, item: &JsonValue) -> bool {
        item.as_object().map_or(false, |o| {
            o.contains_key(self.names.json.removed)
                || o.contains_key("@removed")
                || (o.contains_key("source") && o.contains_key("relationship") && o.contains_key("target"))
        })
    }

    pub(crate) fn document<'v>(&self, doc: &'v JsonValue, expected: PayloadKind) -> Result<&'v Object, Error> {
        let found = self.payload_kind(doc);
        if found != expected {
            return Err(Error::wrong_kind(expected, found));
        }
        doc.as_object()
            .ok_or_else(|| Error::parse("payload must be a JSON object"))
    }

    pub(crate) fn payload<T>(&self, members: &Members<'_>, payload: T) -> Payload<T> {
        let json = &self.names.json;
        Payload {
            context_url: members.control_str(json.context).map(ToString::to_string),
            metadata_etag: members.control_str(json.metadata_etag).map(ToString::to_string),
            payload,
        }
    }

    /// Read single entity.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` if the document is not an entity, parse or
    /// primitive errors from its content.
    pub fn read_entity(&self, doc: &JsonValue) -> Result<Payload<Entity>, Error> {
        let obj = self.document(doc, PayloadKind::Entity)?;
        let members = Members::group(obj, &self.names.json);
        let owner = members
            .control_str(self.names.json.context)
            .and_then(|c| self.types.context_entity_type(c));
        let entity = self.entity(obj, owner, 0)?;
        Ok(self.payload(&members, entity))
    }

    /// Read entity set.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` if the document is not an entity set, parse
    /// or primitive errors from its content.
    pub fn read_entity_set(&self, doc: &JsonValue) -> Result<Payload<EntitySet>, Error> {
        let json = &self.names.json;
        let obj = self.document(doc, PayloadKind::EntitySet)?;
        let members = Members::group(obj, json);
        let owner = members
            .control_str(json.context)
            .and_then(|c| self.types.context_entity_type(c));
        let mut set = EntitySet {
            id: members.control_str(json.id).map(ToString::to_string),
            count: members.control(json.count).and_then(as_count),
            next_link: members.control_str(json.next_link).map(ToString::to_string),
            delta_link: members.control_str(json.delta_link).map(ToString::to_string),
            annotations: self.annotations(&members.annotations, 0)?,
            ..EntitySet::default()
        };
        for item in value_array(&members)? {
            let obj = item
                .as_object()
                .ok_or_else(|| Error::parse("entity set items must be objects"))?;
            set.entities.push(self.entity(obj, owner.clone(), 0)?);
        }
        Ok(self.payload(&members, set))
    }

    /// Read individual property. The name comes from the context URL
    /// (`#People(1)/Name`) and is `value` when the context does not name it.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` for entity sets and other collections of
    /// entities, parse or primitive errors from the value.
    pub fn read_property(&self, doc: &JsonValue) -> Result<Payload<Property>, Error> {
        let json = &self.names.json;
        let found = self.payload_kind(doc);
        if !matches!(found, PayloadKind::Property | PayloadKind::Entity) {
            return Err(Error::wrong_kind(PayloadKind::Property, found));
        }
        let obj = doc
            .as_object()
            .ok_or_else(|| Error::parse("payload must be a JSON object"))?;
        let members = Members::group(obj, json);
        let context = members.control_str(json.context);
        let name = context
            .and_then(context_property_name)
            .unwrap_or("value")
            .to_string();
        let context_type = context
            .and_then(|c| self.types.context_type(c))
            .filter(|t| !t.is_navigation());
        let explicit = members.control_str(json.type_);
        let resolved = explicit.map(|t| self.types.named(t)).or(context_type);

        let property = if members.control(&null_control(json)).is_some() {
            let type_name = resolved.map(|t| t.type_name());
            Property {
                name,
                type_name: type_name.clone(),
                value: Value::Null(type_name),
                annotations: Vec::new(),
            }
        } else if let (Some(field), false) = (
            members.field("value").filter(|f| f.value.is_some()),
            matches!(resolved, Some(EdmType::Complex(_))) && self.types.has_schema(),
        ) {
            let explicit = field.control_str(JsonNames::suffix(json.type_));
            let resolved = explicit.map(|t| self.types.named(t)).or(resolved);
            let value = self
                .value(field.value.unwrap_or(&JsonValue::Null), resolved.as_ref(), 0)
                .map_err(|e| e.in_property(&name))?;
            Property {
                name,
                type_name: resolved.map(|t| t.type_name()).or_else(|| value.type_name()),
                value,
                annotations: self.annotations(&field.annotations, 0)?,
            }
        } else {
            let declared = match resolved {
                Some(EdmType::Complex(t)) => Some(t),
                _ => None,
            };
            let complex = self.complex(obj, declared, 0).map_err(|e| e.in_property(&name))?;
            Property::new(name, complex)
        };
        Ok(self.payload(&members, property))
    }

    pub(crate) fn entity(&self, obj: &Object, owner: Option<String>, depth: usize) -> Result<Entity, Error> {
        self.check_depth(depth)?;
        let json = &self.names.json;
        let members = Members::group(obj, json);
        let string = |name: &str| members.control_str(name).map(ToString::to_string);
        let mut entity = Entity {
            id: members.control_str(json.id).map(Into::into),
            type_name: members.control_str(json.type_).map(normalize_type_name).or(owner),
            etag: members.control_str(json.etag).map(Into::into),
            self_link: string(json.read_link),
            edit_link: string(json.edit_link),
            media_content_source: string(json.media_read_link),
            media_content_type: string(json.media_content_type),
            media_etag: string(json.media_etag),
            annotations: self.annotations(&members.annotations, depth)?,
            ..Entity::default()
        };
        if let Some(href) = members.control_str(json.media_edit_link) {
            let mut link = Link::new(LinkKind::MediaEdit, None, Some(href.to_string()));
            link.media_etag = entity.media_etag.clone();
            entity.media_edit_links.push(link);
        }
        for (key, _) in &members.controls {
            if !is_entity_control(json, key) {
                trace!(member = key, "skipping unknown control information");
            }
        }
        for (metadata, value) in &members.operations {
            push_operations(&mut entity.operations, metadata, value);
        }
        let owner = entity.type_name.clone();
        for (name, field) in &members.fields {
            self.field(&mut entity, owner.as_deref(), name, field, depth)
                .map_err(|e| e.in_property(name))?;
        }
        Ok(entity)
    }

    fn field(
        &self,
        entity: &mut Entity,
        owner: Option<&str>,
        name: &str,
        field: &Field<'_>,
        depth: usize,
    ) -> Result<(), Error> {
        let json = &self.names.json;
        let nav_href = field.control_str(JsonNames::suffix(json.navigation_link));
        let assoc_href = field.control_str(JsonNames::suffix(json.association_link));
        let declared = self.types.declared(owner, name);
        let target = declared.as_ref().and_then(navigation_target);

        if let Some(href) = assoc_href {
            entity.association_links.push(Link::association(name, href));
        }
        if nav_href.is_some() || target.is_some() {
            let mut link = Link::new(
                LinkKind::Navigation,
                Some(name.to_string()),
                nav_href.map(ToString::to_string),
            );
            if let Some(value) = field.value {
                link.inline = self.inline(value, field, target, depth)?;
            }
            link.annotations = self.annotations(&field.annotations, depth)?;
            entity.navigation_links.push(link);
            return Ok(());
        }
        if field.value.is_none() {
            let edit = field
                .control_str(JsonNames::suffix(json.media_edit_link))
                .or_else(|| field.control_str(JsonNames::suffix(json.media_read_link)));
            let media_type = field.control_str(JsonNames::suffix(json.media_content_type));
            let media_etag = field.control_str(JsonNames::suffix(json.media_etag));
            if edit.is_some() || media_type.is_some() || media_etag.is_some() {
                let mut link = Link::new(
                    LinkKind::MediaEdit,
                    Some(name.to_string()),
                    edit.map(ToString::to_string),
                );
                link.media_type = media_type.map(ToString::to_string);
                link.media_etag = media_etag.map(ToString::to_string);
                entity.media_edit_links.push(link);
            } else if assoc_href.is_none() {
                trace!(property = name, "skipping annotations of absent property");
            }
            return Ok(());
        }
        entity.properties.push(self.property(owner, name, field, depth)?);
        Ok(())
    }

    fn inline(
        &self,
        value: &JsonValue,
        field: &Field<'_>,
        target: Option<&str>,
        depth: usize,
    ) -> Result<Inline, Error> {
        let json = &self.names.json;
        let target = target.map(ToString::to_string);
        Ok(match value {
            JsonValue::Null => Inline::Null,
            JsonValue::Object(obj) => Inline::Entity(Box::new(self.entity(obj, target, depth + 1)?)),
            JsonValue::Array(items) => {
                let mut set = EntitySet {
                    count: field.control(JsonNames::suffix(json.count)).and_then(as_count),
                    next_link: field
                        .control_str(JsonNames::suffix(json.next_link))
                        .map(ToString::to_string),
                    ..EntitySet::default()
                };
                for item in items {
                    let obj = item
                        .as_object()
                        .ok_or_else(|| Error::parse("expanded entities must be objects"))?;
                    set.entities.push(self.entity(obj, target.clone(), depth + 1)?);
                }
                Inline::EntitySet(Box::new(set))
            }
            _ => {
                return Err(Error::parse(
                    "navigation property value must be an object, an array or null",
                ))
            }
        })
    }

    fn property(
        &self,
        owner: Option<&str>,
        name: &str,
        field: &Field<'_>,
        depth: usize,
    ) -> Result<Property, Error> {
        let explicit = field.control_str(JsonNames::suffix(self.names.json.type_));
        let resolved = self.types.resolve(explicit, owner, name);
        let value = self.value(field.value.unwrap_or(&JsonValue::Null), resolved.as_ref(), depth)?;
        Ok(Property {
            name: name.to_string(),
            type_name: resolved.map(|t| t.type_name()).or_else(|| value.type_name()),
            value,
            annotations: self.annotations(&field.annotations, depth)?,
        })
    }

    pub(crate) fn annotations(
        &self,
        annotations: &[(&str, &JsonValue)],
        depth: usize,
    ) -> Result<Vec<Annotation>, Error> {
        annotations
            .iter()
            .map(|(term, value)| {
                Ok(Annotation {
                    term: (*term).to_string(),
                    value: self.value(value, None, depth)?,
                })
            })
            .collect()
    }

    /// Read value of the resolved type, or guess the type from its shape.
    pub(crate) fn value(&self, v: &JsonValue, t: Option<&EdmType>, depth: usize) -> Result<Value, Error> {
        match t {
            Some(t) => self.typed(v, t, depth),
            None => self.guessed(v, depth),
        }
    }

    fn typed(&self, v: &JsonValue, t: &EdmType, depth: usize) -> Result<Value, Error> {
        if v.is_null() {
            return Ok(Value::Null(Some(t.type_name())));
        }
        match t {
            EdmType::Primitive(kind) => match Dimension::of(*kind) {
                Some(dimension) => Ok(Value::Geospatial(geojson::read_geometry(v, dimension, None)?)),
                None => Ok(Value::Primitive(primitive(v, *kind)?)),
            },
            EdmType::Enum(name) => match v {
                JsonValue::String(member) => Ok(enum_value(name, member)),
                _ => Err(Error::parse(format!("value of enumeration {name} must be a string"))),
            },
            EdmType::Complex(name) | EdmType::Entity(name) => match v {
                JsonValue::String(member) if !self.types.is_structured(name) => {
                    Ok(enum_value(name, member))
                }
                JsonValue::Object(obj) => Ok(Value::Complex(self.complex(obj, Some(name.clone()), depth + 1)?)),
                _ => Err(Error::parse(format!("value of {name} must be an object"))),
            },
            EdmType::Collection(inner) => match v {
                JsonValue::Array(items) => self.collection(items, Some(inner), depth),
                _ => Err(Error::parse("collection value must be an array")),
            },
        }
    }

    fn guessed(&self, v: &JsonValue, depth: usize) -> Result<Value, Error> {
        Ok(match (guess_json(v), v) {
            (JsonShape::Null, _) => Value::Null(None),
            (JsonShape::Primitive(kind), _) => Value::Primitive(primitive(v, kind)?),
            (JsonShape::Geospatial, _) => {
                Value::Geospatial(geojson::read_geometry(v, Dimension::Geography, None)?)
            }
            (JsonShape::Complex, JsonValue::Object(obj)) => {
                Value::Complex(self.complex(obj, None, depth + 1)?)
            }
            (JsonShape::Collection, JsonValue::Array(items)) => self.collection(items, None, depth)?,
            (shape, _) => return Err(Error::parse(format!("value does not have shape {shape:?}"))),
        })
    }

    fn complex(&self, obj: &Object, type_name: Option<String>, depth: usize) -> Result<ComplexValue, Error> {
        self.check_depth(depth)?;
        let json = &self.names.json;
        let members = Members::group(obj, json);
        let mut complex = ComplexValue::new(
            members
                .control_str(json.type_)
                .map(normalize_type_name)
                .or(type_name),
        );
        for (name, field) in &members.fields {
            if field.value.is_none() {
                trace!(property = name, "skipping annotations of absent property");
                continue;
            }
            let property = self
                .property(complex.type_name.as_deref(), name, field, depth)
                .map_err(|e| e.in_property(name))?;
            complex.properties.push(property);
        }
        Ok(complex)
    }

    fn collection(&self, items: &[JsonValue], inner: Option<&EdmType>, depth: usize) -> Result<Value, Error> {
        self.check_depth(depth + 1)?;
        let mut collection = CollectionValue::new(inner.map(EdmType::type_name));
        for item in items {
            if item.is_array() {
                return Err(Error::parse("collection items cannot be collections"));
            }
            collection.try_push(self.value(item, inner, depth + 1)?)?;
        }
        Ok(Value::Collection(collection))
    }
}

fn enum_value(type_name: &str, member: &str) -> Value {
    Value::Enum(EnumValue {
        type_name: Some(type_name.to_string()),
        member: member.to_string(),
    })
}

/// Primitive from a JSON scalar. Numbers may arrive as strings
/// (`IEEE754Compatible`, `INF`, `NaN`).
fn primitive(v: &JsonValue, kind: EdmPrimitiveKind) -> Result<PrimitiveValue, Error> {
    let text = match v {
        JsonValue::String(s) => Cow::Borrowed(s.as_str()),
        JsonValue::Number(n) if kind.is_numeric() => Cow::Owned(n.to_string()),
        JsonValue::Bool(b) if kind == EdmPrimitiveKind::Boolean => Cow::Owned(b.to_string()),
        other => return Err(PrimitiveTypeError::new(other.to_string(), kind).into()),
    };
    Ok(PrimitiveValue::parse(&text, kind, BinaryEncoding::UrlSafe)?)
}

fn is_entity_control(json: &JsonNames, key: &str) -> bool {
    [
        json.context,
        json.metadata_etag,
        json.type_,
        json.id,
        json.etag,
        json.edit_link,
        json.read_link,
        json.media_edit_link,
        json.media_read_link,
        json.media_content_type,
        json.media_etag,
    ]
    .contains(&key)
}

fn push_operations(operations: &mut Vec<Operation>, metadata: &str, value: &JsonValue) {
    let one = |v: &JsonValue| Operation {
        kind: OperationKind::Action,
        metadata: metadata.to_string(),
        title: v.get("title").and_then(JsonValue::as_str).map(ToString::to_string),
        target: v.get("target").and_then(JsonValue::as_str).map(ToString::to_string),
    };
    match value {
        JsonValue::Array(items) => operations.extend(items.iter().map(one)),
        v => operations.push(one(v)),
    }
}

fn is_service_item(item: &JsonValue) -> bool {
    item.as_object().map_or(false, |o| {
        o.get("url").map_or(false, JsonValue::is_string)
            && o.get("name").map_or(false, JsonValue::is_string)
            && o.keys().all(|k| matches!(k.as_str(), "name" | "url" | "title" | "kind"))
    })
}

pub(crate) fn value_array<'a>(members: &Members<'a>) -> Result<&'a Vec<JsonValue>, Error> {
    members
        .field("value")
        .and_then(|f| f.value)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| Error::parse("collection payload without 'value' array"))
}
