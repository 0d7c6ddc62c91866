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

use super::null_control;
use crate::config::Config;
use crate::config::MetadataLevel;
use crate::edm::EdmPrimitiveKind;
use crate::entity::Entity;
use crate::entity::EntitySet;
use crate::entity::Inline;
use crate::entity::Payload;
use crate::geo::geojson;
use crate::odata::json_type_name;
use crate::odata::primitive_kind;
use crate::primitive::BinaryEncoding;
use crate::primitive::PrimitiveValue;
use crate::value::Annotation;
use crate::value::ComplexValue;
use crate::value::Property;
use crate::value::Value;
use crate::version::JsonNames;
use crate::version::Names;
use crate::Error;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value as JsonValue;

type Object = Map<String, JsonValue>;

/// Writer of JSON entity, entity set and property payloads at the
/// configured metadata level.
#[derive(Debug, Clone, Copy)]
pub struct JsonWriter {
    pub(crate) config: Config,
    pub(crate) names: &'static Names,
}

impl JsonWriter {
    /// Create writer.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            names: config.version.names(),
        }
    }

    pub(crate) fn full(&self) -> bool {
        self.config.metadata == MetadataLevel::Full
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<(), Error> {
        if depth > self.config.max_depth {
            Err(Error::Depth(self.config.max_depth))
        } else {
            Ok(())
        }
    }

    /// Context URL and metadata etag, omitted with `none` metadata.
    pub(crate) fn document<T>(&self, obj: &mut Object, payload: &Payload<T>) {
        if self.config.metadata == MetadataLevel::None {
            return;
        }
        let json = &self.names.json;
        if let Some(context) = &payload.context_url {
            obj.insert(json.context.into(), context.as_str().into());
        }
        if let Some(etag) = &payload.metadata_etag {
            obj.insert(json.metadata_etag.into(), etag.as_str().into());
        }
    }

    fn type_name(&self, name: &str) -> JsonValue {
        json_type_name(name, self.names.hash_types).into()
    }

    /// Write entity.
    ///
    /// # Errors
    ///
    /// `Error::Depth` if expansions nest deeper than the limit.
    pub fn write_entity(&self, payload: &Payload<Entity>) -> Result<JsonValue, Error> {
        let mut obj = Object::new();
        self.document(&mut obj, payload);
        self.entity(&mut obj, &payload.payload, 0)?;
        Ok(JsonValue::Object(obj))
    }

    /// Write entity set.
    ///
    /// # Errors
    ///
    /// `Error::Depth` if expansions nest deeper than the limit.
    pub fn write_entity_set(&self, payload: &Payload<EntitySet>) -> Result<JsonValue, Error> {
        let json = &self.names.json;
        let set = &payload.payload;
        let mut obj = Object::new();
        self.document(&mut obj, payload);
        if self.full() {
            if let Some(id) = &set.id {
                obj.insert(json.id.into(), id.as_str().into());
            }
            for a in &set.annotations {
                obj.insert(format!("@{}", a.term), self.value(&a.value, 0)?);
            }
        }
        if let Some(count) = set.count {
            obj.insert(json.count.into(), self.int64(count));
        }
        obj.insert("value".into(), self.entities(&set.entities, 0)?);
        if let Some(next) = &set.next_link {
            obj.insert(json.next_link.into(), next.as_str().into());
        }
        if let Some(delta) = &set.delta_link {
            obj.insert(json.delta_link.into(), delta.as_str().into());
        }
        Ok(JsonValue::Object(obj))
    }

    /// Write individual property: complex values as an object, everything
    /// else wrapped in `value`.
    ///
    /// # Errors
    ///
    /// `Error::Depth` if the value nests deeper than the limit.
    pub fn write_property(&self, payload: &Payload<Property>) -> Result<JsonValue, Error> {
        let json = &self.names.json;
        let p = &payload.payload;
        let mut obj = Object::new();
        self.document(&mut obj, payload);
        let type_name = p.type_name.clone().or_else(|| p.value.type_name());
        if self.full() {
            if let Some(t) = type_name.as_deref().filter(|t| needs_type(t)) {
                obj.insert(json.type_.into(), self.type_name(t));
            }
        }
        match &p.value {
            Value::Null(_) => {
                obj.insert(null_control(json), true.into());
            }
            Value::Complex(c) => {
                for property in &c.properties {
                    self.property(&mut obj, property, 1)?;
                }
            }
            other => {
                obj.insert("value".into(), self.value(other, 0)?);
            }
        }
        Ok(JsonValue::Object(obj))
    }

    pub(crate) fn entities(&self, entities: &[Entity], depth: usize) -> Result<JsonValue, Error> {
        entities
            .iter()
            .map(|e| {
                let mut obj = Object::new();
                self.entity(&mut obj, e, depth)?;
                Ok(JsonValue::Object(obj))
            })
            .collect::<Result<Vec<_>, Error>>()
            .map(JsonValue::Array)
    }

    pub(crate) fn entity(&self, obj: &mut Object, e: &Entity, depth: usize) -> Result<(), Error> {
        self.check_depth(depth)?;
        let json = &self.names.json;
        let full = self.full();
        let put = |obj: &mut Object, key: &str, value: Option<&str>| {
            if let Some(value) = value {
                obj.insert(key.into(), value.into());
            }
        };
        if full {
            if let Some(t) = &e.type_name {
                obj.insert(json.type_.into(), self.type_name(t));
            }
            put(obj, json.id, e.id.as_ref().map(|id| id.as_str()));
        }
        if self.config.metadata != MetadataLevel::None {
            put(obj, json.etag, e.etag.as_ref().map(|t| t.as_str()));
        }
        if full {
            put(obj, json.edit_link, e.edit_link.as_deref());
            put(obj, json.read_link, e.self_link.as_deref());
            let own_media = e.media_edit_links.iter().find(|l| l.title.is_none());
            put(obj, json.media_edit_link, own_media.and_then(|l| l.href.as_deref()));
            put(obj, json.media_read_link, e.media_content_source.as_deref());
            put(obj, json.media_content_type, e.media_content_type.as_deref());
            let media_etag = e
                .media_etag
                .as_deref()
                .or_else(|| own_media.and_then(|l| l.media_etag.as_deref()));
            put(obj, json.media_etag, media_etag);
            for a in &e.annotations {
                obj.insert(format!("@{}", a.term), self.value(&a.value, depth)?);
            }
            for op in &e.operations {
                let mut body = Object::new();
                if let Some(title) = &op.title {
                    body.insert("title".into(), title.as_str().into());
                }
                if let Some(target) = &op.target {
                    body.insert("target".into(), target.as_str().into());
                }
                let key = if op.metadata.starts_with('#') {
                    op.metadata.clone()
                } else {
                    format!("#{}", op.metadata)
                };
                obj.insert(key, JsonValue::Object(body));
            }
        }
        for p in &e.properties {
            self.property(obj, p, depth)
                .map_err(|err| err.in_property(&p.name))?;
        }
        for link in &e.navigation_links {
            let name = link.name();
            if full {
                if let Some(href) = &link.href {
                    obj.insert(suffixed(name, json.navigation_link), href.as_str().into());
                }
                self.annotations(obj, name, &link.annotations, depth)?;
            }
            match &link.inline {
                Inline::Deferred => {}
                Inline::Null => {
                    obj.insert(name.into(), JsonValue::Null);
                }
                Inline::Entity(inner) => {
                    let mut child = Object::new();
                    self.entity(&mut child, inner, depth + 1)
                        .map_err(|err| err.in_property(name))?;
                    obj.insert(name.into(), JsonValue::Object(child));
                }
                Inline::EntitySet(set) => {
                    if let Some(count) = set.count {
                        obj.insert(suffixed(name, json.count), self.int64(count));
                    }
                    let items = self
                        .entities(&set.entities, depth + 1)
                        .map_err(|err| err.in_property(name))?;
                    obj.insert(name.into(), items);
                    if let Some(next) = &set.next_link {
                        obj.insert(suffixed(name, json.next_link), next.as_str().into());
                    }
                }
            }
        }
        if full {
            for link in &e.association_links {
                if let Some(href) = &link.href {
                    obj.insert(suffixed(link.name(), json.association_link), href.as_str().into());
                }
            }
            for link in e.media_edit_links.iter().filter(|l| l.title.is_some()) {
                let name = link.name();
                put(obj, &suffixed(name, json.media_edit_link), link.href.as_deref());
                put(obj, &suffixed(name, json.media_content_type), link.media_type.as_deref());
                put(obj, &suffixed(name, json.media_etag), link.media_etag.as_deref());
            }
        }
        Ok(())
    }

    fn annotations(
        &self,
        obj: &mut Object,
        name: &str,
        annotations: &[Annotation],
        depth: usize,
    ) -> Result<(), Error> {
        for a in annotations {
            obj.insert(format!("{name}@{}", a.term), self.value(&a.value, depth)?);
        }
        Ok(())
    }

    pub(crate) fn property(&self, obj: &mut Object, p: &Property, depth: usize) -> Result<(), Error> {
        if self.full() {
            self.annotations(obj, &p.name, &p.annotations, depth)?;
            let type_name = p.type_name.clone().or_else(|| p.value.type_name());
            if let Some(t) = type_name.as_deref().filter(|t| needs_type(t)) {
                obj.insert(suffixed(&p.name, self.names.json.type_), self.type_name(t));
            }
        }
        obj.insert(p.name.clone(), self.value(&p.value, depth)?);
        Ok(())
    }

    pub(crate) fn value(&self, v: &Value, depth: usize) -> Result<JsonValue, Error> {
        Ok(match v {
            Value::Null(_) => JsonValue::Null,
            Value::Primitive(p) => self.primitive(p),
            Value::Complex(c) => self.complex(c, None, depth + 1)?,
            Value::Collection(c) => {
                self.check_depth(depth + 1)?;
                let items = c
                    .items()
                    .iter()
                    .map(|item| match item {
                        Value::Complex(complex) => {
                            let declared = c.item_type.as_deref().unwrap_or_default();
                            self.complex(complex, Some(declared), depth + 1)
                        }
                        other => self.value(other, depth + 1),
                    })
                    .collect::<Result<Vec<_>, Error>>()?;
                JsonValue::Array(items)
            }
            Value::Geospatial(g) => geojson::write_geometry(g, None),
            Value::Enum(e) => e.member.as_str().into(),
        })
    }

    /// Complex value; its own type is written when it differs from the
    /// declared one.
    fn complex(&self, c: &ComplexValue, declared: Option<&str>, depth: usize) -> Result<JsonValue, Error> {
        self.check_depth(depth)?;
        let mut obj = Object::new();
        if self.full() {
            if let Some(t) = c.type_name.as_deref().filter(|t| Some(*t) != declared && declared.is_some()) {
                obj.insert(self.names.json.type_.into(), self.type_name(t));
            }
        }
        for p in &c.properties {
            self.property(&mut obj, p, depth)
                .map_err(|err| err.in_property(&p.name))?;
        }
        Ok(JsonValue::Object(obj))
    }

    fn primitive(&self, p: &PrimitiveValue) -> JsonValue {
        match p {
            PrimitiveValue::Boolean(v) => (*v).into(),
            PrimitiveValue::Byte(v) => (*v).into(),
            PrimitiveValue::SByte(v) => (*v).into(),
            PrimitiveValue::Int16(v) => (*v).into(),
            PrimitiveValue::Int32(v) => (*v).into(),
            PrimitiveValue::Int64(v) => self.int64(*v),
            PrimitiveValue::Decimal(v) if self.config.ieee754_compatible => v.to_string().into(),
            PrimitiveValue::Single(_) | PrimitiveValue::Double(_) | PrimitiveValue::Decimal(_) => {
                let text = p.to_wire_string(BinaryEncoding::UrlSafe);
                // INF and NaN have no JSON number form.
                match text.parse::<Number>() {
                    Ok(n) => JsonValue::Number(n),
                    Err(_) => JsonValue::String(text),
                }
            }
            other => other.to_wire_string(BinaryEncoding::UrlSafe).into(),
        }
    }

    fn int64(&self, v: i64) -> JsonValue {
        if self.config.ieee754_compatible {
            v.to_string().into()
        } else {
            v.into()
        }
    }
}

fn suffixed(name: &str, control: &'static str) -> String {
    format!("{name}@{}", JsonNames::suffix(control))
}

/// Whether the type cannot be told from the JSON value alone.
fn needs_type(type_name: &str) -> bool {
    !matches!(
        primitive_kind(type_name),
        Some(EdmPrimitiveKind::String | EdmPrimitiveKind::Boolean)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Link;
    use crate::value::CollectionValue;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn person() -> Entity {
        let mut e = Entity::new("NS.Person")
            .with_property(Property::new("Name", "Ann"))
            .with_property(Property::new("Age", 42_i64))
            .with_link(Link::navigation("Friends", "People(1)/Friends"));
        e.id = Some("People(1)".into());
        e.etag = Some("W/\"1\"".into());
        e
    }

    #[test]
    fn full_metadata_writes_types_and_links() {
        let w = JsonWriter::new(Config::default().metadata(MetadataLevel::Full));
        let doc = w
            .write_entity(&Payload::new(person()).with_context("$metadata#People/$entity"))
            .unwrap();
        assert_eq!(
            doc,
            json!({
                "@odata.context": "$metadata#People/$entity",
                "@odata.type": "#NS.Person",
                "@odata.id": "People(1)",
                "@odata.etag": "W/\"1\"",
                "Name": "Ann",
                "Age@odata.type": "#Int64",
                "Age": 42,
                "Friends@odata.navigationLink": "People(1)/Friends",
            })
        );
    }

    #[test]
    fn minimal_and_none_drop_control_information() {
        let minimal = JsonWriter::new(Config::default())
            .write_entity(&Payload::new(person()).with_context("$metadata#People/$entity"))
            .unwrap();
        assert_eq!(
            minimal,
            json!({
                "@odata.context": "$metadata#People/$entity",
                "@odata.etag": "W/\"1\"",
                "Name": "Ann",
                "Age": 42,
            })
        );
        let none = JsonWriter::new(Config::default().metadata(MetadataLevel::None))
            .write_entity(&Payload::new(person()).with_context("$metadata#People/$entity"))
            .unwrap();
        assert_eq!(none, json!({"Name": "Ann", "Age": 42}));
    }

    #[test]
    fn ieee754_numbers_and_special_floats() {
        let w = JsonWriter::new(Config::default().ieee754_compatible(true));
        let e = Entity::default()
            .with_property(Property::new("Big", 9_007_199_254_740_993_i64))
            .with_property(Property::new("Price", PrimitiveValue::Decimal(Decimal::new(150, 2))))
            .with_property(Property::new("Ratio", f64::NAN))
            .with_property(Property::new("Half", 0.5));
        let doc = w.write_entity(&Payload::new(e)).unwrap();
        assert_eq!(doc["Big"], json!("9007199254740993"));
        assert_eq!(doc["Price"], json!("1.50"));
        assert_eq!(doc["Ratio"], json!("NaN"));
        assert_eq!(doc["Half"], json!(0.5));
    }

    #[test]
    fn property_payloads() {
        let w = JsonWriter::new(Config::default().metadata(MetadataLevel::Full));
        let tags = CollectionValue::try_from_items(Some("Edm.String".into()), [Value::from("a")]).unwrap();
        let doc = w
            .write_property(&Payload::new(Property::new("Tags", tags)))
            .unwrap();
        assert_eq!(doc, json!({"@odata.type": "#Collection(String)", "value": ["a"]}));
        let doc = w
            .write_property(&Payload::new(Property::new("Gone", Value::Null(None))))
            .unwrap();
        assert_eq!(doc, json!({"@odata.null": true}));
    }

    #[test]
    fn depth_limit() {
        let mut inner = Entity::default();
        for _ in 0..3 {
            let mut outer = Entity::default();
            outer.navigation_link_mut("Next").inline = Inline::Entity(Box::new(inner));
            inner = outer;
        }
        let w = JsonWriter::new(Config::default().max_depth(1));
        assert!(matches!(
            w.write_entity(&Payload::new(inner)).unwrap_err().root_cause(),
            Error::Depth(1)
        ));
    }
}
