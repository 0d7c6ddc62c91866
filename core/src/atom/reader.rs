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

use super::root_kind;
use crate::codec::Document;
use crate::config::Config;
use crate::edm::EdmType;
use crate::entity::DeletedEntity;
use crate::entity::DeletedReason;
use crate::entity::Delta;
use crate::entity::Entity;
use crate::entity::EntitySet;
use crate::entity::Inline;
use crate::entity::Link;
use crate::entity::LinkChange;
use crate::entity::LinkKind;
use crate::entity::Operation;
use crate::entity::OperationKind;
use crate::entity::Payload;
use crate::error::PayloadKind;
use crate::geo::gml;
use crate::geo::Dimension;
use crate::geo::Geometry;
use crate::infer::context_property_name;
use crate::infer::navigation_target;
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
use crate::version::Names;
use crate::version::ATOM_NS;
use crate::version::TOMBSTONE_NS;
use crate::xml::Node;
use crate::xml::StartTag;
use crate::xml::XmlCursor;
use crate::Error;
use tracing::trace;

/// Reader of Atom entry, feed and property payloads.
#[derive(Clone, Copy)]
pub struct AtomReader<'s> {
    pub(crate) config: Config,
    pub(crate) names: &'static Names,
    pub(crate) types: TypeResolver<'s>,
}

/// Feed content, including delta records.
#[derive(Default)]
struct Feed {
    set: EntitySet,
    deleted_entities: Vec<DeletedEntity>,
    added_links: Vec<LinkChange>,
    deleted_links: Vec<LinkChange>,
}

impl Feed {
    fn has_delta_records(&self) -> bool {
        !(self.deleted_entities.is_empty() && self.added_links.is_empty() && self.deleted_links.is_empty())
    }

    fn into_delta(self) -> Delta {
        Delta {
            entities: self.set.entities,
            deleted_entities: self.deleted_entities,
            added_links: self.added_links,
            deleted_links: self.deleted_links,
            count: self.set.count,
            next_link: self.set.next_link,
            delta_link: self.set.delta_link,
        }
    }
}

/// Content of an element whose kind is not known up front.
enum Content {
    /// Character data; the end tag was consumed.
    Text(String),
    /// First child element; its start tag was consumed.
    Element(StartTag),
}

impl<'s> AtomReader<'s> {
    /// Create reader.
    #[must_use]
    pub fn new(config: Config, types: TypeResolver<'s>) -> Self {
        Self {
            config,
            names: config.version.names(),
            types,
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), Error> {
        if depth > self.config.max_depth {
            Err(Error::Depth(self.config.max_depth))
        } else {
            Ok(())
        }
    }

    fn m_attr<'t>(&self, tag: &'t StartTag, local: &str) -> Option<&'t str> {
        tag.attr(Some(self.names.metadata_ns), local)
    }

    /// Kind of the payload, told by its document element.
    ///
    /// # Errors
    ///
    /// Returns error if the input has no document element.
    pub fn payload_kind(&self, input: &[u8]) -> Result<PayloadKind, Error> {
        let root = XmlCursor::new(input).root()?;
        Ok(root_kind(&root, self.names))
    }

    pub(crate) fn root(&self, cursor: &mut XmlCursor<'_>, expected: PayloadKind) -> Result<StartTag, Error> {
        let root = cursor.root()?;
        let found = root_kind(&root, self.names);
        if found == expected {
            Ok(root)
        } else {
            Err(Error::wrong_kind(expected, found))
        }
    }

    pub(crate) fn payload<T>(&self, root: &StartTag, payload: T) -> Payload<T> {
        Payload {
            context_url: self.m_attr(root, "context").map(ToString::to_string),
            metadata_etag: self.m_attr(root, "metadata-etag").map(ToString::to_string),
            payload,
        }
    }

    fn owner(&self, root: &StartTag) -> Option<String> {
        self.m_attr(root, "context")
            .and_then(|c| self.types.context_entity_type(c))
    }

    /// Read single entry.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` if the document element is not an entry,
    /// parse or primitive errors from its content.
    pub fn read_entity(&self, input: &[u8]) -> Result<Payload<Entity>, Error> {
        let mut cursor = XmlCursor::new(input);
        let root = self.root(&mut cursor, PayloadKind::Entity)?;
        let entity = self.entry(&mut cursor, &root, self.owner(&root), 0)?;
        cursor.finish()?;
        Ok(self.payload(&root, entity))
    }

    /// Read feed.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` if the document element is not a feed,
    /// parse or primitive errors from its content.
    pub fn read_entity_set(&self, input: &[u8]) -> Result<Payload<EntitySet>, Error> {
        let mut cursor = XmlCursor::new(input);
        let root = self.root(&mut cursor, PayloadKind::EntitySet)?;
        let feed = self.feed(&mut cursor, self.owner(&root), 0)?;
        cursor.finish()?;
        if feed.has_delta_records() {
            trace!("skipping delta records of feed read as entity set");
        }
        Ok(self.payload(&root, feed.set))
    }

    /// Read delta feed: entries, `at:deleted-entry`, `m:link` and
    /// `m:deleted-link` in any order.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` if the document element is not a feed,
    /// parse errors for records without their required attributes.
    pub fn read_delta(&self, input: &[u8]) -> Result<Payload<Delta>, Error> {
        let mut cursor = XmlCursor::new(input);
        let root = self.root(&mut cursor, PayloadKind::EntitySet)?;
        let feed = self.feed(&mut cursor, self.owner(&root), 0)?;
        cursor.finish()?;
        Ok(self.payload(&root, feed.into_delta()))
    }

    /// Read feed as a delta if it carries delta records, as an entity set
    /// otherwise.
    pub(crate) fn read_feed_document(&self, input: &[u8]) -> Result<Document, Error> {
        let mut cursor = XmlCursor::new(input);
        let root = self.root(&mut cursor, PayloadKind::EntitySet)?;
        let feed = self.feed(&mut cursor, self.owner(&root), 0)?;
        cursor.finish()?;
        Ok(if feed.has_delta_records() {
            Document::Delta(self.payload(&root, feed.into_delta()))
        } else {
            Document::EntitySet(self.payload(&root, feed.set))
        })
    }

    /// Read individual property: V4 `m:value` named after the context URL
    /// (`value` when the context does not name it), or a `d:Name` element.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` for other documents, parse or primitive
    /// errors from the value.
    pub fn read_property(&self, input: &[u8]) -> Result<Payload<Property>, Error> {
        let mut cursor = XmlCursor::new(input);
        let root = self.root(&mut cursor, PayloadKind::Property)?;
        let context = self.m_attr(&root, "context");
        let name = if root.in_ns(self.names.data_ns) {
            root.local.clone()
        } else {
            context
                .and_then(context_property_name)
                .unwrap_or("value")
                .to_string()
        };
        let resolved = match self.m_attr(&root, "type") {
            Some(t) => Some(self.types.named(t)),
            None => context
                .and_then(|c| self.types.context_type(c))
                .filter(|t| !t.is_navigation()),
        };
        let value = self
            .value(&mut cursor, &root, resolved.as_ref(), 0)
            .map_err(|e| e.in_property(&name))?;
        cursor.finish()?;
        let property = Property {
            type_name: resolved.map(|t| t.type_name()).or_else(|| value.type_name()),
            name,
            value,
            annotations: Vec::new(),
        };
        Ok(self.payload(&root, property))
    }

    fn entry(
        &self,
        cursor: &mut XmlCursor<'_>,
        tag: &StartTag,
        owner: Option<String>,
        depth: usize,
    ) -> Result<Entity, Error> {
        self.check_depth(depth)?;
        let m = self.names.metadata_ns;
        let mut entity = Entity {
            etag: self.m_attr(tag, "etag").map(Into::into),
            type_name: owner,
            ..Entity::default()
        };
        let mut targeted = Vec::new();
        while let Some(child) = cursor.next_child()? {
            match (child.ns.as_deref(), child.local.as_str()) {
                (Some(ATOM_NS), "id") => entity.id = Some(cursor.text()?.into()),
                (Some(ATOM_NS), "category") => {
                    if child.attr(None, "scheme") == Some(self.names.type_scheme) {
                        if let Some(term) = child.attr(None, "term") {
                            entity.type_name = Some(normalize_type_name(term));
                        }
                    }
                    cursor.skip()?;
                }
                (Some(ATOM_NS), "link") => self.link(cursor, &child, &mut entity, depth)?,
                (Some(ATOM_NS), "content") => self.content(cursor, &child, &mut entity, depth)?,
                (Some(ns), "properties") if ns == m => self.properties(cursor, &mut entity, depth)?,
                (Some(ns), "action" | "function") if ns == m => {
                    entity.operations.push(operation(&child));
                    cursor.skip()?;
                }
                (Some(ns), "annotation") if ns == m => {
                    let target = child.attr(None, "target").map(ToString::to_string);
                    let annotation = self.annotation(cursor, &child, depth)?;
                    match target {
                        Some(target) => targeted.push((target, annotation)),
                        None => entity.annotations.push(annotation),
                    }
                }
                _ => skip_unknown(cursor, &child)?,
            }
        }
        for (target, annotation) in targeted {
            attach(&mut entity, &target, annotation);
        }
        Ok(entity)
    }

    fn link(
        &self,
        cursor: &mut XmlCursor<'_>,
        tag: &StartTag,
        entity: &mut Entity,
        depth: usize,
    ) -> Result<(), Error> {
        let names = self.names;
        let href = tag.attr(None, "href").map(ToString::to_string);
        let media_type = tag.attr(None, "type").map(ToString::to_string);
        let etag = self.m_attr(tag, "etag").map(ToString::to_string);
        match tag.attr(None, "rel").unwrap_or("alternate") {
            "self" => entity.self_link = href,
            "edit" => entity.edit_link = href,
            "edit-media" => {
                entity.media_etag.clone_from(&etag);
                let mut link = Link::new(LinkKind::MediaEdit, None, href);
                link.media_type = media_type;
                link.media_etag = etag;
                entity.media_edit_links.push(link);
            }
            rel => {
                if let Some(name) = rel.strip_prefix(names.navigation_rel) {
                    return self.navigation_link(cursor, name, href, entity, depth);
                } else if let Some(name) = rel.strip_prefix(names.association_rel) {
                    entity
                        .association_links
                        .push(Link::new(LinkKind::Association, Some(name.to_string()), href));
                } else if let Some(name) = rel.strip_prefix(names.media_edit_rel) {
                    let mut link = Link::new(LinkKind::MediaEdit, Some(name.to_string()), href);
                    link.media_type = media_type;
                    link.media_etag = etag;
                    entity.media_edit_links.push(link);
                } else {
                    trace!(rel, "skipping link");
                }
            }
        }
        cursor.skip()
    }

    fn navigation_link(
        &self,
        cursor: &mut XmlCursor<'_>,
        name: &str,
        href: Option<String>,
        entity: &mut Entity,
        depth: usize,
    ) -> Result<(), Error> {
        let target = self
            .types
            .declared(entity.type_name.as_deref(), name)
            .as_ref()
            .and_then(navigation_target)
            .map(ToString::to_string);
        let mut link = Link::new(LinkKind::Navigation, Some(name.to_string()), href);
        while let Some(child) = cursor.next_child()? {
            if child.is(self.names.metadata_ns, "inline") {
                link.inline = self
                    .inline(cursor, target.clone(), depth)
                    .map_err(|e| e.in_property(name))?;
            } else {
                skip_unknown(cursor, &child)?;
            }
        }
        entity.navigation_links.push(link);
        Ok(())
    }

    /// Content of `m:inline`: an entry, a feed, or nothing for an empty
    /// expansion.
    fn inline(&self, cursor: &mut XmlCursor<'_>, target: Option<String>, depth: usize) -> Result<Inline, Error> {
        let mut inline = Inline::Null;
        while let Some(child) = cursor.next_child()? {
            if child.is(ATOM_NS, "entry") {
                let entity = self.entry(cursor, &child, target.clone(), depth + 1)?;
                inline = Inline::Entity(Box::new(entity));
            } else if child.is(ATOM_NS, "feed") {
                let feed = self.feed(cursor, target.clone(), depth + 1)?;
                inline = Inline::EntitySet(Box::new(feed.set));
            } else {
                skip_unknown(cursor, &child)?;
            }
        }
        Ok(inline)
    }

    fn content(
        &self,
        cursor: &mut XmlCursor<'_>,
        tag: &StartTag,
        entity: &mut Entity,
        depth: usize,
    ) -> Result<(), Error> {
        let media_type = tag.attr(None, "type");
        if let Some(src) = tag.attr(None, "src") {
            entity.media_content_source = Some(src.to_string());
            entity.media_content_type = media_type.map(ToString::to_string);
            return cursor.skip();
        }
        if !media_type.map_or(true, |t| t.starts_with("application/xml")) {
            trace!(media_type, "skipping inline content");
            return cursor.skip();
        }
        while let Some(child) = cursor.next_child()? {
            if child.is(self.names.metadata_ns, "properties") {
                self.properties(cursor, entity, depth)?;
            } else {
                skip_unknown(cursor, &child)?;
            }
        }
        Ok(())
    }

    fn properties(&self, cursor: &mut XmlCursor<'_>, entity: &mut Entity, depth: usize) -> Result<(), Error> {
        let owner = entity.type_name.clone();
        while let Some(child) = cursor.next_child()? {
            if child.in_ns(self.names.data_ns) {
                let property = self.property(cursor, &child, owner.as_deref(), depth)?;
                entity.properties.push(property);
            } else {
                skip_unknown(cursor, &child)?;
            }
        }
        Ok(())
    }

    fn feed(&self, cursor: &mut XmlCursor<'_>, owner: Option<String>, depth: usize) -> Result<Feed, Error> {
        self.check_depth(depth)?;
        let m = self.names.metadata_ns;
        let mut feed = Feed::default();
        while let Some(child) = cursor.next_child()? {
            match (child.ns.as_deref(), child.local.as_str()) {
                (Some(ATOM_NS), "id") => feed.set.id = Some(cursor.text()?),
                (Some(ATOM_NS), "entry") => {
                    let entity = self.entry(cursor, &child, owner.clone(), depth)?;
                    feed.set.entities.push(entity);
                }
                (Some(ATOM_NS), "link") => {
                    let href = child.attr(None, "href").map(ToString::to_string);
                    match child.attr(None, "rel") {
                        Some("next") => feed.set.next_link = href,
                        Some(rel) if rel == self.names.delta_rel => feed.set.delta_link = href,
                        rel => trace!(rel, "skipping feed link"),
                    }
                    cursor.skip()?;
                }
                (Some(ns), "count") if ns == m => {
                    let text = cursor.text()?;
                    let count = text
                        .trim()
                        .parse()
                        .map_err(|_| Error::parse(format!("invalid count '{text}'")))?;
                    feed.set.count = Some(count);
                }
                (Some(ns), "annotation") if ns == m => {
                    let annotation = self.annotation(cursor, &child, depth)?;
                    feed.set.annotations.push(annotation);
                }
                (Some(ns), "link") if ns == m => {
                    feed.added_links.push(link_change(&child)?);
                    cursor.skip()?;
                }
                (Some(ns), "deleted-link") if ns == m => {
                    feed.deleted_links.push(link_change(&child)?);
                    cursor.skip()?;
                }
                (Some(TOMBSTONE_NS), "deleted-entry") => {
                    let id = child
                        .attr(None, "ref")
                        .ok_or_else(|| Error::parse("deleted entry without 'ref'"))?;
                    feed.deleted_entities.push(DeletedEntity {
                        id: id.to_string(),
                        reason: child.attr(None, "reason").and_then(DeletedReason::parse),
                    });
                    cursor.skip()?;
                }
                _ => skip_unknown(cursor, &child)?,
            }
        }
        Ok(feed)
    }

    fn annotation(&self, cursor: &mut XmlCursor<'_>, tag: &StartTag, depth: usize) -> Result<Annotation, Error> {
        let term = tag
            .attr(None, "term")
            .ok_or_else(|| Error::parse("annotation without 'term'"))?;
        let t = self.m_attr(tag, "type").map(|t| self.types.named(t));
        Ok(Annotation {
            term: term.to_string(),
            value: self.value(cursor, tag, t.as_ref(), depth)?,
        })
    }

    fn property(
        &self,
        cursor: &mut XmlCursor<'_>,
        tag: &StartTag,
        owner: Option<&str>,
        depth: usize,
    ) -> Result<Property, Error> {
        let name = tag.local.as_str();
        let resolved = self.types.resolve(self.m_attr(tag, "type"), owner, name);
        let value = self
            .value(cursor, tag, resolved.as_ref(), depth)
            .map_err(|e| e.in_property(name))?;
        Ok(Property {
            name: name.to_string(),
            type_name: resolved.map(|t| t.type_name()).or_else(|| value.type_name()),
            value,
            annotations: Vec::new(),
        })
    }

    /// Read value of the element whose start tag was just consumed, of the
    /// resolved type or guessed from its content.
    fn value(
        &self,
        cursor: &mut XmlCursor<'_>,
        tag: &StartTag,
        t: Option<&EdmType>,
        depth: usize,
    ) -> Result<Value, Error> {
        self.check_depth(depth)?;
        if self.m_attr(tag, "null") == Some("true") {
            cursor.skip()?;
            return Ok(Value::Null(t.map(EdmType::type_name)));
        }
        match t {
            Some(EdmType::Primitive(kind)) => match Dimension::of(*kind) {
                Some(dimension) => Ok(Value::Geospatial(geometry(cursor, dimension)?)),
                None => {
                    let text = cursor.text()?;
                    Ok(Value::Primitive(PrimitiveValue::parse(&text, *kind, BinaryEncoding::Standard)?))
                }
            },
            Some(EdmType::Enum(name)) => Ok(enum_value(name, cursor.text()?)),
            Some(EdmType::Complex(name) | EdmType::Entity(name)) => match content(cursor)? {
                Content::Text(text) if text.trim().is_empty() => {
                    Ok(Value::Complex(ComplexValue::new(Some(name.clone()))))
                }
                Content::Text(_) if self.types.is_structured(name) => {
                    Err(Error::parse(format!("value of {name} must have child elements")))
                }
                Content::Text(text) => Ok(enum_value(name, text)),
                Content::Element(first) => {
                    let complex = self.complex(cursor, first, Some(name.clone()), depth)?;
                    Ok(Value::Complex(complex))
                }
            },
            Some(EdmType::Collection(inner)) => {
                let first = match content(cursor)? {
                    Content::Element(first) => Some(first),
                    Content::Text(_) => None,
                };
                self.collection(cursor, first, Some(inner), depth)
            }
            None => match content(cursor)? {
                Content::Text(text) => Ok(Value::Primitive(PrimitiveValue::String(text))),
                Content::Element(first) if gml::is_geometry_element(&first) => {
                    let g = gml::read_geometry(cursor, &first, Dimension::Geography, None)?;
                    drain(cursor)?;
                    Ok(Value::Geospatial(g))
                }
                Content::Element(first) if self.is_item(&first) => {
                    self.collection(cursor, Some(first), None, depth)
                }
                Content::Element(first) => {
                    let complex = self.complex(cursor, first, None, depth)?;
                    Ok(Value::Complex(complex))
                }
            },
        }
    }

    fn is_item(&self, tag: &StartTag) -> bool {
        tag.local == "element" && (tag.in_ns(self.names.element_ns) || tag.in_ns(self.names.metadata_ns))
    }

    /// Properties of a complex value, starting at its first child.
    fn complex(
        &self,
        cursor: &mut XmlCursor<'_>,
        first: StartTag,
        type_name: Option<String>,
        depth: usize,
    ) -> Result<ComplexValue, Error> {
        let mut complex = ComplexValue::new(type_name);
        let mut next = Some(first);
        while let Some(child) = next {
            if child.in_ns(self.names.data_ns) {
                let property = self.property(cursor, &child, complex.type_name.as_deref(), depth + 1)?;
                complex.properties.push(property);
            } else {
                skip_unknown(cursor, &child)?;
            }
            next = cursor.next_child()?;
        }
        Ok(complex)
    }

    /// Items of a collection, starting at its first child if any.
    fn collection(
        &self,
        cursor: &mut XmlCursor<'_>,
        first: Option<StartTag>,
        inner: Option<&EdmType>,
        depth: usize,
    ) -> Result<Value, Error> {
        self.check_depth(depth + 1)?;
        let mut collection = CollectionValue::new(inner.map(EdmType::type_name));
        let mut next = first;
        while let Some(child) = next {
            if self.is_item(&child) {
                let t = self.m_attr(&child, "type").map(|t| self.types.named(t));
                let item = self.value(cursor, &child, t.as_ref().or(inner), depth + 1)?;
                collection.try_push(item)?;
            } else {
                skip_unknown(cursor, &child)?;
            }
            next = cursor.next_child()?;
        }
        Ok(Value::Collection(collection))
    }
}

/// Character data up to the end tag, or the first child element.
fn content(cursor: &mut XmlCursor<'_>) -> Result<Content, Error> {
    let mut text = String::new();
    loop {
        match cursor.next()? {
            Node::Text(t) => text.push_str(&t),
            Node::Start(tag) => return Ok(Content::Element(tag)),
            Node::End => return Ok(Content::Text(text)),
        }
    }
}

/// First GML geometry among the children of the current element.
fn geometry(cursor: &mut XmlCursor<'_>, dimension: Dimension) -> Result<Geometry, Error> {
    let mut found = None;
    while let Some(child) = cursor.next_child()? {
        if found.is_none() && gml::is_geometry_element(&child) {
            found = Some(gml::read_geometry(cursor, &child, dimension, None)?);
        } else {
            skip_unknown(cursor, &child)?;
        }
    }
    found.ok_or_else(|| Error::parse("geospatial property without GML geometry"))
}

fn drain(cursor: &mut XmlCursor<'_>) -> Result<(), Error> {
    while let Some(child) = cursor.next_child()? {
        skip_unknown(cursor, &child)?;
    }
    Ok(())
}

fn skip_unknown(cursor: &mut XmlCursor<'_>, tag: &StartTag) -> Result<(), Error> {
    trace!(element = %tag.local, ns = ?tag.ns, "skipping unknown element");
    cursor.skip()
}

fn enum_value(type_name: &str, member: String) -> Value {
    Value::Enum(EnumValue {
        type_name: Some(type_name.to_string()),
        member,
    })
}

fn operation(tag: &StartTag) -> Operation {
    let attr = |name: &str| tag.attr(None, name).map(ToString::to_string);
    Operation {
        kind: if tag.local == "function" {
            OperationKind::Function
        } else {
            OperationKind::Action
        },
        metadata: attr("metadata").unwrap_or_default(),
        title: attr("title"),
        target: attr("target"),
    }
}

fn link_change(tag: &StartTag) -> Result<LinkChange, Error> {
    let attr = |name: &str| {
        tag.attr(None, name)
            .map(ToString::to_string)
            .ok_or_else(|| Error::parse(format!("{} without '{name}'", tag.local)))
    };
    Ok(LinkChange {
        source: attr("source")?,
        relationship: attr("relationship")?,
        target: attr("target")?,
    })
}

/// Attach annotation to the property or navigation link it targets.
fn attach(entity: &mut Entity, target: &str, annotation: Annotation) {
    if let Some(p) = entity.properties.iter_mut().find(|p| p.name == target) {
        p.annotations.push(annotation);
    } else if let Some(link) = entity
        .navigation_links
        .iter_mut()
        .find(|l| l.title.as_deref() == Some(target))
    {
        link.annotations.push(annotation);
    } else {
        trace!(target, term = %annotation.term, "skipping annotation of absent property");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::EdmPrimitiveKind;
    use crate::edm::MapSchema;
    use crate::geo::Shape;
    use crate::version::ODataVersion;

    const ENTRY: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<entry xmlns="http://www.w3.org/2005/Atom"
       xmlns:m="http://docs.oasis-open.org/odata/ns/metadata"
       xmlns:d="http://docs.oasis-open.org/odata/ns/data"
       xmlns:gml="http://www.opengis.net/gml"
       m:context="http://host/svc/$metadata#People/$entity"
       m:etag="W/&quot;1&quot;">
  <id>http://host/svc/People(1)</id>
  <category term="#NS.Person" scheme="http://docs.oasis-open.org/odata/ns/scheme"/>
  <link rel="edit" href="People(1)"/>
  <link rel="http://docs.oasis-open.org/odata/ns/related/BestFriend" type="application/atom+xml;type=entry" title="BestFriend" href="People(1)/BestFriend">
    <m:inline>
      <entry>
        <id>http://host/svc/People(2)</id>
        <content type="application/xml"><m:properties><d:Name>Bob</d:Name></m:properties></content>
      </entry>
    </m:inline>
  </link>
  <link rel="http://docs.oasis-open.org/odata/ns/related/Trips" type="application/atom+xml;type=feed" title="Trips" href="People(1)/Trips">
    <m:inline/>
  </link>
  <link rel="http://docs.oasis-open.org/odata/ns/edit-media/Photo" title="Photo" href="People(1)/Photo" type="image/png" m:etag="p1"/>
  <m:action metadata="#NS.ShareTrip" title="ShareTrip" target="People(1)/NS.ShareTrip"/>
  <m:annotation term="com.contoso.rating" m:type="Edm.Int32">5</m:annotation>
  <m:annotation term="com.contoso.note" target="Name">hello</m:annotation>
  <content type="application/xml">
    <m:properties>
      <d:Name>Ann</d:Name>
      <d:Age m:type="Edm.Int64">42</d:Age>
      <d:Nickname m:null="true"/>
      <d:Emails m:type="#Collection(Edm.String)">
        <m:element>a@x</m:element>
        <m:element>b@x</m:element>
      </d:Emails>
      <d:Home m:type="#NS.Address">
        <d:City>Oslo</d:City>
        <d:Location m:type="Edm.GeographyPoint">
          <gml:Point gml:srsName="http://www.opengis.net/def/crs/EPSG/0/4326"><gml:pos>1 2</gml:pos></gml:Point>
        </d:Location>
      </d:Home>
      <d:Gender m:type="#NS.Gender">Female</d:Gender>
      <x:Unknown xmlns:x="urn:x">skipped</x:Unknown>
    </m:properties>
  </content>
</entry>"##;

    fn reader(schema: Option<&MapSchema>) -> AtomReader<'_> {
        AtomReader::new(
            Config::default(),
            TypeResolver::new(schema.map(|s| s as &dyn crate::edm::EdmSchema)),
        )
    }

    #[test]
    fn reads_entry() {
        let payload = reader(None).read_entity(ENTRY.as_bytes()).unwrap();
        assert_eq!(
            payload.context_url.as_deref(),
            Some("http://host/svc/$metadata#People/$entity")
        );
        let e = payload.payload;
        assert_eq!(e.id.as_ref().map(|id| id.as_str()), Some("http://host/svc/People(1)"));
        assert_eq!(e.type_name.as_deref(), Some("NS.Person"));
        assert_eq!(e.etag.as_ref().map(|t| t.as_str()), Some("W/\"1\""));
        assert_eq!(e.edit_link.as_deref(), Some("People(1)"));

        let name = e.property("Name").unwrap();
        assert_eq!(name.value, Value::from("Ann"));
        assert_eq!(name.annotations[0].term, "com.contoso.note");
        assert_eq!(e.property("Age").unwrap().value, Value::from(42_i64));
        assert_eq!(e.property("Nickname").unwrap().value, Value::Null(None));
        let emails = e.property("Emails").unwrap();
        assert_eq!(emails.type_name.as_deref(), Some("Collection(Edm.String)"));
        assert_eq!(emails.value.as_collection().unwrap().items().len(), 2);

        let home = e.property("Home").unwrap().value.as_complex().unwrap();
        assert_eq!(home.type_name.as_deref(), Some("NS.Address"));
        let location = home.property("Location").unwrap().value.as_geospatial().unwrap();
        assert_eq!(location.crs.as_deref(), Some("4326"));
        assert!(matches!(location.shape, Shape::Point(Some(_))));
        assert_eq!(
            e.property("Gender").unwrap().value,
            enum_value("NS.Gender", "Female".into())
        );
        assert!(e.property("Unknown").is_none());

        let best = e.navigation_link("BestFriend").unwrap();
        match &best.inline {
            Inline::Entity(friend) => assert_eq!(friend.property("Name").unwrap().value, Value::from("Bob")),
            other => panic!("unexpected inline {other:?}"),
        }
        assert_eq!(e.navigation_link("Trips").unwrap().inline, Inline::Null);
        assert_eq!(e.media_edit_links[0].name(), "Photo");
        assert_eq!(e.media_edit_links[0].media_etag.as_deref(), Some("p1"));
        assert_eq!(e.operations[0].metadata, "#NS.ShareTrip");
        assert_eq!(e.annotations[0].value, Value::from(5));
    }

    #[test]
    fn schema_types_untyped_properties() {
        let schema = MapSchema::new()
            .entity_type("NS.Person", None)
            .property("NS.Person", "Age", EdmType::Primitive(EdmPrimitiveKind::Int32))
            .entity_set("People", "NS.Person");
        let doc = r#"<entry xmlns="http://www.w3.org/2005/Atom"
            xmlns:m="http://docs.oasis-open.org/odata/ns/metadata"
            xmlns:d="http://docs.oasis-open.org/odata/ns/data"
            m:context="$metadata#People/$entity">
            <content type="application/xml"><m:properties><d:Age>7</d:Age></m:properties></content>
        </entry>"#;
        let e = reader(Some(&schema)).read_entity(doc.as_bytes()).unwrap().payload;
        assert_eq!(e.type_name.as_deref(), Some("NS.Person"));
        assert_eq!(e.property("Age").unwrap().value, Value::from(7));

        let e = reader(None).read_entity(doc.as_bytes()).unwrap().payload;
        assert_eq!(e.property("Age").unwrap().value, Value::from("7"));
    }

    #[test]
    fn media_entry_properties_outside_content() {
        let doc = r#"<entry xmlns="http://www.w3.org/2005/Atom"
            xmlns:m="http://docs.oasis-open.org/odata/ns/metadata"
            xmlns:d="http://docs.oasis-open.org/odata/ns/data">
            <link rel="edit-media" href="Photos(1)/$value" m:etag="m1"/>
            <content type="image/jpeg" src="Photos(1)/$value"/>
            <m:properties><d:Name>Sunset</d:Name></m:properties>
        </entry>"#;
        let e = reader(None).read_entity(doc.as_bytes()).unwrap().payload;
        assert!(e.is_media_entity());
        assert_eq!(e.media_content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(e.media_etag.as_deref(), Some("m1"));
        assert_eq!(e.media_edit_links[0].title, None);
        assert_eq!(e.property("Name").unwrap().value, Value::from("Sunset"));
    }

    #[test]
    fn reads_feed_and_delta() {
        let doc = r#"<feed xmlns="http://www.w3.org/2005/Atom"
            xmlns:m="http://docs.oasis-open.org/odata/ns/metadata"
            xmlns:d="http://docs.oasis-open.org/odata/ns/data"
            xmlns:at="http://purl.org/atompub/tombstones/1.0">
            <id>People</id>
            <m:count>5</m:count>
            <m:link source="People(1)" relationship="Friends" target="People(2)"/>
            <entry><id>People(3)</id></entry>
            <at:deleted-entry ref="People(4)" reason="deleted"/>
            <m:deleted-link source="People(1)" relationship="Friends" target="People(5)"/>
            <entry><id>People(6)</id></entry>
            <link rel="next" href="People?$skiptoken=2"/>
            <link rel="http://docs.oasis-open.org/odata/ns/delta" href="People?$deltatoken=9"/>
        </feed>"#;
        let delta = reader(None).read_delta(doc.as_bytes()).unwrap().payload;
        assert_eq!(delta.entities.len(), 2);
        assert_eq!(delta.deleted_entities[0].reason, Some(DeletedReason::Deleted));
        assert_eq!(delta.added_links.len(), 1);
        assert_eq!(delta.deleted_links[0].target, "People(5)");
        assert_eq!(delta.count, Some(5));
        assert_eq!(delta.next_link.as_deref(), Some("People?$skiptoken=2"));
        assert_eq!(delta.delta_link.as_deref(), Some("People?$deltatoken=9"));

        let set = reader(None).read_entity_set(doc.as_bytes()).unwrap().payload;
        assert_eq!(set.id.as_deref(), Some("People"));
        assert_eq!(set.entities.len(), 2);
    }

    #[test]
    fn reads_property_payloads() {
        let doc = r#"<m:value xmlns:m="http://docs.oasis-open.org/odata/ns/metadata"
            m:context="$metadata#People(1)/Age" m:type="Edm.Int32">42</m:value>"#;
        let p = reader(None).read_property(doc.as_bytes()).unwrap().payload;
        assert_eq!(p.name, "Age");
        assert_eq!(p.value, Value::from(42));

        let v3 = AtomReader::new(Config::default().version(ODataVersion::V30), TypeResolver::default());
        let doc = r#"<d:Tags xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices"
            xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
            <d:element>a</d:element><d:element>b</d:element>
        </d:Tags>"#;
        let p = v3.read_property(doc.as_bytes()).unwrap().payload;
        assert_eq!(p.name, "Tags");
        assert_eq!(p.value.as_collection().unwrap().items().len(), 2);
        assert_eq!(p.type_name, None);
    }

    #[test]
    fn wrong_kind_and_malformed_input() {
        let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom"/>"#;
        assert!(matches!(
            reader(None).read_entity(feed.as_bytes()),
            Err(Error::WrongPayloadKind {
                expected: PayloadKind::Entity,
                found: PayloadKind::EntitySet
            })
        ));
        let truncated = r#"<entry xmlns="http://www.w3.org/2005/Atom"><id>x</id>"#;
        assert!(matches!(
            reader(None).read_entity(truncated.as_bytes()),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn primitive_errors_carry_property_path() {
        let doc = r##"<entry xmlns="http://www.w3.org/2005/Atom"
            xmlns:m="http://docs.oasis-open.org/odata/ns/metadata"
            xmlns:d="http://docs.oasis-open.org/odata/ns/data">
            <content type="application/xml"><m:properties>
              <d:Home m:type="#NS.Address"><d:Zip m:type="Edm.Int32">99999999999</d:Zip></d:Home>
            </m:properties></content>
        </entry>"##;
        let err = reader(None).read_entity(doc.as_bytes()).unwrap_err();
        assert_eq!(err.property_path(), vec!["Home", "Zip"]);
        assert!(matches!(err.root_cause(), Error::PrimitiveType(_)));
    }

    #[test]
    fn depth_limit() {
        let reader = AtomReader::new(Config::default().max_depth(2), TypeResolver::default());
        let doc = r#"<m:value xmlns:m="http://docs.oasis-open.org/odata/ns/metadata"
            xmlns:d="http://docs.oasis-open.org/odata/ns/data">
            <d:A><d:B><d:C><d:D>x</d:D></d:C></d:B></d:A>
        </m:value>"#;
        let err = reader.read_property(doc.as_bytes()).unwrap_err();
        assert!(matches!(err.root_cause(), Error::Depth(2)));
    }
}
