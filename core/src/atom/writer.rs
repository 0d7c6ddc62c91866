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

use super::element_name;
use super::ENTRY_TYPE;
use super::FEED_TYPE;
use crate::config::Config;
use crate::edm::EdmPrimitiveKind;
use crate::entity::Delta;
use crate::entity::Entity;
use crate::entity::EntitySet;
use crate::entity::Inline;
use crate::entity::Link;
use crate::entity::OperationKind;
use crate::entity::Payload;
use crate::geo::gml;
use crate::odata::atom_type_name;
use crate::odata::primitive_kind;
use crate::primitive::BinaryEncoding;
use crate::value::Annotation;
use crate::value::Property;
use crate::value::Value;
use crate::version::Names;
use crate::version::ATOM_NS;
use crate::version::GEORSS_NS;
use crate::version::GML_NS;
use crate::version::TOMBSTONE_NS;
use crate::xml::XmlWriter;
use crate::Error;
use std::io::Write;

/// Writer of Atom entry, feed and property payloads. Atom always carries
/// full metadata; the configured metadata level is ignored.
#[derive(Debug, Clone, Copy)]
pub struct AtomWriter {
    pub(crate) config: Config,
    pub(crate) names: &'static Names,
}

/// Attributes of one element, owned until the element is written.
#[derive(Default)]
pub(crate) struct Attrs(Vec<(&'static str, String)>);

impl Attrs {
    pub(crate) fn push(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.0.push((name, value.into()));
        self
    }

    pub(crate) fn opt(&mut self, name: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    pub(crate) fn as_slice(&self) -> Vec<(&str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

impl AtomWriter {
    /// Create writer.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            names: config.version.names(),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), Error> {
        if depth > self.config.max_depth {
            Err(Error::Depth(self.config.max_depth))
        } else {
            Ok(())
        }
    }

    /// Namespace declarations and document attributes of the root element.
    pub(crate) fn root_attrs<T>(&self, payload: &Payload<T>, atom_default: bool) -> Attrs {
        let mut attrs = Attrs::default();
        if atom_default {
            attrs.push("xmlns", ATOM_NS);
        }
        attrs
            .push("xmlns:m", self.names.metadata_ns)
            .push("xmlns:d", self.names.data_ns)
            .push("xmlns:gml", GML_NS)
            .push("xmlns:georss", GEORSS_NS)
            .opt("m:context", payload.context_url.as_deref())
            .opt("m:metadata-etag", payload.metadata_etag.as_deref());
        attrs
    }

    fn type_attr(&self, name: &str) -> String {
        atom_type_name(name, self.names.hash_types)
    }

    /// Write entry.
    ///
    /// # Errors
    ///
    /// `Error::Depth` if expansions nest deeper than the limit,
    /// `Error::Io` on output failure.
    pub fn write_entity<W: Write>(&self, out: W, payload: &Payload<Entity>) -> Result<(), Error> {
        let mut w = XmlWriter::new(out);
        w.declaration()?;
        let root = self.root_attrs(payload, true);
        self.entry(&mut w, &payload.payload, root, 0)
    }

    /// Write feed.
    ///
    /// # Errors
    ///
    /// `Error::Depth` if expansions nest deeper than the limit,
    /// `Error::Io` on output failure.
    pub fn write_entity_set<W: Write>(&self, out: W, payload: &Payload<EntitySet>) -> Result<(), Error> {
        let mut w = XmlWriter::new(out);
        w.declaration()?;
        let root = self.root_attrs(payload, true);
        self.feed(&mut w, &payload.payload, root, 0)
    }

    /// Write delta feed: entries, then `at:deleted-entry`, `m:link` and
    /// `m:deleted-link` records.
    ///
    /// # Errors
    ///
    /// `Error::Depth` if expansions nest deeper than the limit,
    /// `Error::Io` on output failure.
    pub fn write_delta<W: Write>(&self, out: W, payload: &Payload<Delta>) -> Result<(), Error> {
        let delta = &payload.payload;
        let mut w = XmlWriter::new(out);
        w.declaration()?;
        let mut root = self.root_attrs(payload, true);
        root.push("xmlns:at", TOMBSTONE_NS);
        w.start("feed", &root.as_slice())?;
        if let Some(count) = delta.count {
            w.element("m:count", &[], &count.to_string())?;
        }
        for e in &delta.entities {
            self.entry(&mut w, e, Attrs::default(), 0)?;
        }
        for deleted in &delta.deleted_entities {
            let mut attrs = Attrs::default();
            attrs
                .push("ref", deleted.id.as_str())
                .opt("reason", deleted.reason.map(|r| r.as_str()));
            w.empty("at:deleted-entry", &attrs.as_slice())?;
        }
        for (name, changes) in [("m:link", &delta.added_links), ("m:deleted-link", &delta.deleted_links)] {
            for change in changes {
                w.empty(
                    name,
                    &[
                        ("source", change.source.as_str()),
                        ("relationship", change.relationship.as_str()),
                        ("target", change.target.as_str()),
                    ],
                )?;
            }
        }
        self.feed_links(&mut w, delta.next_link.as_deref(), delta.delta_link.as_deref())?;
        w.end("feed")
    }

    /// Write individual property: V4 `m:value`, V3 `d:Name`.
    ///
    /// # Errors
    ///
    /// `Error::Depth` if the value nests deeper than the limit,
    /// `Error::Io` on output failure.
    pub fn write_property<W: Write>(&self, out: W, payload: &Payload<Property>) -> Result<(), Error> {
        let p = &payload.payload;
        let mut w = XmlWriter::new(out);
        w.declaration()?;
        let name = if self.names.hash_types {
            "m:value".to_string()
        } else {
            format!("d:{}", p.name)
        };
        let root = self.root_attrs(payload, false);
        let type_name = p.type_name.clone().or_else(|| p.value.type_name());
        self.value_element(&mut w, &name, root, &p.value, type_name.as_deref(), 0)
            .map_err(|e| e.in_property(&p.name))
    }

    fn feed<W: Write>(&self, w: &mut XmlWriter<W>, set: &EntitySet, attrs: Attrs, depth: usize) -> Result<(), Error> {
        self.check_depth(depth)?;
        w.start("feed", &attrs.as_slice())?;
        if let Some(id) = &set.id {
            w.element("id", &[], id)?;
        }
        if let Some(count) = set.count {
            w.element("m:count", &[], &count.to_string())?;
        }
        for a in &set.annotations {
            self.annotation(w, a, None, depth)?;
        }
        for e in &set.entities {
            self.entry(w, e, Attrs::default(), depth)?;
        }
        self.feed_links(w, set.next_link.as_deref(), set.delta_link.as_deref())?;
        w.end("feed")
    }

    fn feed_links<W: Write>(&self, w: &mut XmlWriter<W>, next: Option<&str>, delta: Option<&str>) -> Result<(), Error> {
        if let Some(next) = next {
            w.empty("link", &[("rel", "next"), ("href", next)])?;
        }
        if let Some(delta) = delta {
            w.empty("link", &[("rel", self.names.delta_rel), ("href", delta)])?;
        }
        Ok(())
    }

    fn entry<W: Write>(&self, w: &mut XmlWriter<W>, e: &Entity, mut attrs: Attrs, depth: usize) -> Result<(), Error> {
        self.check_depth(depth)?;
        let names = self.names;
        attrs.opt("m:etag", e.etag.as_ref().map(|t| t.as_str()));
        w.start("entry", &attrs.as_slice())?;
        if let Some(id) = &e.id {
            w.element("id", &[], id.as_str())?;
        }
        if let Some(t) = &e.type_name {
            let term = self.type_attr(t);
            w.empty("category", &[("term", term.as_str()), ("scheme", names.type_scheme)])?;
        }
        if let Some(href) = &e.self_link {
            w.empty("link", &[("rel", "self"), ("href", href.as_str())])?;
        }
        if let Some(href) = &e.edit_link {
            w.empty("link", &[("rel", "edit"), ("href", href.as_str())])?;
        }
        for link in &e.media_edit_links {
            let mut attrs = Attrs::default();
            match &link.title {
                None => {
                    attrs
                        .push("rel", "edit-media")
                        .opt("href", link.href.as_deref())
                        .opt("type", link.media_type.as_deref())
                        .opt("m:etag", link.media_etag.as_deref().or(e.media_etag.as_deref()));
                }
                Some(name) => {
                    attrs
                        .push("rel", format!("{}{name}", names.media_edit_rel))
                        .push("title", name.as_str())
                        .opt("href", link.href.as_deref())
                        .opt("type", link.media_type.as_deref())
                        .opt("m:etag", link.media_etag.as_deref());
                }
            }
            w.empty("link", &attrs.as_slice())?;
        }
        for link in &e.navigation_links {
            self.navigation_link(w, link, depth)
                .map_err(|err| err.in_property(link.name()))?;
        }
        for link in &e.association_links {
            let mut attrs = Attrs::default();
            attrs
                .push("rel", format!("{}{}", names.association_rel, link.name()))
                .push("type", "application/xml")
                .push("title", link.name())
                .opt("href", link.href.as_deref());
            w.empty("link", &attrs.as_slice())?;
        }
        for op in &e.operations {
            let name = match op.kind {
                OperationKind::Action => "m:action",
                OperationKind::Function => "m:function",
            };
            let mut attrs = Attrs::default();
            attrs
                .push("metadata", op.metadata.as_str())
                .opt("title", op.title.as_deref())
                .opt("target", op.target.as_deref());
            w.empty(name, &attrs.as_slice())?;
        }
        for a in &e.annotations {
            self.annotation(w, a, None, depth)?;
        }
        for p in &e.properties {
            for a in &p.annotations {
                self.annotation(w, a, Some(&p.name), depth)?;
            }
        }
        for link in &e.navigation_links {
            for a in &link.annotations {
                self.annotation(w, a, Some(link.name()), depth)?;
            }
        }
        match &e.media_content_source {
            Some(src) => {
                let mut attrs = Attrs::default();
                attrs
                    .opt("type", e.media_content_type.as_deref())
                    .push("src", src.as_str());
                w.empty("content", &attrs.as_slice())?;
                self.properties(w, &e.properties, depth)?;
            }
            None => {
                w.start("content", &[("type", "application/xml")])?;
                self.properties(w, &e.properties, depth)?;
                w.end("content")?;
            }
        }
        w.end("entry")
    }

    fn navigation_link<W: Write>(&self, w: &mut XmlWriter<W>, link: &Link, depth: usize) -> Result<(), Error> {
        let media_type = match &link.inline {
            Inline::EntitySet(_) => FEED_TYPE,
            _ => ENTRY_TYPE,
        };
        let mut attrs = Attrs::default();
        attrs
            .push("rel", format!("{}{}", self.names.navigation_rel, link.name()))
            .push("type", media_type)
            .push("title", link.name())
            .opt("href", link.href.as_deref());
        if link.inline == Inline::Deferred {
            return w.empty("link", &attrs.as_slice());
        }
        w.start("link", &attrs.as_slice())?;
        match &link.inline {
            Inline::Entity(inner) => {
                w.start("m:inline", &[])?;
                self.entry(w, inner, Attrs::default(), depth + 1)?;
                w.end("m:inline")?;
            }
            Inline::EntitySet(set) => {
                w.start("m:inline", &[])?;
                self.feed(w, set, Attrs::default(), depth + 1)?;
                w.end("m:inline")?;
            }
            Inline::Null | Inline::Deferred => w.empty("m:inline", &[])?,
        }
        w.end("link")
    }

    fn properties<W: Write>(&self, w: &mut XmlWriter<W>, properties: &[Property], depth: usize) -> Result<(), Error> {
        if properties.is_empty() {
            return Ok(());
        }
        w.start("m:properties", &[])?;
        for p in properties {
            self.property(w, p, depth)?;
        }
        w.end("m:properties")
    }

    fn property<W: Write>(&self, w: &mut XmlWriter<W>, p: &Property, depth: usize) -> Result<(), Error> {
        let type_name = p.type_name.clone().or_else(|| p.value.type_name());
        self.value_element(
            w,
            &format!("d:{}", p.name),
            Attrs::default(),
            &p.value,
            type_name.as_deref(),
            depth,
        )
        .map_err(|e| e.in_property(&p.name))
    }

    fn annotation<W: Write>(
        &self,
        w: &mut XmlWriter<W>,
        a: &Annotation,
        target: Option<&str>,
        depth: usize,
    ) -> Result<(), Error> {
        let mut attrs = Attrs::default();
        attrs.push("term", a.term.as_str()).opt("target", target);
        let type_name = a.value.type_name();
        self.value_element(w, "m:annotation", attrs, &a.value, type_name.as_deref(), depth)
    }

    /// Element holding a value. `m:type` is written unless the type is
    /// `Edm.String` on a non-null value; nulls get `m:null`.
    fn value_element<W: Write>(
        &self,
        w: &mut XmlWriter<W>,
        name: &str,
        mut attrs: Attrs,
        value: &Value,
        type_name: Option<&str>,
        depth: usize,
    ) -> Result<(), Error> {
        self.check_depth(depth)?;
        let is_string = type_name.and_then(primitive_kind) == Some(EdmPrimitiveKind::String);
        if let Some(t) = type_name.filter(|_| value.is_null() || !is_string) {
            attrs.push("m:type", self.type_attr(t));
        }
        match value {
            Value::Null(_) => {
                attrs.push("m:null", "true");
                w.empty(name, &attrs.as_slice())
            }
            Value::Primitive(p) => w.element(name, &attrs.as_slice(), &p.to_wire_string(BinaryEncoding::Standard)),
            Value::Enum(e) => w.element(name, &attrs.as_slice(), &e.member),
            Value::Geospatial(g) => {
                w.start(name, &attrs.as_slice())?;
                gml::write_geometry(w, g, None)?;
                w.end(name)
            }
            Value::Complex(c) => {
                w.start(name, &attrs.as_slice())?;
                for p in &c.properties {
                    self.property(w, p, depth + 1)?;
                }
                w.end(name)
            }
            Value::Collection(c) => {
                w.start(name, &attrs.as_slice())?;
                let item_name = element_name(self.names);
                for item in c.items() {
                    // Items carry their own type only where it differs from the item type.
                    let item_type = item.type_name().filter(|t| Some(t) != c.item_type.as_ref());
                    self.value_element(w, item_name, Attrs::default(), item, item_type.as_deref(), depth + 1)?;
                }
                w.end(name)
            }
        }
    }
}
