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

//! Atom service documents (`app:service`) and XML error bodies
//! (`m:error`). Service items are titled by their name.

use super::writer::Attrs;
use super::AtomReader;
use super::AtomWriter;
use crate::entity::Payload;
use crate::error::PayloadKind;
use crate::error_body::ErrorBody;
use crate::error_body::ErrorDetail;
use crate::error_body::InnerError;
use crate::service::ServiceDocument;
use crate::service::ServiceItem;
use crate::service::ServiceItemKind;
use crate::service::ITEM_KINDS;
use crate::version::APP_NS;
use crate::version::ATOM_NS;
use crate::version::XML_NS;
use crate::xml::StartTag;
use crate::xml::XmlCursor;
use crate::xml::XmlWriter;
use crate::Error;
use std::io::Write;
use std::mem;
use tracing::trace;

const METADATA_SEGMENT: &str = "$metadata";

impl AtomReader<'_> {
    fn item_kind(&self, tag: &StartTag) -> Option<ServiceItemKind> {
        let m = self.names.metadata_ns;
        if tag.is(APP_NS, "collection") {
            Some(ServiceItemKind::EntitySet)
        } else if tag.is(m, "singleton") {
            Some(ServiceItemKind::Singleton)
        } else if tag.is(m, "function-import") {
            Some(ServiceItemKind::FunctionImport)
        } else if tag.is(m, "service-document") {
            Some(ServiceItemKind::ServiceDocument)
        } else {
            None
        }
    }

    /// Read service document.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` if the document element is not
    /// `app:service`, parse errors for items without `href`.
    pub fn read_service_document(&self, input: &[u8]) -> Result<Payload<ServiceDocument>, Error> {
        let mut cursor = XmlCursor::new(input);
        let root = self.root(&mut cursor, PayloadKind::ServiceDocument)?;
        let mut service = ServiceDocument::default();
        while let Some(workspace) = cursor.next_child()? {
            if !workspace.is(APP_NS, "workspace") {
                skip_unknown(&mut cursor, &workspace)?;
                continue;
            }
            while let Some(child) = cursor.next_child()? {
                if child.is(ATOM_NS, "title") {
                    service.title = Some(cursor.text()?);
                    continue;
                }
                let Some(kind) = self.item_kind(&child) else {
                    skip_unknown(&mut cursor, &child)?;
                    continue;
                };
                let url = child
                    .attr(None, "href")
                    .ok_or_else(|| Error::parse(format!("{} without 'href'", child.local)))?
                    .to_string();
                let mut name = None;
                while let Some(item_child) = cursor.next_child()? {
                    if item_child.is(ATOM_NS, "title") {
                        name = Some(cursor.text()?);
                    } else {
                        skip_unknown(&mut cursor, &item_child)?;
                    }
                }
                service.items_mut(kind).push(ServiceItem {
                    name: name.unwrap_or_else(|| url.clone()),
                    title: None,
                    url,
                });
            }
        }
        cursor.finish()?;
        let mut payload = self.payload(&root, service);
        let base = root.attr(Some(XML_NS), "base");
        payload.payload.metadata_uri = payload
            .context_url
            .clone()
            .or_else(|| base.map(|b| format!("{}/{METADATA_SEGMENT}", b.trim_end_matches('/'))));
        Ok(payload)
    }

    /// Read `m:error` body.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` if the document element is not `m:error`.
    pub fn read_error(&self, input: &[u8]) -> Result<ErrorBody, Error> {
        let m = self.names.metadata_ns;
        let mut cursor = XmlCursor::new(input);
        self.root(&mut cursor, PayloadKind::Error)?;
        let mut body = ErrorBody::default();
        while let Some(child) = cursor.next_child()? {
            if !child.in_ns(m) {
                skip_unknown(&mut cursor, &child)?;
                continue;
            }
            match child.local.as_str() {
                "code" => body.code = Some(cursor.text()?),
                "message" => {
                    body.message_lang = child.attr(Some(XML_NS), "lang").map(ToString::to_string);
                    body.message = Some(cursor.text()?);
                }
                "target" => body.target = Some(cursor.text()?),
                "details" => {
                    while let Some(detail) = cursor.next_child()? {
                        if detail.is(m, "detail") {
                            body.details.push(self.detail(&mut cursor)?);
                        } else {
                            skip_unknown(&mut cursor, &detail)?;
                        }
                    }
                }
                "innererror" => body.inner_error = Some(self.inner_error(&mut cursor)?),
                _ => skip_unknown(&mut cursor, &child)?,
            }
        }
        cursor.finish()?;
        Ok(body)
    }

    fn detail(&self, cursor: &mut XmlCursor<'_>) -> Result<ErrorDetail, Error> {
        let mut detail = ErrorDetail::default();
        while let Some(child) = cursor.next_child()? {
            let slot = match child.local.as_str() {
                "code" => &mut detail.code,
                "target" => &mut detail.target,
                "message" => &mut detail.message,
                _ => {
                    skip_unknown(cursor, &child)?;
                    continue;
                }
            };
            *slot = Some(cursor.text()?);
        }
        Ok(detail)
    }

    /// Inner error chain. Each `m:internalexception` opens a level that is
    /// folded into its parent at its end tag, so nesting is not bounded by
    /// the stack.
    fn inner_error(&self, cursor: &mut XmlCursor<'_>) -> Result<InnerError, Error> {
        let m = self.names.metadata_ns;
        let mut current = InnerError::default();
        let mut parents = Vec::new();
        loop {
            match cursor.next_child()? {
                Some(child) if child.is(m, "internalexception") => {
                    parents.push(mem::take(&mut current));
                }
                Some(child) if child.in_ns(m) => match child.local.as_str() {
                    "message" => current.message = Some(cursor.text()?),
                    "type" => current.type_name = Some(cursor.text()?),
                    "stacktrace" => current.stacktrace = Some(cursor.text()?),
                    _ => skip_unknown(cursor, &child)?,
                },
                Some(child) => skip_unknown(cursor, &child)?,
                None => match parents.pop() {
                    Some(mut parent) => {
                        parent.internal_exception = Some(Box::new(current));
                        current = parent;
                    }
                    None => return Ok(current),
                },
            }
        }
    }
}

fn skip_unknown(cursor: &mut XmlCursor<'_>, tag: &StartTag) -> Result<(), Error> {
    trace!(element = %tag.local, "skipping unknown element");
    cursor.skip()
}

impl AtomWriter {
    /// Write service document.
    ///
    /// # Errors
    ///
    /// `Error::Io` on output failure.
    pub fn write_service_document<W: Write>(&self, out: W, payload: &Payload<ServiceDocument>) -> Result<(), Error> {
        let service = &payload.payload;
        let mut w = XmlWriter::new(out);
        w.declaration()?;
        let context = payload.context_url.as_ref().or(service.metadata_uri.as_ref());
        let base = context.and_then(|c| c.strip_suffix(METADATA_SEGMENT));
        let mut attrs = Attrs::default();
        attrs
            .push("xmlns", APP_NS)
            .push("xmlns:atom", ATOM_NS)
            .push("xmlns:m", self.names.metadata_ns)
            .opt("xml:base", base)
            .opt("m:context", context.map(String::as_str))
            .opt("m:metadata-etag", payload.metadata_etag.as_deref());
        w.start("service", &attrs.as_slice())?;
        w.start("workspace", &[])?;
        w.element("atom:title", &[], service.title.as_deref().unwrap_or("Default"))?;
        for kind in ITEM_KINDS {
            let name = match kind {
                ServiceItemKind::EntitySet => "collection",
                ServiceItemKind::Singleton => "m:singleton",
                ServiceItemKind::FunctionImport => "m:function-import",
                ServiceItemKind::ServiceDocument => "m:service-document",
            };
            for item in service.items(kind) {
                w.start(name, &[("href", item.url.as_str())])?;
                w.element("atom:title", &[], &item.name)?;
                w.end(name)?;
            }
        }
        w.end("workspace")?;
        w.end("service")
    }

    /// Write `m:error` body.
    ///
    /// # Errors
    ///
    /// `Error::Io` on output failure.
    pub fn write_error<W: Write>(&self, out: W, error: &ErrorBody) -> Result<(), Error> {
        let mut w = XmlWriter::new(out);
        w.declaration()?;
        w.start("m:error", &[("xmlns:m", self.names.metadata_ns)])?;
        optional(&mut w, "m:code", error.code.as_deref())?;
        if let Some(message) = &error.message {
            let mut attrs = Attrs::default();
            attrs.opt("xml:lang", error.message_lang.as_deref());
            w.element("m:message", &attrs.as_slice(), message)?;
        }
        optional(&mut w, "m:target", error.target.as_deref())?;
        if !error.details.is_empty() {
            w.start("m:details", &[])?;
            for detail in &error.details {
                w.start("m:detail", &[])?;
                optional(&mut w, "m:code", detail.code.as_deref())?;
                optional(&mut w, "m:target", detail.target.as_deref())?;
                optional(&mut w, "m:message", detail.message.as_deref())?;
                w.end("m:detail")?;
            }
            w.end("m:details")?;
        }
        if let Some(inner) = &error.inner_error {
            let levels: Vec<&InnerError> =
                std::iter::successors(Some(inner), |e| e.internal_exception.as_deref()).collect();
            let level_name = |i: usize| if i == 0 { "m:innererror" } else { "m:internalexception" };
            for (i, level) in levels.iter().enumerate() {
                w.start(level_name(i), &[])?;
                optional(&mut w, "m:message", level.message.as_deref())?;
                optional(&mut w, "m:type", level.type_name.as_deref())?;
                optional(&mut w, "m:stacktrace", level.stacktrace.as_deref())?;
            }
            for i in (0..levels.len()).rev() {
                w.end(level_name(i))?;
            }
        }
        w.end("m:error")
    }
}

fn optional<W: Write>(w: &mut XmlWriter<W>, name: &str, text: Option<&str>) -> Result<(), Error> {
    match text {
        Some(text) => w.element(name, &[], text),
        None => Ok(()),
    }
}
