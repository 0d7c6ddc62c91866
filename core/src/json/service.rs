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

use super::reader::value_array;
use super::JsonReader;
use super::JsonWriter;
use super::Members;
use crate::entity::Payload;
use crate::error::PayloadKind;
use crate::error_body::ErrorBody;
use crate::error_body::ErrorDetail;
use crate::error_body::InnerError;
use crate::service::ServiceDocument;
use crate::service::ServiceItem;
use crate::service::ServiceItemKind;
use crate::service::ITEM_KINDS;
use crate::version::ODataVersion;
use crate::Error;
use serde_json::Map;
use serde_json::Value as JsonValue;
use tracing::trace;

type Object = Map<String, JsonValue>;

fn string(obj: &Object, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(JsonValue::as_str)
        .map(ToString::to_string)
}

impl JsonReader<'_> {
    /// Read service document.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` for other payloads, parse errors for items
    /// without `name` or `url`.
    pub fn read_service_document(&self, doc: &JsonValue) -> Result<Payload<ServiceDocument>, Error> {
        let json = &self.names.json;
        let found = self.payload_kind(doc);
        if !matches!(found, PayloadKind::ServiceDocument | PayloadKind::EntitySet) {
            return Err(Error::wrong_kind(PayloadKind::ServiceDocument, found));
        }
        let obj = doc
            .as_object()
            .ok_or_else(|| Error::parse("payload must be a JSON object"))?;
        let members = Members::group(obj, json);
        let mut service = ServiceDocument {
            metadata_uri: members.control_str(json.context).map(ToString::to_string),
            ..ServiceDocument::default()
        };
        for item in value_array(&members)? {
            let item = item
                .as_object()
                .ok_or_else(|| Error::parse("service document items must be objects"))?;
            let name = string(item, "name").ok_or_else(|| Error::parse("service item without 'name'"))?;
            let url = string(item, "url").ok_or_else(|| Error::parse("service item without 'url'"))?;
            let kind = match item.get("kind").and_then(JsonValue::as_str) {
                None => ServiceItemKind::EntitySet,
                Some(kind) => match ServiceItemKind::parse(kind) {
                    Some(kind) => kind,
                    None => {
                        trace!(kind, name, "skipping service item of unknown kind");
                        continue;
                    }
                },
            };
            service.items_mut(kind).push(ServiceItem {
                name,
                title: string(item, "title"),
                url,
            });
        }
        Ok(self.payload(&members, service))
    }

    /// Read error body. Both the `error` and the older `odata.error`
    /// wrappers are accepted in every version.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` if the document is not an error body.
    pub fn read_error(&self, doc: &JsonValue) -> Result<ErrorBody, Error> {
        let found = self.payload_kind(doc);
        let body = doc
            .get("error")
            .or_else(|| doc.get("odata.error"))
            .and_then(JsonValue::as_object)
            .ok_or(Error::wrong_kind(PayloadKind::Error, found))?;
        let (message, message_lang) = match body.get("message") {
            Some(JsonValue::Object(m)) => (string(m, "value"), string(m, "lang")),
            Some(JsonValue::String(m)) => (Some(m.clone()), None),
            _ => (None, None),
        };
        let details = body
            .get("details")
            .and_then(JsonValue::as_array)
            .map(|details| {
                details
                    .iter()
                    .filter_map(JsonValue::as_object)
                    .map(|d| ErrorDetail {
                        code: string(d, "code"),
                        target: string(d, "target"),
                        message: string(d, "message"),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(ErrorBody {
            code: string(body, "code"),
            message,
            message_lang,
            target: string(body, "target"),
            details,
            inner_error: body
                .get("innererror")
                .and_then(JsonValue::as_object)
                .map(inner_error),
        })
    }
}

/// Inner error chain, read iteratively so that its depth is not bounded
/// by the stack.
fn inner_error(obj: &Object) -> InnerError {
    let mut levels = Vec::new();
    let mut current = Some(obj);
    while let Some(level) = current {
        levels.push(InnerError {
            message: string(level, "message"),
            type_name: string(level, "type"),
            stacktrace: string(level, "stacktrace"),
            internal_exception: None,
        });
        current = level.get("internalexception").and_then(JsonValue::as_object);
    }
    let mut chain = None;
    while let Some(mut level) = levels.pop() {
        level.internal_exception = chain.map(Box::new);
        chain = Some(level);
    }
    chain.unwrap_or_default()
}

fn inner_error_json(inner: &InnerError) -> JsonValue {
    let levels: Vec<&InnerError> =
        std::iter::successors(Some(inner), |e| e.internal_exception.as_deref()).collect();
    let mut chain: Option<Object> = None;
    for level in levels.into_iter().rev() {
        let mut obj = Object::new();
        put(&mut obj, "message", level.message.as_deref());
        put(&mut obj, "type", level.type_name.as_deref());
        put(&mut obj, "stacktrace", level.stacktrace.as_deref());
        if let Some(next) = chain.take() {
            obj.insert("internalexception".into(), JsonValue::Object(next));
        }
        chain = Some(obj);
    }
    JsonValue::Object(chain.unwrap_or_default())
}

fn put(obj: &mut Object, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        obj.insert(key.into(), value.into());
    }
}

impl JsonWriter {
    /// Write service document.
    #[must_use]
    pub fn write_service_document(&self, payload: &Payload<ServiceDocument>) -> JsonValue {
        let json = &self.names.json;
        let service = &payload.payload;
        let mut obj = Object::new();
        if let Some(context) = payload.context_url.as_ref().or(service.metadata_uri.as_ref()) {
            obj.insert(json.context.into(), context.as_str().into());
        }
        let mut items = Vec::new();
        for kind in ITEM_KINDS {
            for item in service.items(kind) {
                let mut entry = Object::new();
                entry.insert("name".into(), item.name.as_str().into());
                put(&mut entry, "title", item.title.as_deref());
                entry.insert("kind".into(), kind.as_str().into());
                entry.insert("url".into(), item.url.as_str().into());
                items.push(JsonValue::Object(entry));
            }
        }
        obj.insert("value".into(), JsonValue::Array(items));
        JsonValue::Object(obj)
    }

    /// Write error body. V3 wraps it in `odata.error` and writes the message
    /// as `{lang, value}`.
    #[must_use]
    pub fn write_error(&self, error: &ErrorBody) -> JsonValue {
        let v3 = self.config.version == ODataVersion::V30;
        let mut body = Object::new();
        put(&mut body, "code", error.code.as_deref());
        if let Some(message) = &error.message {
            let message = if v3 {
                let mut m = Object::new();
                put(&mut m, "lang", error.message_lang.as_deref());
                m.insert("value".into(), message.as_str().into());
                JsonValue::Object(m)
            } else {
                message.as_str().into()
            };
            body.insert("message".into(), message);
        }
        put(&mut body, "target", error.target.as_deref());
        if !error.details.is_empty() {
            let details = error
                .details
                .iter()
                .map(|d| {
                    let mut obj = Object::new();
                    put(&mut obj, "code", d.code.as_deref());
                    put(&mut obj, "target", d.target.as_deref());
                    put(&mut obj, "message", d.message.as_deref());
                    JsonValue::Object(obj)
                })
                .collect();
            body.insert("details".into(), JsonValue::Array(details));
        }
        if let Some(inner) = &error.inner_error {
            body.insert("innererror".into(), inner_error_json(inner));
        }
        let mut obj = Object::new();
        obj.insert(self.names.json.error.into(), JsonValue::Object(body));
        JsonValue::Object(obj)
    }
}
