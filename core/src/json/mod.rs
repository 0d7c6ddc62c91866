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

//! OData JSON format
//!
//! Readers work on a parsed `serde_json::Value` tree (with
//! `preserve_order`, so document order survives). The members of every
//! object are first grouped in one pass into:
//! - control information of the object (`@odata.id`, `odata.type` in V3);
//! - instance annotations of the object (`@com.contoso.rating`);
//! - advertised operations (`#NS.Discount`);
//! - fields: a property name with its value and everything suffixed to it
//!   (`Name@odata.type`, `Friends@odata.navigationLink`,
//!   `Name@com.contoso.note`), regardless of member order.
//!
//! References:
//! - OASIS OData JSON Format Version 4.01
//! - OData Version 3.0 JSON Format

/// Delta payloads.
pub mod delta;
/// Entity, entity set and property reader.
pub mod reader;
/// Service documents and error bodies.
pub mod service;
/// Entity, entity set and property writer.
pub mod writer;

#[doc(inline)]
pub use reader::JsonReader;
#[doc(inline)]
pub use writer::JsonWriter;

use crate::version::JsonNames;
use serde_json::Map;
use serde_json::Value as JsonValue;
use tracing::trace;

/// Property name with its value and suffixed members.
#[derive(Debug, Default)]
pub(crate) struct Field<'a> {
    pub value: Option<&'a JsonValue>,
    /// Suffixed control information keyed by suffix (`odata.type`).
    pub controls: Vec<(&'a str, &'a JsonValue)>,
    /// Suffixed annotations keyed by term.
    pub annotations: Vec<(&'a str, &'a JsonValue)>,
}

impl<'a> Field<'a> {
    pub fn control(&self, suffix: &str) -> Option<&'a JsonValue> {
        self.controls
            .iter()
            .find(|(k, _)| *k == suffix)
            .map(|(_, v)| *v)
    }

    pub fn control_str(&self, suffix: &str) -> Option<&'a str> {
        self.control(suffix).and_then(JsonValue::as_str)
    }
}

/// Grouped members of one JSON object.
#[derive(Debug, Default)]
pub(crate) struct Members<'a> {
    pub controls: Vec<(&'a str, &'a JsonValue)>,
    pub annotations: Vec<(&'a str, &'a JsonValue)>,
    pub operations: Vec<(&'a str, &'a JsonValue)>,
    pub fields: Vec<(&'a str, Field<'a>)>,
}

impl<'a> Members<'a> {
    pub fn group(obj: &'a Map<String, JsonValue>, names: &JsonNames) -> Self {
        let mut m = Self::default();
        for (key, value) in obj {
            let key = key.as_str();
            if names.is_control(key) {
                m.controls.push((key, value));
            } else if let Some(term) = key.strip_prefix('@') {
                if term.starts_with("odata.") {
                    m.controls.push((key, value));
                } else if term.contains('@') {
                    trace!(member = key, "skipping annotation of annotation");
                } else {
                    m.annotations.push((term, value));
                }
            } else if key.starts_with('#') {
                m.operations.push((key, value));
            } else if let Some((base, suffix)) = key.split_once('@') {
                let field = m.field_mut(base);
                if suffix.starts_with("odata.") {
                    field.controls.push((suffix, value));
                } else {
                    field.annotations.push((suffix, value));
                }
            } else {
                m.field_mut(key).value = Some(value);
            }
        }
        m
    }

    fn field_mut(&mut self, name: &'a str) -> &mut Field<'a> {
        let index = match self.fields.iter().position(|(n, _)| *n == name) {
            Some(index) => index,
            None => {
                self.fields.push((name, Field::default()));
                self.fields.len() - 1
            }
        };
        &mut self.fields[index].1
    }

    pub fn control(&self, name: &str) -> Option<&'a JsonValue> {
        self.controls
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| *v)
    }

    pub fn control_str(&self, name: &str) -> Option<&'a str> {
        self.control(name).and_then(JsonValue::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&Field<'a>> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| f)
    }

    /// Names of fields that carry a value.
    pub fn data_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.fields
            .iter()
            .filter(|(_, f)| f.value.is_some())
            .map(|(n, _)| *n)
    }
}

/// Count value: a number or, in `IEEE754Compatible` payloads, a string.
pub(crate) fn as_count(v: &JsonValue) -> Option<i64> {
    v.as_i64()
        .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

/// Name of the `@odata.null` control of the version.
pub(crate) fn null_control(names: &JsonNames) -> String {
    format!("{}null", names.control_prefix)
}
