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

//! OData identifiers and type names
//!
//! Minimal wrappers for identifiers carried by payloads:
//! - [`ODataId`]: value of `@odata.id` / Atom `id`, the entity identity (opaque string)
//! - [`ODataETag`]: value of `@odata.etag` / `m:etag` (opaque string)
//!
//! Notes
//! - [`ODataId`] and [`ODataETag`] do not validate content.
//! - Type names on the wire may be written `#NS.Type`, `NS.Type`, `#Int32`,
//!   `Edm.Int32` or `#Collection(Int32)`; [`normalize_type_name`] maps all of
//!   them to the canonical form (`Edm.Int32`, `Collection(Edm.Int32)`).
//!
//! Example
//! ```rust
//! use odata_codec::odata::normalize_type_name;
//!
//! assert_eq!(normalize_type_name("#Collection(Int32)"), "Collection(Edm.Int32)");
//! assert_eq!(normalize_type_name("#NS.Person"), "NS.Person");
//! ```
//!
//! References:
//! - OASIS OData 4.01 JSON Format: `@odata.id`, `@odata.etag`, `@odata.type`
//!

use crate::edm::EdmPrimitiveKind;
use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;

/// Type for `@odata.id` identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ODataId(String);

impl ODataId {
    /// Identifier as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ODataId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ODataId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for ODataId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

/// Type for `@odata.etag` identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ODataETag(String);

impl ODataETag {
    /// Entity tag as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ODataETag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ODataETag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for ODataETag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

/// Canonical form of a wire type name.
#[must_use]
pub fn normalize_type_name(name: &str) -> String {
    let name = name.trim().trim_start_matches('#');
    if let Some(inner) = collection_item_type(name) {
        return format!("Collection({})", normalize_type_name(inner));
    }
    if !name.contains('.') {
        if let Ok(kind) = name.parse::<EdmPrimitiveKind>() {
            return kind.qualified_name();
        }
    }
    name.to_string()
}

/// JSON spelling of a canonical type name: `#Int32`, `#NS.Person`,
/// `#Collection(Int32)`. Without `hash` (OData V3) the name is written
/// qualified and unprefixed.
#[must_use]
pub fn json_type_name(name: &str, hash: bool) -> String {
    if !hash {
        return name.to_string();
    }
    fn short(name: &str) -> &str {
        match primitive_kind(name) {
            Some(kind) => kind.name(),
            None => name,
        }
    }
    match collection_item_type(name) {
        Some(inner) => format!("#Collection({})", short(inner)),
        None => format!("#{}", short(name)),
    }
}

/// Atom `m:type` spelling of a canonical type name: primitives as
/// `Edm.Int32`, everything else prefixed by `#` when `hash` is set.
#[must_use]
pub fn atom_type_name(name: &str, hash: bool) -> String {
    if primitive_kind(name).is_some() || !hash {
        name.to_string()
    } else {
        format!("#{name}")
    }
}

/// Item type of `Collection(...)` name.
#[must_use]
pub fn collection_item_type(name: &str) -> Option<&str> {
    name.trim_start_matches('#')
        .strip_prefix("Collection(")
        .and_then(|v| v.strip_suffix(')'))
}

/// Primitive kind named by the canonical type name.
#[must_use]
pub fn primitive_kind(name: &str) -> Option<EdmPrimitiveKind> {
    let name = name.trim_start_matches('#');
    if name.starts_with("Edm.") || !name.contains('.') {
        name.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_short_primitive_names() {
        assert_eq!(normalize_type_name("Int32"), "Edm.Int32");
        assert_eq!(normalize_type_name("#Edm.Int64"), "Edm.Int64");
        assert_eq!(normalize_type_name("#GeographyPoint"), "Edm.GeographyPoint");
        assert_eq!(normalize_type_name("Collection(Edm.String)"), "Collection(Edm.String)");
        assert_eq!(normalize_type_name("Color"), "Color");
        assert_eq!(primitive_kind("Edm.Guid"), Some(EdmPrimitiveKind::Guid));
        assert_eq!(primitive_kind("NS.Color"), None);
    }

    #[test]
    fn wire_spellings() {
        assert_eq!(json_type_name("Edm.Int64", true), "#Int64");
        assert_eq!(json_type_name("Collection(Edm.String)", true), "#Collection(String)");
        assert_eq!(json_type_name("Collection(NS.Address)", true), "#Collection(NS.Address)");
        assert_eq!(json_type_name("Edm.Int64", false), "Edm.Int64");
        assert_eq!(atom_type_name("Edm.Int64", true), "Edm.Int64");
        assert_eq!(atom_type_name("NS.Color", true), "#NS.Color");
        assert_eq!(atom_type_name("Collection(Edm.Int32)", true), "#Collection(Edm.Int32)");
        assert_eq!(atom_type_name("NS.Color", false), "NS.Color");
    }
}
