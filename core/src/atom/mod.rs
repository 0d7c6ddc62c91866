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

//! OData Atom format
//!
//! The reader is a recursive descent over [`XmlCursor`]: one function per
//! element kind, each consuming its element up to and including the end
//! tag. Unknown elements are skipped. The writer emits the fixed prefixes
//! declared on the document element:
//!
//! | prefix    | namespace                         |
//! |-----------|-----------------------------------|
//! | (default) | Atom                              |
//! | `m`       | OData metadata (version-keyed)    |
//! | `d`       | OData data (version-keyed)        |
//! | `gml`     | GML                               |
//! | `georss`  | GeoRSS                            |
//! | `at`      | Atom tombstones (delta feeds)     |
//! | `app`     | Atom publishing (service docs)    |
//!
//! References:
//! - OData Atom Format Version 4.0
//! - RFC 4287 (Atom), RFC 5023 (AtomPub), RFC 6721 (tombstones)
//!
//! [`XmlCursor`]: crate::xml::XmlCursor

/// Entry, feed and property reader.
pub mod reader;
/// Service documents and error bodies.
pub mod service;
/// Entry, feed and property writer.
pub mod writer;

#[doc(inline)]
pub use reader::AtomReader;
#[doc(inline)]
pub use writer::AtomWriter;

use crate::error::PayloadKind;
use crate::version::Names;
use crate::version::APP_NS;
use crate::version::ATOM_NS;
use crate::xml::StartTag;

/// Media type of links to a single entry.
pub const ENTRY_TYPE: &str = "application/atom+xml;type=entry";
/// Media type of links to a feed.
pub const FEED_TYPE: &str = "application/atom+xml;type=feed";

/// Payload kind told by the document element.
pub(crate) fn root_kind(tag: &StartTag, names: &Names) -> PayloadKind {
    if tag.is(ATOM_NS, "entry") {
        PayloadKind::Entity
    } else if tag.is(ATOM_NS, "feed") {
        PayloadKind::EntitySet
    } else if tag.is(APP_NS, "service") {
        PayloadKind::ServiceDocument
    } else if tag.is(names.metadata_ns, "error") {
        PayloadKind::Error
    } else if tag.is(names.metadata_ns, "value") || tag.in_ns(names.data_ns) {
        PayloadKind::Property
    } else {
        PayloadKind::Unknown
    }
}

/// Prefixed name of collection items.
pub(crate) fn element_name(names: &Names) -> &'static str {
    if names.element_ns == names.metadata_ns {
        "m:element"
    } else {
        "d:element"
    }
}
