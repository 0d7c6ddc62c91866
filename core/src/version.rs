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

//! Protocol version and version-keyed wire names
//!
//! Namespace URIs, link relations and JSON control names differ between
//! OData V3 and V4. Each version has one immutable [`Names`] table; codecs
//! look it up once from their configuration.

use serde::Deserialize;
use serde::Serialize;

/// Atom syndication namespace.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
/// Atom publishing protocol namespace (service documents).
pub const APP_NS: &str = "http://www.w3.org/2007/app";
/// GML namespace.
pub const GML_NS: &str = "http://www.opengis.net/gml";
/// GeoRSS namespace.
pub const GEORSS_NS: &str = "http://www.georss.org/georss";
/// Atom tombstones namespace (deleted entries in delta feeds).
pub const TOMBSTONE_NS: &str = "http://purl.org/atompub/tombstones/1.0";
/// `xml:` namespace.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// OData protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ODataVersion {
    /// OData 3.0.
    #[serde(rename = "3.0")]
    V30,
    /// OData 4.0.
    #[serde(rename = "4.0")]
    V40,
}

impl Default for ODataVersion {
    fn default() -> Self {
        Self::V40
    }
}

impl ODataVersion {
    /// Wire names of the version.
    #[must_use]
    pub const fn names(self) -> &'static Names {
        match self {
            Self::V30 => &V30_NAMES,
            Self::V40 => &V40_NAMES,
        }
    }
}

/// Version-keyed names used on the wire.
#[derive(Debug)]
pub struct Names {
    /// Metadata namespace (`m:` prefix).
    pub metadata_ns: &'static str,
    /// Data namespace (`d:` prefix).
    pub data_ns: &'static str,
    /// Scheme of Atom `category` carrying the entity type.
    pub type_scheme: &'static str,
    /// Link relation prefix of navigation links.
    pub navigation_rel: &'static str,
    /// Link relation prefix of association links.
    pub association_rel: &'static str,
    /// Link relation prefix of named stream edit links.
    pub media_edit_rel: &'static str,
    /// Link relation of the delta link in Atom feeds.
    pub delta_rel: &'static str,
    /// Namespace of collection items in Atom (`m:element` / `d:element`).
    pub element_ns: &'static str,
    /// Whether Atom type attributes carry the leading `#`.
    pub hash_types: bool,
    /// JSON names.
    pub json: JsonNames,
}

/// JSON control information names.
#[derive(Debug)]
pub struct JsonNames {
    /// Context URL.
    pub context: &'static str,
    /// Metadata etag.
    pub metadata_etag: &'static str,
    /// Type annotation.
    pub type_: &'static str,
    /// Entity id.
    pub id: &'static str,
    /// Entity tag.
    pub etag: &'static str,
    /// Edit link.
    pub edit_link: &'static str,
    /// Read (self) link.
    pub read_link: &'static str,
    /// Media edit link.
    pub media_edit_link: &'static str,
    /// Media read link.
    pub media_read_link: &'static str,
    /// Media content type.
    pub media_content_type: &'static str,
    /// Media entity tag.
    pub media_etag: &'static str,
    /// Navigation link suffix.
    pub navigation_link: &'static str,
    /// Association link suffix.
    pub association_link: &'static str,
    /// Collection count.
    pub count: &'static str,
    /// Next page link.
    pub next_link: &'static str,
    /// Delta link.
    pub delta_link: &'static str,
    /// Removed marker of delta items.
    pub removed: &'static str,
    /// Wrapper key of error bodies.
    pub error: &'static str,
    /// Prefix shared by all control information of the version.
    pub control_prefix: &'static str,
}

/// OData 3.0 names.
pub const V30_NAMES: Names = Names {
    metadata_ns: "http://schemas.microsoft.com/ado/2007/08/dataservices/metadata",
    data_ns: "http://schemas.microsoft.com/ado/2007/08/dataservices",
    type_scheme: "http://schemas.microsoft.com/ado/2007/08/dataservices/scheme",
    navigation_rel: "http://schemas.microsoft.com/ado/2007/08/dataservices/related/",
    association_rel: "http://schemas.microsoft.com/ado/2007/08/dataservices/relatedlinks/",
    media_edit_rel: "http://schemas.microsoft.com/ado/2007/08/dataservices/edit-media/",
    delta_rel: "http://schemas.microsoft.com/ado/2007/08/dataservices/delta",
    element_ns: "http://schemas.microsoft.com/ado/2007/08/dataservices",
    hash_types: false,
    json: JsonNames {
        context: "odata.metadata",
        metadata_etag: "odata.metadataEtag",
        type_: "odata.type",
        id: "odata.id",
        etag: "odata.etag",
        edit_link: "odata.editLink",
        read_link: "odata.readLink",
        media_edit_link: "odata.mediaEditLink",
        media_read_link: "odata.mediaReadLink",
        media_content_type: "odata.mediaContentType",
        media_etag: "odata.mediaEtag",
        navigation_link: "odata.navigationLinkUrl",
        association_link: "odata.associationLinkUrl",
        count: "odata.count",
        next_link: "odata.nextLink",
        delta_link: "odata.deltaLink",
        removed: "odata.removed",
        error: "odata.error",
        control_prefix: "odata.",
    },
};

/// OData 4.0 names.
pub const V40_NAMES: Names = Names {
    metadata_ns: "http://docs.oasis-open.org/odata/ns/metadata",
    data_ns: "http://docs.oasis-open.org/odata/ns/data",
    type_scheme: "http://docs.oasis-open.org/odata/ns/scheme",
    navigation_rel: "http://docs.oasis-open.org/odata/ns/related/",
    association_rel: "http://docs.oasis-open.org/odata/ns/relatedlinks/",
    media_edit_rel: "http://docs.oasis-open.org/odata/ns/edit-media/",
    delta_rel: "http://docs.oasis-open.org/odata/ns/delta",
    element_ns: "http://docs.oasis-open.org/odata/ns/metadata",
    hash_types: true,
    json: JsonNames {
        context: "@odata.context",
        metadata_etag: "@odata.metadataEtag",
        type_: "@odata.type",
        id: "@odata.id",
        etag: "@odata.etag",
        edit_link: "@odata.editLink",
        read_link: "@odata.readLink",
        media_edit_link: "@odata.mediaEditLink",
        media_read_link: "@odata.mediaReadLink",
        media_content_type: "@odata.mediaContentType",
        media_etag: "@odata.mediaEtag",
        navigation_link: "@odata.navigationLink",
        association_link: "@odata.associationLink",
        count: "@odata.count",
        next_link: "@odata.nextLink",
        delta_link: "@odata.deltaLink",
        removed: "@odata.removed",
        error: "error",
        control_prefix: "@odata.",
    },
};

impl JsonNames {
    /// Whether the member name is control information of this version.
    #[must_use]
    pub fn is_control(&self, name: &str) -> bool {
        name.starts_with(self.control_prefix)
    }

    /// Suffix form of the control name (`@odata.type` for both versions'
    /// `Prop@odata.type` fields).
    #[must_use]
    pub fn suffix(name: &'static str) -> &'static str {
        name.strip_prefix('@').unwrap_or(name)
    }
}
