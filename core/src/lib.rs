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

//! OData payload codec
//!
//! Reads and writes OData payloads in Atom and JSON (full, minimal and no
//! metadata) over an owned value model:
//! - [`value`]: properties and the closed [`value::Value`] tree
//! - [`entity`]: entities, links, entity sets and delta payloads
//! - [`service`], [`error_body`]: service documents and error bodies
//! - [`primitive`], [`geo`]: leaf codecs for EDM primitive and geospatial values
//! - [`atom`], [`json`]: format-specific readers and writers
//! - [`codec`]: format-independent [`Codec`] over byte streams
//! - [`infer`]: type resolution from explicit names, schema and value shape
//!
//! Types that the payload does not state are looked up in an optional
//! schema through the [`edm::EdmSchema`] trait.

/// Atom format.
pub mod atom;
/// Format-independent codec.
pub mod codec;
/// Codec configuration.
pub mod config;
/// Entity Data Model types and schema lookup.
pub mod edm;
/// Entities, links, entity sets and delta payloads.
pub mod entity;
/// Codec errors.
pub mod error;
/// Error bodies.
pub mod error_body;
/// Geospatial values.
pub mod geo;
/// Type resolution.
pub mod infer;
/// JSON format.
pub mod json;
/// OData identifiers and type names.
pub mod odata;
/// Primitive values.
pub mod primitive;
/// Service documents.
pub mod service;
/// Properties and values.
pub mod value;
/// Protocol versions and namespaces.
pub mod version;
/// XML pull reader and writer.
pub mod xml;

#[doc(inline)]
pub use codec::Codec;
#[doc(inline)]
pub use codec::Document;
#[doc(inline)]
pub use codec::ODataDeserializer;
#[doc(inline)]
pub use codec::ODataSerializer;
#[doc(inline)]
pub use config::Config;
#[doc(inline)]
pub use config::Format;
#[doc(inline)]
pub use config::MetadataLevel;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use odata::ODataETag;
#[doc(inline)]
pub use odata::ODataId;
#[doc(inline)]
pub use primitive::edm_date_time_offset::EdmDateTimeOffset;
#[doc(inline)]
pub use version::ODataVersion;
