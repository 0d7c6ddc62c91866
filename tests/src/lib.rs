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

//! This is tests support lib.

/// Errors used in tests.
pub mod error;
/// Payload fixtures.
pub mod fixtures;
/// Merge of JSON payloads.
pub mod json_merge;

#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use fixtures::fixture;
#[doc(inline)]
pub use fixtures::trippin_schema;
#[doc(inline)]
pub use json_merge::json_merge;

use odata_codec::Codec;
use odata_codec::Document;

/// Used in tests for `@odata.context` fields.
pub const ODATA_CONTEXT: &str = "@odata.context";
/// Used in tests for `@odata.id` fields.
pub const ODATA_ID: &str = "@odata.id";
/// Used in tests for `@odata.type` fields.
pub const ODATA_TYPE: &str = "@odata.type";
/// Used in tests for `@odata.etag` fields.
pub const ODATA_ETAG: &str = "@odata.etag";

/// Namespace of the schema in `trippin.xml`.
pub const TRIPPIN: &str = "Trippin";

/// Context URL of a single person.
pub const PERSON_CONTEXT: &str = "http://services.example.com/Trippin/$metadata#People/$entity";

/// Write document with the codec into a buffer.
///
/// # Errors
///
/// Errors of the codec.
pub fn written(codec: &Codec<'_>, document: &Document) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    codec.write_document(&mut out, document)?;
    Ok(out)
}

/// Write document and read it back with the same codec.
///
/// # Errors
///
/// Errors of the codec.
pub fn reread(codec: &Codec<'_>, document: &Document) -> Result<Document, Error> {
    let bytes = written(codec, document)?;
    Ok(codec.read_document(bytes.as_slice())?)
}
