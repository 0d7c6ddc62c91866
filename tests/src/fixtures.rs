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

//! Fixtures live in `tests/fixtures` of this crate.

use crate::Error;
use odata_codec::edm::MapSchema;
use odata_codec_csdl::parse_schema;
use std::fs;
use std::path::Path;

/// Read fixture file.
///
/// # Errors
///
/// `Error::Fixture` if the file cannot be read.
pub fn fixture(name: &str) -> Result<Vec<u8>, Error> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name);
    fs::read(&path).map_err(|e| Error::Fixture(path, e))
}

/// Schema of the people service, parsed from `trippin.xml`.
///
/// # Errors
///
/// Returns error if the fixture cannot be read or parsed.
pub fn trippin_schema() -> Result<MapSchema, Error> {
    let csdl = String::from_utf8(fixture("trippin.xml")?)?;
    Ok(parse_schema(&csdl)?)
}
