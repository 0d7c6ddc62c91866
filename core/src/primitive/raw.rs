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

//! Raw values (`/Property/$value`)
//!
//! A raw value body is the bare wire text of a primitive value
//! (`text/plain`) or, for `Edm.Binary`, the bytes themselves
//! (`application/octet-stream`). Any other media type cannot carry a raw
//! value and is rejected with [`Error::UnsupportedMediaType`].

use super::BinaryEncoding;
use super::PrimitiveValue;
use crate::edm::EdmPrimitiveKind;
use crate::Error;
use std::io::Read;
use std::io::Write;

const TEXT_PLAIN: &str = "text/plain";
const OCTET_STREAM: &str = "application/octet-stream";

/// Media type a raw value of the kind is carried in.
#[must_use]
pub const fn raw_media_type(kind: EdmPrimitiveKind) -> &'static str {
    match kind {
        EdmPrimitiveKind::Binary | EdmPrimitiveKind::Stream => OCTET_STREAM,
        _ => TEXT_PLAIN,
    }
}

fn check_media_type(kind: EdmPrimitiveKind, content_type: &str) -> Result<(), Error> {
    let media = content_type.split(';').next().unwrap_or_default().trim();
    if media.eq_ignore_ascii_case(raw_media_type(kind)) {
        Ok(())
    } else {
        Err(Error::UnsupportedMediaType(format!(
            "{content_type} cannot carry raw {kind} value"
        )))
    }
}

/// Write raw value in the requested media type.
///
/// # Errors
///
/// `Error::UnsupportedMediaType` if the media type cannot carry the value,
/// `Error::Io` on write failure.
pub fn write_raw_value<W: Write>(
    value: &PrimitiveValue,
    content_type: &str,
    mut w: W,
) -> Result<(), Error> {
    check_media_type(value.kind(), content_type)?;
    match value {
        PrimitiveValue::Binary(bytes) => w.write_all(bytes)?,
        other => w.write_all(other.to_wire_string(BinaryEncoding::Standard).as_bytes())?,
    }
    Ok(())
}

/// Read raw value of the kind.
///
/// # Errors
///
/// `Error::UnsupportedMediaType` if the media type cannot carry the value,
/// `Error::PrimitiveType` if the text is not valid for the kind.
pub fn read_raw_value<R: Read>(
    mut r: R,
    kind: EdmPrimitiveKind,
    content_type: &str,
) -> Result<PrimitiveValue, Error> {
    check_media_type(kind, content_type)?;
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)?;
    if kind == EdmPrimitiveKind::Binary {
        return Ok(PrimitiveValue::Binary(bytes));
    }
    let text = String::from_utf8(bytes).map_err(Error::parse)?;
    Ok(PrimitiveValue::parse(&text, kind, BinaryEncoding::Standard)?)
}
