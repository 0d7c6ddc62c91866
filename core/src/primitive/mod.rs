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

//! Primitive value codec
//!
//! [`PrimitiveValue::parse`] turns wire text into a typed value of the
//! requested [`EdmPrimitiveKind`]; [`PrimitiveValue::to_wire_string`] is its
//! inverse. Both are pure. Malformed text is reported as
//! [`PrimitiveTypeError`] carrying the text and the expected kind.
//!
//! ```rust
//! use odata_codec::edm::EdmPrimitiveKind;
//! use odata_codec::primitive::{BinaryEncoding, PrimitiveValue};
//!
//! let v = PrimitiveValue::parse("2147483648", EdmPrimitiveKind::Int64, BinaryEncoding::Standard).unwrap();
//! assert_eq!(v, PrimitiveValue::Int64(2_147_483_648));
//! assert!(PrimitiveValue::parse("2147483648", EdmPrimitiveKind::Int32, BinaryEncoding::Standard).is_err());
//! ```

/// `Edm.Binary` encodings.
pub mod binary;
/// `Edm.DateTimeOffset`.
pub mod edm_date_time_offset;
/// Raw (`$value`) bodies.
pub mod raw;
/// `Edm.Date`, `Edm.TimeOfDay`, `Edm.Duration`.
pub mod temporal;

#[doc(inline)]
pub use binary::BinaryEncoding;
#[doc(inline)]
pub use edm_date_time_offset::EdmDateTimeOffset;
#[doc(inline)]
pub use temporal::EdmDate;
#[doc(inline)]
pub use temporal::EdmDuration;
#[doc(inline)]
pub use temporal::EdmTimeOfDay;

use crate::edm::EdmPrimitiveKind;
use crate::error::PrimitiveTypeError;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;
use uuid::Uuid;

/// Typed primitive value.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum PrimitiveValue {
    Boolean(bool),
    Byte(u8),
    SByte(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Binary(Vec<u8>),
    Date(EdmDate),
    DateTimeOffset(EdmDateTimeOffset),
    TimeOfDay(EdmTimeOfDay),
    Duration(EdmDuration),
    Guid(Uuid),
}

impl PrimitiveValue {
    /// Parse wire text as a value of the kind.
    ///
    /// # Errors
    ///
    /// Returns error if the text does not conform to the kind grammar,
    /// including integer overflow. Geospatial and stream kinds are not
    /// primitive values and are always rejected.
    pub fn parse(
        text: &str,
        kind: EdmPrimitiveKind,
        encoding: BinaryEncoding,
    ) -> Result<Self, PrimitiveTypeError> {
        let err = || PrimitiveTypeError::new(text, kind);
        Ok(match kind {
            EdmPrimitiveKind::Boolean => {
                if text.eq_ignore_ascii_case("true") {
                    Self::Boolean(true)
                } else if text.eq_ignore_ascii_case("false") {
                    Self::Boolean(false)
                } else {
                    return Err(err());
                }
            }
            EdmPrimitiveKind::Byte => Self::Byte(integer(text).ok_or_else(err)?),
            EdmPrimitiveKind::SByte => Self::SByte(integer(text).ok_or_else(err)?),
            EdmPrimitiveKind::Int16 => Self::Int16(integer(text).ok_or_else(err)?),
            EdmPrimitiveKind::Int32 => Self::Int32(integer(text).ok_or_else(err)?),
            EdmPrimitiveKind::Int64 => Self::Int64(integer(text).ok_or_else(err)?),
            EdmPrimitiveKind::Single => {
                let v: f32 = float(text).ok_or_else(err)?;
                Self::Single(v)
            }
            EdmPrimitiveKind::Double => {
                let v: f64 = float(text).ok_or_else(err)?;
                Self::Double(v)
            }
            EdmPrimitiveKind::Decimal => Self::Decimal(decimal(text).ok_or_else(err)?),
            EdmPrimitiveKind::String => Self::String(text.to_string()),
            EdmPrimitiveKind::Binary => Self::Binary(encoding.decode(text).map_err(|_| err())?),
            EdmPrimitiveKind::Date => Self::Date(text.parse()?),
            EdmPrimitiveKind::DateTimeOffset => Self::DateTimeOffset(text.parse()?),
            EdmPrimitiveKind::TimeOfDay => Self::TimeOfDay(text.parse()?),
            EdmPrimitiveKind::Duration => Self::Duration(text.parse()?),
            EdmPrimitiveKind::Guid => {
                // Only the 8-4-4-4-12 form is valid on the wire.
                if text.len() != 36 {
                    return Err(err());
                }
                Self::Guid(Uuid::parse_str(text).map_err(|_| err())?)
            }
            _ => return Err(err()),
        })
    }

    /// Kind of the value.
    #[must_use]
    pub const fn kind(&self) -> EdmPrimitiveKind {
        match self {
            Self::Boolean(_) => EdmPrimitiveKind::Boolean,
            Self::Byte(_) => EdmPrimitiveKind::Byte,
            Self::SByte(_) => EdmPrimitiveKind::SByte,
            Self::Int16(_) => EdmPrimitiveKind::Int16,
            Self::Int32(_) => EdmPrimitiveKind::Int32,
            Self::Int64(_) => EdmPrimitiveKind::Int64,
            Self::Single(_) => EdmPrimitiveKind::Single,
            Self::Double(_) => EdmPrimitiveKind::Double,
            Self::Decimal(_) => EdmPrimitiveKind::Decimal,
            Self::String(_) => EdmPrimitiveKind::String,
            Self::Binary(_) => EdmPrimitiveKind::Binary,
            Self::Date(_) => EdmPrimitiveKind::Date,
            Self::DateTimeOffset(_) => EdmPrimitiveKind::DateTimeOffset,
            Self::TimeOfDay(_) => EdmPrimitiveKind::TimeOfDay,
            Self::Duration(_) => EdmPrimitiveKind::Duration,
            Self::Guid(_) => EdmPrimitiveKind::Guid,
        }
    }

    /// Wire text of the value.
    #[must_use]
    pub fn to_wire_string(&self, encoding: BinaryEncoding) -> String {
        match self {
            Self::Boolean(v) => v.to_string(),
            Self::Byte(v) => v.to_string(),
            Self::SByte(v) => v.to_string(),
            Self::Int16(v) => v.to_string(),
            Self::Int32(v) => v.to_string(),
            Self::Int64(v) => v.to_string(),
            Self::Single(v) => format_float(f64::from(*v), &format!("{v:?}")),
            Self::Double(v) => format_float(*v, &format!("{v:?}")),
            Self::Decimal(v) => v.to_string(),
            Self::String(v) => v.clone(),
            Self::Binary(v) => encoding.encode(v),
            Self::Date(v) => v.to_string(),
            Self::DateTimeOffset(v) => v.to_string(),
            Self::TimeOfDay(v) => v.to_string(),
            Self::Duration(v) => v.to_string(),
            Self::Guid(v) => v.hyphenated().to_string(),
        }
    }

    /// String content, if the value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for PrimitiveValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.to_wire_string(BinaryEncoding::Standard).fmt(f)
    }
}

impl From<bool> for PrimitiveValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for PrimitiveValue {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for PrimitiveValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for PrimitiveValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for PrimitiveValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for PrimitiveValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Decimal> for PrimitiveValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<Uuid> for PrimitiveValue {
    fn from(v: Uuid) -> Self {
        Self::Guid(v)
    }
}

fn integer<T: FromStr>(text: &str) -> Option<T> {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn float<T: FromStr + Into<f64> + Copy>(text: &str) -> Option<T> {
    match text {
        "INF" | "Infinity" => return "inf".parse().ok(),
        "-INF" | "-Infinity" => return "-inf".parse().ok(),
        "NaN" => return "NaN".parse().ok(),
        _ => {}
    }
    let mantissa = text.strip_prefix(['-', '+']).unwrap_or(text);
    let valid = mantissa.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && mantissa
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'-' | b'+'));
    if !valid {
        return None;
    }
    let v: T = text.parse().ok()?;
    // Literal overflow turns into infinity; that is an overflow, not INF.
    if v.into().is_infinite() {
        return None;
    }
    Some(v)
}

fn decimal(text: &str) -> Option<Decimal> {
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str(text).ok()
    }
}

fn format_float(v: f64, debug: &str) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        if v > 0.0 { "INF".into() } else { "-INF".into() }
    } else {
        debug.to_string()
    }
}
