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

//! `Edm.DateTimeOffset` primitive wrapper
//!
//! Wraps `time::OffsetDateTime` and reads / writes RFC 3339 text, which is
//! the wire form in both Atom and JSON payloads. Display always uses
//! canonical RFC 3339 formatting; `+00:00` is rendered as `Z` while
//! non‑UTC offsets are preserved.
//!
//! Equality is equality of the instant and the offset, so values that
//! survive a round trip through text compare equal.
//!
//! References:
//! - OASIS OData 4.01 CSDL, Primitive Types: Edm.DateTimeOffset: `https://docs.oasis-open.org/odata/`
//! - RFC 3339: Date and Time on the Internet: `https://datatracker.ietf.org/doc/html/rfc3339`
//!
//! Examples
//! ```rust
//! use odata_codec::EdmDateTimeOffset;
//! use std::str::FromStr;
//!
//! let z = EdmDateTimeOffset::from_str("2021-03-04T05:06:07Z").unwrap();
//! assert_eq!(z.to_string(), "2021-03-04T05:06:07Z".to_string());
//!
//! let plus = EdmDateTimeOffset::from_str("2021-03-04T10:36:07+05:30").unwrap();
//! assert_eq!(plus.to_string(), "2021-03-04T10:36:07+05:30");
//! ```
//!

use crate::edm::EdmPrimitiveKind;
use crate::error::PrimitiveTypeError;
use core::str::FromStr;
use std::fmt::Display;
use std::fmt::Error as FmtError;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Type corresponding to `Edm.DateTimeOffset`.
#[derive(Debug, Clone, Copy)]
pub struct EdmDateTimeOffset(OffsetDateTime);

impl EdmDateTimeOffset {
    /// Underlying date and time.
    #[must_use]
    pub const fn as_offset_date_time(&self) -> OffsetDateTime {
        self.0
    }
}

impl PartialEq for EdmDateTimeOffset {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.0.offset() == other.0.offset()
    }
}

impl From<OffsetDateTime> for EdmDateTimeOffset {
    fn from(dt: OffsetDateTime) -> Self {
        Self(dt)
    }
}

impl From<EdmDateTimeOffset> for OffsetDateTime {
    fn from(w: EdmDateTimeOffset) -> Self {
        w.0
    }
}

impl Display for EdmDateTimeOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = self.0.format(&Rfc3339).map_err(|_| FmtError)?;
        f.write_str(&s)
    }
}

impl FromStr for EdmDateTimeOffset {
    type Err = PrimitiveTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OffsetDateTime::parse(s, &Rfc3339)
            .map(Self)
            .map_err(|_| PrimitiveTypeError::new(s, EdmPrimitiveKind::DateTimeOffset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::UtcOffset;

    #[test]
    fn parses_and_displays_utc_z() {
        let s = "2021-03-04T05:06:07Z";
        let w: EdmDateTimeOffset = s.parse().unwrap();
        assert_eq!(w.to_string(), s);
        assert_eq!(w.as_offset_date_time().offset(), UtcOffset::UTC);
    }

    #[test]
    fn plus_zero_offset_canonicalizes_to_z() {
        let w: EdmDateTimeOffset = "2021-03-04T05:06:07+00:00".parse().unwrap();
        assert_eq!(w.to_string(), "2021-03-04T05:06:07Z");
        let w: EdmDateTimeOffset = "2021-03-04T05:06:07-00:00".parse().unwrap();
        assert_eq!(w.to_string(), "2021-03-04T05:06:07Z");
    }

    #[test]
    fn preserves_offsets_and_fractions() {
        for s in [
            "2021-03-04T10:36:07+05:30",
            "2021-03-04T00:06:07-05:00",
            "2021-03-04T05:06:07.123456789Z",
            "2021-03-04T05:06:07.5+01:00",
            "2021-03-04T12:00:00+14:00",
            "2021-03-04T12:00:00-12:00",
        ] {
            let w: EdmDateTimeOffset = s.parse().unwrap();
            assert_eq!(w.to_string(), s);
        }
    }

    #[test]
    fn same_instant_different_offset_is_not_equal() {
        let a: EdmDateTimeOffset = "2021-03-04T10:36:07+05:30".parse().unwrap();
        let b: EdmDateTimeOffset = "2021-03-04T05:06:07Z".parse().unwrap();
        assert_ne!(a, b);
        assert_eq!(a, "2021-03-04T10:36:07+05:30".parse().unwrap());
    }

    #[test]
    fn rejects_invalid_inputs() {
        let err = "not-a-date".parse::<EdmDateTimeOffset>().unwrap_err();
        assert_eq!(err.expected, EdmPrimitiveKind::DateTimeOffset);
        assert_eq!(err.text, "not-a-date");
        // RFC3339 requires an explicit offset
        assert!("2021-03-04T05:06:07".parse::<EdmDateTimeOffset>().is_err());
        assert!("2021-03-04T23:59:60Z".parse::<EdmDateTimeOffset>().is_err());
    }
}
