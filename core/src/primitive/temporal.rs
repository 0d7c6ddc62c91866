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

//! `Edm.Date`, `Edm.TimeOfDay` and `Edm.Duration` wrappers
//!
//! Grammar (OData ABNF):
//! - date: `YYYY-MM-DD`
//! - time of day: `hh:mm[:ss[.fffffffff]]`, up to nanosecond precision
//! - duration: `[-]P[nD][T[nH][nM][n[.fffffffff]S]]`
//!
//! Durations are always written with every component
//! (`P1DT0H0M5.25S`), fractional seconds without trailing zeros.
//!
//! References:
//! - OASIS OData 4.01 ABNF: `dateValue`, `timeOfDayValue`, `durationValue`
//!

use crate::edm::EdmPrimitiveKind;
use crate::error::PrimitiveTypeError;
use core::str::FromStr;
use std::fmt::Display;
use std::fmt::Error as FmtError;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;
use time::Duration;
use time::Time;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Type corresponding to `Edm.Date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdmDate(Date);

impl EdmDate {
    /// Underlying date.
    #[must_use]
    pub const fn as_date(&self) -> Date {
        self.0
    }
}

impl From<Date> for EdmDate {
    fn from(d: Date) -> Self {
        Self(d)
    }
}

impl Display for EdmDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = self.0.format(DATE_FORMAT).map_err(|_| FmtError)?;
        f.write_str(&s)
    }
}

impl FromStr for EdmDate {
    type Err = PrimitiveTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| PrimitiveTypeError::new(s, EdmPrimitiveKind::Date))
    }
}

/// Type corresponding to `Edm.TimeOfDay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdmTimeOfDay(Time);

impl EdmTimeOfDay {
    /// Underlying time.
    #[must_use]
    pub const fn as_time(&self) -> Time {
        self.0
    }
}

impl From<Time> for EdmTimeOfDay {
    fn from(t: Time) -> Self {
        Self(t)
    }
}

impl Display for EdmTimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let (h, m, s, nanos) = self.0.as_hms_nano();
        write!(f, "{h:02}:{m:02}:{s:02}")?;
        write_fraction(f, nanos)
    }
}

impl FromStr for EdmTimeOfDay {
    type Err = PrimitiveTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PrimitiveTypeError::new(s, EdmPrimitiveKind::TimeOfDay);
        let mut parts = s.splitn(3, ':');
        let hour = parts.next().and_then(two_digits).ok_or_else(err)?;
        let minute = parts.next().and_then(two_digits).ok_or_else(err)?;
        let (second, nanos) = match parts.next() {
            None => (0, 0),
            Some(rest) => {
                let (sec, frac) = rest.split_once('.').unwrap_or((rest, ""));
                let sec = two_digits(sec).ok_or_else(err)?;
                let nanos = if rest.contains('.') {
                    parse_fraction(frac).ok_or_else(err)?
                } else {
                    0
                };
                (sec, nanos)
            }
        };
        Time::from_hms_nano(hour, minute, second, nanos)
            .map(Self)
            .map_err(|_| err())
    }
}

/// Type corresponding to `Edm.Duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdmDuration(Duration);

impl EdmDuration {
    /// Underlying duration.
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }
}

impl From<Duration> for EdmDuration {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl Display for EdmDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let d = self.0;
        if d.is_negative() {
            f.write_str("-")?;
        }
        let total = d.whole_seconds().unsigned_abs();
        let nanos = d.subsec_nanoseconds().unsigned_abs();
        let days = total / 86_400;
        let hours = total % 86_400 / 3_600;
        let minutes = total % 3_600 / 60;
        let seconds = total % 60;
        write!(f, "P{days}DT{hours}H{minutes}M{seconds}")?;
        write_fraction(f, nanos)?;
        f.write_str("S")
    }
}

impl FromStr for EdmDuration {
    type Err = PrimitiveTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s).ok_or_else(|| PrimitiveTypeError::new(s, EdmPrimitiveKind::Duration))
    }
}

fn parse_duration(s: &str) -> Option<EdmDuration> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let rest = rest.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) if !t.is_empty() => (d, Some(t)),
        Some(_) => return None,
        None => (rest, None),
    };

    let mut seconds: i64 = 0;
    let mut nanos: i32 = 0;
    let mut seen = false;
    if !date_part.is_empty() {
        let days = date_part.strip_suffix('D')?;
        seconds = digits(days)?.checked_mul(86_400)?;
        seen = true;
    }
    if let Some(mut t) = time_part {
        for (unit, factor) in [('H', 3_600_i64), ('M', 60)] {
            if let Some((n, tail)) = t.split_once(unit) {
                seconds = seconds.checked_add(digits(n)?.checked_mul(factor)?)?;
                t = tail;
                seen = true;
            }
        }
        if !t.is_empty() {
            let secs = t.strip_suffix('S')?;
            let (whole, frac) = secs.split_once('.').unwrap_or((secs, ""));
            seconds = seconds.checked_add(digits(whole)?)?;
            if secs.contains('.') {
                nanos = i32::try_from(parse_fraction(frac)?).ok()?;
            }
            seen = true;
        }
    }
    if !seen {
        return None;
    }
    let d = Duration::new(seconds, nanos);
    Some(EdmDuration(if negative { -d } else { d }))
}

fn digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn two_digits(s: &str) -> Option<u8> {
    if s.len() != 2 {
        return None;
    }
    digits(s).and_then(|v| u8::try_from(v).ok())
}

/// Parse 1 to 9 fractional digits into nanoseconds.
fn parse_fraction(frac: &str) -> Option<u32> {
    if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = frac.parse().ok()?;
    let scale = 10_u32.pow(u32::try_from(9 - frac.len()).ok()?);
    Some(value * scale)
}

fn write_fraction(f: &mut Formatter<'_>, nanos: u32) -> FmtResult {
    if nanos == 0 {
        return Ok(());
    }
    let digits = format!("{nanos:09}");
    write!(f, ".{}", digits.trim_end_matches('0'))
}
