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

//! Codec errors
//!
//! Every reader and writer reports one [`Error`]. The taxonomy follows the
//! failure classes callers need to tell apart:
//! - [`Error::Parse`]: the bytes are not a well-formed payload (unbalanced
//!   XML elements, truncated JSON, misplaced values).
//! - [`Error::WrongPayloadKind`]: well-formed, but a different kind of payload
//!   than requested (an entity set handed to the entity reader).
//! - [`Error::PrimitiveType`]: value text does not match the declared or
//!   inferred EDM primitive kind.
//! - [`Error::UnsupportedMediaType`]: the requested wire format cannot carry
//!   the requested value kind.
//!
//! Errors raised while reading a property are wrapped in
//! [`Error::Property`] so the failing path is visible; use
//! [`Error::root_cause`] to match on the underlying class.

use crate::edm::EdmPrimitiveKind;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io::Error as IoError;

/// Kind of a top-level payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Single entity (Atom `entry`).
    Entity,
    /// Collection of entities (Atom `feed`).
    EntitySet,
    /// Delta response.
    Delta,
    /// Individual property.
    Property,
    /// Service document.
    ServiceDocument,
    /// Error body.
    Error,
    /// Anything not recognized.
    Unknown,
}

impl Display for PayloadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Entity => "entity".fmt(f),
            Self::EntitySet => "entity set".fmt(f),
            Self::Delta => "delta".fmt(f),
            Self::Property => "property".fmt(f),
            Self::ServiceDocument => "service document".fmt(f),
            Self::Error => "error".fmt(f),
            Self::Unknown => "unknown payload".fmt(f),
        }
    }
}

/// Structural error in the wire bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human readable description.
    pub message: String,
    /// Byte offset in the input, when the underlying reader reports one.
    pub position: Option<u64>,
}

impl ParseError {
    /// Create parse error without position.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    /// Create parse error at the byte offset.
    #[must_use]
    pub fn at(message: impl Into<String>, position: u64) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.position {
            Some(pos) => write!(f, "{} (at byte {pos})", self.message),
            None => self.message.fmt(f),
        }
    }
}

/// Value text does not match the primitive kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveTypeError {
    /// Offending text.
    pub text: String,
    /// Kind the text was expected to conform to.
    pub expected: EdmPrimitiveKind,
}

impl PrimitiveTypeError {
    /// Create new primitive type error.
    #[must_use]
    pub fn new(text: impl Into<String>, expected: EdmPrimitiveKind) -> Self {
        Self {
            text: text.into(),
            expected,
        }
    }
}

impl Display for PrimitiveTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "'{}' is not a valid {} value", self.text, self.expected)
    }
}

/// Codec errors.
#[derive(Debug)]
pub enum Error {
    /// Structurally malformed payload.
    Parse(ParseError),
    /// Payload is of a different kind than requested.
    WrongPayloadKind {
        /// Kind requested by the caller.
        expected: PayloadKind,
        /// Kind found in the payload.
        found: PayloadKind,
    },
    /// Value text does not match its primitive kind.
    PrimitiveType(PrimitiveTypeError),
    /// Requested format cannot represent the value.
    UnsupportedMediaType(String),
    /// Input / output error of the underlying stream.
    Io(IoError),
    /// Error while reading or writing a named property.
    Property(String, Box<Error>),
    /// Nesting of inline expansions or structured values exceeds the limit.
    Depth(usize),
}

impl Error {
    /// Create a parse error from any displayable cause.
    pub fn parse(cause: impl Display) -> Self {
        Self::Parse(ParseError::new(cause.to_string()))
    }

    /// Error to report when a reader got the other kind of payload.
    #[must_use]
    pub const fn wrong_kind(expected: PayloadKind, found: PayloadKind) -> Self {
        Self::WrongPayloadKind { expected, found }
    }

    /// Wrap the error with the property name it happened in.
    #[must_use]
    pub fn in_property(self, name: &str) -> Self {
        Self::Property(name.to_string(), Box::new(self))
    }

    /// Innermost error with all property context removed.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Property(_, inner) => inner.root_cause(),
            other => other,
        }
    }

    /// Dotted path of properties the error happened in.
    #[must_use]
    pub fn property_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut cur = self;
        while let Self::Property(name, inner) = cur {
            path.push(name.as_str());
            cur = inner;
        }
        path
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Parse(err) => write!(f, "malformed payload: {err}"),
            Self::WrongPayloadKind { expected, found } => {
                write!(f, "wrong payload kind: expected {expected}, found {found}")
            }
            Self::PrimitiveType(err) => write!(f, "primitive value error: {err}"),
            Self::UnsupportedMediaType(media) => write!(f, "unsupported media type: {media}"),
            Self::Io(err) => write!(f, "input/output error: {err}"),
            Self::Property(name, err) => write!(f, "while processing property: {name}\n{err}"),
            Self::Depth(limit) => write!(f, "payload nesting exceeds limit of {limit} levels"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Property(_, err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<PrimitiveTypeError> for Error {
    fn from(err: PrimitiveTypeError) -> Self {
        Self::PrimitiveType(err)
    }
}

impl From<IoError> for Error {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::Parse(ParseError::new(err.to_string()))
        }
    }
}
