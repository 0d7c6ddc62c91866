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

//! Codec configuration and wire format selection.
//!
//! ```rust
//! use odata_codec::config::{Format, MetadataLevel};
//!
//! let (format, metadata) =
//!     Format::from_content_type("application/json;odata.metadata=full").unwrap();
//! assert_eq!(format, Format::Json);
//! assert_eq!(metadata, Some(MetadataLevel::Full));
//! ```

use crate::Error;
use crate::ODataVersion;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Amount of control information in JSON payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataLevel {
    /// All control information.
    Full,
    /// Control information that cannot be computed from metadata.
    Minimal,
    /// Data only.
    None,
}

impl Default for MetadataLevel {
    fn default() -> Self {
        Self::Minimal
    }
}

impl Display for MetadataLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Full => "full".fmt(f),
            Self::Minimal => "minimal".fmt(f),
            Self::None => "none".fmt(f),
        }
    }
}

/// Wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Atom / XML.
    Atom,
    /// JSON.
    Json,
}

impl Format {
    /// Detect format (and JSON metadata level, if stated) from a
    /// `Content-Type` / `Accept` value.
    ///
    /// # Errors
    ///
    /// `Error::UnsupportedMediaType` for verbose JSON and unknown media types.
    pub fn from_content_type(content_type: &str) -> Result<(Self, Option<MetadataLevel>), Error> {
        let mut parts = content_type.split(';').map(str::trim);
        let media = parts.next().unwrap_or_default().to_ascii_lowercase();
        match media.as_str() {
            "application/atom+xml" | "application/xml" | "text/xml" => Ok((Self::Atom, None)),
            "application/json" => {
                let mut metadata = None;
                for param in parts {
                    let (key, value) = param.split_once('=').unwrap_or((param, ""));
                    let value = value.trim().trim_matches('"').to_ascii_lowercase();
                    match key.trim().to_ascii_lowercase().as_str() {
                        "odata.metadata" | "metadata" => {
                            metadata = Some(match value.as_str() {
                                "full" => MetadataLevel::Full,
                                "minimal" => MetadataLevel::Minimal,
                                "none" => MetadataLevel::None,
                                _ => return Err(Error::UnsupportedMediaType(content_type.into())),
                            });
                        }
                        "odata" => {
                            metadata = Some(match value.as_str() {
                                "fullmetadata" => MetadataLevel::Full,
                                "minimalmetadata" => MetadataLevel::Minimal,
                                "nometadata" => MetadataLevel::None,
                                _ => return Err(Error::UnsupportedMediaType(content_type.into())),
                            });
                        }
                        _ => {}
                    }
                }
                Ok((Self::Json, metadata))
            }
            _ => Err(Error::UnsupportedMediaType(content_type.into())),
        }
    }
}

/// Whether the content type requests `IEEE754Compatible=true`.
#[must_use]
pub fn is_ieee754_compatible(content_type: &str) -> bool {
    content_type.split(';').skip(1).any(|p| {
        p.split_once('=').map_or(false, |(k, v)| {
            k.trim().eq_ignore_ascii_case("IEEE754Compatible") && v.trim().eq_ignore_ascii_case("true")
        })
    })
}

/// Codec configuration.
///
/// Immutable once handed to a codec; cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Protocol version selecting namespace and control names.
    pub version: ODataVersion,
    /// JSON metadata level used by writers (readers accept every level).
    pub metadata: MetadataLevel,
    /// Write `Int64` and `Decimal` as JSON strings.
    pub ieee754_compatible: bool,
    /// Maximum nesting of expansions and structured values.
    pub max_depth: usize,
}

/// Default limit of nesting levels.
pub const DEFAULT_MAX_DEPTH: usize = 100;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: ODataVersion::V40,
            metadata: MetadataLevel::Minimal,
            ieee754_compatible: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Set protocol version.
    #[must_use]
    pub const fn version(mut self, version: ODataVersion) -> Self {
        self.version = version;
        self
    }

    /// Set JSON metadata level.
    #[must_use]
    pub const fn metadata(mut self, metadata: MetadataLevel) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set `IEEE754Compatible` mode.
    #[must_use]
    pub const fn ieee754_compatible(mut self, on: bool) -> Self {
        self.ieee754_compatible = on;
        self
    }

    /// Set nesting limit.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Apply parameters of a content type (metadata level and
    /// `IEEE754Compatible`) on top of this configuration.
    ///
    /// # Errors
    ///
    /// `Error::UnsupportedMediaType` if the content type is not supported.
    pub fn for_content_type(self, content_type: &str) -> Result<(Format, Self), Error> {
        let (format, metadata) = Format::from_content_type(content_type)?;
        let config = Self {
            metadata: metadata.unwrap_or(self.metadata),
            ieee754_compatible: self.ieee754_compatible || is_ieee754_compatible(content_type),
            ..self
        };
        Ok((format, config))
    }
}
