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

use quick_xml::DeError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// CSDL reading errors.
#[derive(Debug)]
pub enum Error {
    /// XML deserialization error.
    XmlDeserialize(DeError),
    /// Document has no or more than one `edmx:DataServices`.
    WrongDataServicesNumber,
    /// Malformed type name or unknown `Edm` primitive type.
    InvalidType(String),
    /// Error in the property of the structured type.
    Property(String, String, Box<Error>),
}

impl Error {
    /// Innermost error with property context removed.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Property(_, _, inner) => inner.root_cause(),
            other => other,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::XmlDeserialize(err) => write!(f, "CSDL deserialization error: {err}"),
            Self::WrongDataServicesNumber => "document must contain exactly one edmx:DataServices".fmt(f),
            Self::InvalidType(name) => write!(f, "invalid type name: {name}"),
            Self::Property(type_name, property, err) => {
                write!(f, "property {property} of type {type_name}: {err}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::XmlDeserialize(err) => Some(err),
            Self::Property(_, _, err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
