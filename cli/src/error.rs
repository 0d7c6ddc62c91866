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

use odata_codec::Error as CodecError;
use odata_codec_csdl::Error as CsdlError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io::Error as IoError;
use std::path::PathBuf;
use toml::de::Error as TomlError;

/// Converter errors.
#[derive(Debug)]
pub enum Error {
    /// Input / output error on the file.
    Io(PathBuf, IoError),
    /// Payload could not be read or written.
    Codec(CodecError),
    /// Schema document could not be read.
    Csdl(PathBuf, CsdlError),
    /// Settings file is not valid TOML / settings.
    Settings(PathBuf, TomlError),
    /// Content type is neither given nor known from the file extension.
    UnknownContentType(PathBuf),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io(fname, error) => {
                write!(f, "input/output error: file: {}: {error}", fname.display())
            }
            Self::Codec(error) => write!(f, "payload error: {error}"),
            Self::Csdl(fname, error) => {
                write!(f, "schema error: file: {}: {error}", fname.display())
            }
            Self::Settings(fname, error) => {
                write!(f, "settings error: file: {}: {error}", fname.display())
            }
            Self::UnknownContentType(fname) => write!(
                f,
                "cannot tell content type of {}; pass it with --from",
                fname.display()
            ),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(_, err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::Csdl(_, err) => Some(err),
            Self::Settings(_, err) => Some(err),
            Self::UnknownContentType(_) => None,
        }
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}
