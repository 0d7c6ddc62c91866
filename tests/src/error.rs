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

//! Errors for tests

use odata_codec::error::PayloadKind;
use odata_codec::Error as CodecError;
use odata_codec_csdl::Error as CsdlError;
use serde_json::Error as JsonError;
use std::io::Error as IoError;
use std::path::PathBuf;
use std::string::FromUtf8Error;

#[derive(Debug)]
pub enum Error {
    Codec(CodecError),
    Csdl(CsdlError),
    Json(JsonError),
    Fixture(PathBuf, IoError),
    Utf8(FromUtf8Error),
    ExpectedProperty(&'static str),
    UnexpectedDocument(PayloadKind),
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl From<CsdlError> for Error {
    fn from(e: CsdlError) -> Self {
        Self::Csdl(e)
    }
}

impl From<JsonError> for Error {
    fn from(e: JsonError) -> Self {
        Self::Json(e)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(e: FromUtf8Error) -> Self {
        Self::Utf8(e)
    }
}
