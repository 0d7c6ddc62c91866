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

//! Converter settings.
//!
//! Read from a TOML file passed with `--config`:
//!
//! ```toml
//! # CSDL document used when --schema is not given.
//! schema = "metadata.xml"
//!
//! [codec]
//! version = "4.0"
//! metadata = "full"
//! ieee754_compatible = false
//! max_depth = 100
//! ```
//!
//! Parameters of the `--from` / `--to` content types take precedence over
//! the `[codec]` table.

use crate::Error;
use odata_codec::Config;
use serde::Deserialize;
use std::fs::File;
use std::io::Read as _;
use std::path::Path;
use std::path::PathBuf;

/// Settings of the converter.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Codec configuration shared by reader and writer.
    pub codec: Config,
    /// Default schema document.
    pub schema: Option<PathBuf>,
}

impl Settings {
    /// Read settings from TOML file.
    ///
    /// # Errors
    ///
    /// - `Error::Io` if failed to read file
    /// - `Error::Settings` if the content is not valid settings.
    pub fn read(fname: &Path) -> Result<Self, Error> {
        let mut file = File::open(fname).map_err(|e| Error::Io(fname.to_path_buf(), e))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::Io(fname.to_path_buf(), e))?;
        toml::from_str(&content).map_err(|e| Error::Settings(fname.to_path_buf(), e))
    }
}
