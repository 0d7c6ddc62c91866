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

use crate::Error;
use quick_xml::events::BytesDecl;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Writer;
use std::io::Error as IoError;
use std::io::ErrorKind;
use std::io::Write;

/// Event writer with qualified names spelled out by the caller
/// (`m:properties`, `d:Name`).
pub struct XmlWriter<W: Write> {
    inner: Writer<W>,
}

fn io(err: impl ToString) -> Error {
    Error::Io(IoError::new(ErrorKind::Other, err.to_string()))
}

impl<W: Write> XmlWriter<W> {
    /// Create writer.
    pub fn new(w: W) -> Self {
        Self {
            inner: Writer::new(w),
        }
    }

    /// Write XML declaration.
    ///
    /// # Errors
    ///
    /// Returns error on output failure.
    pub fn declaration(&mut self) -> Result<(), Error> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(io)
    }

    /// Write start tag with attributes.
    ///
    /// # Errors
    ///
    /// Returns error on output failure.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), Error> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.inner.write_event(Event::Start(start)).map_err(io)
    }

    /// Write end tag.
    ///
    /// # Errors
    ///
    /// Returns error on output failure.
    pub fn end(&mut self, name: &str) -> Result<(), Error> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(io)
    }

    /// Write escaped character data.
    ///
    /// # Errors
    ///
    /// Returns error on output failure.
    pub fn text(&mut self, text: &str) -> Result<(), Error> {
        self.inner
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(io)
    }

    /// Write empty element.
    ///
    /// # Errors
    ///
    /// Returns error on output failure.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), Error> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.inner.write_event(Event::Empty(start)).map_err(io)
    }

    /// Write element holding only text.
    ///
    /// # Errors
    ///
    /// Returns error on output failure.
    pub fn element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<(), Error> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// Finish writing and return the output.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}
