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

//! Format-independent codec
//!
//! [`Codec`] selects the Atom or JSON reader and writer by [`Format`] and
//! works over byte streams. Payload kinds have dedicated methods in
//! [`ODataDeserializer`] and [`ODataSerializer`]; [`Document`] carries a
//! payload whose kind is only known after reading it.
//!
//! ```rust
//! use odata_codec::codec::{Codec, ODataDeserializer, ODataSerializer};
//! use odata_codec::config::{Config, Format};
//!
//! let json = Codec::new(Format::Json, Config::default());
//! let atom = Codec::new(Format::Atom, Config::default());
//! let entity = json
//!     .read_entity(r##"{"@odata.type":"#NS.Person","Name":"Ann"}"##.as_bytes())
//!     .unwrap();
//! let mut xml = Vec::new();
//! atom.write_entity(&mut xml, &entity).unwrap();
//! let back = atom.read_entity(xml.as_slice()).unwrap();
//! assert_eq!(back.payload.type_name.as_deref(), Some("NS.Person"));
//! ```

use crate::atom::AtomReader;
use crate::atom::AtomWriter;
use crate::config::Config;
use crate::config::Format;
use crate::edm::EdmSchema;
use crate::entity::Delta;
use crate::entity::Entity;
use crate::entity::EntitySet;
use crate::entity::Payload;
use crate::error::PayloadKind;
use crate::error_body::ErrorBody;
use crate::infer::TypeResolver;
use crate::json::JsonReader;
use crate::json::JsonWriter;
use crate::service::ServiceDocument;
use crate::value::Property;
use crate::Error;
use serde_json::Value as JsonValue;
use std::io::Read;
use std::io::Write;
use tracing::debug;

/// Reading of top-level payloads from a byte stream.
pub trait ODataDeserializer {
    /// Read single entity.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a well-formed entity payload.
    fn read_entity<R: Read>(&self, input: R) -> Result<Payload<Entity>, Error>;

    /// Read entity collection.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a well-formed entity set payload.
    fn read_entity_set<R: Read>(&self, input: R) -> Result<Payload<EntitySet>, Error>;

    /// Read delta response.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a well-formed delta payload.
    fn read_delta<R: Read>(&self, input: R) -> Result<Payload<Delta>, Error>;

    /// Read individual property.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a well-formed property payload.
    fn read_property<R: Read>(&self, input: R) -> Result<Payload<Property>, Error>;

    /// Read service document.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a well-formed service document.
    fn read_service_document<R: Read>(&self, input: R) -> Result<Payload<ServiceDocument>, Error>;

    /// Read error body.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a well-formed error body.
    fn read_error<R: Read>(&self, input: R) -> Result<ErrorBody, Error>;
}

/// Writing of top-level payloads to a byte stream.
pub trait ODataSerializer {
    /// Write single entity.
    ///
    /// # Errors
    ///
    /// Returns error if the entity cannot be represented or the output fails.
    fn write_entity<W: Write>(&self, out: W, payload: &Payload<Entity>) -> Result<(), Error>;

    /// Write entity collection.
    ///
    /// # Errors
    ///
    /// Returns error if an entity cannot be represented or the output fails.
    fn write_entity_set<W: Write>(&self, out: W, payload: &Payload<EntitySet>) -> Result<(), Error>;

    /// Write delta response.
    ///
    /// # Errors
    ///
    /// Returns error if an entity cannot be represented or the output fails.
    fn write_delta<W: Write>(&self, out: W, payload: &Payload<Delta>) -> Result<(), Error>;

    /// Write individual property.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be represented or the output fails.
    fn write_property<W: Write>(&self, out: W, payload: &Payload<Property>) -> Result<(), Error>;

    /// Write service document.
    ///
    /// # Errors
    ///
    /// Returns error if the output fails.
    fn write_service_document<W: Write>(&self, out: W, payload: &Payload<ServiceDocument>) -> Result<(), Error>;

    /// Write error body.
    ///
    /// # Errors
    ///
    /// Returns error if the output fails.
    fn write_error<W: Write>(&self, out: W, error: &ErrorBody) -> Result<(), Error>;
}

/// Top-level payload of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Single entity.
    Entity(Payload<Entity>),
    /// Entity collection.
    EntitySet(Payload<EntitySet>),
    /// Delta response.
    Delta(Payload<Delta>),
    /// Individual property.
    Property(Payload<Property>),
    /// Service document.
    ServiceDocument(Payload<ServiceDocument>),
    /// Error body.
    Error(ErrorBody),
}

impl Document {
    /// Kind of the payload.
    #[must_use]
    pub const fn kind(&self) -> PayloadKind {
        match self {
            Self::Entity(_) => PayloadKind::Entity,
            Self::EntitySet(_) => PayloadKind::EntitySet,
            Self::Delta(_) => PayloadKind::Delta,
            Self::Property(_) => PayloadKind::Property,
            Self::ServiceDocument(_) => PayloadKind::ServiceDocument,
            Self::Error(_) => PayloadKind::Error,
        }
    }
}

/// Reader and writer of one wire format.
///
/// Holds only configuration and an optional schema, so it can be shared
/// between threads and reused for any number of payloads.
#[derive(Clone, Copy)]
pub struct Codec<'s> {
    format: Format,
    config: Config,
    types: TypeResolver<'s>,
}

impl<'s> Codec<'s> {
    /// Create codec without a schema.
    #[must_use]
    pub fn new(format: Format, config: Config) -> Self {
        Self {
            format,
            config,
            types: TypeResolver::default(),
        }
    }

    /// Create codec for a `Content-Type` value. Parameters of the content
    /// type override the configuration.
    ///
    /// # Errors
    ///
    /// `Error::UnsupportedMediaType` if the content type is not supported.
    pub fn for_content_type(content_type: &str, config: Config) -> Result<Self, Error> {
        let (format, config) = config.for_content_type(content_type)?;
        Ok(Self::new(format, config))
    }

    /// Resolve undeclared types through the schema.
    #[must_use]
    pub fn with_schema(mut self, schema: &'s dyn EdmSchema) -> Self {
        self.types = TypeResolver::new(Some(schema));
        self
    }

    /// Wire format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Kind of the payload in the input.
    ///
    /// # Errors
    ///
    /// Returns error if the input cannot be read or is not well-formed.
    pub fn payload_kind<R: Read>(&self, input: R) -> Result<PayloadKind, Error> {
        let bytes = read_all(input)?;
        match self.format {
            Format::Atom => self.atom_reader().payload_kind(&bytes),
            Format::Json => {
                let doc: JsonValue = serde_json::from_slice(&bytes)?;
                Ok(self.json_reader().payload_kind(&doc))
            }
        }
    }

    /// Read payload of any kind. Atom feeds without delta records are
    /// entity sets.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` with found kind `Unknown` if the payload is
    /// not recognized, otherwise errors of the reader of the found kind.
    pub fn read_document<R: Read>(&self, input: R) -> Result<Document, Error> {
        let bytes = read_all(input)?;
        match self.format {
            Format::Atom => {
                let reader = self.atom_reader();
                let kind = reader.payload_kind(&bytes)?;
                debug!(format = ?self.format, %kind, "reading document");
                match kind {
                    PayloadKind::Entity => reader.read_entity(&bytes).map(Document::Entity),
                    PayloadKind::EntitySet | PayloadKind::Delta => reader.read_feed_document(&bytes),
                    PayloadKind::Property => reader.read_property(&bytes).map(Document::Property),
                    PayloadKind::ServiceDocument => reader.read_service_document(&bytes).map(Document::ServiceDocument),
                    PayloadKind::Error => reader.read_error(&bytes).map(Document::Error),
                    PayloadKind::Unknown => Err(Error::wrong_kind(PayloadKind::Entity, kind)),
                }
            }
            Format::Json => {
                let doc: JsonValue = serde_json::from_slice(&bytes)?;
                let reader = self.json_reader();
                let kind = reader.payload_kind(&doc);
                debug!(format = ?self.format, %kind, "reading document");
                match kind {
                    PayloadKind::Entity => reader.read_entity(&doc).map(Document::Entity),
                    PayloadKind::EntitySet => reader.read_entity_set(&doc).map(Document::EntitySet),
                    PayloadKind::Delta => reader.read_delta(&doc).map(Document::Delta),
                    PayloadKind::Property => reader.read_property(&doc).map(Document::Property),
                    PayloadKind::ServiceDocument => reader.read_service_document(&doc).map(Document::ServiceDocument),
                    PayloadKind::Error => reader.read_error(&doc).map(Document::Error),
                    PayloadKind::Unknown => Err(Error::wrong_kind(PayloadKind::Entity, kind)),
                }
            }
        }
    }

    /// Write payload of any kind.
    ///
    /// # Errors
    ///
    /// Errors of the writer of the document's kind.
    pub fn write_document<W: Write>(&self, out: W, document: &Document) -> Result<(), Error> {
        match document {
            Document::Entity(p) => self.write_entity(out, p),
            Document::EntitySet(p) => self.write_entity_set(out, p),
            Document::Delta(p) => self.write_delta(out, p),
            Document::Property(p) => self.write_property(out, p),
            Document::ServiceDocument(p) => self.write_service_document(out, p),
            Document::Error(e) => self.write_error(out, e),
        }
    }

    fn atom_reader(&self) -> AtomReader<'s> {
        AtomReader::new(self.config, self.types)
    }

    fn json_reader(&self) -> JsonReader<'s> {
        JsonReader::new(self.config, self.types)
    }

    fn read<R, T>(
        &self,
        input: R,
        kind: PayloadKind,
        atom: impl FnOnce(&AtomReader<'s>, &[u8]) -> Result<T, Error>,
        json: impl FnOnce(&JsonReader<'s>, &JsonValue) -> Result<T, Error>,
    ) -> Result<T, Error>
    where
        R: Read,
    {
        debug!(format = ?self.format, %kind, "reading payload");
        let bytes = read_all(input)?;
        match self.format {
            Format::Atom => atom(&self.atom_reader(), &bytes),
            Format::Json => {
                let doc: JsonValue = serde_json::from_slice(&bytes)?;
                json(&self.json_reader(), &doc)
            }
        }
    }

    fn write<W: Write>(
        &self,
        out: W,
        kind: PayloadKind,
        atom: impl FnOnce(&AtomWriter, W) -> Result<(), Error>,
        json: impl FnOnce(&JsonWriter) -> Result<JsonValue, Error>,
    ) -> Result<(), Error> {
        debug!(format = ?self.format, %kind, "writing payload");
        match self.format {
            Format::Atom => atom(&AtomWriter::new(self.config), out),
            Format::Json => {
                let doc = json(&JsonWriter::new(self.config))?;
                serde_json::to_writer(out, &doc)?;
                Ok(())
            }
        }
    }
}

fn read_all<R: Read>(mut input: R) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    Ok(bytes)
}

impl ODataDeserializer for Codec<'_> {
    fn read_entity<R: Read>(&self, input: R) -> Result<Payload<Entity>, Error> {
        self.read(
            input,
            PayloadKind::Entity,
            |r, bytes| r.read_entity(bytes),
            |r, doc| r.read_entity(doc),
        )
    }

    fn read_entity_set<R: Read>(&self, input: R) -> Result<Payload<EntitySet>, Error> {
        self.read(
            input,
            PayloadKind::EntitySet,
            |r, bytes| r.read_entity_set(bytes),
            |r, doc| r.read_entity_set(doc),
        )
    }

    fn read_delta<R: Read>(&self, input: R) -> Result<Payload<Delta>, Error> {
        self.read(
            input,
            PayloadKind::Delta,
            |r, bytes| r.read_delta(bytes),
            |r, doc| r.read_delta(doc),
        )
    }

    fn read_property<R: Read>(&self, input: R) -> Result<Payload<Property>, Error> {
        self.read(
            input,
            PayloadKind::Property,
            |r, bytes| r.read_property(bytes),
            |r, doc| r.read_property(doc),
        )
    }

    fn read_service_document<R: Read>(&self, input: R) -> Result<Payload<ServiceDocument>, Error> {
        self.read(
            input,
            PayloadKind::ServiceDocument,
            |r, bytes| r.read_service_document(bytes),
            |r, doc| r.read_service_document(doc),
        )
    }

    fn read_error<R: Read>(&self, input: R) -> Result<ErrorBody, Error> {
        self.read(
            input,
            PayloadKind::Error,
            |r, bytes| r.read_error(bytes),
            |r, doc| r.read_error(doc),
        )
    }
}

impl ODataSerializer for Codec<'_> {
    fn write_entity<W: Write>(&self, out: W, payload: &Payload<Entity>) -> Result<(), Error> {
        self.write(
            out,
            PayloadKind::Entity,
            |w, out| w.write_entity(out, payload),
            |w| w.write_entity(payload),
        )
    }

    fn write_entity_set<W: Write>(&self, out: W, payload: &Payload<EntitySet>) -> Result<(), Error> {
        self.write(
            out,
            PayloadKind::EntitySet,
            |w, out| w.write_entity_set(out, payload),
            |w| w.write_entity_set(payload),
        )
    }

    fn write_delta<W: Write>(&self, out: W, payload: &Payload<Delta>) -> Result<(), Error> {
        self.write(
            out,
            PayloadKind::Delta,
            |w, out| w.write_delta(out, payload),
            |w| w.write_delta(payload),
        )
    }

    fn write_property<W: Write>(&self, out: W, payload: &Payload<Property>) -> Result<(), Error> {
        self.write(
            out,
            PayloadKind::Property,
            |w, out| w.write_property(out, payload),
            |w| w.write_property(payload),
        )
    }

    fn write_service_document<W: Write>(&self, out: W, payload: &Payload<ServiceDocument>) -> Result<(), Error> {
        self.write(
            out,
            PayloadKind::ServiceDocument,
            |w, out| w.write_service_document(out, payload),
            |w| Ok(w.write_service_document(payload)),
        )
    }

    fn write_error<W: Write>(&self, out: W, error: &ErrorBody) -> Result<(), Error> {
        self.write(
            out,
            PayloadKind::Error,
            |w, out| w.write_error(out, error),
            |w| Ok(w.write_error(error)),
        )
    }
}
