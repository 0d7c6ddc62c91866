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

//! Command-line entry points of the converter
//!
//! - `Convert`: read a payload in one content type and write it in another,
//!   e.g. Atom to JSON with full metadata. The payload kind is detected.
//! - `Inspect`: print a short summary of a payload.
//!
//! Both commands can type undeclared properties through a CSDL document
//! (`--schema`, or `schema` in the settings file).

use crate::settings::Settings;
use crate::Error;
use clap::Subcommand;
use odata_codec::edm::MapSchema;
use odata_codec::Codec;
use odata_codec::Document;
use odata_codec_csdl::parse_schema;
use std::fmt::Display;
use std::fs::File;
use std::io::stdout;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read as _;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// Content type used for `.json` files.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Content type used for `.xml` and `.atom` files.
pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

/// Converter commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert payload to another format.
    Convert {
        /// Payload to convert.
        input: PathBuf,
        /// Content type of the input. Guessed from the file extension if
        /// omitted.
        #[arg(short, long)]
        from: Option<String>,
        /// Content type of the output, for example
        /// `application/json;odata.metadata=full` or `application/atom+xml`.
        #[arg(short, long)]
        to: String,
        /// CSDL document used to type properties the payload does not.
        #[arg(short, long)]
        schema: Option<PathBuf>,
        /// Output file. Standard output if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print summary of a payload.
    Inspect {
        /// Payload to inspect.
        input: PathBuf,
        /// Content type of the input. Guessed from the file extension if
        /// omitted.
        #[arg(short, long)]
        from: Option<String>,
        /// CSDL document used to type properties the payload does not.
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },
}

/// Process a converter command.
///
/// # Errors
///
/// Returns an error if command processing fails.
pub fn process_command(command: &Commands, settings: &Settings) -> Result<Vec<String>, Error> {
    let mut display_output = Vec::new();
    match command {
        Commands::Convert {
            input,
            from,
            to,
            schema,
            output,
        } => {
            let schema = load_schema(schema.as_ref().or(settings.schema.as_ref()))?;
            let document = read_document(input, from.as_deref(), settings, schema.as_ref())?;
            let writer = Codec::for_content_type(to, settings.codec)?;
            debug!(kind = %document.kind(), to = %to, "converting payload");
            match output {
                Some(output) => {
                    let file = File::create(output).map_err(|e| Error::Io(output.clone(), e))?;
                    let mut out = BufWriter::new(file);
                    writer.write_document(&mut out, &document)?;
                    out.flush().map_err(|e| Error::Io(output.clone(), e))?;
                    display_output.push(format!("{} file has been written", output.display()));
                }
                None => {
                    let mut out = stdout().lock();
                    writer.write_document(&mut out, &document)?;
                    writeln!(out).map_err(|e| Error::Io("-".into(), e))?;
                }
            }
            Ok(display_output)
        }
        Commands::Inspect {
            input,
            from,
            schema,
        } => {
            let schema = load_schema(schema.as_ref().or(settings.schema.as_ref()))?;
            let document = read_document(input, from.as_deref(), settings, schema.as_ref())?;
            display_output.extend(summary(&document));
            Ok(display_output)
        }
    }
}

/// Content type told by the file extension.
#[must_use]
pub fn content_type_of(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "json" => Some(JSON_CONTENT_TYPE),
        "xml" | "atom" => Some(ATOM_CONTENT_TYPE),
        _ => None,
    }
}

fn load_schema(fname: Option<&PathBuf>) -> Result<Option<MapSchema>, Error> {
    let Some(fname) = fname else {
        return Ok(None);
    };
    let mut file = File::open(fname).map_err(|e| Error::Io(fname.clone(), e))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::Io(fname.clone(), e))?;
    parse_schema(&content)
        .map(Some)
        .map_err(|e| Error::Csdl(fname.clone(), e))
}

fn read_document(
    input: &Path,
    from: Option<&str>,
    settings: &Settings,
    schema: Option<&MapSchema>,
) -> Result<Document, Error> {
    let content_type = from
        .or_else(|| content_type_of(input))
        .ok_or_else(|| Error::UnknownContentType(input.to_path_buf()))?;
    let mut reader = Codec::for_content_type(content_type, settings.codec)?;
    if let Some(schema) = schema {
        reader = reader.with_schema(schema);
    }
    let file = File::open(input).map_err(|e| Error::Io(input.to_path_buf(), e))?;
    Ok(reader.read_document(BufReader::new(file))?)
}

/// Human-readable summary of the payload, one fact per line.
#[must_use]
pub fn summary(document: &Document) -> Vec<String> {
    let mut lines = vec![format!("kind: {}", document.kind())];
    let mut line = |key: &str, value: &dyn Display| lines.push(format!("{key}: {value}"));
    match document {
        Document::Entity(p) => {
            if let Some(context) = &p.context_url {
                line("context", context);
            }
            let e = &p.payload;
            if let Some(t) = &e.type_name {
                line("type", t);
            }
            if let Some(id) = &e.id {
                line("id", id);
            }
            line("properties", &e.properties.len());
            line("navigation links", &e.navigation_links.len());
            if e.is_media_entity() {
                line("media", &e.media_content_source.as_deref().unwrap_or_default());
            }
        }
        Document::EntitySet(p) => {
            if let Some(context) = &p.context_url {
                line("context", context);
            }
            line("entities", &p.payload.entities.len());
            if let Some(count) = p.payload.count {
                line("count", &count);
            }
            if let Some(next) = &p.payload.next_link {
                line("next link", next);
            }
        }
        Document::Delta(p) => {
            if let Some(context) = &p.context_url {
                line("context", context);
            }
            let d = &p.payload;
            line("entities", &d.entities.len());
            line("deleted entities", &d.deleted_entities.len());
            line("added links", &d.added_links.len());
            line("deleted links", &d.deleted_links.len());
            if let Some(delta) = &d.delta_link {
                line("delta link", delta);
            }
        }
        Document::Property(p) => {
            line("name", &p.payload.name);
            if let Some(t) = &p.payload.type_name {
                line("type", t);
            }
        }
        Document::ServiceDocument(p) => {
            let s = &p.payload;
            if let Some(metadata) = &s.metadata_uri {
                line("metadata", metadata);
            }
            line("entity sets", &s.entity_sets.len());
            line("singletons", &s.singletons.len());
            line("function imports", &s.function_imports.len());
            line("related service documents", &s.related_service_documents.len());
        }
        Document::Error(e) => {
            if let Some(code) = &e.code {
                line("code", code);
            }
            if let Some(message) = &e.message {
                line("message", message);
            }
            line("inner errors", &e.inner_errors().count());
        }
    }
    lines
}
