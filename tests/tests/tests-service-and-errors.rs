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

use odata_codec::service::ServiceDocument;
use odata_codec::service::ITEM_KINDS;
use odata_codec::service::ServiceItemKind;
use odata_codec::Codec;
use odata_codec::Config;
use odata_codec::Document;
use odata_codec::Format;
use odata_codec::ODataDeserializer;
use odata_codec::ODataSerializer;
use odata_codec::ODataVersion;
use odata_codec_tests::fixture;
use odata_codec_tests::reread;
use odata_codec_tests::Error;
use serde_json::json;

const METADATA: &str = "http://services.example.com/Trippin/$metadata";

fn items(service: &ServiceDocument) -> Vec<(ServiceItemKind, &str, &str)> {
    ITEM_KINDS
        .into_iter()
            .flat_map(|kind| {
            service
                .items(kind)
                .iter()
                .map(move |item| (kind, item.name.as_str(), item.url.as_str()))
        })
        .collect()
}

#[test]
fn service_documents_agree() -> Result<(), Error> {
    let json = Codec::new(Format::Json, Config::default())
        .read_service_document(fixture("service.json")?.as_slice())?
        .into_inner();
    let atom = Codec::new(Format::Atom, Config::default())
        .read_service_document(fixture("service.xml")?.as_slice())?
        .into_inner();
    assert_eq!(items(&json), items(&atom));
    assert_eq!(json.metadata_uri.as_deref(), Some(METADATA));
    assert_eq!(atom.metadata_uri.as_deref(), Some(METADATA));
    assert_eq!(json.entity_set_url("Airlines"), Some("Airlines"));
    assert_eq!(
        items(&json)[4],
        (ServiceItemKind::ServiceDocument, "Reference", "http://services.example.com/Reference/")
    );
    Ok(())
}

#[test]
fn service_document_round_trip() -> Result<(), Error> {
    let json = Codec::new(Format::Json, Config::default());
    let service = json.read_document(fixture("service.json")?.as_slice())?;
    let Document::ServiceDocument(expected) = &service else {
        return Err(Error::UnexpectedDocument(service.kind()));
    };
    assert_eq!(reread(&json, &service)?, service);

    let atom = Codec::new(Format::Atom, Config::default());
    let doc = reread(&atom, &service)?;
    let Document::ServiceDocument(back) = &doc else {
        return Err(Error::UnexpectedDocument(doc.kind()));
    };
    assert_eq!(items(&back.payload), items(&expected.payload));
    Ok(())
}

#[test]
fn error_fixtures_agree() -> Result<(), Error> {
    let json = Codec::new(Format::Json, Config::default()).read_error(fixture("error.json")?.as_slice())?;
    let atom = Codec::new(Format::Atom, Config::default()).read_error(fixture("error.xml")?.as_slice())?;
    assert_eq!(json, atom);

    assert_eq!(json.code.as_deref(), Some("501"));
    assert_eq!(json.details.len(), 1);
    let chain: Vec<_> = json
        .inner_errors()
        .map(|e| (e.type_name.as_deref(), e.message.as_deref()))
        .collect();
    assert_eq!(
        chain,
        vec![
            (Some("Trippin.ServiceException"), Some("Request failed")),
            (Some("Trippin.SearchException"), Some("Search is disabled")),
            (Some("System.IO.IOException"), Some("Index unavailable")),
        ]
    );
    Ok(())
}

#[test]
fn error_chain_round_trip() -> Result<(), Error> {
    let body = Codec::new(Format::Json, Config::default()).read_error(fixture("error.json")?.as_slice())?;
    for format in [Format::Json, Format::Atom] {
        for version in [ODataVersion::V40, ODataVersion::V30] {
            let codec = Codec::new(format, Config::default().version(version));
            let mut out = Vec::new();
            codec.write_error(&mut out, &body)?;
            if format == Format::Json {
                let doc: serde_json::Value = serde_json::from_slice(&out)?;
                let wrapper = if version == ODataVersion::V30 { "odata.error" } else { "error" };
                assert!(doc.get(wrapper).is_some(), "{version:?}");
            }
            assert_eq!(codec.read_error(out.as_slice())?, body, "{format:?} {version:?}");
        }
    }
    Ok(())
}

// Truncated levels and the V3 wrapper are accepted by every version.
#[test]
fn partial_error_bodies() -> Result<(), Error> {
    let doc = json!({
        "odata.error": {
            "code": "400",
            "message": {"lang": "en-US", "value": "Bad request"},
            "innererror": {"internalexception": {"type": "T2"}}
        }
    });
    let body = Codec::new(Format::Json, Config::default()).read_error(serde_json::to_vec(&doc)?.as_slice())?;
    assert_eq!(body.message.as_deref(), Some("Bad request"));
    assert_eq!(body.message_lang.as_deref(), Some("en-US"));
    let chain: Vec<_> = body.inner_errors().map(|e| e.type_name.as_deref()).collect();
    assert_eq!(chain, vec![None, Some("T2")]);
    Ok(())
}
