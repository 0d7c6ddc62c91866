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

use odata_codec::entity::Inline;
use odata_codec::primitive::PrimitiveValue;
use odata_codec::Codec;
use odata_codec::Config;
use odata_codec::Document;
use odata_codec::Format;
use odata_codec::MetadataLevel;
use odata_codec::ODataDeserializer;
use odata_codec::ODataSerializer;
use odata_codec::ODataVersion;
use odata_codec_tests::fixture;
use odata_codec_tests::reread;
use odata_codec_tests::trippin_schema;
use odata_codec_tests::Error;
use odata_codec_tests::PERSON_CONTEXT;
use odata_codec_tests::TRIPPIN;

const AVATAR: &str = "fi653p3+MklA/LdoBlhWgnMTUUEo8tEgtbMXnF0a3CUNL9BZxXpSRiD9ebTnmNR0zWPjJVIDx4tdmCnq55XrJh+RW9aI/b34wAogK3kcORw=";

fn full() -> Config {
    Config::default().metadata(MetadataLevel::Full)
}

// Same person served as JSON and as untyped Atom reads to the same
// entity once the schema is known.
#[test]
fn json_and_atom_fixtures_agree() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let json = Codec::new(Format::Json, full()).with_schema(&schema);
    let atom = Codec::new(Format::Atom, full()).with_schema(&schema);
    let from_json = json.read_entity(fixture("person.json")?.as_slice())?;
    let from_atom = atom.read_entity(fixture("person.atom.xml")?.as_slice())?;
    assert_eq!(from_json.context_url.as_deref(), Some(PERSON_CONTEXT));
    assert_eq!(from_atom, from_json);

    let person = &from_json.payload;
    assert_eq!(person.type_name, Some(format!("{TRIPPIN}.Person")));
    assert_eq!(
        person.etag.as_ref().map(|t| t.as_str()),
        Some("W/\"08D1694BD49A0F11\"")
    );
    let age = person.property("Age").ok_or(Error::ExpectedProperty("Age"))?;
    assert_eq!(age.value.as_primitive(), Some(&PrimitiveValue::Int64(42)));
    assert_eq!(age.type_name.as_deref(), Some("Edm.Int64"));
    let best = person
        .navigation_link("BestFriend")
        .ok_or(Error::ExpectedProperty("BestFriend"))?;
    match &best.inline {
        Inline::Entity(friend) => assert_eq!(friend.type_name, Some(format!("{TRIPPIN}.Person"))),
        other => panic!("unexpected inline {other:?}"),
    }
    Ok(())
}

#[test]
fn full_json_round_trip() -> Result<(), Error> {
    let schema = trippin_schema()?;
    for codec in [
        Codec::new(Format::Json, full()).with_schema(&schema),
        Codec::new(Format::Json, full()),
    ] {
        let person = codec.read_document(fixture("person.json")?.as_slice())?;
        assert_eq!(reread(&codec, &person)?, person);
    }
    Ok(())
}

#[test]
fn atom_round_trip_in_both_versions() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let json = Codec::new(Format::Json, full()).with_schema(&schema);
    let person = json.read_document(fixture("person.json")?.as_slice())?;
    for version in [ODataVersion::V40, ODataVersion::V30] {
        let atom = Codec::new(Format::Atom, Config::default().version(version));
        assert_eq!(reread(&atom, &person)?, person, "{version:?}");
    }
    Ok(())
}

#[test]
fn binary_fixture_round_trip() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let json = Codec::new(Format::Json, full()).with_schema(&schema);
    let atom = Codec::new(Format::Atom, full()).with_schema(&schema);
    let person = json.read_entity(fixture("person.json")?.as_slice())?;
    let avatar = person
        .payload
        .property("Avatar")
        .and_then(|p| p.value.as_primitive())
        .ok_or(Error::ExpectedProperty("Avatar"))?;
    let PrimitiveValue::Binary(bytes) = avatar else {
        panic!("not binary: {avatar:?}");
    };
    assert_eq!(bytes.len(), 80);

    // Atom keeps the padded standard alphabet.
    let mut xml = Vec::new();
    atom.write_entity(&mut xml, &person)?;
    let xml = String::from_utf8(xml)?;
    assert!(xml.contains(AVATAR), "{xml}");

    // JSON is written in unpadded base64url.
    let mut out = Vec::new();
    json.write_entity(&mut out, &person)?;
    let out: serde_json::Value = serde_json::from_slice(&out)?;
    let url_safe = AVATAR.replace('+', "-").replace('/', "_");
    assert_eq!(out["Avatar"].as_str(), Some(url_safe.trim_end_matches('=')));

    let back = atom.read_entity(xml.as_bytes())?;
    assert_eq!(back.payload.property("Avatar"), person.payload.property("Avatar"));
    Ok(())
}

#[test]
fn unknown_payload_is_rejected() -> Result<(), Error> {
    let json = Codec::new(Format::Json, Config::default());
    let err = json.read_document(b"[1, 2]".as_slice()).unwrap_err();
    assert!(matches!(err, odata_codec::Error::WrongPayloadKind { .. }), "{err}");
    let atom = Codec::new(Format::Atom, Config::default());
    let err = atom.read_document(b"<html/>".as_slice()).unwrap_err();
    assert!(matches!(err, odata_codec::Error::WrongPayloadKind { .. }), "{err}");
    assert!(matches!(
        json.read_document(b"{".as_slice()),
        Err(odata_codec::Error::Parse(_))
    ));
    Ok(())
}

#[test]
fn document_kinds() -> Result<(), Error> {
    let json = Codec::new(Format::Json, Config::default());
    let person = json.read_document(fixture("person.json")?.as_slice())?;
    assert!(matches!(person, Document::Entity(_)));
    let kind = json.payload_kind(fixture("delta.json")?.as_slice())?;
    assert_eq!(kind.to_string(), "delta");
    Ok(())
}
