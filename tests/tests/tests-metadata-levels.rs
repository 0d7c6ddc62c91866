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

use odata_codec::entity::Entity;
use odata_codec::entity::Inline;
use odata_codec::entity::Payload;
use odata_codec::geo::Dimension;
use odata_codec::primitive::PrimitiveValue;
use odata_codec::value::Value;
use odata_codec::Codec;
use odata_codec::Config;
use odata_codec::Format;
use odata_codec::MetadataLevel;
use odata_codec::ODataDeserializer;
use odata_codec::ODataSerializer;
use odata_codec_tests::fixture;
use odata_codec_tests::trippin_schema;
use odata_codec_tests::Error;
use odata_codec_tests::ODATA_CONTEXT;
use odata_codec_tests::ODATA_ETAG;
use odata_codec_tests::ODATA_ID;
use odata_codec_tests::ODATA_TYPE;
use serde_json::Value as JsonValue;

fn write(person: &Payload<Entity>, metadata: MetadataLevel) -> Result<JsonValue, Error> {
    let mut out = Vec::new();
    Codec::new(Format::Json, Config::default().metadata(metadata)).write_entity(&mut out, person)?;
    Ok(serde_json::from_slice(&out)?)
}

fn person() -> Result<Payload<Entity>, Error> {
    let schema = trippin_schema()?;
    Ok(Codec::new(Format::Json, Config::default())
        .with_schema(&schema)
        .read_entity(fixture("person.json")?.as_slice())?)
}

#[test]
fn control_information_per_level() -> Result<(), Error> {
    let person = person()?;

    let full = write(&person, MetadataLevel::Full)?;
    for key in [ODATA_CONTEXT, ODATA_ID, ODATA_TYPE, ODATA_ETAG, "@odata.editLink"] {
        assert!(full.get(key).is_some(), "{key} missing in {full}");
    }
    assert_eq!(full["Age@odata.type"], "#Int64");
    assert_eq!(full["Friends@odata.navigationLink"], "People('russellwhyte')/Friends");
    assert_eq!(full["@com.example.rating"], 5);
    assert!(full.get("UserName@odata.type").is_none());

    let minimal = write(&person, MetadataLevel::Minimal)?;
    assert!(minimal.get(ODATA_CONTEXT).is_some());
    assert!(minimal.get(ODATA_ETAG).is_some());
    for key in [ODATA_ID, ODATA_TYPE, "@odata.editLink", "Age@odata.type", "@com.example.rating"] {
        assert!(minimal.get(key).is_none(), "{key} present in {minimal}");
    }
    assert!(minimal.get("Friends@odata.navigationLink").is_none());
    assert!(minimal["BestFriend"].is_object());

    let none = write(&person, MetadataLevel::None)?;
    let controls: Vec<&String> = none
        .as_object()
        .map(|o| o.keys().filter(|k| k.contains('@')).collect())
        .unwrap_or_default();
    assert!(controls.is_empty(), "{controls:?}");
    assert_eq!(none["Age"], 42);
    Ok(())
}

// The context URL of minimal metadata is enough to recover every
// declared type through the schema.
#[test]
fn minimal_metadata_reads_back_with_schema() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let person = person()?;
    let minimal = serde_json::to_vec(&write(&person, MetadataLevel::Minimal)?)?;
    let back = Codec::new(Format::Json, Config::default())
        .with_schema(&schema)
        .read_entity(minimal.as_slice())?;
    assert_eq!(back.context_url, person.context_url);
    let (back, person) = (back.payload, person.payload);
    assert_eq!(back.type_name, person.type_name);
    assert_eq!(back.etag, person.etag);
    assert_eq!(back.id, None);
    assert_eq!(back.properties, person.properties);
    assert!(back.navigation_link("Friends").is_none());
    let best = back
        .navigation_link("BestFriend")
        .ok_or(Error::ExpectedProperty("BestFriend"))?;
    let Inline::Entity(friend) = &best.inline else {
        panic!("unexpected inline {:?}", best.inline);
    };
    assert_eq!(
        friend.property("Concurrency").map(|p| &p.value),
        Some(&Value::from(635_404_796_846_280_401_i64))
    );
    Ok(())
}

// Without control information only the shapes are left.
#[test]
fn no_metadata_degrades_to_guessed_types() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let person = person()?;
    let none = serde_json::to_vec(&write(&person, MetadataLevel::None)?)?;
    let back = Codec::new(Format::Json, Config::default())
        .with_schema(&schema)
        .read_entity(none.as_slice())?
        .into_inner();
    assert_eq!(back.type_name, None);
    assert_eq!(back.etag, None);
    let value = |name: &'static str| back.property(name).map(|p| &p.value).ok_or(Error::ExpectedProperty(name));

    assert_eq!(value("Age")?.as_primitive(), Some(&PrimitiveValue::Int32(42)));
    assert_eq!(
        value("Concurrency")?.as_primitive(),
        Some(&PrimitiveValue::Int64(635_404_796_846_280_400))
    );
    assert_eq!(value("Gender")?, &Value::from("Male"));
    assert_eq!(value("MiddleName")?, &Value::Null(None));
    let area = value("HomeArea")?
        .as_geospatial()
        .ok_or(Error::ExpectedProperty("HomeArea"))?;
    assert_eq!(area.dimension, Dimension::Geography);
    assert_eq!(area.crs.as_deref(), Some("4326"));
    // Expanded entities are indistinguishable from complex values.
    assert!(value("BestFriend")?.as_complex().is_some());
    assert!(back.navigation_links.is_empty());
    Ok(())
}
