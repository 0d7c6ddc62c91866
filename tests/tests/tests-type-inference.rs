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
use odata_codec::entity::Payload;
use odata_codec::geo::Dimension;
use odata_codec::primitive::BinaryEncoding;
use odata_codec::primitive::PrimitiveValue;
use odata_codec::value::EnumValue;
use odata_codec::value::Value;
use odata_codec::Codec;
use odata_codec::Config;
use odata_codec::Format;
use odata_codec::MetadataLevel;
use odata_codec::ODataDeserializer;
use odata_codec::ODataSerializer;
use odata_codec_tests::json_merge;
use odata_codec_tests::trippin_schema;
use odata_codec_tests::Error;
use odata_codec_tests::ODATA_CONTEXT;
use odata_codec_tests::ODATA_TYPE;
use odata_codec_tests::PERSON_CONTEXT;
use serde_json::json;

fn read_json(codec: &Codec<'_>, doc: &serde_json::Value) -> Result<Entity, Error> {
    let bytes = serde_json::to_vec(doc)?;
    Ok(codec.read_entity(bytes.as_slice())?.into_inner())
}

fn value<'e>(entity: &'e Entity, name: &'static str) -> Result<&'e Value, Error> {
    entity
        .property(name)
        .map(|p| &p.value)
        .ok_or(Error::ExpectedProperty(name))
}

// Explicit type annotations without a schema and a schema without type
// annotations resolve every property to the same type.
#[test]
fn explicit_types_and_schema_agree_in_json() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let data = json!({
        ODATA_CONTEXT: PERSON_CONTEXT,
        "UserName": "russellwhyte",
        "Age": 42,
        "Concurrency": 7,
        "Emails": ["Russell@example.com"],
        "Gender": "Male",
        "AddressInfo": [{"Address": "187 Suffolk Ln.", "City": {"Name": "Boise"}}],
        "HomeArea": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]},
    });
    let annotations = json!({
        ODATA_TYPE: "#Trippin.Person",
        "UserName@odata.type": "#String",
        "Age@odata.type": "#Int64",
        "Concurrency@odata.type": "#Int64",
        "Emails@odata.type": "#Collection(String)",
        "Gender@odata.type": "#Trippin.PersonGender",
        "AddressInfo@odata.type": "#Collection(Trippin.Location)",
        "AddressInfo": [{
            "Address": "187 Suffolk Ln.",
            "City@odata.type": "#Trippin.City",
            "City": {"Name": "Boise"},
        }],
        "HomeArea@odata.type": "#GeographyPolygon",
    });
    let explicit = read_json(
        &Codec::new(Format::Json, Config::default()),
        &json_merge([&data, &annotations]),
    )?;
    let declared = read_json(&Codec::new(Format::Json, Config::default()).with_schema(&schema), &data)?;
    assert_eq!(explicit.properties, declared.properties);

    // Annotations agreeing with the schema change nothing.
    let both = read_json(
        &Codec::new(Format::Json, Config::default()).with_schema(&schema),
        &json_merge([&data, &annotations]),
    )?;
    assert_eq!(both.properties, declared.properties);

    assert_eq!(value(&declared, "Concurrency")?, &Value::from(7_i64));
    assert_eq!(
        value(&declared, "Gender")?,
        &Value::Enum(EnumValue {
            type_name: Some("Trippin.PersonGender".into()),
            member: "Male".into(),
        })
    );
    let address = value(&declared, "AddressInfo")?
        .as_collection()
        .and_then(|c| c.items().first())
        .and_then(Value::as_complex)
        .ok_or(Error::ExpectedProperty("AddressInfo"))?;
    assert_eq!(address.type_name.as_deref(), Some("Trippin.Location"));
    let city = address
        .property("City")
        .ok_or(Error::ExpectedProperty("City"))?;
    assert_eq!(city.type_name.as_deref(), Some("Trippin.City"));
    Ok(())
}

#[test]
fn explicit_types_and_schema_agree_in_atom() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let entry = |typed: bool| {
        let t = |name: &str| {
            if typed {
                format!(r#" m:type="{name}""#)
            } else {
                String::new()
            }
        };
        format!(
            r#"<entry xmlns="http://www.w3.org/2005/Atom"
                xmlns:m="http://docs.oasis-open.org/odata/ns/metadata"
                xmlns:d="http://docs.oasis-open.org/odata/ns/data"
                m:context="{PERSON_CONTEXT}">
              <content type="application/xml"><m:properties>
                <d:Age{age}>42</d:Age>
                <d:Gender{gender}>Female</d:Gender>
                <d:Emails{emails}><m:element>a@example.com</m:element></d:Emails>
                <d:MiddleName{middle} m:null="true"/>
              </m:properties></content>
            </entry>"#,
            age = t("Edm.Int64"),
            gender = t("#Trippin.PersonGender"),
            emails = t("#Collection(Edm.String)"),
            middle = t("Edm.String"),
        )
    };
    let explicit = Codec::new(Format::Atom, Config::default())
        .read_entity(entry(true).as_bytes())?
        .into_inner();
    let declared = Codec::new(Format::Atom, Config::default())
        .with_schema(&schema)
        .read_entity(entry(false).as_bytes())?
        .into_inner();
    assert_eq!(explicit.properties, declared.properties);
    assert_eq!(value(&declared, "Age")?, &Value::from(42_i64));
    assert_eq!(value(&declared, "MiddleName")?, &Value::Null(Some("Edm.String".into())));
    Ok(())
}

// Without type information a JSON integer is taken as Int32 when it fits,
// so an Int64 property holding a small value loses its declared type.
#[test]
fn untyped_integers_guess_int32() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let data = json!({"UserName": "russellwhyte", "Age": 0, "Concurrency": 635404796846280400_i64});
    let guessed = read_json(&Codec::new(Format::Json, Config::default()), &data)?;
    let age = guessed.property("Age").ok_or(Error::ExpectedProperty("Age"))?;
    assert_eq!(age.value.as_primitive(), Some(&PrimitiveValue::Int32(0)));
    assert_eq!(age.type_name.as_deref(), Some("Edm.Int32"));
    assert_eq!(
        value(&guessed, "Concurrency")?.as_primitive(),
        Some(&PrimitiveValue::Int64(635_404_796_846_280_400))
    );

    // The schema alone does not help without the owning type.
    let no_owner = read_json(&Codec::new(Format::Json, Config::default()).with_schema(&schema), &data)?;
    assert_eq!(no_owner.properties, guessed.properties);

    let typed = read_json(
        &Codec::new(Format::Json, Config::default()).with_schema(&schema),
        &json_merge([&data, &json!({ODATA_CONTEXT: PERSON_CONTEXT})]),
    )?;
    assert_eq!(value(&typed, "Age")?.as_primitive(), Some(&PrimitiveValue::Int64(0)));
    Ok(())
}

#[test]
fn untyped_shapes() -> Result<(), Error> {
    let data = json!({
        "Flag": true,
        "Ratio": 0.5,
        "Where": {"type": "Point", "coordinates": [1.0, 2.0]},
        "Nested": {"type": "Point", "extra": 1},
        "Tags": ["a", "b"],
        "Nothing": null,
    });
    let e = read_json(&Codec::new(Format::Json, Config::default()), &data)?;
    assert_eq!(value(&e, "Flag")?, &Value::from(true));
    assert_eq!(value(&e, "Ratio")?, &Value::from(0.5));
    let point = value(&e, "Where")?
        .as_geospatial()
        .ok_or(Error::ExpectedProperty("Where"))?;
    assert_eq!(point.dimension, Dimension::Geography);
    assert!(value(&e, "Nested")?.as_complex().is_some());
    assert_eq!(
        value(&e, "Tags")?.as_collection().map(|c| c.items().len()),
        Some(2)
    );
    assert_eq!(value(&e, "Nothing")?, &Value::Null(None));
    Ok(())
}

// Decimal numbers keep every digit and their scale through the JSON
// number form, which a double cannot hold.
#[test]
fn decimal_numbers_are_exact() -> Result<(), Error> {
    let input = r##"{
        "@odata.type": "#Trippin.Person",
        "Price@odata.type": "#Decimal",
        "Price": 1234567890.123456789,
        "Fee@odata.type": "#Decimal",
        "Fee": 1.50
    }"##;
    let codec = Codec::new(Format::Json, Config::default().metadata(MetadataLevel::Full));
    let person = codec.read_entity(input.as_bytes())?;
    let wire = |name: &'static str| -> Result<String, Error> {
        let value = value(&person.payload, name)?
            .as_primitive()
            .ok_or(Error::ExpectedProperty(name))?;
        Ok(value.to_wire_string(BinaryEncoding::Standard))
    };
    assert_eq!(wire("Price")?, "1234567890.123456789");
    assert_eq!(wire("Fee")?, "1.50");

    let mut out = Vec::new();
    codec.write_entity(&mut out, &person)?;
    let text = String::from_utf8(out)?;
    assert!(text.contains("\"Price\":1234567890.123456789"), "{text}");
    assert!(text.contains("\"Fee\":1.50"), "{text}");
    Ok(())
}

#[test]
fn ieee754_int64_strings_are_exact() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let codec = Codec::new(Format::Json, Config::default().ieee754_compatible(true)).with_schema(&schema);
    let data = json!({ODATA_CONTEXT: PERSON_CONTEXT, "Concurrency": "9007199254740993"});
    let person = read_json(&codec, &data)?;
    assert_eq!(value(&person, "Concurrency")?, &Value::from(9_007_199_254_740_993_i64));

    let mut out = Vec::new();
    codec.write_entity(&mut out, &Payload::new(person).with_context(PERSON_CONTEXT))?;
    let doc: serde_json::Value = serde_json::from_slice(&out)?;
    assert_eq!(doc["Concurrency"], "9007199254740993");
    let back = read_json(&codec, &doc)?;
    assert_eq!(value(&back, "Concurrency")?, &Value::from(9_007_199_254_740_993_i64));
    Ok(())
}

// A scalar where the schema declares a complex type is a type error,
// not an enumeration member.
#[test]
fn declared_complex_type_rejects_scalar() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let data = json!({
        ODATA_CONTEXT: PERSON_CONTEXT,
        "AddressInfo": [{"Address": "187 Suffolk Ln.", "City": "Boise"}],
    });
    let codec = Codec::new(Format::Json, Config::default()).with_schema(&schema);
    let bytes = serde_json::to_vec(&data)?;
    let Err(err) = codec.read_entity(bytes.as_slice()) else {
        panic!("scalar accepted as Trippin.City");
    };
    assert_eq!(err.property_path(), vec!["AddressInfo", "City"]);
    assert!(matches!(err.root_cause(), odata_codec::Error::Parse(_)));

    let entry = format!(
        r#"<entry xmlns="http://www.w3.org/2005/Atom"
            xmlns:m="http://docs.oasis-open.org/odata/ns/metadata"
            xmlns:d="http://docs.oasis-open.org/odata/ns/data"
            m:context="{PERSON_CONTEXT}">
          <content type="application/xml"><m:properties>
            <d:AddressInfo><m:element><d:City>Boise</d:City></m:element></d:AddressInfo>
          </m:properties></content>
        </entry>"#
    );
    let Err(err) = Codec::new(Format::Atom, Config::default())
        .with_schema(&schema)
        .read_entity(entry.as_bytes())
    else {
        panic!("text accepted as Trippin.City");
    };
    assert_eq!(err.property_path(), vec!["AddressInfo", "City"]);
    assert!(matches!(err.root_cause(), odata_codec::Error::Parse(_)));
    Ok(())
}
