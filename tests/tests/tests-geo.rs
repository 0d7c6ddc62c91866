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
use odata_codec::geo::Geometry;
use odata_codec::geo::Polygon;
use odata_codec::geo::Position;
use odata_codec::geo::Shape;
use odata_codec::value::Property;
use odata_codec::Codec;
use odata_codec::Config;
use odata_codec::Format;
use odata_codec::MetadataLevel;
use odata_codec::ODataDeserializer;
use odata_codec::ODataSerializer;
use odata_codec_tests::Error;

fn ring(points: &[(f64, f64)]) -> Vec<Position> {
    points.iter().map(|&(x, y)| Position::new(x, y)).collect()
}

fn area(interior: Vec<Position>) -> Geometry {
    Geometry::new(
        Dimension::Geography,
        Shape::Polygon(Polygon {
            exterior: ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)]),
            interior,
        }),
    )
    .with_crs("4326")
}

fn person(geometry: Geometry) -> Payload<Entity> {
    Payload::new(Entity::new("Trippin.Person").with_property(Property::new("HomeArea", geometry)))
}

fn write(format: Format, payload: &Payload<Entity>) -> Result<(Vec<u8>, Entity), Error> {
    let codec = Codec::new(format, Config::default().metadata(MetadataLevel::Full));
    let mut out = Vec::new();
    codec.write_entity(&mut out, payload)?;
    let back = codec.read_entity(out.as_slice())?.into_inner();
    Ok((out, back))
}

#[test]
fn polygon_without_holes() -> Result<(), Error> {
    let payload = person(area(Vec::new()));

    let (out, back) = write(Format::Atom, &payload)?;
    let text = String::from_utf8(out)?;
    assert!(text.contains("gml:exterior"));
    assert!(!text.contains("gml:interior"));
    assert!(text.contains("http://www.opengis.net/def/crs/EPSG/0/4326"));
    assert_eq!(back.properties, payload.payload.properties);

    let (out, back) = write(Format::Json, &payload)?;
    let doc: serde_json::Value = serde_json::from_slice(&out)?;
    assert_eq!(doc["HomeArea"]["coordinates"].as_array().map(Vec::len), Some(1));
    assert_eq!(doc["HomeArea"]["crs"]["properties"]["name"], "EPSG:4326");
    assert_eq!(back.properties, payload.payload.properties);
    Ok(())
}

#[test]
fn polygon_with_hole() -> Result<(), Error> {
    let payload = person(area(ring(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)])));
    for format in [Format::Atom, Format::Json] {
        let (_, back) = write(format, &payload)?;
        assert_eq!(back.properties, payload.payload.properties, "{format:?}");
    }
    Ok(())
}

// Members sharing the collection's reference system do not repeat it.
#[test]
fn collection_members_inherit_crs() -> Result<(), Error> {
    let point = Geometry::new(Dimension::Geography, Shape::Point(Some(Position::new(1.5, 2.5)))).with_crs("4326");
    let collection = Geometry::new(Dimension::Geography, Shape::Collection(vec![point, area(Vec::new())])).with_crs("4326");
    let payload = person(collection);

    let (out, back) = write(Format::Json, &payload)?;
    let doc: serde_json::Value = serde_json::from_slice(&out)?;
    let members = doc["HomeArea"]["geometries"]
        .as_array()
        .ok_or(Error::ExpectedProperty("HomeArea"))?;
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|m| m.get("crs").is_none()));
    assert_eq!(back.properties, payload.payload.properties);

    let (out, back) = write(Format::Atom, &payload)?;
    assert_eq!(String::from_utf8(out)?.matches("srsName").count(), 1);
    assert_eq!(back.properties, payload.payload.properties);
    Ok(())
}
