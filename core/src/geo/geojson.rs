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

use super::crs_from_urn;
use super::crs_urn;
use super::Dimension;
use super::Geometry;
use super::Polygon;
use super::Position;
use super::Shape;
use crate::Error;
use serde_json::json;
use serde_json::Map;
use serde_json::Value as JsonValue;
use tracing::warn;

const TYPES: [&str; 7] = [
    "Point",
    "LineString",
    "Polygon",
    "MultiPoint",
    "MultiLineString",
    "MultiPolygon",
    "GeometryCollection",
];

/// Whether the JSON value looks like a GeoJSON geometry: an object with a
/// known `type` and nothing but `type`, `coordinates`, `geometries`, `crs`
/// and control information.
#[must_use]
pub fn is_geojson(value: &JsonValue) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let known_type = obj
        .get("type")
        .and_then(JsonValue::as_str)
        .map_or(false, |t| TYPES.contains(&t));
    known_type
        && obj.keys().all(|k| {
            matches!(k.as_str(), "type" | "coordinates" | "geometries" | "crs") || k.contains('@')
        })
}

/// Read GeoJSON geometry. Geometries without their own `crs` inherit `crs`.
///
/// # Errors
///
/// Returns error if the value is not an object with a known `type`.
/// Missing or malformed coordinates are not an error.
pub fn read_geometry(
    value: &JsonValue,
    dimension: Dimension,
    crs: Option<&str>,
) -> Result<Geometry, Error> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::parse("geospatial value must be a JSON object"))?;
    let kind = obj
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::parse("geospatial value without 'type'"))?;
    let crs = obj
        .get("crs")
        .and_then(|c| c.pointer("/properties/name"))
        .and_then(JsonValue::as_str)
        .map(crs_from_urn)
        .or_else(|| crs.map(ToString::to_string));
    let coordinates = obj.get("coordinates");
    let shape = match kind {
        "Point" => Shape::Point(degrade(kind, coordinates, |c| {
            if c.as_array().map_or(false, Vec::is_empty) {
                Some(None)
            } else {
                position(c).map(Some)
            }
        })),
        "LineString" => Shape::LineString(degrade(kind, coordinates, positions)),
        "MultiPoint" => Shape::MultiPoint(degrade(kind, coordinates, positions)),
        "Polygon" => Shape::Polygon(degrade(kind, coordinates, polygon)),
        "MultiLineString" => Shape::MultiLineString(degrade(kind, coordinates, |c| {
            c.as_array()?.iter().map(positions).collect()
        })),
        "MultiPolygon" => Shape::MultiPolygon(degrade(kind, coordinates, |c| {
            c.as_array()?.iter().map(polygon).collect()
        })),
        "GeometryCollection" => {
            let members = obj
                .get("geometries")
                .and_then(JsonValue::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            Shape::Collection(
                members
                    .iter()
                    .map(|m| read_geometry(m, dimension, crs.as_deref()))
                    .collect::<Result<_, _>>()?,
            )
        }
        other => return Err(Error::parse(format!("unsupported GeoJSON type '{other}'"))),
    };
    Ok(Geometry {
        dimension,
        crs,
        shape,
    })
}

/// Apply coordinate reader; absent or malformed coordinates give an empty
/// shape.
fn degrade<T: Default>(
    kind: &str,
    coordinates: Option<&JsonValue>,
    f: impl FnOnce(&JsonValue) -> Option<T>,
) -> T {
    match coordinates {
        None | Some(JsonValue::Null) => {
            warn!(kind, "GeoJSON value without coordinates, reading empty shape");
            T::default()
        }
        Some(c) => f(c).unwrap_or_else(|| {
            warn!(kind, coordinates = %c, "malformed GeoJSON coordinates, reading empty shape");
            T::default()
        }),
    }
}

fn position(value: &JsonValue) -> Option<Position> {
    let ordinates = value
        .as_array()?
        .iter()
        .map(JsonValue::as_f64)
        .collect::<Option<Vec<_>>>()?;
    Position::from_ordinates(&ordinates)
}

fn positions(value: &JsonValue) -> Option<Vec<Position>> {
    value.as_array()?.iter().map(position).collect()
}

fn polygon(value: &JsonValue) -> Option<Polygon> {
    let rings = value
        .as_array()?
        .iter()
        .map(positions)
        .collect::<Option<Vec<_>>>()?;
    let mut rings = rings.into_iter();
    Some(Polygon {
        exterior: rings.next().unwrap_or_default(),
        interior: rings.flatten().collect(),
    })
}

fn position_json(p: &Position) -> JsonValue {
    match p.z {
        Some(z) => json!([p.x, p.y, z]),
        None => json!([p.x, p.y]),
    }
}

fn positions_json(points: &[Position]) -> JsonValue {
    JsonValue::Array(points.iter().map(position_json).collect())
}

fn polygon_json(p: &Polygon) -> JsonValue {
    let mut rings = vec![positions_json(&p.exterior)];
    if !p.interior.is_empty() {
        rings.push(positions_json(&p.interior));
    }
    JsonValue::Array(rings)
}

/// Write geometry as GeoJSON. `crs` is written when it differs from
/// `parent_crs` (pass `None` for the outermost geometry).
#[must_use]
pub fn write_geometry(g: &Geometry, parent_crs: Option<&str>) -> JsonValue {
    let mut obj = Map::new();
    let crs = g.crs.as_deref().or(parent_crs);
    let (kind, body) = match &g.shape {
        Shape::Point(p) => (
            "Point",
            ("coordinates", p.as_ref().map_or_else(|| json!([]), position_json)),
        ),
        Shape::LineString(points) => ("LineString", ("coordinates", positions_json(points))),
        Shape::MultiPoint(points) => ("MultiPoint", ("coordinates", positions_json(points))),
        Shape::Polygon(p) => ("Polygon", ("coordinates", polygon_json(p))),
        Shape::MultiLineString(lines) => (
            "MultiLineString",
            (
                "coordinates",
                JsonValue::Array(lines.iter().map(|l| positions_json(l)).collect()),
            ),
        ),
        Shape::MultiPolygon(polygons) => (
            "MultiPolygon",
            ("coordinates", JsonValue::Array(polygons.iter().map(polygon_json).collect())),
        ),
        Shape::Collection(members) => (
            "GeometryCollection",
            (
                "geometries",
                JsonValue::Array(members.iter().map(|m| write_geometry(m, crs)).collect()),
            ),
        ),
    };
    obj.insert("type".into(), kind.into());
    obj.insert(body.0.into(), body.1);
    if let Some(own) = g.crs.as_deref().filter(|c| Some(*c) != parent_crs) {
        obj.insert(
            "crs".into(),
            json!({"type": "name", "properties": {"name": crs_urn(own)}}),
        );
    }
    JsonValue::Object(obj)
}
