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

//! Geospatial values
//!
//! A [`Geometry`] is a shape plus its dimension (geography or geometry,
//! which only changes how coordinates are interpreted) and an optional
//! coordinate reference system token such as `4326`.
//!
//! Wire forms:
//! - GML in Atom payloads ([`gml`]), CRS in `srsName` as
//!   `http://www.opengis.net/def/crs/EPSG/0/{token}`.
//! - GeoJSON in JSON payloads ([`geojson`]), CRS in `crs.properties.name`
//!   as `EPSG:{token}`.
//!
//! Missing coordinates are not an error: the shape is read as empty.
//!
//! References:
//! - OASIS OData 4.01 JSON Format: Geography and Geometry
//! - OGC GML 3.1.1 simple features profile
//!

/// GeoJSON reader and writer.
pub mod geojson;
/// GML reader and writer.
pub mod gml;

use crate::edm::EdmPrimitiveKind;

/// Coordinate interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Round earth.
    Geography,
    /// Flat earth.
    Geometry,
}

impl Dimension {
    /// Dimension of the geospatial kind; `None` for other kinds.
    #[must_use]
    pub fn of(kind: EdmPrimitiveKind) -> Option<Self> {
        let name = kind.name();
        if name.starts_with("Geography") {
            Some(Self::Geography)
        } else if name.starts_with("Geometry") {
            Some(Self::Geometry)
        } else {
            None
        }
    }
}

/// Single coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// X (longitude).
    pub x: f64,
    /// Y (latitude).
    pub y: f64,
    /// Optional Z.
    pub z: Option<f64>,
}

impl Position {
    /// Create 2D position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Build position from 2 or 3 ordinates.
    #[must_use]
    pub fn from_ordinates(ordinates: &[f64]) -> Option<Self> {
        match *ordinates {
            [x, y] => Some(Self { x, y, z: None }),
            [x, y, z] => Some(Self { x, y, z: Some(z) }),
            _ => None,
        }
    }
}

/// Polygon rings. The interior ring is empty for polygons without holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    /// Exterior ring.
    pub exterior: Vec<Position>,
    /// Interior ring.
    pub interior: Vec<Position>,
}

/// Shape of a geospatial value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Point; `None` is the empty point.
    Point(Option<Position>),
    /// Line string.
    LineString(Vec<Position>),
    /// Polygon.
    Polygon(Polygon),
    /// Multi point.
    MultiPoint(Vec<Position>),
    /// Multi line string.
    MultiLineString(Vec<Vec<Position>>),
    /// Multi polygon.
    MultiPolygon(Vec<Polygon>),
    /// Collection of geometries of any shape.
    Collection(Vec<Geometry>),
}

/// Geospatial value.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Dimension.
    pub dimension: Dimension,
    /// Coordinate reference system token (`4326`).
    pub crs: Option<String>,
    /// Shape.
    pub shape: Shape,
}

impl Geometry {
    /// Create geometry without CRS.
    #[must_use]
    pub const fn new(dimension: Dimension, shape: Shape) -> Self {
        Self {
            dimension,
            crs: None,
            shape,
        }
    }

    /// Set CRS token.
    #[must_use]
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    /// EDM kind of the value, e.g. `Edm.GeographyPoint`.
    #[must_use]
    pub const fn kind(&self) -> EdmPrimitiveKind {
        use EdmPrimitiveKind as K;
        match (self.dimension, &self.shape) {
            (Dimension::Geography, Shape::Point(_)) => K::GeographyPoint,
            (Dimension::Geography, Shape::LineString(_)) => K::GeographyLineString,
            (Dimension::Geography, Shape::Polygon(_)) => K::GeographyPolygon,
            (Dimension::Geography, Shape::MultiPoint(_)) => K::GeographyMultiPoint,
            (Dimension::Geography, Shape::MultiLineString(_)) => K::GeographyMultiLineString,
            (Dimension::Geography, Shape::MultiPolygon(_)) => K::GeographyMultiPolygon,
            (Dimension::Geography, Shape::Collection(_)) => K::GeographyCollection,
            (Dimension::Geometry, Shape::Point(_)) => K::GeometryPoint,
            (Dimension::Geometry, Shape::LineString(_)) => K::GeometryLineString,
            (Dimension::Geometry, Shape::Polygon(_)) => K::GeometryPolygon,
            (Dimension::Geometry, Shape::MultiPoint(_)) => K::GeometryMultiPoint,
            (Dimension::Geometry, Shape::MultiLineString(_)) => K::GeometryMultiLineString,
            (Dimension::Geometry, Shape::MultiPolygon(_)) => K::GeometryMultiPolygon,
            (Dimension::Geometry, Shape::Collection(_)) => K::GeometryCollection,
        }
    }
}

/// CRS token of a GML `srsName`: the part after the last `/`.
#[must_use]
pub fn crs_from_srs_name(srs_name: &str) -> String {
    srs_name
        .rsplit_once('/')
        .map_or(srs_name, |(_, token)| token)
        .to_string()
}

/// CRS token of a GeoJSON `crs.properties.name`: the part after the last `:`.
#[must_use]
pub fn crs_from_urn(name: &str) -> String {
    name.rsplit_once(':')
        .map_or(name, |(_, token)| token)
        .to_string()
}

/// GML `srsName` of a CRS token.
#[must_use]
pub fn srs_name(crs: &str) -> String {
    format!("http://www.opengis.net/def/crs/EPSG/0/{crs}")
}

/// GeoJSON CRS name of a CRS token.
#[must_use]
pub fn crs_urn(crs: &str) -> String {
    format!("EPSG:{crs}")
}
