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

use super::crs_from_srs_name;
use super::srs_name;
use super::Dimension;
use super::Geometry;
use super::Polygon;
use super::Position;
use super::Shape;
use crate::version::GML_NS;
use crate::xml::StartTag;
use crate::xml::XmlCursor;
use crate::xml::XmlWriter;
use crate::Error;
use std::io::Write;
use tracing::trace;
use tracing::warn;

/// Whether the element starts a GML geometry.
#[must_use]
pub fn is_geometry_element(tag: &StartTag) -> bool {
    tag.in_ns(GML_NS)
        && matches!(
            tag.local.as_str(),
            "Point"
                | "LineString"
                | "Polygon"
                | "MultiPoint"
                | "MultiCurve"
                | "MultiLineString"
                | "MultiSurface"
                | "MultiPolygon"
                | "MultiGeometry"
        )
}

/// Read geometry whose start tag was just consumed. Members without their
/// own `srsName` inherit `crs`.
///
/// # Errors
///
/// Returns error on malformed XML or an element that is not a GML
/// geometry. Malformed coordinates are not an error.
pub fn read_geometry(
    cursor: &mut XmlCursor<'_>,
    tag: &StartTag,
    dimension: Dimension,
    crs: Option<&str>,
) -> Result<Geometry, Error> {
    let crs = tag
        .attr(Some(GML_NS), "srsName")
        .or_else(|| tag.attr(None, "srsName"))
        .map(crs_from_srs_name)
        .or_else(|| crs.map(ToString::to_string));
    let shape = match tag.local.as_str() {
        "Point" => {
            let mut pos = None;
            while let Some(child) = cursor.next_child()? {
                if child.is(GML_NS, "pos") {
                    pos = read_pos(cursor)?;
                } else {
                    skip_unknown(cursor, &child)?;
                }
            }
            Shape::Point(pos)
        }
        "LineString" => Shape::LineString(read_positions(cursor)?),
        "Polygon" => Shape::Polygon(read_polygon(cursor)?),
        "MultiPoint" => {
            let mut points = Vec::new();
            read_members(cursor, |cursor, member| {
                let g = read_geometry(cursor, member, dimension, crs.as_deref())?;
                if let Shape::Point(Some(p)) = g.shape {
                    points.push(p);
                }
                Ok(())
            })?;
            Shape::MultiPoint(points)
        }
        "MultiCurve" | "MultiLineString" => {
            let mut lines = Vec::new();
            read_members(cursor, |cursor, member| {
                let g = read_geometry(cursor, member, dimension, crs.as_deref())?;
                if let Shape::LineString(l) = g.shape {
                    lines.push(l);
                }
                Ok(())
            })?;
            Shape::MultiLineString(lines)
        }
        "MultiSurface" | "MultiPolygon" => {
            let mut polygons = Vec::new();
            read_members(cursor, |cursor, member| {
                let g = read_geometry(cursor, member, dimension, crs.as_deref())?;
                if let Shape::Polygon(p) = g.shape {
                    polygons.push(p);
                }
                Ok(())
            })?;
            Shape::MultiPolygon(polygons)
        }
        "MultiGeometry" => {
            let mut members = Vec::new();
            read_members(cursor, |cursor, member| {
                members.push(read_geometry(cursor, member, dimension, crs.as_deref())?);
                Ok(())
            })?;
            Shape::Collection(members)
        }
        other => return Err(Error::parse(format!("unsupported GML element '{other}'"))),
    };
    Ok(Geometry {
        dimension,
        crs,
        shape,
    })
}

fn skip_unknown(cursor: &mut XmlCursor<'_>, tag: &StartTag) -> Result<(), Error> {
    trace!(element = %tag.local, "skipping unknown GML element");
    cursor.skip()
}

/// Iterate geometries of member containers (`gml:pointMembers`,
/// `gml:curveMember`, ...) of the current element.
fn read_members<F>(cursor: &mut XmlCursor<'_>, mut f: F) -> Result<(), Error>
where
    F: FnMut(&mut XmlCursor<'_>, &StartTag) -> Result<(), Error>,
{
    while let Some(container) = cursor.next_child()? {
        let is_member = container.in_ns(GML_NS)
            && (container.local.ends_with("Member") || container.local.ends_with("Members"));
        if !is_member {
            skip_unknown(cursor, &container)?;
            continue;
        }
        while let Some(member) = cursor.next_child()? {
            if is_geometry_element(&member) {
                f(cursor, &member)?;
            } else {
                skip_unknown(cursor, &member)?;
            }
        }
    }
    Ok(())
}

fn read_polygon(cursor: &mut XmlCursor<'_>) -> Result<Polygon, Error> {
    let mut polygon = Polygon::default();
    while let Some(ring) = cursor.next_child()? {
        let target = if ring.is(GML_NS, "exterior") {
            &mut polygon.exterior
        } else if ring.is(GML_NS, "interior") {
            &mut polygon.interior
        } else {
            skip_unknown(cursor, &ring)?;
            continue;
        };
        while let Some(linear) = cursor.next_child()? {
            if linear.is(GML_NS, "LinearRing") {
                target.extend(read_positions(cursor)?);
            } else {
                skip_unknown(cursor, &linear)?;
            }
        }
    }
    Ok(polygon)
}

fn read_positions(cursor: &mut XmlCursor<'_>) -> Result<Vec<Position>, Error> {
    let mut positions = Vec::new();
    while let Some(child) = cursor.next_child()? {
        if child.is(GML_NS, "pos") {
            positions.extend(read_pos(cursor)?);
        } else if child.is(GML_NS, "posList") {
            let dims = child
                .attr(None, "srsDimension")
                .and_then(|d| d.parse::<usize>().ok())
                .filter(|d| *d == 2 || *d == 3)
                .unwrap_or(2);
            let text = cursor.text()?;
            match ordinates(&text) {
                Some(values) if values.len() % dims == 0 => positions.extend(
                    values
                        .chunks(dims)
                        .filter_map(Position::from_ordinates),
                ),
                _ => warn!(text = %text, "malformed gml:posList, ignoring coordinates"),
            }
        } else {
            skip_unknown(cursor, &child)?;
        }
    }
    Ok(positions)
}

fn read_pos(cursor: &mut XmlCursor<'_>) -> Result<Option<Position>, Error> {
    let text = cursor.text()?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    let pos = ordinates(&text).and_then(|v| Position::from_ordinates(&v));
    if pos.is_none() {
        warn!(text = %text, "malformed gml:pos, reading empty position");
    }
    Ok(pos)
}

fn ordinates(text: &str) -> Option<Vec<f64>> {
    text.split_whitespace().map(|v| v.parse().ok()).collect()
}

fn pos_text(p: &Position) -> String {
    match p.z {
        Some(z) => format!("{} {} {z}", p.x, p.y),
        None => format!("{} {}", p.x, p.y),
    }
}

/// Write geometry as GML. `srsName` is written when the CRS differs from
/// `parent_crs` (pass `None` for the outermost geometry).
///
/// # Errors
///
/// Returns error on output failure.
pub fn write_geometry<W: Write>(
    w: &mut XmlWriter<W>,
    g: &Geometry,
    parent_crs: Option<&str>,
) -> Result<(), Error> {
    let srs = g
        .crs
        .as_deref()
        .filter(|crs| Some(*crs) != parent_crs)
        .map(srs_name);
    let mut attrs = Vec::new();
    if let Some(srs) = &srs {
        attrs.push(("gml:srsName", srs.as_str()));
    }
    let crs = g.crs.as_deref().or(parent_crs);
    match &g.shape {
        Shape::Point(None) => w.empty("gml:Point", &attrs),
        Shape::Point(Some(p)) => {
            w.start("gml:Point", &attrs)?;
            w.element("gml:pos", &[], &pos_text(p))?;
            w.end("gml:Point")
        }
        Shape::LineString(points) => {
            w.start("gml:LineString", &attrs)?;
            write_positions(w, points)?;
            w.end("gml:LineString")
        }
        Shape::Polygon(polygon) => {
            w.start("gml:Polygon", &attrs)?;
            write_polygon_rings(w, polygon)?;
            w.end("gml:Polygon")
        }
        Shape::MultiPoint(points) => {
            w.start("gml:MultiPoint", &attrs)?;
            w.start("gml:pointMembers", &[])?;
            for p in points {
                w.start("gml:Point", &[])?;
                w.element("gml:pos", &[], &pos_text(p))?;
                w.end("gml:Point")?;
            }
            w.end("gml:pointMembers")?;
            w.end("gml:MultiPoint")
        }
        Shape::MultiLineString(lines) => {
            w.start("gml:MultiCurve", &attrs)?;
            w.start("gml:curveMembers", &[])?;
            for line in lines {
                w.start("gml:LineString", &[])?;
                write_positions(w, line)?;
                w.end("gml:LineString")?;
            }
            w.end("gml:curveMembers")?;
            w.end("gml:MultiCurve")
        }
        Shape::MultiPolygon(polygons) => {
            w.start("gml:MultiSurface", &attrs)?;
            w.start("gml:surfaceMembers", &[])?;
            for polygon in polygons {
                w.start("gml:Polygon", &[])?;
                write_polygon_rings(w, polygon)?;
                w.end("gml:Polygon")?;
            }
            w.end("gml:surfaceMembers")?;
            w.end("gml:MultiSurface")
        }
        Shape::Collection(members) => {
            w.start("gml:MultiGeometry", &attrs)?;
            w.start("gml:geometryMembers", &[])?;
            for member in members {
                write_geometry(w, member, crs)?;
            }
            w.end("gml:geometryMembers")?;
            w.end("gml:MultiGeometry")
        }
    }
}

fn write_positions<W: Write>(w: &mut XmlWriter<W>, points: &[Position]) -> Result<(), Error> {
    for p in points {
        w.element("gml:pos", &[], &pos_text(p))?;
    }
    Ok(())
}

fn write_polygon_rings<W: Write>(w: &mut XmlWriter<W>, polygon: &Polygon) -> Result<(), Error> {
    for (name, ring) in [("gml:exterior", &polygon.exterior), ("gml:interior", &polygon.interior)] {
        if ring.is_empty() {
            continue;
        }
        w.start(name, &[])?;
        w.start("gml:LinearRing", &[])?;
        write_positions(w, ring)?;
        w.end("gml:LinearRing")?;
        w.end(name)?;
    }
    Ok(())
}
