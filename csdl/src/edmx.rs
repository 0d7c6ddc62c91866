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

//! EDMX document model
//!
//! Deserialized with `quick-xml` serde. Only what is needed to type
//! payload properties is kept: structured types and their properties,
//! enumeration types, type definitions, entity sets, singletons and (for
//! V3 documents) associations. Other schema children are accepted and
//! dropped. Namespaces of element names are ignored, so V3
//! (`http://schemas.microsoft.com/ado/...`) and V4 (`http://docs.oasis-open.org/odata/...`)
//! documents share one model.
//!
//! References:
//! - OASIS OData 4.01 CSDL XML: 3 Entity Model Wrapper, 5 Schema,
//!   6 Structural Property, 7 Navigation Property, 8 Entity Type,
//!   9 Complex Type, 10 Enumeration Type, 11 Type Definition,
//!   13 Entity Container
//! - MC-CSDL 2.0: Association

use crate::Error;
use serde::Deserialize;
use tagged_types::TaggedType;

/// Type name as written in the document (qualified, alias-qualified or
/// `Collection(...)`).
pub type TypeName = TaggedType<String, TypeNameTag>;
#[derive(tagged_types::Tag)]
#[implement(Clone, Hash, PartialEq, Eq)]
#[transparent(Debug, Display, Deserialize)]
#[capability(inner_access)]
pub enum TypeNameTag {}

/// Element whose content is not used.
#[derive(Debug, Deserialize)]
pub struct Ignored {}

/// 3.1 Element edmx:Edmx
#[derive(Debug, Deserialize)]
struct DeEdmx {
    #[serde(rename = "$value", default)]
    items: Vec<DeEdmxItem>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
enum DeEdmxItem {
    /// 3.2 Element edmx:DataServices
    DataServices(DeDataServices),
    /// 3.3 Element edmx:Reference
    Reference(Ignored),
}

#[derive(Debug, Deserialize)]
struct DeDataServices {
    #[serde(rename = "Schema", default)]
    schemas: Vec<DeSchema>,
}

/// Validated EDMX document.
#[derive(Debug)]
pub struct Edmx {
    /// Schemas of the single `edmx:DataServices`.
    pub schemas: Vec<Schema>,
}

impl Edmx {
    /// Parse EDMX document.
    ///
    /// # Errors
    ///
    /// `Error::XmlDeserialize` if the document is not well-formed CSDL,
    /// `Error::WrongDataServicesNumber` unless it has exactly one
    /// `edmx:DataServices`.
    pub fn parse(data: &str) -> Result<Self, Error> {
        use quick_xml::de as quick_xml_de;
        quick_xml_de::from_str::<DeEdmx>(data)
            .map_err(Error::XmlDeserialize)?
            .validate()
    }
}

impl DeEdmx {
    fn validate(self) -> Result<Edmx, Error> {
        let mut dss = self.items.into_iter().filter_map(|v| match v {
            DeEdmxItem::DataServices(ds) => Some(ds),
            DeEdmxItem::Reference(_) => None,
        });
        let ds = dss.next().ok_or(Error::WrongDataServicesNumber)?;
        if dss.next().is_some() {
            return Err(Error::WrongDataServicesNumber);
        }
        Ok(Edmx {
            schemas: ds.schemas.into_iter().map(DeSchema::validate).collect(),
        })
    }
}

/// 5.1 Element edm:Schema
#[derive(Debug, Deserialize)]
struct DeSchema {
    #[serde(rename = "@Namespace")]
    namespace: String,
    #[serde(rename = "@Alias")]
    alias: Option<String>,
    #[serde(rename = "$value", default)]
    items: Vec<DeSchemaItem>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
enum DeSchemaItem {
    EntityType(StructuredType),
    ComplexType(StructuredType),
    EnumType(EnumType),
    TypeDefinition(TypeDefinition),
    EntityContainer(DeEntityContainer),
    Association(DeAssociation),
    Action(Ignored),
    Function(Ignored),
    Term(Ignored),
    Annotations(Ignored),
    Annotation(Ignored),
    Using(Ignored),
    ValueTerm(Ignored),
    Documentation(Ignored),
}

/// Validated schema.
#[derive(Debug, Default)]
pub struct Schema {
    /// Namespace.
    pub namespace: String,
    /// Alias of the namespace.
    pub alias: Option<String>,
    /// Entity types.
    pub entity_types: Vec<StructuredType>,
    /// Complex types.
    pub complex_types: Vec<StructuredType>,
    /// Enumeration types.
    pub enum_types: Vec<EnumType>,
    /// Type definitions.
    pub type_definitions: Vec<TypeDefinition>,
    /// Entity containers.
    pub entity_containers: Vec<EntityContainer>,
    /// V3 associations.
    pub associations: Vec<Association>,
}

impl DeSchema {
    fn validate(self) -> Schema {
        self.items.into_iter().fold(
            Schema {
                namespace: self.namespace,
                alias: self.alias,
                ..Schema::default()
            },
            |mut schema, v| {
                match v {
                    DeSchemaItem::EntityType(v) => schema.entity_types.push(v),
                    DeSchemaItem::ComplexType(v) => schema.complex_types.push(v),
                    DeSchemaItem::EnumType(v) => schema.enum_types.push(v),
                    DeSchemaItem::TypeDefinition(v) => schema.type_definitions.push(v),
                    DeSchemaItem::EntityContainer(v) => schema.entity_containers.push(v.validate()),
                    DeSchemaItem::Association(v) => schema.associations.push(v.validate()),
                    DeSchemaItem::Action(_)
                    | DeSchemaItem::Function(_)
                    | DeSchemaItem::Term(_)
                    | DeSchemaItem::Annotations(_)
                    | DeSchemaItem::Annotation(_)
                    | DeSchemaItem::Using(_)
                    | DeSchemaItem::ValueTerm(_)
                    | DeSchemaItem::Documentation(_) => {}
                }
                schema
            },
        )
    }
}

/// 8.1 Element edm:EntityType / 9.1 Element edm:ComplexType
#[derive(Debug, Deserialize)]
pub struct StructuredType {
    /// 8.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: String,
    /// 8.1.2 Attribute `BaseType`
    #[serde(rename = "@BaseType")]
    pub base_type: Option<TypeName>,
    #[serde(rename = "$value", default)]
    items: Vec<DeStructuredTypeItem>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
enum DeStructuredTypeItem {
    Property(StructuralProperty),
    NavigationProperty(NavigationProperty),
    Key(Ignored),
    Annotation(Ignored),
    Documentation(Ignored),
}

impl StructuredType {
    /// Structural properties in document order.
    pub fn properties(&self) -> impl Iterator<Item = &StructuralProperty> {
        self.items.iter().filter_map(|v| match v {
            DeStructuredTypeItem::Property(p) => Some(p),
            _ => None,
        })
    }

    /// Navigation properties in document order.
    pub fn navigation_properties(&self) -> impl Iterator<Item = &NavigationProperty> {
        self.items.iter().filter_map(|v| match v {
            DeStructuredTypeItem::NavigationProperty(p) => Some(p),
            _ => None,
        })
    }
}

/// 6.1 Element edm:Property
#[derive(Debug, Deserialize)]
pub struct StructuralProperty {
    /// 6.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: String,
    /// 6.1.2 Attribute `Type`
    #[serde(rename = "@Type")]
    pub ptype: TypeName,
}

/// 7.1 Element edm:NavigationProperty
#[derive(Debug, Deserialize)]
pub struct NavigationProperty {
    /// 7.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: String,
    /// 7.1.2 Attribute `Type`, absent in V3.
    #[serde(rename = "@Type")]
    pub ptype: Option<TypeName>,
    /// V3 association of the navigation property.
    #[serde(rename = "@Relationship")]
    pub relationship: Option<String>,
    /// V3 association end the navigation property leads to.
    #[serde(rename = "@ToRole")]
    pub to_role: Option<String>,
}

/// 10.1 Element edm:EnumType
#[derive(Debug, Deserialize)]
pub struct EnumType {
    /// 10.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: String,
}

/// 11.1 Element edm:TypeDefinition
#[derive(Debug, Deserialize)]
pub struct TypeDefinition {
    /// 11.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: String,
    /// 11.1.2 Attribute `UnderlyingType`
    #[serde(rename = "@UnderlyingType")]
    pub underlying_type: TypeName,
}

/// 13.1 Element edm:EntityContainer
#[derive(Debug, Deserialize)]
struct DeEntityContainer {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "$value", default)]
    items: Vec<DeEntityContainerItem>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
enum DeEntityContainerItem {
    EntitySet(EntitySet),
    Singleton(Singleton),
    ActionImport(Ignored),
    FunctionImport(Ignored),
    AssociationSet(Ignored),
    Annotation(Ignored),
    Documentation(Ignored),
}

/// Validated entity container.
#[derive(Debug)]
pub struct EntityContainer {
    /// Name of the container.
    pub name: String,
    /// Entity sets.
    pub entity_sets: Vec<EntitySet>,
    /// Singletons.
    pub singletons: Vec<Singleton>,
}

impl DeEntityContainer {
    fn validate(self) -> EntityContainer {
        let (entity_sets, singletons) =
            self.items
                .into_iter()
                .fold((Vec::new(), Vec::new()), |(mut sets, mut singletons), v| {
                    match v {
                        DeEntityContainerItem::EntitySet(v) => sets.push(v),
                        DeEntityContainerItem::Singleton(v) => singletons.push(v),
                        _ => {}
                    }
                    (sets, singletons)
                });
        EntityContainer {
            name: self.name,
            entity_sets,
            singletons,
        }
    }
}

/// 13.2 Element edm:EntitySet
#[derive(Debug, Deserialize)]
pub struct EntitySet {
    /// 13.2.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: String,
    /// 13.2.2 Attribute `EntityType`
    #[serde(rename = "@EntityType")]
    pub entity_type: TypeName,
}

/// 13.3 Element edm:Singleton
#[derive(Debug, Deserialize)]
pub struct Singleton {
    /// 13.3.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: String,
    /// 13.3.2 Attribute `Type`
    #[serde(rename = "@Type")]
    pub stype: TypeName,
}

/// V3 element edm:Association
#[derive(Debug, Deserialize)]
struct DeAssociation {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "$value", default)]
    items: Vec<DeAssociationItem>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
enum DeAssociationItem {
    End(AssociationEnd),
    ReferentialConstraint(Ignored),
    Documentation(Ignored),
}

/// Validated V3 association.
#[derive(Debug)]
pub struct Association {
    /// Name of the association.
    pub name: String,
    /// Its two ends.
    pub ends: Vec<AssociationEnd>,
}

impl DeAssociation {
    fn validate(self) -> Association {
        Association {
            name: self.name,
            ends: self
                .items
                .into_iter()
                .filter_map(|v| match v {
                    DeAssociationItem::End(end) => Some(end),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// V3 element edm:End
#[derive(Debug, Deserialize)]
pub struct AssociationEnd {
    /// Role name referenced by `ToRole`.
    #[serde(rename = "@Role")]
    pub role: String,
    /// Entity type of the end.
    #[serde(rename = "@Type")]
    pub etype: TypeName,
    /// `1`, `0..1` or `*`.
    #[serde(rename = "@Multiplicity")]
    pub multiplicity: String,
}
