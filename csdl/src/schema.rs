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

//! Schema building
//!
//! Property types are written as names; whether `NS.Color` is an
//! enumeration or a complex type is only known after all schemas of the
//! document are seen, so building takes two passes: collect the kinds of
//! named types, then declare properties with their resolved [`EdmType`].

use crate::edmx::Association;
use crate::edmx::Edmx;
use crate::edmx::Schema;
use crate::edmx::StructuredType;
use crate::edmx::TypeName;
use crate::Error;
use odata_codec::edm::EdmPrimitiveKind;
use odata_codec::edm::EdmType;
use odata_codec::edm::MapSchema;
use std::collections::HashMap;
use tracing::debug;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Entity,
    Complex,
    Enum,
    Definition,
}

/// Names and kinds of every type declared in the document.
struct Index<'a> {
    aliases: HashMap<&'a str, &'a str>,
    kinds: HashMap<String, Kind>,
    associations: HashMap<String, &'a Association>,
}

impl<'a> Index<'a> {
    fn new(schemas: &'a [Schema]) -> Self {
        let aliases = schemas
            .iter()
            .filter_map(|s| s.alias.as_deref().map(|a| (a, s.namespace.as_str())))
            .collect();
        let mut kinds = HashMap::new();
        let mut associations = HashMap::new();
        for s in schemas {
            let qualified = |name: &str| format!("{}.{name}", s.namespace);
            for t in &s.entity_types {
                kinds.insert(qualified(&t.name), Kind::Entity);
            }
            for t in &s.complex_types {
                kinds.insert(qualified(&t.name), Kind::Complex);
            }
            for t in &s.enum_types {
                kinds.insert(qualified(&t.name), Kind::Enum);
            }
            for t in &s.type_definitions {
                kinds.insert(qualified(&t.name), Kind::Definition);
            }
            for a in &s.associations {
                associations.insert(qualified(&a.name), a);
            }
        }
        Self {
            aliases,
            kinds,
            associations,
        }
    }

    /// Qualified name with the namespace alias replaced.
    fn qualify(&self, name: &str) -> String {
        match name.rsplit_once('.') {
            Some((ns, simple)) => self
                .aliases
                .get(ns)
                .map_or_else(|| name.to_string(), |full| format!("{full}.{simple}")),
            None => name.to_string(),
        }
    }

    /// Type of the property. `None` for abstract `Edm` types that carry no
    /// wire type (`Edm.Untyped`, `Edm.PrimitiveType`, ...) and for V3
    /// `Edm.DateTime` / `Edm.Time`.
    fn edm_type(&self, name: &str) -> Result<Option<EdmType>, Error> {
        let name = name.trim();
        if let Some(inner) = name.strip_prefix("Collection(") {
            let inner = inner
                .strip_suffix(')')
                .ok_or_else(|| Error::InvalidType(name.to_string()))?;
            return Ok(self
                .edm_type(inner)?
                .map(|t| EdmType::Collection(Box::new(t))));
        }
        if name.is_empty() || name.contains(['(', ')']) {
            return Err(Error::InvalidType(name.to_string()));
        }
        if let Some(simple) = name.strip_prefix("Edm.") {
            return Ok(match simple {
                "Untyped" | "PrimitiveType" | "ComplexType" | "EntityType" | "AnnotationPath"
                | "PropertyPath" | "NavigationPropertyPath" | "AnyPropertyPath" | "ModelElementPath" => None,
                // V3 temporal types without a V4 kind; their text reads as a string.
                "DateTime" | "Time" => None,
                _ => Some(EdmType::Primitive(
                    name.parse::<EdmPrimitiveKind>()
                        .map_err(|_| Error::InvalidType(name.to_string()))?,
                )),
            });
        }
        let qualified = self.qualify(name);
        Ok(Some(match self.kinds.get(&qualified) {
            Some(Kind::Entity) => EdmType::Entity(qualified),
            Some(Kind::Enum) => EdmType::Enum(qualified),
            // Type definitions are mapped to their underlying kind on lookup.
            Some(Kind::Complex | Kind::Definition) | None => EdmType::Complex(qualified),
        }))
    }

    /// Target of a V3 navigation property: the entity type of the
    /// association end, a collection for multiplicity `*`.
    fn association_target(&self, relationship: &str, to_role: &str) -> Option<EdmType> {
        let association = self.associations.get(&self.qualify(relationship))?;
        let end = association.ends.iter().find(|e| e.role == to_role)?;
        let target = EdmType::Entity(self.qualify(end.etype.inner()));
        Some(if end.multiplicity == "*" {
            EdmType::Collection(Box::new(target))
        } else {
            target
        })
    }
}

impl Edmx {
    /// Build the lookup schema of the document.
    ///
    /// # Errors
    ///
    /// `Error::InvalidType` if a property, base or underlying type name is
    /// malformed or names an unknown `Edm` primitive type.
    pub fn to_schema(&self) -> Result<MapSchema, Error> {
        let index = Index::new(&self.schemas);
        let mut schema = MapSchema::new();
        for s in &self.schemas {
            if let Some(alias) = &s.alias {
                schema = schema.alias(alias, &s.namespace);
            }
            let qualified = |name: &str| format!("{}.{name}", s.namespace);
            for t in &s.entity_types {
                let name = qualified(&t.name);
                let base = t.base_type.as_ref().map(|b| index.qualify(b.inner()));
                schema = schema.entity_type(&name, base.as_deref());
                schema = declare_properties(schema, &index, &name, t)?;
            }
            for t in &s.complex_types {
                let name = qualified(&t.name);
                let base = t.base_type.as_ref().map(|b| index.qualify(b.inner()));
                schema = schema.complex_type(&name, base.as_deref());
                schema = declare_properties(schema, &index, &name, t)?;
            }
            for t in &s.enum_types {
                schema = schema.enum_type(&qualified(&t.name));
            }
            for t in &s.type_definitions {
                let underlying = underlying_kind(&t.underlying_type)?;
                schema = schema.type_definition(&qualified(&t.name), underlying);
            }
            for c in &s.entity_containers {
                for set in &c.entity_sets {
                    schema = schema.entity_set(&set.name, &index.qualify(set.entity_type.inner()));
                }
                for singleton in &c.singletons {
                    schema = schema.entity_set(&singleton.name, &index.qualify(singleton.stype.inner()));
                }
            }
        }
        debug!(
            schemas = self.schemas.len(),
            types = index.kinds.len(),
            "built schema from CSDL"
        );
        Ok(schema)
    }
}

fn underlying_kind(name: &TypeName) -> Result<EdmPrimitiveKind, Error> {
    name.inner()
        .parse::<EdmPrimitiveKind>()
        .map_err(|_| Error::InvalidType(name.inner().clone()))
}

fn declare_properties(
    mut schema: MapSchema,
    index: &Index<'_>,
    type_name: &str,
    t: &StructuredType,
) -> Result<MapSchema, Error> {
    for p in t.properties() {
        let in_type = |e| Error::Property(type_name.to_string(), p.name.clone(), Box::new(e));
        match index.edm_type(p.ptype.inner()).map_err(in_type)? {
            Some(ptype) => schema = schema.property(type_name, &p.name, ptype),
            None => trace!(type_name, property = %p.name, "property of abstract type left undeclared"),
        }
    }
    for p in t.navigation_properties() {
        let target = match (&p.ptype, &p.relationship, &p.to_role) {
            (Some(ptype), _, _) => index
                .edm_type(ptype.inner())
                .map_err(|e| Error::Property(type_name.to_string(), p.name.clone(), Box::new(e)))?,
            (None, Some(relationship), Some(to_role)) => index.association_target(relationship, to_role),
            _ => None,
        };
        // Navigation targets are entities even if the type is not declared here.
        let target = target.map(|t| match t {
            EdmType::Collection(inner) => EdmType::Collection(Box::new(as_entity(*inner))),
            other => as_entity(other),
        });
        match target {
            Some(target) => schema = schema.property(type_name, &p.name, target),
            None => trace!(type_name, property = %p.name, "navigation property without resolvable target"),
        }
    }
    Ok(schema)
}

fn as_entity(t: EdmType) -> EdmType {
    match t {
        EdmType::Complex(name) | EdmType::Enum(name) => EdmType::Entity(name),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odata_codec::edm::EdmSchema;
    use odata_codec::edm::TypeKind;

    const V4: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:Reference Uri="https://oasis-tcs.github.io/odata-vocabularies/vocabularies/Org.OData.Core.V1.xml">
    <edmx:Include Namespace="Org.OData.Core.V1" Alias="Core"/>
  </edmx:Reference>
  <edmx:DataServices>
    <Schema Namespace="Microsoft.OData.SampleService.Models.TripPin" Alias="Trip" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <EnumType Name="PersonGender">
        <Member Name="Male" Value="0"/>
        <Member Name="Female" Value="1"/>
      </EnumType>
      <TypeDefinition Name="Money" UnderlyingType="Edm.Decimal"/>
      <ComplexType Name="Location">
        <Property Name="Address" Type="Edm.String"/>
        <Property Name="City" Type="Trip.City"/>
      </ComplexType>
      <ComplexType Name="City">
        <Property Name="Name" Type="Edm.String"/>
      </ComplexType>
      <ComplexType Name="EventLocation" BaseType="Trip.Location">
        <Property Name="BuildingInfo" Type="Edm.String"/>
      </ComplexType>
      <EntityType Name="Person" OpenType="true">
        <Key><PropertyRef Name="UserName"/></Key>
        <Property Name="UserName" Type="Edm.String" Nullable="false">
          <Annotation Term="Core.Permissions" EnumMember="Core.Permission/Read"/>
        </Property>
        <Property Name="Emails" Type="Collection(Edm.String)"/>
        <Property Name="AddressInfo" Type="Collection(Trip.Location)"/>
        <Property Name="Gender" Type="Trip.PersonGender"/>
        <Property Name="Budget" Type="Trip.Money"/>
        <Property Name="Concurrency" Type="Edm.Int64" Nullable="false"/>
        <Property Name="Extra" Type="Edm.Untyped"/>
        <NavigationProperty Name="Friends" Type="Collection(Trip.Person)"/>
        <NavigationProperty Name="Photo" Type="Trip.Photo"/>
      </EntityType>
      <EntityType Name="Employee" BaseType="Trip.Person">
        <Property Name="Cost" Type="Edm.Int64"/>
      </EntityType>
      <EntityType Name="Photo" HasStream="true">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int64" Nullable="false"/>
      </EntityType>
      <Function Name="GetNearestAirport">
        <Parameter Name="lat" Type="Edm.Double" Nullable="false"/>
        <ReturnType Type="Edm.String"/>
      </Function>
      <EntityContainer Name="DefaultContainer">
        <EntitySet Name="People" EntityType="Trip.Person">
          <NavigationPropertyBinding Path="Friends" Target="People"/>
        </EntitySet>
        <FunctionImport Name="GetNearestAirport" Function="Trip.GetNearestAirport"/>
        <EntitySet Name="Photos" EntityType="Trip.Photo"/>
        <Singleton Name="Me" Type="Trip.Person"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

    const V3: &str = r#"<edmx:Edmx Version="1.0" xmlns:edmx="http://schemas.microsoft.com/ado/2007/06/edmx">
  <edmx:DataServices m:DataServiceVersion="3.0" xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
    <Schema Namespace="ODataDemo" xmlns="http://schemas.microsoft.com/ado/2009/11/edm">
      <EntityType Name="Product">
        <Key><PropertyRef Name="ID"/></Key>
        <Property Name="ID" Type="Edm.Int32" Nullable="false"/>
        <Property Name="ReleaseDate" Type="Edm.DateTime" Nullable="false"/>
        <NavigationProperty Name="Category" Relationship="ODataDemo.Product_Category_Category_Products" ToRole="Category_Products" FromRole="Product_Category"/>
      </EntityType>
      <EntityType Name="Category">
        <Key><PropertyRef Name="ID"/></Key>
        <Property Name="ID" Type="Edm.Int32" Nullable="false"/>
        <NavigationProperty Name="Products" Relationship="ODataDemo.Product_Category_Category_Products" ToRole="Product_Category" FromRole="Category_Products"/>
      </EntityType>
      <Association Name="Product_Category_Category_Products">
        <End Type="ODataDemo.Category" Role="Category_Products" Multiplicity="0..1"/>
        <End Type="ODataDemo.Product" Role="Product_Category" Multiplicity="*"/>
      </Association>
      <EntityContainer Name="DemoService" m:IsDefaultEntityContainer="true">
        <EntitySet Name="Products" EntityType="ODataDemo.Product"/>
        <EntitySet Name="Categories" EntityType="ODataDemo.Category"/>
        <AssociationSet Name="Products_Category_Categories" Association="ODataDemo.Product_Category_Category_Products">
          <End Role="Product_Category" EntitySet="Products"/>
          <End Role="Category_Products" EntitySet="Categories"/>
        </AssociationSet>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

    const NS: &str = "Microsoft.OData.SampleService.Models.TripPin";

    fn trip(name: &str) -> String {
        format!("{NS}.{name}")
    }

    #[test]
    fn v4_document() -> Result<(), Error> {
        let schema = Edmx::parse(V4)?.to_schema()?;
        let person = trip("Person");
        assert_eq!(
            schema.resolve_property(&person, "Emails"),
            Some(EdmType::Collection(Box::new(EdmType::Primitive(EdmPrimitiveKind::String))))
        );
        assert_eq!(
            schema.resolve_property(&person, "AddressInfo"),
            Some(EdmType::Collection(Box::new(EdmType::Complex(trip("Location")))))
        );
        assert_eq!(schema.resolve_property(&person, "Gender"), Some(EdmType::Enum(trip("PersonGender"))));
        assert_eq!(
            schema.resolve_property_type(&person, "Budget"),
            Some(EdmType::Primitive(EdmPrimitiveKind::Decimal))
        );
        assert_eq!(schema.resolve_property(&person, "Extra"), None);
        assert_eq!(
            schema.resolve_property(&person, "Friends"),
            Some(EdmType::Collection(Box::new(EdmType::Entity(person.clone()))))
        );
        assert_eq!(schema.resolve_property(&person, "Photo"), Some(EdmType::Entity(trip("Photo"))));
        // Inherited through the alias-qualified base type.
        assert_eq!(
            schema.resolve_property(&trip("Employee"), "Concurrency"),
            Some(EdmType::Primitive(EdmPrimitiveKind::Int64))
        );
        assert_eq!(
            schema.resolve_property(&trip("EventLocation"), "City"),
            Some(EdmType::Complex(trip("City")))
        );
        assert_eq!(schema.resolve_entity_set("People"), Some(person.clone()));
        assert_eq!(schema.resolve_entity_set("Me"), Some(person));
        assert_eq!(
            schema.resolve_type("Trip.Money").map(|d| d.kind),
            Some(TypeKind::Definition(EdmPrimitiveKind::Decimal))
        );
        Ok(())
    }

    #[test]
    fn v3_associations() -> Result<(), Error> {
        let schema = Edmx::parse(V3)?.to_schema()?;
        assert_eq!(
            schema.resolve_property("ODataDemo.Product", "Category"),
            Some(EdmType::Entity("ODataDemo.Category".into()))
        );
        assert_eq!(
            schema.resolve_property("ODataDemo.Category", "Products"),
            Some(EdmType::Collection(Box::new(EdmType::Entity("ODataDemo.Product".into()))))
        );
        assert_eq!(schema.resolve_property("ODataDemo.Product", "ReleaseDate"), None);
        assert_eq!(
            schema.resolve_property("ODataDemo.Product", "ID"),
            Some(EdmType::Primitive(EdmPrimitiveKind::Int32))
        );
        assert_eq!(schema.resolve_entity_set("Categories").as_deref(), Some("ODataDemo.Category"));
        Ok(())
    }

    #[test]
    fn invalid_documents() {
        let bad_type = V4.replace("Type=\"Edm.Int64\" Nullable=\"false\"/>\n        <Property Name=\"Extra\"", "Type=\"Edm.Int65\" Nullable=\"false\"/>\n        <Property Name=\"Extra\"");
        let err = Edmx::parse(&bad_type).and_then(|e| e.to_schema()).unwrap_err();
        assert!(matches!(err.root_cause(), Error::InvalidType(name) if name == "Edm.Int65"));
        assert!(err.to_string().contains("Concurrency"));

        let unbalanced = V4.replace("Collection(Edm.String)", "Collection(Edm.String");
        assert!(matches!(
            Edmx::parse(&unbalanced).and_then(|e| e.to_schema()).unwrap_err().root_cause(),
            Error::InvalidType(_)
        ));

        assert!(matches!(Edmx::parse("<edmx:Edmx"), Err(Error::XmlDeserialize(_))));
        assert!(matches!(
            Edmx::parse(r#"<edmx:Edmx Version="4.0"></edmx:Edmx>"#),
            Err(Error::WrongDataServicesNumber)
        ));
    }
}
