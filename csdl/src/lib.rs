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

//! CSDL schema provider
//!
//! Reads `$metadata` documents (`edmx:Edmx`, V3 and V4) and builds the
//! [`MapSchema`] that codecs consult for types a payload does not state.
//!
//! ```rust
//! use odata_codec::edm::{EdmPrimitiveKind, EdmSchema, EdmType};
//!
//! let schema = odata_codec_csdl::parse_schema(r#"
//!   <edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
//!     <edmx:DataServices>
//!       <Schema Namespace="NS" xmlns="http://docs.oasis-open.org/odata/ns/edm">
//!         <EntityType Name="Person">
//!           <Property Name="Age" Type="Edm.Int64"/>
//!         </EntityType>
//!       </Schema>
//!     </edmx:DataServices>
//!   </edmx:Edmx>"#).unwrap();
//! assert_eq!(
//!     schema.resolve_property("NS.Person", "Age"),
//!     Some(EdmType::Primitive(EdmPrimitiveKind::Int64))
//! );
//! ```

/// EDMX document model.
pub mod edmx;
/// CSDL reading errors.
pub mod error;
/// Schema building.
pub mod schema;

#[doc(inline)]
pub use edmx::Edmx;
#[doc(inline)]
pub use error::Error;

use odata_codec::edm::MapSchema;

/// Parse EDMX document and build its schema.
///
/// # Errors
///
/// Returns error if the document is not valid CSDL or names malformed
/// types.
pub fn parse_schema(data: &str) -> Result<MapSchema, Error> {
    Edmx::parse(data)?.to_schema()
}
