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

//! Service document model.

/// Kind of a service document item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceItemKind {
    /// Entity set.
    EntitySet,
    /// Singleton.
    Singleton,
    /// Function import.
    FunctionImport,
    /// Related service document.
    ServiceDocument,
}

impl ServiceItemKind {
    /// JSON `kind` value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EntitySet => "EntitySet",
            Self::Singleton => "Singleton",
            Self::FunctionImport => "FunctionImport",
            Self::ServiceDocument => "ServiceDocument",
        }
    }

    /// Parse JSON `kind` value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EntitySet" => Some(Self::EntitySet),
            "Singleton" => Some(Self::Singleton),
            "FunctionImport" => Some(Self::FunctionImport),
            "ServiceDocument" => Some(Self::ServiceDocument),
            _ => None,
        }
    }
}

/// Entry of a service document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceItem {
    /// Name.
    pub name: String,
    /// Human readable title.
    pub title: Option<String>,
    /// URL, relative to the service root.
    pub url: String,
}

impl ServiceItem {
    /// Create item without title.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            url: url.into(),
        }
    }
}

/// Service document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDocument {
    /// Workspace title.
    pub title: Option<String>,
    /// Metadata document URL.
    pub metadata_uri: Option<String>,
    /// Entity sets.
    pub entity_sets: Vec<ServiceItem>,
    /// Singletons.
    pub singletons: Vec<ServiceItem>,
    /// Function imports.
    pub function_imports: Vec<ServiceItem>,
    /// Related service documents.
    pub related_service_documents: Vec<ServiceItem>,
}

impl ServiceDocument {
    /// Items of the kind.
    #[must_use]
    pub fn items(&self, kind: ServiceItemKind) -> &[ServiceItem] {
        match kind {
            ServiceItemKind::EntitySet => &self.entity_sets,
            ServiceItemKind::Singleton => &self.singletons,
            ServiceItemKind::FunctionImport => &self.function_imports,
            ServiceItemKind::ServiceDocument => &self.related_service_documents,
        }
    }

    /// Mutable items of the kind.
    pub fn items_mut(&mut self, kind: ServiceItemKind) -> &mut Vec<ServiceItem> {
        match kind {
            ServiceItemKind::EntitySet => &mut self.entity_sets,
            ServiceItemKind::Singleton => &mut self.singletons,
            ServiceItemKind::FunctionImport => &mut self.function_imports,
            ServiceItemKind::ServiceDocument => &mut self.related_service_documents,
        }
    }

    /// Entity set URL by name.
    #[must_use]
    pub fn entity_set_url(&self, name: &str) -> Option<&str> {
        self.entity_sets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.url.as_str())
    }
}

/// All item kinds in document order.
pub const ITEM_KINDS: [ServiceItemKind; 4] = [
    ServiceItemKind::EntitySet,
    ServiceItemKind::Singleton,
    ServiceItemKind::FunctionImport,
    ServiceItemKind::ServiceDocument,
];
