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

//! Entities, entity sets and delta payloads
//!
//! The model is an owned tree: an [`Entity`] owns its [`Link`]s and an
//! expanded link owns the inline entity or entity set. Expansions are
//! copies, so cyclic expansion (`A -> B -> A`) is just a deeper tree.
//!
//! Link lists are kept apart by kind (navigation, association,
//! media-edit), each in document order.

use crate::odata::ODataETag;
use crate::odata::ODataId;
use crate::value::Annotation;
use crate::value::Property;

/// Role of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Read link of the entity.
    Self_,
    /// Edit link of the entity.
    Edit,
    /// Link to related entities.
    Navigation,
    /// Link to the references of related entities.
    Association,
    /// Edit link of a media resource or named stream.
    MediaEdit,
}

/// Expansion state of a navigation link.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Inline {
    /// Not expanded.
    #[default]
    Deferred,
    /// Expanded, but there is no related entity.
    Null,
    /// Expanded single-valued navigation.
    Entity(Box<Entity>),
    /// Expanded collection-valued navigation.
    EntitySet(Box<EntitySet>),
}

/// Link of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Navigation property or stream name; `None` for the entity's own
    /// media edit link.
    pub title: Option<String>,
    /// Role.
    pub kind: LinkKind,
    /// Target URL, if present on the wire.
    pub href: Option<String>,
    /// Media type of a media resource or named stream.
    pub media_type: Option<String>,
    /// Entity tag of a media resource or named stream.
    pub media_etag: Option<String>,
    /// Inline expansion.
    pub inline: Inline,
    /// Annotations targeting the link.
    pub annotations: Vec<Annotation>,
}

impl Link {
    /// Create link.
    pub fn new(kind: LinkKind, title: Option<String>, href: Option<String>) -> Self {
        Self {
            title,
            kind,
            href,
            media_type: None,
            media_etag: None,
            inline: Inline::Deferred,
            annotations: Vec::new(),
        }
    }

    /// Navigation link to the URL.
    pub fn navigation(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(LinkKind::Navigation, Some(name.into()), Some(href.into()))
    }

    /// Association link to the URL.
    pub fn association(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(LinkKind::Association, Some(name.into()), Some(href.into()))
    }

    /// Named stream edit link.
    pub fn stream(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(LinkKind::MediaEdit, Some(name.into()), Some(href.into()))
    }

    /// Set expansion.
    #[must_use]
    pub fn with_inline(mut self, inline: Inline) -> Self {
        self.inline = inline;
        self
    }

    /// Navigation property or stream name, empty for untitled links.
    #[must_use]
    pub fn name(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// Kind of a bound operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Action (side effects).
    Action,
    /// Function (no side effects).
    Function,
}

/// Advertised bound action or function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Action or function. JSON cannot tell them apart and reports
    /// actions.
    pub kind: OperationKind,
    /// Metadata URL fragment, e.g. `#NS.Discount`.
    pub metadata: String,
    /// Human readable title.
    pub title: Option<String>,
    /// Invocation URL.
    pub target: Option<String>,
}

/// Entity (Atom entry).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    /// Identity.
    pub id: Option<ODataId>,
    /// Qualified entity type name.
    pub type_name: Option<String>,
    /// Entity tag.
    pub etag: Option<ODataETag>,
    /// Read link.
    pub self_link: Option<String>,
    /// Edit link.
    pub edit_link: Option<String>,
    /// Structural properties in document order.
    pub properties: Vec<Property>,
    /// Navigation links.
    pub navigation_links: Vec<Link>,
    /// Association links.
    pub association_links: Vec<Link>,
    /// Media edit links: the untitled media resource link and named streams.
    pub media_edit_links: Vec<Link>,
    /// Advertised actions and functions.
    pub operations: Vec<Operation>,
    /// Read URL of the media resource.
    pub media_content_source: Option<String>,
    /// Media type of the media resource.
    pub media_content_type: Option<String>,
    /// Entity tag of the media resource.
    pub media_etag: Option<String>,
    /// Instance annotations of the entity.
    pub annotations: Vec<Annotation>,
}

impl Entity {
    /// Create empty entity of the type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    /// Whether the entity is a media entity.
    #[must_use]
    pub const fn is_media_entity(&self) -> bool {
        self.media_content_source.is_some()
    }

    /// Add property.
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Add link to the list of its kind.
    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        self.push_link(link);
        self
    }

    /// Add link to the list of its kind. Self and edit links replace
    /// [`Entity::self_link`] / [`Entity::edit_link`].
    pub fn push_link(&mut self, link: Link) {
        match link.kind {
            LinkKind::Self_ => self.self_link = link.href,
            LinkKind::Edit => self.edit_link = link.href,
            LinkKind::Navigation => self.navigation_links.push(link),
            LinkKind::Association => self.association_links.push(link),
            LinkKind::MediaEdit => self.media_edit_links.push(link),
        }
    }

    /// Property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Navigation link by navigation property name.
    #[must_use]
    pub fn navigation_link(&self, name: &str) -> Option<&Link> {
        self.navigation_links
            .iter()
            .find(|l| l.title.as_deref() == Some(name))
    }

    /// Mutable navigation link by name, created when missing.
    pub fn navigation_link_mut(&mut self, name: &str) -> &mut Link {
        let index = match self
            .navigation_links
            .iter()
            .position(|l| l.title.as_deref() == Some(name))
        {
            Some(index) => index,
            None => {
                self.navigation_links
                    .push(Link::new(LinkKind::Navigation, Some(name.to_string()), None));
                self.navigation_links.len() - 1
            }
        };
        &mut self.navigation_links[index]
    }
}

/// Collection of entities (Atom feed).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySet {
    /// Identity of the collection.
    pub id: Option<String>,
    /// Entities in document order.
    pub entities: Vec<Entity>,
    /// Total count (`$count=true`).
    pub count: Option<i64>,
    /// Next page link.
    pub next_link: Option<String>,
    /// Delta link.
    pub delta_link: Option<String>,
    /// Instance annotations of the collection.
    pub annotations: Vec<Annotation>,
}

/// Reason an entity left the delta set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletedReason {
    /// The entity was deleted.
    Deleted,
    /// The entity no longer matches the query.
    Changed,
}

impl DeletedReason {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Changed => "changed",
        }
    }

    /// Parse wire name; unknown reasons are `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "deleted" => Some(Self::Deleted),
            "changed" => Some(Self::Changed),
            _ => None,
        }
    }
}

/// Removed entity of a delta payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedEntity {
    /// Identity of the removed entity.
    pub id: String,
    /// Removal reason, if stated.
    pub reason: Option<DeletedReason>,
}

/// Added or deleted relationship of a delta payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkChange {
    /// Identity of the source entity.
    pub source: String,
    /// Navigation property name.
    pub relationship: String,
    /// Identity of the target entity.
    pub target: String,
}

/// Delta payload.
///
/// No ordering holds between the categories: the wire may interleave
/// upserts, removals and link changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    /// Added or changed entities.
    pub entities: Vec<Entity>,
    /// Removed entities.
    pub deleted_entities: Vec<DeletedEntity>,
    /// Added links.
    pub added_links: Vec<LinkChange>,
    /// Deleted links.
    pub deleted_links: Vec<LinkChange>,
    /// Total count.
    pub count: Option<i64>,
    /// Next page link.
    pub next_link: Option<String>,
    /// Opaque delta link for the next incremental fetch.
    pub delta_link: Option<String>,
}

/// Top-level payload with its document-level control information.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload<T> {
    /// Context URL (`@odata.context`, `m:context`).
    pub context_url: Option<String>,
    /// Metadata document entity tag (`@odata.metadataEtag`, `m:metadata-etag`).
    pub metadata_etag: Option<String>,
    /// Payload.
    pub payload: T,
}

impl<T> Payload<T> {
    /// Wrap payload without context.
    pub const fn new(payload: T) -> Self {
        Self {
            context_url: None,
            metadata_etag: None,
            payload,
        }
    }

    /// Set context URL.
    #[must_use]
    pub fn with_context(mut self, context_url: impl Into<String>) -> Self {
        self.context_url = Some(context_url.into());
        self
    }

    /// Unwrap payload.
    pub fn into_inner(self) -> T {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_go_to_list_of_their_kind() {
        let mut e = Entity::new("NS.Person")
            .with_link(Link::new(LinkKind::Edit, None, Some("People(1)".into())))
            .with_link(Link::navigation("Friends", "People(1)/Friends"))
            .with_link(Link::association("Friends", "People(1)/Friends/$ref"))
            .with_link(Link::stream("Photo", "People(1)/Photo"));
        assert_eq!(e.edit_link.as_deref(), Some("People(1)"));
        assert_eq!(e.navigation_links.len(), 1);
        assert_eq!(e.association_links.len(), 1);
        assert_eq!(e.media_edit_links.len(), 1);
        assert!(!e.is_media_entity());

        e.navigation_link_mut("Parent").inline = Inline::Null;
        assert_eq!(e.navigation_links.len(), 2);
        assert_eq!(e.navigation_link("Parent").map(|l| &l.inline), Some(&Inline::Null));
    }

    #[test]
    fn deleted_reason_names() {
        assert_eq!(DeletedReason::parse("changed"), Some(DeletedReason::Changed));
        assert_eq!(DeletedReason::Deleted.as_str(), "deleted");
        assert_eq!(DeletedReason::parse("other"), None);
    }
}
