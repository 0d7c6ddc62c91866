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

//! Delta payloads
//!
//! Items of the `value` array are classified one by one, in any order:
//! - context fragment `$deletedLink`, or a `{source, relationship, target}`
//!   record marked removed: deleted link;
//! - context fragment `$link`, or an unmarked link record: added link;
//! - context fragment `$deletedEntity`, or marked removed: deleted entity;
//! - anything else: added or changed entity.
//!
//! A record is marked removed by `@odata.removed` (`@removed` in 4.01).

use super::as_count;
use super::reader::value_array;
use super::JsonReader;
use super::JsonWriter;
use super::Members;
use crate::config::MetadataLevel;
use crate::entity::Delta;
use crate::entity::DeletedEntity;
use crate::entity::DeletedReason;
use crate::entity::LinkChange;
use crate::entity::Payload;
use crate::error::PayloadKind;
use crate::Error;
use serde_json::json;
use serde_json::Map;
use serde_json::Value as JsonValue;

type Object = Map<String, JsonValue>;

enum Record {
    Entity,
    DeletedEntity,
    AddedLink,
    DeletedLink,
}

impl JsonReader<'_> {
    /// Read delta payload.
    ///
    /// # Errors
    ///
    /// `Error::WrongPayloadKind` if the document is not a collection, parse
    /// errors for records without their required members.
    pub fn read_delta(&self, doc: &JsonValue) -> Result<Payload<Delta>, Error> {
        let json = &self.names.json;
        let found = self.payload_kind(doc);
        if !matches!(found, PayloadKind::Delta | PayloadKind::EntitySet) {
            return Err(Error::wrong_kind(PayloadKind::Delta, found));
        }
        let obj = doc
            .as_object()
            .ok_or_else(|| Error::parse("payload must be a JSON object"))?;
        let members = Members::group(obj, json);
        let owner = members
            .control_str(json.context)
            .and_then(|c| self.types.context_entity_type(c));
        let mut delta = Delta {
            count: members.control(json.count).and_then(as_count),
            next_link: members.control_str(json.next_link).map(ToString::to_string),
            delta_link: members.control_str(json.delta_link).map(ToString::to_string),
            ..Delta::default()
        };
        for item in value_array(&members)? {
            let obj = item
                .as_object()
                .ok_or_else(|| Error::parse("delta items must be objects"))?;
            match self.classify(obj) {
                Record::Entity => {
                    let owner = obj
                        .get(json.context)
                        .and_then(JsonValue::as_str)
                        .and_then(|c| self.types.context_entity_type(c))
                        .or_else(|| owner.clone());
                    delta.entities.push(self.entity(obj, owner, 0)?);
                }
                Record::DeletedEntity => delta.deleted_entities.push(self.deleted_entity(obj)?),
                Record::AddedLink => delta.added_links.push(link_change(obj)?),
                Record::DeletedLink => delta.deleted_links.push(link_change(obj)?),
            }
        }
        Ok(self.payload(&members, delta))
    }

    fn removed<'v>(&self, obj: &'v Object) -> Option<&'v JsonValue> {
        obj.get(self.names.json.removed).or_else(|| obj.get("@removed"))
    }

    fn classify(&self, obj: &Object) -> Record {
        let json = &self.names.json;
        let fragment = obj
            .get(json.context)
            .and_then(JsonValue::as_str)
            .and_then(|c| c.split_once('#'))
            .map(|(_, f)| f);
        let link_shaped = ["source", "relationship", "target"]
            .iter()
            .all(|k| obj.get(*k).map_or(false, JsonValue::is_string))
            && !obj.contains_key(json.type_);
        let removed = self.removed(obj).is_some();
        match fragment {
            Some(f) if f.ends_with("$deletedLink") => Record::DeletedLink,
            Some(f) if f.ends_with("$link") => Record::AddedLink,
            Some(f) if f.ends_with("$deletedEntity") => Record::DeletedEntity,
            _ if link_shaped && removed => Record::DeletedLink,
            _ if link_shaped => Record::AddedLink,
            _ if removed => Record::DeletedEntity,
            _ => Record::Entity,
        }
    }

    fn deleted_entity(&self, obj: &Object) -> Result<DeletedEntity, Error> {
        let id = obj
            .get("id")
            .or_else(|| obj.get(self.names.json.id))
            .or_else(|| obj.get("@id"))
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::parse("deleted entity without id"))?;
        let reason = obj
            .get("reason")
            .or_else(|| self.removed(obj).and_then(|r| r.get("reason")))
            .and_then(JsonValue::as_str)
            .and_then(DeletedReason::parse);
        Ok(DeletedEntity {
            id: id.to_string(),
            reason,
        })
    }
}

fn link_change(obj: &Object) -> Result<LinkChange, Error> {
    let member = |name: &str| {
        obj.get(name)
            .and_then(JsonValue::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| Error::parse(format!("link change without '{name}'")))
    };
    Ok(LinkChange {
        source: member("source")?,
        relationship: member("relationship")?,
        target: member("target")?,
    })
}

impl JsonWriter {
    /// Write delta payload: upserts, then removals, then link changes.
    ///
    /// # Errors
    ///
    /// `Error::Depth` if expansions nest deeper than the limit.
    pub fn write_delta(&self, payload: &Payload<Delta>) -> Result<JsonValue, Error> {
        let json = &self.names.json;
        let delta = &payload.payload;
        let mut obj = Object::new();
        self.document(&mut obj, payload);
        if let Some(count) = delta.count {
            obj.insert(json.count.into(), count.into());
        }
        let mut items = Vec::new();
        for e in &delta.entities {
            let mut record = Object::new();
            // Records keep their id below full metadata too.
            if !self.full() && self.config.metadata != MetadataLevel::None {
                if let Some(id) = &e.id {
                    record.insert(json.id.into(), id.as_str().into());
                }
            }
            self.entity(&mut record, e, 0)?;
            items.push(JsonValue::Object(record));
        }
        for deleted in &delta.deleted_entities {
            let mut removed = Object::new();
            if let Some(reason) = deleted.reason {
                removed.insert("reason".into(), reason.as_str().into());
            }
            let mut record = Object::new();
            record.insert(json.removed.into(), JsonValue::Object(removed));
            record.insert(json.id.into(), deleted.id.as_str().into());
            items.push(JsonValue::Object(record));
        }
        let link = |change: &LinkChange| {
            json!({
                "source": change.source,
                "relationship": change.relationship,
                "target": change.target,
            })
        };
        items.extend(delta.added_links.iter().map(link));
        for change in &delta.deleted_links {
            let mut record = Object::new();
            record.insert(json.removed.into(), JsonValue::Object(Object::new()));
            if let JsonValue::Object(members) = link(change) {
                record.extend(members);
            }
            items.push(JsonValue::Object(record));
        }
        obj.insert("value".into(), JsonValue::Array(items));
        if let Some(next) = &delta.next_link {
            obj.insert(json.next_link.into(), next.as_str().into());
        }
        if let Some(link) = &delta.delta_link {
            obj.insert(json.delta_link.into(), link.as_str().into());
        }
        Ok(JsonValue::Object(obj))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::infer::TypeResolver;

    #[test]
    fn classifies_records_in_any_order() {
        let doc = json!({
            "@odata.context": "$metadata#Customers/$delta",
            "@odata.count": 5,
            "value": [
                {"@odata.context": "$metadata#Customers/$deletedLink", "source": "Customers('A')", "relationship": "Orders", "target": "Orders(1)"},
                {"@odata.id": "Customers('B')", "Name": "Bob"},
                {"@odata.removed": {"reason": "changed"}, "@odata.id": "Customers('C')"},
                {"source": "Customers('A')", "relationship": "Orders", "target": "Orders(2)"},
                {"@odata.id": "Customers('D')", "Name": "Dan"},
            ],
            "@odata.deltaLink": "Customers?$deltatoken=8015",
        });
        let r = JsonReader::new(Config::default(), TypeResolver::default());
        let delta = r.read_delta(&doc).unwrap().payload;
        assert_eq!(delta.entities.len(), 2);
        assert_eq!(delta.deleted_entities.len(), 1);
        assert_eq!(delta.deleted_entities[0].reason, Some(DeletedReason::Changed));
        assert_eq!(delta.added_links.len(), 1);
        assert_eq!(delta.deleted_links.len(), 1);
        assert_eq!(delta.count, Some(5));
        assert_eq!(delta.delta_link.as_deref(), Some("Customers?$deltatoken=8015"));
    }

    #[test]
    fn written_delta_reads_back() {
        let delta = Delta {
            deleted_entities: vec![DeletedEntity {
                id: "Customers('C')".into(),
                reason: Some(DeletedReason::Deleted),
            }],
            added_links: vec![LinkChange {
                source: "Customers('A')".into(),
                relationship: "Orders".into(),
                target: "Orders(2)".into(),
            }],
            deleted_links: vec![LinkChange {
                source: "Customers('A')".into(),
                relationship: "Orders".into(),
                target: "Orders(1)".into(),
            }],
            delta_link: Some("Customers?$deltatoken=1".into()),
            ..Delta::default()
        };
        let doc = JsonWriter::new(Config::default())
            .write_delta(&Payload::new(delta.clone()))
            .unwrap();
        let back = JsonReader::new(Config::default(), TypeResolver::default())
            .read_delta(&doc)
            .unwrap();
        assert_eq!(back.payload, delta);
    }
}
