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

use odata_codec::entity::DeletedReason;
use odata_codec::value::Value;
use odata_codec::Codec;
use odata_codec::Config;
use odata_codec::Document;
use odata_codec::Format;
use odata_codec::ODataDeserializer;
use odata_codec::ODataVersion;
use odata_codec_tests::fixture;
use odata_codec_tests::reread;
use odata_codec_tests::trippin_schema;
use odata_codec_tests::Error;
use odata_codec_tests::ODATA_CONTEXT;
use serde_json::json;

const DELTA_LINK: &str = "http://services.example.com/Trippin/People?$deltatoken=1234&$select=FirstName,Age";

#[test]
fn records_are_classified() -> Result<(), Error> {
    let schema = trippin_schema()?;
    let delta = Codec::new(Format::Json, Config::default())
        .with_schema(&schema)
        .read_delta(fixture("delta.json")?.as_slice())?
        .into_inner();
    assert_eq!(delta.entities.len(), 2);
    assert_eq!(delta.deleted_entities.len(), 1);
    assert_eq!(delta.deleted_links.len(), 1);
    assert_eq!(delta.added_links.len(), 1);
    assert_eq!(delta.count, Some(5));
    assert_eq!(delta.delta_link.as_deref(), Some(DELTA_LINK));
    assert_eq!(delta.next_link, None);

    assert_eq!(delta.deleted_entities[0].id, "People('vincentcalabrese')");
    assert_eq!(delta.deleted_entities[0].reason, Some(DeletedReason::Deleted));
    assert_eq!(delta.deleted_links[0].target, "People('keithpinckney')");
    assert_eq!(delta.added_links[0].target, "People('scottketchum')");

    // Entities of the set are typed through the context.
    let scott = &delta.entities[1];
    assert_eq!(scott.type_name.as_deref(), Some("Trippin.Person"));
    assert_eq!(scott.property("Age").map(|p| &p.value), Some(&Value::from(27_i64)));
    Ok(())
}

#[test]
fn delta_survives_both_formats() -> Result<(), Error> {
    let json = Codec::new(Format::Json, Config::default());
    let delta = json.read_document(fixture("delta.json")?.as_slice())?;
    let Document::Delta(payload) = &delta else {
        return Err(Error::UnexpectedDocument(delta.kind()));
    };
    assert_eq!(payload.payload.delta_link.as_deref(), Some(DELTA_LINK));
    assert_eq!(reread(&json, &delta)?, delta);

    for version in [ODataVersion::V40, ODataVersion::V30] {
        let atom = Codec::new(Format::Atom, Config::default().version(version));
        let back = reread(&atom, &delta)?;
        let Document::Delta(back) = back else {
            return Err(Error::UnexpectedDocument(back.kind()));
        };
        assert_eq!(back.payload, payload.payload, "{version:?}");
    }
    Ok(())
}

// 4.01 services mark removals with `@removed` instead of a context URL.
#[test]
fn removed_markers() -> Result<(), Error> {
    let doc = json!({
        ODATA_CONTEXT: "$metadata#People/$delta",
        "value": [
            {"@removed": {"reason": "changed"}, "@id": "People('a')"},
            {"@odata.removed": {"reason": "deleted"}, "id": "People('b')"},
            {"@removed": {}, "source": "People('a')", "relationship": "Friends", "target": "People('b')"},
        ],
        "@odata.deltaLink": "People?$deltatoken=1",
    });
    let delta = Codec::new(Format::Json, Config::default())
        .read_delta(serde_json::to_vec(&doc)?.as_slice())?
        .into_inner();
    assert!(delta.entities.is_empty());
    let reasons: Vec<_> = delta.deleted_entities.iter().map(|d| d.reason).collect();
    assert_eq!(reasons, vec![Some(DeletedReason::Changed), Some(DeletedReason::Deleted)]);
    assert_eq!(delta.deleted_links.len(), 1);
    Ok(())
}
