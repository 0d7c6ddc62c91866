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

use serde_json::Map;
use serde_json::Value as JsonValue;

/// Merge JSON values left to right. Objects are merged member by member,
/// anything else is replaced.
#[must_use]
pub fn json_merge<'a>(values: impl IntoIterator<Item = &'a JsonValue>) -> JsonValue {
    values
        .into_iter()
        .fold(JsonValue::Object(Map::new()), |mut acc, v| {
            merge(&mut acc, v);
            acc
        })
}

fn merge(acc: &mut JsonValue, v: &JsonValue) {
    match (acc, v) {
        (JsonValue::Object(acc), JsonValue::Object(v)) => {
            for (key, value) in v {
                match acc.get_mut(key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        acc.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (acc, v) => *acc = v.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_objects_are_merged() {
        let merged = json_merge([
            &json!({"a": 1, "b": {"c": 2}}),
            &json!({"b": {"d": 3}, "e": [1]}),
        ]);
        assert_eq!(merged, json!({"a": 1, "b": {"c": 2, "d": 3}, "e": [1]}));
    }
}
