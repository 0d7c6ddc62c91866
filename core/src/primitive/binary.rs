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

//! `Edm.Binary` text encodings.
//!
//! Atom payloads carry standard padded base64. JSON payloads are written in
//! unpadded base64url; on read both alphabets are accepted, with or without
//! padding, since services disagree.

use base64::alphabet;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::general_purpose::GeneralPurposeConfig;
use base64::engine::general_purpose::STANDARD;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

/// Alphabet in force for binary values of the current payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryEncoding {
    /// RFC 4648 base64 with padding (Atom / XML).
    Standard,
    /// RFC 4648 base64url without padding (JSON).
    UrlSafe,
}

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

impl BinaryEncoding {
    /// Encode bytes.
    #[must_use]
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Standard => STANDARD.encode(bytes),
            Self::UrlSafe => URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    /// Decode text. Alphabet is picked from the text itself; padding is
    /// optional.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not base64 of either alphabet.
    pub fn decode(self, text: &str) -> Result<Vec<u8>, base64::DecodeError> {
        let text = text.trim();
        if text.contains(['-', '_']) {
            LENIENT_URL_SAFE.decode(text)
        } else if text.contains(['+', '/']) {
            LENIENT_STANDARD.decode(text)
        } else {
            match self {
                Self::Standard => LENIENT_STANDARD.decode(text),
                Self::UrlSafe => LENIENT_URL_SAFE.decode(text),
            }
        }
    }
}
