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

//! Error response bodies
//!
//! The inner error is a chain: every level may carry an
//! `internalexception` of the same shape, to any depth, and the chain may
//! stop at any level. [`ErrorBody::inner_errors`] walks it.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// One level of the inner error chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InnerError {
    /// Message.
    pub message: Option<String>,
    /// Exception type name.
    pub type_name: Option<String>,
    /// Stack trace.
    pub stacktrace: Option<String>,
    /// Next level.
    pub internal_exception: Option<Box<InnerError>>,
}

/// Additional error detail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Service-defined code.
    pub code: Option<String>,
    /// Target of the detail.
    pub target: Option<String>,
    /// Message.
    pub message: Option<String>,
}

/// Error response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    /// Service-defined code.
    pub code: Option<String>,
    /// Message.
    pub message: Option<String>,
    /// Language of the message.
    pub message_lang: Option<String>,
    /// Target of the error.
    pub target: Option<String>,
    /// Details.
    pub details: Vec<ErrorDetail>,
    /// Inner error chain.
    pub inner_error: Option<InnerError>,
}

impl ErrorBody {
    /// Iterate the inner error chain from the outermost level.
    pub fn inner_errors(&self) -> impl Iterator<Item = &InnerError> {
        std::iter::successors(self.inner_error.as_ref(), |e| {
            e.internal_exception.as_deref()
        })
    }
}

impl Display for ErrorBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}"),
            (None, Some(message)) => message.fmt(f),
            (Some(code), None) => code.fmt(f),
            (None, None) => "unspecified service error".fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_iteration() {
        let body = ErrorBody {
            message: Some("outer".into()),
            inner_error: Some(InnerError {
                message: Some("1".into()),
                internal_exception: Some(Box::new(InnerError {
                    message: Some("2".into()),
                    ..InnerError::default()
                })),
                ..InnerError::default()
            }),
            ..ErrorBody::default()
        };
        let messages: Vec<_> = body
            .inner_errors()
            .filter_map(|e| e.message.as_deref())
            .collect();
        assert_eq!(messages, vec!["1", "2"]);
        assert_eq!(body.to_string(), "outer");
    }
}
