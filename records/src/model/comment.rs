// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The `Comment` data type.

use crate::model::{Id, present};
use bazaar_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use derive_more::Constructor;
use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Text of a comment.  Comments cannot be empty.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CommentContent(String);

impl CommentContent {
    /// Creates a new comment text from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(ModelError("content: cannot be empty".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the comment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A deserialization visitor for a `CommentContent`.
struct CommentContentVisitor;

impl Visitor<'_> for CommentContentVisitor {
    type Value = CommentContent;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a non-empty string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        CommentContent::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        CommentContent::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for CommentContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(CommentContentVisitor)
    }
}

/// Contents of a comment as provided by a client on creation.
#[derive(Constructor, Debug, Deserialize, PartialEq, Serialize)]
pub struct CommentFields {
    /// The comment text.
    pub content: CommentContent,
}

/// A partial update to a comment.
#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CommentPatch {
    /// New text for the comment.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub content: Option<CommentContent>,
}

/// A stored comment attached to a record.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique identifier of the comment.
    id: Id,

    /// The comment text.
    content: CommentContent,

    /// Time when the comment was created.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Comment {
    /// Overwrites the fields present in `patch`, leaving the others untouched.
    pub fn apply(mut self, patch: CommentPatch) -> Self {
        if let Some(content) = patch.content {
            self.content = content;
        }
        self
    }
}
