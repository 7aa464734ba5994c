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

//! High-level data types.

use bazaar_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

mod comment;
pub use comment::{Comment, CommentContent, CommentFields, CommentPatch};
mod query;
pub use query::{ListQuery, SortOrder};
mod record;
pub use record::{Price, Record, RecordFields, RecordName, RecordPatch, RecordSummary};

/// Identifier of a record or a comment, assigned by the database layer on creation.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Id(Uuid);

impl Id {
    /// Generates a new random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the UUID backing this identifier.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Id {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.as_hyphenated().fmt(f)
    }
}

/// Name of the resource that a record belongs to, such as `articles`.
///
/// Records are partitioned by collection: a record is only visible through the routes of the
/// collection it was created in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Collection(&'static str);

impl Collection {
    /// Creates a new collection named `name`, which is also used as the top-level path component
    /// of its REST routes.
    pub fn new(name: &'static str) -> ModelResult<Self> {
        if name.is_empty() {
            return Err(ModelError("Collection name cannot be empty".to_owned()));
        }
        if !name.chars().all(|ch| ch.is_ascii_lowercase() || ch == '-' || ch == '_') {
            return Err(ModelError(format!("Invalid collection name '{}'", name)));
        }
        Ok(Self(name))
    }

    /// Returns the collection name.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Deserializes a field that is optional in a payload but that cannot be null when present.
///
/// Use with `#[serde(default)]` so that a missing field yields `None`.  If `T` is itself an
/// `Option`, an explicit null is preserved as `Some(None)`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Deserializes a list that treats an explicit null as the empty list.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
