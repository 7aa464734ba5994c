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

//! Business logic for a collection of records and their comments.

use crate::model::Collection;
use bazaar_core::clocks::Clock;
use bazaar_core::db::Db;
use std::sync::Arc;

mod comments;
mod record;
mod records;
#[cfg(test)]
pub(crate) mod testutils;

/// Business logic.
///
/// A driver is bound to a single collection: every operation it exposes only sees the records
/// that were created through a driver for the same collection.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub struct RecordsDriver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the creation time of new entities.
    clock: Arc<dyn Clock + Send + Sync>,

    /// The collection that this driver operates on.
    collection: Collection,
}

impl RecordsDriver {
    /// Creates a new driver for `collection` backed by the given injected components.
    pub fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        collection: Collection,
    ) -> Self {
        Self { db, clock, collection }
    }

    /// Returns the collection that this driver operates on.
    pub fn collection(&self) -> Collection {
        self.collection
    }
}
