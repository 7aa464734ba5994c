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

//! Test utilities for the business layer.

use crate::db::init_schema;
use crate::driver::RecordsDriver;
use crate::model::Collection;
use bazaar_core::clocks::testutils::MonotonicClock;
use bazaar_core::db::sqlite::testutils::setup;
use bazaar_core::db::{Db, Executor};
use std::sync::Arc;

/// Seconds since the epoch of the first timestamp handed out by the test clock.
pub(crate) const START_SEC: i64 = 1_700_000_000;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver, exposed so that tests can set up and inspect state.
    db: Arc<dyn Db + Send + Sync>,

    /// The driver under test.
    driver: RecordsDriver,
}

impl TestContext {
    /// Initializes a driver for the `articles` collection backed by an in-memory database.
    pub(crate) async fn setup() -> Self {
        Self::setup_for("articles").await
    }

    /// Initializes a driver for the `collection` backed by an in-memory database.
    pub(crate) async fn setup_for(collection: &'static str) -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::new(setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(MonotonicClock::new(START_SEC));
        let driver = RecordsDriver::new(db.clone(), clock, Collection::new(collection).unwrap());
        Self { db, driver }
    }

    /// Returns a direct executor against the test database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Returns a driver sharing the database of this context but bound to `collection`.
    pub(crate) fn driver_for(&self, collection: &'static str) -> RecordsDriver {
        let mut driver = self.driver.clone();
        driver.collection = Collection::new(collection).unwrap();
        driver
    }

    /// Returns a copy of the driver under test.
    pub(crate) fn driver(&self) -> RecordsDriver {
        self.driver.clone()
    }
}
