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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::testutils::TestContext as DriverTestContext;
use crate::model::*;
use crate::rest::app_with_comments;
use axum::Router;
use time::macros::datetime;

/// State of a running REST test, serving the `articles` collection with comments.
pub(crate) struct TestContext {
    /// The driver-level context that owns the database.
    inner: DriverTestContext,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app backed by an in-memory database.
    pub(crate) async fn setup() -> Self {
        let inner = DriverTestContext::setup().await;
        let app = app_with_comments(inner.driver());
        Self { inner, app }
    }

    /// Returns a copy of the app under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Returns the app for another `collection` backed by the same database.
    pub(crate) fn app_for(&self, collection: &'static str) -> Router {
        app_with_comments(self.inner.driver_for(collection))
    }

    /// Stores a record called `name` with `price` in `collection` and returns it.
    pub(crate) async fn create_record_in(
        &self,
        collection: &'static str,
        name: &str,
        price: f64,
        created_sec: i64,
    ) -> Record {
        let fields = RecordFields::new(
            RecordName::new(name).unwrap(),
            Price::new(price).unwrap(),
            None,
            vec![],
        );
        let created = datetime!(2023-11-14 22:00:00 UTC) + time::Duration::seconds(created_sec);
        db::create_record(
            &mut self.inner.ex().await,
            Collection::new(collection).unwrap(),
            fields,
            created,
        )
        .await
        .unwrap()
    }

    /// Stores a record called `name` with `price` in the `articles` collection and returns it.
    pub(crate) async fn create_record(&self, name: &str, price: f64) -> Record {
        self.create_record_in("articles", name, price, 0).await
    }

    /// Gets the record `id` of the `articles` collection, if it exists.
    pub(crate) async fn get_record(&self, id: Id) -> Option<Record> {
        match db::get_record(&mut self.inner.ex().await, self.inner.driver().collection(), id)
            .await
        {
            Ok(record) => Some(record),
            Err(bazaar_core::db::DbError::NotFound) => None,
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    /// Attaches a comment with `content` created `created_sec` seconds after an arbitrary point in
    /// time to the record `record_id` of the `articles` collection.
    pub(crate) async fn create_comment(
        &self,
        record_id: Id,
        content: &str,
        created_sec: i64,
    ) -> Comment {
        let fields = CommentFields::new(CommentContent::new(content).unwrap());
        let created = datetime!(2023-11-14 23:00:00 UTC) + time::Duration::seconds(created_sec);
        db::create_comment(
            &mut self.inner.ex().await,
            self.inner.driver().collection(),
            record_id,
            fields,
            created,
        )
        .await
        .unwrap()
    }

    /// Gets the comment `id` attached to `record_id`, if it exists.
    pub(crate) async fn get_comment(&self, record_id: Id, id: Id) -> Option<Comment> {
        let collection = self.inner.driver().collection();
        match db::get_comment(&mut self.inner.ex().await, collection, record_id, id).await {
            Ok(comment) => Some(comment),
            Err(bazaar_core::db::DbError::NotFound) => None,
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
