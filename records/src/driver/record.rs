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

//! Operations on one record.

use crate::db;
use crate::driver::RecordsDriver;
use crate::model::*;
use bazaar_core::driver::DriverResult;

impl RecordsDriver {
    /// Creates a new record out of `fields`, stamped with the current time.
    pub(crate) async fn create_record(self, fields: RecordFields) -> DriverResult<Record> {
        let now = self.clock.now_utc();
        let record =
            db::create_record(&mut self.db.ex().await?, self.collection, fields, now).await?;
        Ok(record)
    }

    /// Gets the record identified by `id`.
    pub(crate) async fn get_record(self, id: &str) -> DriverResult<Record> {
        let id = db::parse_id(id)?;
        let record = db::get_record(&mut self.db.ex().await?, self.collection, id).await?;
        Ok(record)
    }

    /// Applies `patch` to the record identified by `id` and returns the updated record.
    pub(crate) async fn update_record(self, id: &str, patch: RecordPatch) -> DriverResult<Record> {
        let id = db::parse_id(id)?;
        let mut tx = self.db.begin().await?;
        let record = db::get_record(tx.ex(), self.collection, id).await?.apply(patch);
        db::update_record(tx.ex(), self.collection, &record).await?;
        tx.commit().await?;
        Ok(record)
    }

    /// Deletes the record identified by `id` along with all of its comments.
    pub(crate) async fn delete_record(self, id: &str) -> DriverResult<()> {
        let id = db::parse_id(id)?;
        db::delete_record(&mut self.db.ex().await?, self.collection, id).await?;
        Ok(())
    }
}
