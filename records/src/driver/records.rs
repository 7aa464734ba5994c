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

//! Operations on the whole collection of records.

use crate::db;
use crate::driver::RecordsDriver;
use crate::model::*;
use bazaar_core::driver::DriverResult;

impl RecordsDriver {
    /// Gets the summaries of the records that match `query`.
    pub(crate) async fn get_records(self, query: ListQuery) -> DriverResult<Vec<RecordSummary>> {
        let summaries = db::get_records(&mut self.db.ex().await?, self.collection, &query).await?;
        Ok(summaries)
    }

    /// Gets all records with all of their fields.
    pub(crate) async fn get_all_records(self) -> DriverResult<Vec<Record>> {
        let records = db::get_all_records(&mut self.db.ex().await?, self.collection).await?;
        Ok(records)
    }

    /// Counts all records.
    pub(crate) async fn count_records(self) -> DriverResult<u64> {
        let total = db::count_records(&mut self.db.ex().await?, self.collection).await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;

    /// Creates a record called `name` through `context`.
    async fn create(context: &TestContext, name: &str) -> Record {
        let fields = RecordFields::new(
            RecordName::new(name).unwrap(),
            Price::new(1.0).unwrap(),
            None,
            vec![],
        );
        context.driver().create_record(fields).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_records_empty() {
        let context = TestContext::setup().await;

        assert!(context.driver().get_records(ListQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_records_recent_first() {
        let context = TestContext::setup().await;

        let old = create(&context, "old").await;
        let new = create(&context, "new").await;

        let query = ListQuery { order: SortOrder::Recent, ..Default::default() };
        let summaries = context.driver().get_records(query).await.unwrap();
        assert_eq!(vec![new.summary(), old.summary()], summaries);
    }

    #[tokio::test]
    async fn test_get_records_default_page_size() {
        let context = TestContext::setup().await;

        for i in 0..15 {
            create(&context, &format!("record {}", i)).await;
        }

        assert_eq!(10, context.driver().get_records(ListQuery::default()).await.unwrap().len());

        let query = ListQuery { offset: 10, ..Default::default() };
        assert_eq!(5, context.driver().get_records(query).await.unwrap().len());
    }

    #[tokio::test]
    async fn test_get_all_records_and_count() {
        let context = TestContext::setup().await;

        for i in 0..15 {
            create(&context, &format!("record {}", i)).await;
        }
        context.driver_for("products").create_record(RecordFields::new(
            RecordName::new("elsewhere").unwrap(),
            Price::new(0.0).unwrap(),
            None,
            vec![],
        ))
        .await
        .unwrap();

        let all = context.driver().get_all_records().await.unwrap();
        assert_eq!(15, all.len());
        assert!(all.iter().all(|r| r.name().as_str() != "elsewhere"));
        assert_eq!(15, context.driver().count_records().await.unwrap());
        assert_eq!(1, context.driver_for("products").count_records().await.unwrap());
    }
}
