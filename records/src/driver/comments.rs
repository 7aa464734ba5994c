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

//! Operations on the comments of a record.

use crate::db;
use crate::driver::RecordsDriver;
use crate::model::*;
use bazaar_core::driver::DriverResult;

impl RecordsDriver {
    /// Gets the comments attached to the record `record_id` that match `query`.
    pub(crate) async fn get_comments(
        self,
        record_id: &str,
        query: ListQuery,
    ) -> DriverResult<Vec<Comment>> {
        let record_id = db::parse_id(record_id)?;
        let comments =
            db::get_comments(&mut self.db.ex().await?, self.collection, record_id, &query).await?;
        Ok(comments)
    }

    /// Attaches a new comment built out of `fields` to the record `record_id`.
    pub(crate) async fn create_comment(
        self,
        record_id: &str,
        fields: CommentFields,
    ) -> DriverResult<Comment> {
        let record_id = db::parse_id(record_id)?;
        let now = self.clock.now_utc();
        let comment =
            db::create_comment(&mut self.db.ex().await?, self.collection, record_id, fields, now)
                .await?;
        Ok(comment)
    }

    /// Gets the comment `id` attached to the record `record_id`.
    pub(crate) async fn get_comment(self, record_id: &str, id: &str) -> DriverResult<Comment> {
        let record_id = db::parse_id(record_id)?;
        let id = db::parse_id(id)?;
        let comment =
            db::get_comment(&mut self.db.ex().await?, self.collection, record_id, id).await?;
        Ok(comment)
    }

    /// Applies `patch` to the comment `id` attached to the record `record_id` and returns the
    /// updated comment.
    pub(crate) async fn update_comment(
        self,
        record_id: &str,
        id: &str,
        patch: CommentPatch,
    ) -> DriverResult<Comment> {
        let record_id = db::parse_id(record_id)?;
        let id = db::parse_id(id)?;
        let mut tx = self.db.begin().await?;
        let comment = db::get_comment(tx.ex(), self.collection, record_id, id).await?.apply(patch);
        db::update_comment(tx.ex(), self.collection, record_id, &comment).await?;
        tx.commit().await?;
        Ok(comment)
    }

    /// Deletes the comment `id` attached to the record `record_id`.
    pub(crate) async fn delete_comment(self, record_id: &str, id: &str) -> DriverResult<()> {
        let record_id = db::parse_id(record_id)?;
        let id = db::parse_id(id)?;
        db::delete_comment(&mut self.db.ex().await?, self.collection, record_id, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use bazaar_core::driver::DriverError;

    /// Creates a record and returns its identifier as a client would provide it.
    async fn create_parent(context: &TestContext) -> String {
        let fields = RecordFields::new(
            RecordName::new("Widget").unwrap(),
            Price::new(1.0).unwrap(),
            None,
            vec![],
        );
        let record = context.driver().create_record(fields).await.unwrap();
        record.id().to_string()
    }

    fn fields(content: &str) -> CommentFields {
        CommentFields::new(CommentContent::new(content).unwrap())
    }

    #[tokio::test]
    async fn test_create_and_get_comment() {
        let context = TestContext::setup().await;
        let parent = create_parent(&context).await;

        let comment = context.driver().create_comment(&parent, fields("Neat")).await.unwrap();
        assert_eq!("Neat", comment.content().as_str());

        let fetched =
            context.driver().get_comment(&parent, &comment.id().to_string()).await.unwrap();
        assert_eq!(comment, fetched);
    }

    #[tokio::test]
    async fn test_create_comment_missing_parent() {
        let context = TestContext::setup().await;

        assert_eq!(
            DriverError::NotFound("Entity not found".to_owned()),
            context
                .driver()
                .create_comment(&Id::new_random().to_string(), fields("Neat"))
                .await
                .unwrap_err()
        );
        match context.driver().create_comment("bad", fields("Neat")).await {
            Err(DriverError::MalformedId(_)) => (),
            e => panic!("Must have failed with MalformedId but got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_get_comments_newest_first() {
        let context = TestContext::setup().await;
        let parent = create_parent(&context).await;

        let first = context.driver().create_comment(&parent, fields("First")).await.unwrap();
        let second = context.driver().create_comment(&parent, fields("Second")).await.unwrap();

        let query = ListQuery { order: SortOrder::Recent, ..Default::default() };
        let comments = context.driver().get_comments(&parent, query).await.unwrap();
        assert_eq!(vec![second, first], comments);
    }

    #[tokio::test]
    async fn test_get_comments_missing_parent_is_empty() {
        let context = TestContext::setup().await;

        let comments = context
            .driver()
            .get_comments(&Id::new_random().to_string(), ListQuery::default())
            .await
            .unwrap();
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn test_get_comment_wrong_parent() {
        let context = TestContext::setup().await;
        let parent1 = create_parent(&context).await;
        let parent2 = create_parent(&context).await;

        let comment = context.driver().create_comment(&parent1, fields("Neat")).await.unwrap();
        assert_eq!(
            DriverError::NotFound("Entity not found".to_owned()),
            context.driver().get_comment(&parent2, &comment.id().to_string()).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_update_comment_ok() {
        let context = TestContext::setup().await;
        let parent = create_parent(&context).await;

        let comment = context.driver().create_comment(&parent, fields("Neet")).await.unwrap();
        let patch = CommentPatch { content: Some(CommentContent::new("Neat").unwrap()) };
        let updated = context
            .driver()
            .update_comment(&parent, &comment.id().to_string(), patch)
            .await
            .unwrap();
        assert_eq!("Neat", updated.content().as_str());
        assert_eq!(comment.id(), updated.id());
        assert_eq!(comment.created_at(), updated.created_at());

        let fetched =
            context.driver().get_comment(&parent, &comment.id().to_string()).await.unwrap();
        assert_eq!(updated, fetched);
    }

    #[tokio::test]
    async fn test_update_comment_not_found() {
        let context = TestContext::setup().await;
        let parent = create_parent(&context).await;

        assert_eq!(
            DriverError::NotFound("Entity not found".to_owned()),
            context
                .driver()
                .update_comment(&parent, &Id::new_random().to_string(), CommentPatch::default())
                .await
                .unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_delete_comment_ok() {
        let context = TestContext::setup().await;
        let parent = create_parent(&context).await;

        let comment = context.driver().create_comment(&parent, fields("Neat")).await.unwrap();
        context.driver().delete_comment(&parent, &comment.id().to_string()).await.unwrap();

        assert!(
            context.driver().get_comments(&parent, ListQuery::default()).await.unwrap().is_empty()
        );
    }

    #[tokio::test]
    async fn test_delete_comment_malformed_id() {
        let context = TestContext::setup().await;
        let parent = create_parent(&context).await;

        match context.driver().delete_comment(&parent, "not-an-id").await {
            Err(DriverError::MalformedId(_)) => (),
            e => panic!("Must have failed with MalformedId but got: {:?}", e),
        }
    }
}
