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

//! API to delete a comment.

use crate::driver::RecordsDriver;
use axum::extract::State;
use axum::response::IntoResponse;
use bazaar_core::rest::{IdPath, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<RecordsDriver>,
    IdPath((id, comment_id)): IdPath<(String, String)>,
) -> Result<impl IntoResponse, RestError> {
    driver.delete_comment(&id, &comment_id).await?;
    Ok(http::StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::model::Id;
    use crate::rest::testutils::*;
    use bazaar_core::rest::testutils::*;

    fn route(id: &str, comment_id: &str) -> (http::Method, String) {
        (http::Method::DELETE, format!("/articles/{}/comments/{}", id, comment_id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let record = context.create_record("Widget", 1.0).await;
        let comment = context.create_comment(*record.id(), "Nice", 0).await;
        let other = context.create_comment(*record.id(), "Meh", 1).await;

        OneShotBuilder::new(
            context.app(),
            route(&record.id().to_string(), &comment.id().to_string()),
        )
        .send_empty()
        .await
        .expect_status(http::StatusCode::NO_CONTENT)
        .expect_empty()
        .await;

        assert_eq!(None, context.get_comment(*record.id(), *comment.id()).await);
        assert_eq!(Some(other.clone()), context.get_comment(*record.id(), *other.id()).await);
        assert!(context.get_record(*record.id()).await.is_some());
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;
        let record = context.create_record("Widget", 1.0).await;

        OneShotBuilder::new(
            context.app(),
            route(&record.id().to_string(), &Id::new_random().to_string()),
        )
        .send_empty()
        .await
        .expect_not_found()
        .await;

        OneShotBuilder::new(context.app(), route(&record.id().to_string(), "nope"))
            .send_empty()
            .await
            .expect_not_found()
            .await;
    }
}
