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

//! API to partially update a comment.

use crate::driver::RecordsDriver;
use crate::model::{Comment, CommentPatch};
use axum::Json;
use axum::extract::State;
use bazaar_core::rest::{IdPath, JsonBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<RecordsDriver>,
    IdPath((id, comment_id)): IdPath<(String, String)>,
    JsonBody(patch): JsonBody<CommentPatch>,
) -> Result<Json<Comment>, RestError> {
    let comment = driver.update_comment(&id, &comment_id, patch).await?;
    Ok(Json(comment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Id;
    use crate::rest::testutils::*;
    use bazaar_core::rest::testutils::*;
    use bazaar_core::test_payload_must_be_json;
    use serde_json::json;

    fn route(id: &str, comment_id: &str) -> (http::Method, String) {
        (http::Method::PATCH, format!("/articles/{}/comments/{}", id, comment_id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let record = context.create_record("Widget", 1.0).await;
        let comment = context.create_comment(*record.id(), "Nise", 0).await;

        let response = OneShotBuilder::new(
            context.app(),
            route(&record.id().to_string(), &comment.id().to_string()),
        )
        .send_json(json!({"content": "Nice"}))
        .await
        .expect_json::<Comment>()
        .await;
        assert_eq!(comment.id(), response.id());
        assert_eq!("Nice", response.content().as_str());
        assert_eq!(comment.created_at(), response.created_at());

        assert_eq!(Some(response), context.get_comment(*record.id(), *comment.id()).await);
    }

    #[tokio::test]
    async fn test_invalid_content() {
        let context = TestContext::setup().await;
        let record = context.create_record("Widget", 1.0).await;
        let comment = context.create_comment(*record.id(), "Nice", 0).await;

        for body in [json!({"content": ""}), json!({"content": null})] {
            OneShotBuilder::new(
                context.app(),
                route(&record.id().to_string(), &comment.id().to_string()),
            )
            .send_json(body)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error(".")
            .await;
        }

        assert_eq!(Some(comment.clone()), context.get_comment(*record.id(), *comment.id()).await);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;
        let record = context.create_record("Widget", 1.0).await;

        OneShotBuilder::new(
            context.app(),
            route(&record.id().to_string(), &Id::new_random().to_string()),
        )
        .send_json(json!({"content": "Nice"}))
        .await
        .expect_not_found()
        .await;
    }

    test_payload_must_be_json!(
        TestContext::setup().await.app(),
        route(&Id::new_random().to_string(), &Id::new_random().to_string())
    );
}
