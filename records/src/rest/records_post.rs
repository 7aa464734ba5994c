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

//! API to create a record.

use crate::driver::RecordsDriver;
use crate::model::RecordFields;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use bazaar_core::rest::{JsonBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<RecordsDriver>,
    JsonBody(fields): JsonBody<RecordFields>,
) -> Result<impl IntoResponse, RestError> {
    let record = driver.create_record(fields).await?;
    Ok((http::StatusCode::CREATED, Json(record)))
}

#[cfg(test)]
mod tests {
    use crate::model::Record;
    use crate::rest::testutils::*;
    use bazaar_core::rest::testutils::*;
    use bazaar_core::test_payload_must_be_json;
    use serde_json::json;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/articles".to_owned())
    }

    #[tokio::test]
    async fn test_create_minimal() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "Widget", "price": 9.99}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<Record>()
            .await;
        assert_eq!("Widget", response.name().as_str());
        assert_eq!(9.99, response.price().as_f64());
        assert_eq!(&None, response.description());
        assert!(response.tags().is_empty());

        assert_eq!(Some(response.clone()), context.get_record(*response.id()).await);
    }

    #[tokio::test]
    async fn test_create_full() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({
                "name": "Widget",
                "price": "12.5",
                "description": "Shiny",
                "tags": ["a", "b"]
            }))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<Record>()
            .await;
        assert_eq!(12.5, response.price().as_f64());
        assert_eq!(&Some("Shiny".to_owned()), response.description());
        assert_eq!(&vec!["a".to_owned(), "b".to_owned()], response.tags());

        assert_eq!(Some(response.clone()), context.get_record(*response.id()).await);
    }

    #[tokio::test]
    async fn test_client_cannot_choose_id_or_time() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({
                "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "name": "Widget",
                "price": 1,
                "createdAt": "2000-01-01T00:00:00Z"
            }))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<Record>()
            .await;
        assert_ne!("67e55044-10b1-426f-9247-bb680e5fe0c8", response.id().to_string());
        assert_ne!(2000, response.created_at().year());
    }

    #[tokio::test]
    async fn test_missing_name() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"price": 3}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("missing field `name`")
            .await;
    }

    #[tokio::test]
    async fn test_empty_name() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "", "price": 3}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("name: cannot be empty")
            .await;
    }

    #[tokio::test]
    async fn test_bad_price() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "Widget", "price": "abc"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("price: cannot convert \"abc\" to a number")
            .await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "Widget", "price": true}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("expected a number or a string holding a number")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.app(), route());
}
