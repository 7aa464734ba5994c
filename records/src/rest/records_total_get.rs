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

//! API to count the records.

use crate::driver::RecordsDriver;
use axum::Json;
use axum::extract::State;
use bazaar_core::rest::RestError;
use serde::{Deserialize, Serialize};

/// Message returned by the server with the number of records.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct TotalResponse {
    /// Number of records in the collection.
    pub(crate) total: u64,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<RecordsDriver>,
) -> Result<Json<TotalResponse>, RestError> {
    let total = driver.count_records().await?;
    Ok(Json(TotalResponse { total }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use bazaar_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/articles/total".to_owned())
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .take_body_as_text()
            .await;
        assert_eq!(r#"{"total":0}"#, response);
    }

    #[tokio::test]
    async fn test_counts_collection_only() {
        let context = TestContext::setup().await;
        context.create_record("A", 1.0).await;
        context.create_record("B", 1.0).await;
        context.create_record_in("products", "C", 1.0, 0).await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_json::<TotalResponse>()
            .await;
        assert_eq!(TotalResponse { total: 2 }, response);
    }
}
