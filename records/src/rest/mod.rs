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

//! REST interface for a collection of records and their comments.

use crate::driver::RecordsDriver;
use axum::Router;
use http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

mod comment_delete;
mod comment_get;
mod comment_patch;
mod comments_get;
mod comments_post;
mod list_params;
mod record_delete;
mod record_get;
mod record_patch;
mod records_all_get;
mod records_get;
mod records_post;
mod records_total_get;
#[cfg(test)]
mod testutils;

/// Creates the router exposing the records of the collection handled by `driver`.
///
/// All routes live under `/<collection>`.
pub fn app(driver: RecordsDriver) -> Router {
    use axum::routing::get;
    let base = format!("/{}", driver.collection().as_str());
    Router::new()
        .route(&base, get(records_get::handler).post(records_post::handler))
        .route(&format!("{}/all", base), get(records_all_get::handler))
        .route(&format!("{}/total", base), get(records_total_get::handler))
        .route(
            &format!("{}/:id", base),
            get(record_get::handler).patch(record_patch::handler).delete(record_delete::handler),
        )
        .with_state(driver)
}

/// Creates the router exposing the records of the collection handled by `driver` along with the
/// comments attached to them.
pub fn app_with_comments(driver: RecordsDriver) -> Router {
    use axum::routing::get;
    let base = format!("/{}", driver.collection().as_str());
    let comments = Router::new()
        .route(
            &format!("{}/:id/comments", base),
            get(comments_get::handler).post(comments_post::handler),
        )
        .route(
            &format!("{}/:id/comments/:comment_id", base),
            get(comment_get::handler).patch(comment_patch::handler).delete(comment_delete::handler),
        )
        .with_state(driver.clone());
    app(driver).merge(comments)
}

/// Creates the CORS policy shared by all services: any origin may issue JSON requests with any
/// of the methods used by the APIs.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
