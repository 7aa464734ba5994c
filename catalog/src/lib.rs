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

//! Catalog service: a flat collection of data items.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use axum::Router;
use bazaar_core::clocks::Clock;
use bazaar_core::db::Db;
use bazaar_core::model::ModelResult;
use bazaar_records::driver::RecordsDriver;
use bazaar_records::model::Collection;
use bazaar_records::rest::cors;
use log::{info, warn};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Creates the router for the application, backed by `db` and stamping new entities with `clock`.
pub fn app(
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<dyn Clock + Send + Sync>,
) -> ModelResult<Router> {
    let driver = RecordsDriver::new(db, clock, Collection::new("datas")?);
    Ok(bazaar_records::rest::app(driver).layer(cors()))
}

/// Waits until the process is asked to terminate.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warn!("Cannot listen for shutdown requests: {}", e);
            std::future::pending::<()>().await
        }
    }
}

/// Serves the application on `bind_addr` until interrupted, and then closes `db`.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<dyn Clock + Send + Sync>,
) -> Result<(), Box<dyn Error>> {
    let app = app(db.clone(), clock)?;

    let listener = TcpListener::bind(bind_addr.into()).await?;
    info!("Listening on {}", listener.local_addr()?);
    let result = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    db.close().await;
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::clocks::testutils::MonotonicClock;
    use bazaar_core::rest::testutils::*;
    use bazaar_records::db::init_schema;
    use serde_json::{Value, json};

    /// Creates the app backed by an in-memory database.
    async fn setup() -> Router {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(bazaar_core::db::sqlite::testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        app(db, Arc::new(MonotonicClock::new(1_700_000_000))).unwrap()
    }

    #[tokio::test]
    async fn test_datas_lifecycle() {
        let app = setup().await;

        let created = OneShotBuilder::new(app.clone(), (http::Method::POST, "/datas"))
            .send_json(json!({
                "name": "Sensor",
                "price": 5,
                "description": "Temperature sensor",
                "tags": ["iot"]
            }))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<Value>()
            .await;
        let uri = format!("/datas/{}", created["id"].as_str().unwrap());

        let listed = OneShotBuilder::new(app.clone(), (http::Method::GET, "/datas"))
            .with_query([("search", "temperature")])
            .send_empty()
            .await
            .expect_json::<Value>()
            .await;
        assert_eq!(
            json!([{
                "id": created["id"],
                "name": "Sensor",
                "price": created["price"],
                "createdAt": created["createdAt"]
            }]),
            listed
        );

        let all = OneShotBuilder::new(app.clone(), (http::Method::GET, "/datas/all"))
            .send_empty()
            .await
            .expect_json::<Value>()
            .await;
        assert_eq!(json!([created]), all);

        let updated = OneShotBuilder::new(app.clone(), (http::Method::PATCH, &uri))
            .send_json(json!({"description": null}))
            .await
            .expect_json::<Value>()
            .await;
        assert!(updated.get("description").is_none());

        OneShotBuilder::new(app.clone(), (http::Method::DELETE, &uri))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        let total = OneShotBuilder::new(app, (http::Method::GET, "/datas/total"))
            .send_empty()
            .await
            .expect_json::<Value>()
            .await;
        assert_eq!(json!({"total": 0}), total);
    }

    #[tokio::test]
    async fn test_no_comments() {
        let app = setup().await;

        let created = OneShotBuilder::new(app.clone(), (http::Method::POST, "/datas"))
            .send_json(json!({"name": "Sensor", "price": 5}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<Value>()
            .await;

        let uri = format!("/datas/{}/comments", created["id"].as_str().unwrap());
        let body = OneShotBuilder::new(app, (http::Method::GET, &uri))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .take_body_as_text()
            .await;
        assert!(body.is_empty());
    }
}
