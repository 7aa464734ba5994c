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

//! Market service: articles and products, each with their own comments.

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
use bazaar_records::rest::{app_with_comments, cors};
use log::{info, warn};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Collections served by this service.
const COLLECTIONS: &[&str] = &["articles", "products"];

/// Creates the router for the application, backed by `db` and stamping new entities with `clock`.
pub fn app(
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<dyn Clock + Send + Sync>,
) -> ModelResult<Router> {
    let mut router = Router::new();
    for name in COLLECTIONS {
        let driver = RecordsDriver::new(db.clone(), clock.clone(), Collection::new(*name)?);
        router = router.merge(app_with_comments(driver));
    }
    Ok(router.layer(cors()))
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
