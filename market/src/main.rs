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

//! Entry point to the market service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use bazaar_core::clocks::SystemClock;
use bazaar_core::db::{Db, connect_from_env};
use bazaar_core::env::{get_var, load_dotenv};
use bazaar_market::serve;
use bazaar_records::db::init_schema;
use log::{debug, error, warn};
use std::error::Error;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Port to listen on when `PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Gathers the configuration from the environment and runs the service until interrupted.
async fn run() -> Result<(), Box<dyn Error>> {
    let port = get_var::<u16>("PORT")?.unwrap_or(DEFAULT_PORT);
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let db: Arc<dyn Db + Send + Sync> = Arc::from(connect_from_env("DATABASE").await?);
    init_schema(&mut db.ex().await?).await?;

    serve(addr, db, Arc::new(SystemClock::default())).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let dotenv = load_dotenv(None);
    env_logger::init();
    match dotenv {
        Ok(Some(path)) => debug!("Loaded environment from {}", path.display()),
        Ok(None) => (),
        Err(e) => warn!("{}; continuing without it", e),
    }

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
