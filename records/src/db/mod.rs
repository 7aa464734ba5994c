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

//! Database abstractions to manipulate records and their comments.
//!
//! Every function takes the `Collection` the caller operates on and scopes all of its queries to
//! it, so that a record created in one collection cannot be observed or modified through another.

use crate::model::{Id, SortOrder};
#[cfg(feature = "postgres")]
use bazaar_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use bazaar_core::db::sqlite;
use bazaar_core::db::{DbError, DbResult, Executor};
use uuid::Uuid;

mod comments;
pub(crate) use comments::*;
mod records;
pub(crate) use records::*;


/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Interprets a client-provided identifier.
///
/// Identifiers that do not have the shape of the identifiers we generate cannot possibly match an
/// entity, so they are reported as `MalformedId` instead of being sent to the database.
pub(crate) fn parse_id(raw: &str) -> DbResult<Id> {
    match Uuid::try_parse(raw) {
        Ok(uuid) => Ok(Id::from(uuid)),
        Err(e) => Err(DbError::MalformedId(format!("'{}': {}", raw, e))),
    }
}

/// Validates that a write statement affecting the entity `id` only touched 1 row.
fn ensure_one_row(id: Id, affected: u64) -> DbResult<()> {
    match affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError(format!("Write of {} affected {} rows", id, affected))),
    }
}

/// Folds the case of `text` so that searches can match it case-insensitively.
///
/// The databases' own `lower()` functions cannot be relied upon for this because their handling
/// of non-ASCII text depends on the backend and its locale.
fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Converts a pagination quantity into the signed type that the databases expect, clamping values
/// that are too large to represent.
fn as_sql_count(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Converts a row count returned by the database into an unsigned quantity.
fn from_sql_count(n: i64) -> DbResult<u64> {
    u64::try_from(n).map_err(|e| DbError::DataIntegrityError(format!("Invalid count {}: {}", n, e)))
}

/// Returns the `ORDER BY` clause for `order` on PostgreSQL, given the `created` column name.
#[cfg(feature = "postgres")]
fn postgres_order_by(order: SortOrder, created: &str) -> String {
    match order {
        SortOrder::Natural => String::new(),
        SortOrder::Recent => format!("ORDER BY {} DESC", created),
        SortOrder::Oldest => format!("ORDER BY {} ASC", created),
    }
}

/// Returns the `ORDER BY` clause for `order` on SQLite, given the prefix of the `created` columns.
#[cfg(any(feature = "sqlite", test))]
fn sqlite_order_by(order: SortOrder, prefix: &str) -> String {
    match order {
        SortOrder::Natural => String::new(),
        SortOrder::Recent => {
            format!("ORDER BY {0}created_sec DESC, {0}created_nsec DESC", prefix)
        }
        SortOrder::Oldest => format!("ORDER BY {0}created_sec ASC, {0}created_nsec ASC", prefix),
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_parse_id_ok() {
        let id = parse_id("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!("67e55044-10b1-426f-9247-bb680e5fe0c8", id.to_string());
    }

    #[test]
    fn test_parse_id_malformed() {
        for raw in ["", "not-a-valid-id-shape", "67e55044-10b1-426f-9247-bb680e5fe0c"] {
            match parse_id(raw) {
                Err(DbError::MalformedId(_)) => (),
                e => panic!("Must have failed with MalformedId but got: {:?}", e),
            }
        }
    }

    #[test]
    fn test_fold_case() {
        assert_eq!("blue widget", fold_case("Blue WIDGET"));
        assert_eq!("école", fold_case("ÉCOLE"));
        assert_eq!("straße ω", fold_case("STRAßE Ω"));
    }

    #[test]
    fn test_as_sql_count_clamps() {
        assert_eq!(10, as_sql_count(10));
        assert_eq!(i64::MAX, as_sql_count(u64::MAX));
    }

    #[test]
    fn test_sqlite_order_by() {
        assert_eq!("", sqlite_order_by(SortOrder::Natural, ""));
        assert_eq!(
            "ORDER BY c.created_sec DESC, c.created_nsec DESC",
            sqlite_order_by(SortOrder::Recent, "c.")
        );
        assert_eq!(
            "ORDER BY created_sec ASC, created_nsec ASC",
            sqlite_order_by(SortOrder::Oldest, "")
        );
    }
}
