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

//! Database operations on records.

#[cfg(feature = "postgres")]
use crate::db::postgres_order_by;
#[cfg(any(feature = "sqlite", test))]
use crate::db::sqlite_order_by;
use crate::db::{as_sql_count, ensure_one_row, fold_case, from_sql_count};
use crate::model::*;
use bazaar_core::db::{DbError, DbResult, Executor};
#[cfg(feature = "postgres")]
use bazaar_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use bazaar_core::db::sqlite;
use futures::TryStreamExt;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use time::OffsetDateTime;
use uuid::Uuid;

/// Columns to fetch to build a full `Record` on PostgreSQL.
#[cfg(feature = "postgres")]
const POSTGRES_RECORD_COLUMNS: &str = "id, name, description, price, tags, created";

/// Columns to fetch to build a full `Record` on SQLite.
#[cfg(any(feature = "sqlite", test))]
const SQLITE_RECORD_COLUMNS: &str =
    "id, name, description, price, tags, created_sec, created_nsec";

/// Builds a `Record` out of a PostgreSQL row.
#[cfg(feature = "postgres")]
fn record_from_postgres(row: PgRow) -> DbResult<Record> {
    let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
    let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
    let description: Option<String> =
        row.try_get("description").map_err(postgres::map_sqlx_error)?;
    let price: f64 = row.try_get("price").map_err(postgres::map_sqlx_error)?;
    let tags: Vec<String> = row.try_get("tags").map_err(postgres::map_sqlx_error)?;
    let created: OffsetDateTime = row.try_get("created").map_err(postgres::map_sqlx_error)?;

    Ok(Record::new(
        Id::from(id),
        RecordName::new(name)?,
        description,
        Price::new(price)?,
        tags,
        created,
    ))
}

/// Builds a `Record` out of a SQLite row.
#[cfg(any(feature = "sqlite", test))]
fn record_from_sqlite(row: SqliteRow) -> DbResult<Record> {
    let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
    let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
    let description: Option<String> =
        row.try_get("description").map_err(sqlite::map_sqlx_error)?;
    let price: f64 = row.try_get("price").map_err(sqlite::map_sqlx_error)?;
    let tags: String = row.try_get("tags").map_err(sqlite::map_sqlx_error)?;
    let created_sec: i64 = row.try_get("created_sec").map_err(sqlite::map_sqlx_error)?;
    let created_nsec: i64 = row.try_get("created_nsec").map_err(sqlite::map_sqlx_error)?;

    let tags: Vec<String> = serde_json::from_str(&tags).map_err(|e| {
        DbError::DataIntegrityError(format!("Invalid tags for record {}: {}", id, e))
    })?;

    Ok(Record::new(
        Id::from(id),
        RecordName::new(name)?,
        description,
        Price::new(price)?,
        tags,
        sqlite::build_timestamp(created_sec, created_nsec)?,
    ))
}

/// Serializes `tags` for storage in SQLite.
#[cfg(any(feature = "sqlite", test))]
fn tags_to_sqlite(tags: &[String]) -> DbResult<String> {
    serde_json::to_string(tags)
        .map_err(|e| DbError::BackendError(format!("Cannot serialize tags for storage: {}", e)))
}

/// Stores a new record in `collection` built from `fields` and created at `created`.
///
/// The identifier of the new record is assigned here.
pub(crate) async fn create_record(
    ex: &mut Executor,
    collection: Collection,
    fields: RecordFields,
    created: OffsetDateTime,
) -> DbResult<Record> {
    let record = Record::from_fields(Id::new_random(), fields, created);

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO records
                    (id, collection, name, description, price, tags, created,
                    folded_name, folded_description)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ";
            sqlx::query(query_str)
                .bind(record.id().as_uuid())
                .bind(collection.as_str())
                .bind(record.name().as_str())
                .bind(record.description().as_deref())
                .bind(record.price().as_f64())
                .bind(record.tags())
                .bind(record.created_at())
                .bind(fold_case(record.name().as_str()))
                .bind(record.description().as_deref().map(fold_case))
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (created_sec, created_nsec) = sqlite::unpack_timestamp(*record.created_at())?;
            let tags = tags_to_sqlite(record.tags())?;

            let query_str = "
                INSERT INTO records
                    (id, collection, name, description, price, tags, created_sec, created_nsec,
                    folded_name, folded_description)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ";
            sqlx::query(query_str)
                .bind(record.id().as_uuid())
                .bind(collection.as_str())
                .bind(record.name().as_str())
                .bind(record.description().as_deref())
                .bind(record.price().as_f64())
                .bind(tags)
                .bind(created_sec)
                .bind(created_nsec)
                .bind(fold_case(record.name().as_str()))
                .bind(record.description().as_deref().map(fold_case))
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    if rows_affected != 1 {
        return Err(DbError::BackendError(format!("Insert created {} rows", rows_affected)));
    }
    Ok(record)
}

/// Gets the record `id` from `collection`.
pub(crate) async fn get_record(
    ex: &mut Executor,
    collection: Collection,
    id: Id,
) -> DbResult<Record> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!(
                "SELECT {} FROM records WHERE id = $1 AND collection = $2",
                POSTGRES_RECORD_COLUMNS
            );
            let row = sqlx::query(&query_str)
                .bind(id.as_uuid())
                .bind(collection.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            record_from_postgres(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = format!(
                "SELECT {} FROM records WHERE id = ? AND collection = ?",
                SQLITE_RECORD_COLUMNS
            );
            let row = sqlx::query(&query_str)
                .bind(id.as_uuid())
                .bind(collection.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            record_from_sqlite(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the summaries of the records in `collection` that match `query`.
pub(crate) async fn get_records(
    ex: &mut Executor,
    collection: Collection,
    query: &ListQuery,
) -> DbResult<Vec<RecordSummary>> {
    let mut summaries = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!(
                "
                SELECT id, name, price, created
                FROM records
                WHERE collection = $1 AND (
                    $2::TEXT IS NULL
                    OR strpos(folded_name, $2) > 0
                    OR strpos(COALESCE(folded_description, ''), $2) > 0
                )
                {}
                LIMIT $3 OFFSET $4
                ",
                postgres_order_by(query.order, "created")
            );
            let mut rows = sqlx::query(&query_str)
                .bind(collection.as_str())
                .bind(query.search.as_deref().map(fold_case))
                .bind(as_sql_count(query.limit))
                .bind(as_sql_count(query.offset))
                .fetch(&mut **ex);

            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
                let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
                let price: f64 = row.try_get("price").map_err(postgres::map_sqlx_error)?;
                let created: OffsetDateTime =
                    row.try_get("created").map_err(postgres::map_sqlx_error)?;

                summaries.push(RecordSummary {
                    id: Id::from(id),
                    name: RecordName::new(name)?,
                    price: Price::new(price)?,
                    created_at: created,
                });
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = format!(
                "
                SELECT id, name, price, created_sec, created_nsec
                FROM records
                WHERE collection = ?1 AND (
                    ?2 IS NULL
                    OR instr(folded_name, ?2) > 0
                    OR instr(COALESCE(folded_description, ''), ?2) > 0
                )
                {}
                LIMIT ?3 OFFSET ?4
                ",
                sqlite_order_by(query.order, "")
            );
            let mut rows = sqlx::query(&query_str)
                .bind(collection.as_str())
                .bind(query.search.as_deref().map(fold_case))
                .bind(as_sql_count(query.limit))
                .bind(as_sql_count(query.offset))
                .fetch(&mut **ex);

            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
                let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
                let price: f64 = row.try_get("price").map_err(sqlite::map_sqlx_error)?;
                let created_sec: i64 = row.try_get("created_sec").map_err(sqlite::map_sqlx_error)?;
                let created_nsec: i64 =
                    row.try_get("created_nsec").map_err(sqlite::map_sqlx_error)?;

                summaries.push(RecordSummary {
                    id: Id::from(id),
                    name: RecordName::new(name)?,
                    price: Price::new(price)?,
                    created_at: sqlite::build_timestamp(created_sec, created_nsec)?,
                });
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(summaries)
}

/// Gets all records in `collection` without any filtering nor pagination.
pub(crate) async fn get_all_records(
    ex: &mut Executor,
    collection: Collection,
) -> DbResult<Vec<Record>> {
    let mut records = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                format!("SELECT {} FROM records WHERE collection = $1", POSTGRES_RECORD_COLUMNS);
            let mut rows = sqlx::query(&query_str).bind(collection.as_str()).fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                records.push(record_from_postgres(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str =
                format!("SELECT {} FROM records WHERE collection = ?", SQLITE_RECORD_COLUMNS);
            let mut rows = sqlx::query(&query_str).bind(collection.as_str()).fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                records.push(record_from_sqlite(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(records)
}

/// Counts the records in `collection`.
pub(crate) async fn count_records(ex: &mut Executor, collection: Collection) -> DbResult<u64> {
    let total: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS total FROM records WHERE collection = $1";
            let row = sqlx::query(query_str)
                .bind(collection.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("total").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS total FROM records WHERE collection = ?";
            let row = sqlx::query(query_str)
                .bind(collection.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("total").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    from_sql_count(total)
}

/// Overwrites the mutable fields of the stored copy of `record` in `collection`.
pub(crate) async fn update_record(
    ex: &mut Executor,
    collection: Collection,
    record: &Record,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE records
                SET name = $1, description = $2, price = $3, tags = $4,
                    folded_name = $5, folded_description = $6
                WHERE id = $7 AND collection = $8
            ";
            sqlx::query(query_str)
                .bind(record.name().as_str())
                .bind(record.description().as_deref())
                .bind(record.price().as_f64())
                .bind(record.tags())
                .bind(fold_case(record.name().as_str()))
                .bind(record.description().as_deref().map(fold_case))
                .bind(record.id().as_uuid())
                .bind(collection.as_str())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let tags = tags_to_sqlite(record.tags())?;

            let query_str = "
                UPDATE records
                SET name = ?, description = ?, price = ?, tags = ?,
                    folded_name = ?, folded_description = ?
                WHERE id = ? AND collection = ?
            ";
            sqlx::query(query_str)
                .bind(record.name().as_str())
                .bind(record.description().as_deref())
                .bind(record.price().as_f64())
                .bind(tags)
                .bind(fold_case(record.name().as_str()))
                .bind(record.description().as_deref().map(fold_case))
                .bind(record.id().as_uuid())
                .bind(collection.as_str())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(*record.id(), rows_affected)
}

/// Deletes the record `id` from `collection` along with all of its comments.
pub(crate) async fn delete_record(
    ex: &mut Executor,
    collection: Collection,
    id: Id,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM records WHERE id = $1 AND collection = $2";
            sqlx::query(query_str)
                .bind(id.as_uuid())
                .bind(collection.as_str())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM records WHERE id = ? AND collection = ?";
            sqlx::query(query_str)
                .bind(id.as_uuid())
                .bind(collection.as_str())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(id, rows_affected)
}
