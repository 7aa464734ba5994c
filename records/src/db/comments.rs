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

//! Database operations on the comments attached to records.
//!
//! Comments are always addressed through their parent record and the collection the parent lives
//! in.  Operations on a comment whose parent does not match fail with `NotFound`.

#[cfg(feature = "postgres")]
use crate::db::postgres_order_by;
#[cfg(any(feature = "sqlite", test))]
use crate::db::sqlite_order_by;
use crate::db::{as_sql_count, ensure_one_row, fold_case};
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

/// Builds a `Comment` out of a PostgreSQL row.
#[cfg(feature = "postgres")]
fn comment_from_postgres(row: PgRow) -> DbResult<Comment> {
    let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
    let content: String = row.try_get("content").map_err(postgres::map_sqlx_error)?;
    let created: OffsetDateTime = row.try_get("created").map_err(postgres::map_sqlx_error)?;
    Ok(Comment::new(Id::from(id), CommentContent::new(content)?, created))
}

/// Builds a `Comment` out of a SQLite row.
#[cfg(any(feature = "sqlite", test))]
fn comment_from_sqlite(row: SqliteRow) -> DbResult<Comment> {
    let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
    let content: String = row.try_get("content").map_err(sqlite::map_sqlx_error)?;
    let created_sec: i64 = row.try_get("created_sec").map_err(sqlite::map_sqlx_error)?;
    let created_nsec: i64 = row.try_get("created_nsec").map_err(sqlite::map_sqlx_error)?;
    Ok(Comment::new(
        Id::from(id),
        CommentContent::new(content)?,
        sqlite::build_timestamp(created_sec, created_nsec)?,
    ))
}

/// Stores a new comment built from `fields` and created at `created` under the record
/// `record_id` of `collection`.
///
/// Fails with `NotFound` if the parent record does not exist in `collection`.
pub(crate) async fn create_comment(
    ex: &mut Executor,
    collection: Collection,
    record_id: Id,
    fields: CommentFields,
    created: OffsetDateTime,
) -> DbResult<Comment> {
    let comment = Comment::new(Id::new_random(), fields.content, created);

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO comments (id, record_id, content, created, folded_content)
                SELECT $1, id, $2, $3, $6 FROM records WHERE id = $4 AND collection = $5
            ";
            sqlx::query(query_str)
                .bind(comment.id().as_uuid())
                .bind(comment.content().as_str())
                .bind(comment.created_at())
                .bind(record_id.as_uuid())
                .bind(collection.as_str())
                .bind(fold_case(comment.content().as_str()))
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (created_sec, created_nsec) = sqlite::unpack_timestamp(*comment.created_at())?;

            let query_str = "
                INSERT INTO comments
                    (id, record_id, content, folded_content, created_sec, created_nsec)
                SELECT ?, id, ?, ?, ?, ? FROM records WHERE id = ? AND collection = ?
            ";
            sqlx::query(query_str)
                .bind(comment.id().as_uuid())
                .bind(comment.content().as_str())
                .bind(fold_case(comment.content().as_str()))
                .bind(created_sec)
                .bind(created_nsec)
                .bind(record_id.as_uuid())
                .bind(collection.as_str())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(comment),
        _ => Err(DbError::BackendError(format!("Insert created {} rows", rows_affected))),
    }
}

/// Gets the comment `id` attached to the record `record_id` of `collection`.
pub(crate) async fn get_comment(
    ex: &mut Executor,
    collection: Collection,
    record_id: Id,
    id: Id,
) -> DbResult<Comment> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT c.id, c.content, c.created
                FROM comments c JOIN records r ON c.record_id = r.id
                WHERE c.id = $1 AND r.id = $2 AND r.collection = $3
            ";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .bind(record_id.as_uuid())
                .bind(collection.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            comment_from_postgres(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT c.id, c.content, c.created_sec, c.created_nsec
                FROM comments c JOIN records r ON c.record_id = r.id
                WHERE c.id = ? AND r.id = ? AND r.collection = ?
            ";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .bind(record_id.as_uuid())
                .bind(collection.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            comment_from_sqlite(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the comments attached to the record `record_id` of `collection` that match `query`.
///
/// The search text in `query` applies to the content of the comments.  A parent record that does
/// not exist simply has no comments.
pub(crate) async fn get_comments(
    ex: &mut Executor,
    collection: Collection,
    record_id: Id,
    query: &ListQuery,
) -> DbResult<Vec<Comment>> {
    let mut comments = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!(
                "
                SELECT c.id, c.content, c.created
                FROM comments c JOIN records r ON c.record_id = r.id
                WHERE r.id = $1 AND r.collection = $2 AND (
                    $3::TEXT IS NULL OR strpos(c.folded_content, $3) > 0
                )
                {}
                LIMIT $4 OFFSET $5
                ",
                postgres_order_by(query.order, "c.created")
            );
            let mut rows = sqlx::query(&query_str)
                .bind(record_id.as_uuid())
                .bind(collection.as_str())
                .bind(query.search.as_deref().map(fold_case))
                .bind(as_sql_count(query.limit))
                .bind(as_sql_count(query.offset))
                .fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                comments.push(comment_from_postgres(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = format!(
                "
                SELECT c.id, c.content, c.created_sec, c.created_nsec
                FROM comments c JOIN records r ON c.record_id = r.id
                WHERE r.id = ?1 AND r.collection = ?2 AND (
                    ?3 IS NULL OR instr(c.folded_content, ?3) > 0
                )
                {}
                LIMIT ?4 OFFSET ?5
                ",
                sqlite_order_by(query.order, "c.")
            );
            let mut rows = sqlx::query(&query_str)
                .bind(record_id.as_uuid())
                .bind(collection.as_str())
                .bind(query.search.as_deref().map(fold_case))
                .bind(as_sql_count(query.limit))
                .bind(as_sql_count(query.offset))
                .fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                comments.push(comment_from_sqlite(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(comments)
}

/// Overwrites the content of the stored copy of `comment` attached to the record `record_id` of
/// `collection`.
pub(crate) async fn update_comment(
    ex: &mut Executor,
    collection: Collection,
    record_id: Id,
    comment: &Comment,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE comments SET content = $1, folded_content = $2
                WHERE id = $3 AND record_id IN (
                    SELECT id FROM records WHERE id = $4 AND collection = $5
                )
            ";
            sqlx::query(query_str)
                .bind(comment.content().as_str())
                .bind(fold_case(comment.content().as_str()))
                .bind(comment.id().as_uuid())
                .bind(record_id.as_uuid())
                .bind(collection.as_str())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE comments SET content = ?, folded_content = ?
                WHERE id = ? AND record_id IN (
                    SELECT id FROM records WHERE id = ? AND collection = ?
                )
            ";
            sqlx::query(query_str)
                .bind(comment.content().as_str())
                .bind(fold_case(comment.content().as_str()))
                .bind(comment.id().as_uuid())
                .bind(record_id.as_uuid())
                .bind(collection.as_str())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(*comment.id(), rows_affected)
}

/// Deletes the comment `id` attached to the record `record_id` of `collection`.
pub(crate) async fn delete_comment(
    ex: &mut Executor,
    collection: Collection,
    record_id: Id,
    id: Id,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                DELETE FROM comments
                WHERE id = $1 AND record_id IN (
                    SELECT id FROM records WHERE id = $2 AND collection = $3
                )
            ";
            sqlx::query(query_str)
                .bind(id.as_uuid())
                .bind(record_id.as_uuid())
                .bind(collection.as_str())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                DELETE FROM comments
                WHERE id = ? AND record_id IN (
                    SELECT id FROM records WHERE id = ? AND collection = ?
                )
            ";
            sqlx::query(query_str)
                .bind(id.as_uuid())
                .bind(record_id.as_uuid())
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
