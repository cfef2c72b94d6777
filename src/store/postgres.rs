//! PostgreSQL-backed book store.

use super::{require_title, BookStore};
use crate::error::AppError;
use crate::migration::{apply_migrations, BOOKS_TABLE};
use crate::model::{Book, BookChanges, BookFilter, NewBook};
use crate::sql::{self, qualified_table, QueryBuf, SqlParam};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use uuid::Uuid;

pub struct PgBookStore {
    pool: PgPool,
    table: String,
}

impl PgBookStore {
    /// Wrap an existing pool; the table must already exist.
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgBookStore {
            pool,
            table: qualified_table(schema, BOOKS_TABLE),
        }
    }

    /// Create the table (and unique title index when asked) if missing, then wrap the pool.
    pub async fn bootstrap(pool: PgPool, schema: &str, unique_titles: bool) -> Result<Self, AppError> {
        apply_migrations(&pool, schema, unique_titles).await?;
        Ok(Self::new(pool, schema))
    }

    fn bind_all<'q>(q: &'q QueryBuf) -> QueryAs<'q, Postgres, Book, PgArguments> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, Book>(&q.sql);
        for p in &q.params {
            query = match p {
                SqlParam::Text(s) => query.bind(s.as_str()),
                SqlParam::Uuid(u) => query.bind(*u),
            };
        }
        query
    }

    async fn fetch_one_opt(&self, q: &QueryBuf) -> Result<Option<Book>, AppError> {
        Ok(Self::bind_all(q).fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn create(&self, book: NewBook) -> Result<Book, AppError> {
        require_title(&book.title)?;
        let q = sql::insert(&self.table, &book);
        // Duplicate titles surface as unique violations and map to Conflict.
        Ok(Self::bind_all(&q).fetch_one(&self.pool).await?)
    }

    async fn find_all(&self, filter: &BookFilter) -> Result<Vec<Book>, AppError> {
        let q = sql::select_list(&self.table, filter);
        Ok(Self::bind_all(&q).fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, AppError> {
        self.fetch_one_opt(&sql::select_by_id(&self.table, id)).await
    }

    async fn update_by_id(&self, id: Uuid, changes: &BookChanges) -> Result<Option<Book>, AppError> {
        if let Some(ref t) = changes.title {
            require_title(t)?;
        }
        self.fetch_one_opt(&sql::update_by_id(&self.table, id, changes)).await
    }

    async fn update_by_filter(&self, filter: &BookFilter, changes: &BookChanges) -> Result<Option<Book>, AppError> {
        if let Some(ref t) = changes.title {
            require_title(t)?;
        }
        self.fetch_one_opt(&sql::update_first_match(&self.table, filter, changes))
            .await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Book>, AppError> {
        self.fetch_one_opt(&sql::delete_by_id(&self.table, id)).await
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let q = sql::delete_all(&self.table);
        tracing::debug!(sql = %q.sql, "query");
        let done = sqlx::query(&q.sql).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Create the target database if it does not exist, connecting through the `postgres` maintenance DB.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Storage(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| AppError::Storage("DATABASE_URL: no database path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name_from_url() {
        let (admin, name) = parse_db_name_from_url("postgres://u:p@localhost:5432/bookshelf?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "bookshelf");
    }

    #[test]
    fn url_without_path_is_an_error() {
        assert!(parse_db_name_from_url("postgres://localhost").is_err());
    }
}
