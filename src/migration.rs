//! Bootstrap the books table: schema, table, ordering column, and the optional unique title index.
//! Every statement is idempotent so this runs on each startup.

use crate::error::AppError;
use crate::sql::{qualified_table, quoted};
use sqlx::PgPool;

pub const BOOKS_TABLE: &str = "books";

pub async fn apply_migrations(pool: &PgPool, schema: &str, unique_titles: bool) -> Result<(), AppError> {
    let table = qualified_table(schema, BOOKS_TABLE);

    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)))
        .execute(pool)
        .await?;

    // gen_random_uuid() is built in from PostgreSQL 13.
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            "seq" BIGSERIAL NOT NULL,
            "title" TEXT NOT NULL CHECK (length(btrim("title")) > 0),
            "author" TEXT NOT NULL,
            "description" TEXT NOT NULL,
            "genre" TEXT NOT NULL,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        table
    );
    sqlx::query(&ddl).execute(pool).await?;

    sqlx::query(&format!(
        r#"CREATE INDEX IF NOT EXISTS "books_seq_idx" ON {} ("seq")"#,
        table
    ))
    .execute(pool)
    .await?;

    if unique_titles {
        // Fails if duplicate titles are already stored.
        sqlx::query(&format!(
            r#"CREATE UNIQUE INDEX IF NOT EXISTS "books_title_key" ON {} ("title")"#,
            table
        ))
        .execute(pool)
        .await?;
    } else {
        sqlx::query(&format!(
            r#"DROP INDEX IF EXISTS {}."books_title_key""#,
            quoted(schema)
        ))
        .execute(pool)
        .await?;
    }

    tracing::info!(table = %table, unique_titles, "books table ready");
    Ok(())
}
