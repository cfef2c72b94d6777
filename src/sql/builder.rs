//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for the books table.

use crate::model::{BookChanges, BookFilter, NewBook};
use uuid::Uuid;

/// Columns returned by every statement, in `Book` field order.
const BOOK_COLUMNS: &str = r#""id", "title", "author", "description", "genre", "created_at", "updated_at""#;

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Uuid(Uuid),
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlParam) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }

    /// `"col" = $n AND ...` for each set constraint, or `TRUE` when the filter is empty.
    fn where_clause(&mut self, filter: &BookFilter) -> String {
        let parts: Vec<String> = filter
            .pairs()
            .into_iter()
            .map(|(col, val)| {
                let n = self.push_param(SqlParam::Text(val.to_string()));
                format!("{} = ${}", quoted(col), n)
            })
            .collect();
        if parts.is_empty() {
            "TRUE".to_string()
        } else {
            parts.join(" AND ")
        }
    }

    /// `SET` list for the given changes; always refreshes `updated_at`.
    fn set_clause(&mut self, changes: &BookChanges) -> String {
        let mut sets = Vec::new();
        for (col, val) in [
            ("title", &changes.title),
            ("author", &changes.author),
            ("description", &changes.description),
            ("genre", &changes.genre),
        ] {
            if let Some(v) = val {
                let n = self.push_param(SqlParam::Text(v.clone()));
                sets.push(format!("{} = ${}", quoted(col), n));
            }
        }
        sets.push(r#""updated_at" = NOW()"#.to_string());
        sets.join(", ")
    }
}

/// SELECT matching rows in insertion order.
pub fn select_list(table: &str, filter: &BookFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = q.where_clause(filter);
    q.sql = format!(
        r#"SELECT {} FROM {} WHERE {} ORDER BY "seq""#,
        BOOK_COLUMNS, table, where_sql
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(table: &str, id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlParam::Uuid(id));
    q.sql = format!(r#"SELECT {} FROM {} WHERE "id" = ${}"#, BOOK_COLUMNS, table, n);
    q
}

/// INSERT one row; id and timestamps come from column defaults.
pub fn insert(table: &str, book: &NewBook) -> QueryBuf {
    let mut q = QueryBuf::new();
    let placeholders: Vec<String> = [&book.title, &book.author, &book.description, &book.genre]
        .into_iter()
        .map(|v| format!("${}", q.push_param(SqlParam::Text(v.clone()))))
        .collect();
    q.sql = format!(
        r#"INSERT INTO {} ("title", "author", "description", "genre") VALUES ({}) RETURNING {}"#,
        table,
        placeholders.join(", "),
        BOOK_COLUMNS
    );
    q
}

/// UPDATE by primary key.
pub fn update_by_id(table: &str, id: Uuid, changes: &BookChanges) -> QueryBuf {
    let mut q = QueryBuf::new();
    let set_sql = q.set_clause(changes);
    let n = q.push_param(SqlParam::Uuid(id));
    q.sql = format!(
        r#"UPDATE {} SET {} WHERE "id" = ${} RETURNING {}"#,
        table, set_sql, n, BOOK_COLUMNS
    );
    q
}

/// UPDATE the first row (by insertion order) matching the filter.
pub fn update_first_match(table: &str, filter: &BookFilter, changes: &BookChanges) -> QueryBuf {
    let mut q = QueryBuf::new();
    let set_sql = q.set_clause(changes);
    let where_sql = q.where_clause(filter);
    q.sql = format!(
        r#"UPDATE {t} SET {s} WHERE "id" = (SELECT "id" FROM {t} WHERE {w} ORDER BY "seq" LIMIT 1) RETURNING {c}"#,
        t = table,
        s = set_sql,
        w = where_sql,
        c = BOOK_COLUMNS
    );
    q
}

/// DELETE by primary key, returning the removed row.
pub fn delete_by_id(table: &str, id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlParam::Uuid(id));
    q.sql = format!(r#"DELETE FROM {} WHERE "id" = ${} RETURNING {}"#, table, n, BOOK_COLUMNS);
    q
}

pub fn delete_all(table: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("DELETE FROM {}", table);
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: &str = r#""public"."books""#;

    #[test]
    fn qualified_table_quotes_both_parts() {
        assert_eq!(qualified_table("public", "books"), T);
        assert_eq!(quoted(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn list_without_filter_selects_everything_in_order() {
        let q = select_list(T, &BookFilter::default());
        assert!(q.sql.contains("WHERE TRUE ORDER BY \"seq\""));
        assert!(q.params.is_empty());
    }

    #[test]
    fn list_filter_binds_each_constraint() {
        let f = BookFilter {
            author: Some("Le Guin".into()),
            genre: Some("fantasy".into()),
            ..Default::default()
        };
        let q = select_list(T, &f);
        assert!(q.sql.contains(r#""author" = $1 AND "genre" = $2"#));
        assert_eq!(
            q.params,
            vec![SqlParam::Text("Le Guin".into()), SqlParam::Text("fantasy".into())]
        );
    }

    #[test]
    fn update_numbers_set_params_before_id() {
        let id = Uuid::new_v4();
        let changes = BookChanges {
            genre: Some("classic".into()),
            ..Default::default()
        };
        let q = update_by_id(T, id, &changes);
        assert!(q.sql.contains(r#"SET "genre" = $1, "updated_at" = NOW() WHERE "id" = $2"#));
        assert_eq!(q.params[1], SqlParam::Uuid(id));
    }

    #[test]
    fn update_first_match_limits_to_one_row() {
        let changes = BookChanges {
            author: Some("X".into()),
            ..Default::default()
        };
        let q = update_first_match(T, &BookFilter::by_title("Dune"), &changes);
        assert!(q.sql.contains(r#"WHERE "title" = $2 ORDER BY "seq" LIMIT 1"#));
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn insert_binds_four_fields() {
        let q = insert(
            T,
            &NewBook {
                title: "a".into(),
                author: "b".into(),
                description: "c".into(),
                genre: "d".into(),
            },
        );
        assert!(q.sql.contains("VALUES ($1, $2, $3, $4)"));
        assert_eq!(q.params.len(), 4);
    }
}
