//! Request validation against the configured policy.

use crate::config::{FieldRule, ValidationPolicy};
use crate::error::AppError;
use crate::model::{BookChanges, NewBook};
use serde_json::{Map, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create/replace body. Title is always required; the other fields follow
    /// the policy and are filled with their defaults when absent.
    pub fn validate_full(body: &Map<String, Value>, policy: &ValidationPolicy) -> Result<NewBook, AppError> {
        let title = string_field(body, "title")?
            .ok_or_else(|| AppError::Validation("title is required".into()))?;
        Ok(NewBook {
            title,
            author: apply_rule(body, "author", &policy.author)?,
            description: apply_rule(body, "description", &policy.description)?,
            genre: apply_rule(body, "genre", &policy.genre)?,
        })
    }

    /// Validate a full replace (PUT). All four fields are required whatever the policy,
    /// so a short body never resets stored values to defaults.
    pub fn validate_replace(body: &Map<String, Value>) -> Result<NewBook, AppError> {
        let required = |key: &str| {
            string_field(body, key)?.ok_or_else(|| AppError::Validation("Please add all the fields".into()))
        };
        Ok(NewBook {
            title: required("title")?,
            author: required("author")?,
            description: required("description")?,
            genre: required("genre")?,
        })
    }

    /// Validate only the fields present in body (for PATCH). Required is not enforced for
    /// missing fields, but a present field may not be blanked.
    pub fn validate_partial(body: &Map<String, Value>) -> Result<BookChanges, AppError> {
        Ok(BookChanges {
            title: string_field(body, "title")?,
            author: string_field(body, "author")?,
            description: string_field(body, "description")?,
            genre: string_field(body, "genre")?,
        })
    }

    /// Body for `PATCH /books`: `{title, newAuthor}`, both required.
    pub fn validate_author_change(body: &Map<String, Value>) -> Result<(String, String), AppError> {
        let title = string_field(body, "title")?;
        let author = string_field(body, "newAuthor")?;
        match (title, author) {
            (Some(t), Some(a)) => Ok((t, a)),
            (None, _) => Err(AppError::Validation("title is required".into())),
            (_, None) => Err(AppError::Validation("newAuthor is required".into())),
        }
    }
}

/// A present, non-null field must be a non-blank string. Null and absent both read as `None`.
fn string_field(body: &Map<String, Value>, key: &str) -> Result<Option<String>, AppError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(AppError::Validation(format!("{} must not be empty", key)))
        }
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(AppError::Validation(format!("{} must be a string", key))),
    }
}

fn apply_rule(body: &Map<String, Value>, key: &str, rule: &FieldRule) -> Result<String, AppError> {
    let is_blank = matches!(body.get(key), Some(Value::String(s)) if s.trim().is_empty());
    match rule {
        FieldRule::Required => {
            string_field(body, key)?.ok_or_else(|| AppError::Validation(format!("{} is required", key)))
        }
        FieldRule::Default(fallback) if is_blank => Ok(fallback.clone()),
        FieldRule::Default(fallback) => Ok(string_field(body, key)?.unwrap_or_else(|| fallback.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_AUTHOR, DEFAULT_GENRE};
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn title_is_always_required() {
        for policy in [ValidationPolicy::lenient(), ValidationPolicy::strict()] {
            let err = RequestValidator::validate_full(&obj(json!({"author": "x"})), &policy).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = RequestValidator::validate_full(&obj(json!({"title": "   "})), &ValidationPolicy::lenient())
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn lenient_fills_sentinels() {
        let b = RequestValidator::validate_full(&obj(json!({"title": "Dune", "author": ""})), &ValidationPolicy::lenient())
            .unwrap();
        assert_eq!(b.author, DEFAULT_AUTHOR);
        assert_eq!(b.genre, DEFAULT_GENRE);
    }

    #[test]
    fn strict_requires_every_field() {
        let body = obj(json!({"title": "Dune", "author": "Herbert", "description": "spice"}));
        let err = RequestValidator::validate_full(&body, &ValidationPolicy::strict()).unwrap_err();
        assert_eq!(err.to_string(), "genre is required");
    }

    #[test]
    fn replace_requires_all_fields_even_when_lenient() {
        let err = RequestValidator::validate_replace(&obj(json!({"title": "Solaris"}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let b = RequestValidator::validate_replace(&obj(json!({
            "title": "Solaris", "author": "Lem", "description": "ocean", "genre": "sci-fi"
        })))
        .unwrap();
        assert_eq!(b.genre, "sci-fi");
    }

    #[test]
    fn non_string_fields_are_rejected() {
        let err = RequestValidator::validate_partial(&obj(json!({"genre": 7}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn partial_ignores_unknown_keys() {
        let c = RequestValidator::validate_partial(&obj(json!({"genre": "horror", "rating": 5}))).unwrap();
        assert_eq!(c.genre.as_deref(), Some("horror"));
        assert!(c.title.is_none());
    }

    #[test]
    fn author_change_needs_both_fields() {
        assert!(RequestValidator::validate_author_change(&obj(json!({"title": "Dune"}))).is_err());
        let (t, a) =
            RequestValidator::validate_author_change(&obj(json!({"title": "Dune", "newAuthor": "F. Herbert"})))
                .unwrap();
        assert_eq!((t.as_str(), a.as_str()), ("Dune", "F. Herbert"));
    }
}
