//! Standard response envelope helpers: `{success, data?, count?, message?, error?}`.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    pub error: &'static str,
}

pub type EnvelopeResponse<T> = (StatusCode, Json<Envelope<T>>);

pub fn success_one<T: Serialize>(data: T) -> EnvelopeResponse<T> {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            count: None,
            data: Some(data),
            message: None,
        }),
    )
}

pub fn success_created<T: Serialize>(data: T) -> EnvelopeResponse<T> {
    let (_, body) = success_one(data);
    (StatusCode::CREATED, body)
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> EnvelopeResponse<Vec<T>> {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            count: Some(count),
            data: Some(data),
            message: None,
        }),
    )
}

/// Success with a message and no data, e.g. after a delete.
pub fn success_message(message: impl Into<String>, count: Option<u64>) -> EnvelopeResponse<()> {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            count,
            data: None,
            message: Some(message.into()),
        }),
    )
}
