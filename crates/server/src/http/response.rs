//! `{data: T}` success envelope. Errors serialize through `ApiError`'s own
//! `IntoResponse`, so handlers only ever wrap the happy path here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Serialize;

#[derive(Serialize)]
struct Envelope<T> {
    data: T,
}

pub fn ok<T: Serialize>(data: T) -> axum::response::Response {
    (StatusCode::OK, Json(Envelope { data })).into_response()
}

pub fn created<T: Serialize>(data: T) -> axum::response::Response {
    (StatusCode::CREATED, Json(Envelope { data })).into_response()
}

pub fn no_content() -> axum::response::Response {
    StatusCode::NO_CONTENT.into_response()
}
