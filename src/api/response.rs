use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: String,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
}

pub type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

fn reply<T: Serialize>(status: StatusCode, data: Option<T>, message: Option<String>) -> Reply<T> {
    let meta = ResponseMeta {
        status: if status.is_success() { "success" } else { "error" }.to_string(),
        status_code: status.as_u16(),
        timestamp: Utc::now().to_rfc3339(),
        message,
    };

    (status, Json(ApiResponse { data, meta }))
}

pub fn success<T: Serialize>(data: T) -> Reply<T> {
    reply(StatusCode::OK, Some(data), None)
}

/// Error envelope that still carries the resulting state, when there is one.
pub fn error<T: Serialize>(status: StatusCode, data: Option<T>, message: String) -> Reply<T> {
    reply(status, data, Some(message))
}
