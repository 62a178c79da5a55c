/**
 * Error Conversion
 *
 * `IntoResponse` for `ApiError`, so handlers can return
 * `Result<Json<T>, ApiError>` directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "board not found",
 *   "status": 404
 * }
 * ```
 */
use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if let ApiError::Database(ref err) = self {
            tracing::error!("record store failure: {:?}", err);
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Internal Server Error"))
                    .unwrap()
            })
    }
}
