use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::FromRequest;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// The JSON shape every API failure takes: a single human-readable message under "error"
#[derive(Serialize, Debug, ToSchema)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct BasicErrorResponse {
    #[schema(example = "Title is required")]
    pub error: String,
}

/// Response type that turns a domain validation failure into a 400 carrying the
/// rule's message. The boundary never restates validation rules; it just forwards
/// what the domain declared.
pub struct ValidationErrorResponse(pub String);

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(BasicErrorResponse { error: self.0 }),
        )
            .into_response()
    }
}

/// Response type for requests addressing a todo that doesn't exist
pub struct NotFoundErrorResponse;

impl IntoResponse for NotFoundErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(BasicErrorResponse {
                error: "Todo not found".to_owned(),
            }),
        )
            .into_response()
    }
}

/// Response type for unexpected failures. The cause chain is logged server-side;
/// the client only ever sees the fixed per-operation message.
pub struct GenericErrorResponse {
    pub client_message: &'static str,
    pub cause: anyhow::Error,
}

impl GenericErrorResponse {
    pub fn new(client_message: &'static str, cause: anyhow::Error) -> Self {
        GenericErrorResponse {
            client_message,
            cause,
        }
    }
}

impl IntoResponse for GenericErrorResponse {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.cause);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(BasicErrorResponse {
                error: self.client_message.to_owned(),
            }),
        )
            .into_response()
    }
}

/// Wrapper for [axum::Json] which customizes the rejection to use our error shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse {
                error: format!("Malformed request body: {}", self.parse_problem),
            }),
        )
            .into_response()
    }
}
