use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::usecases::contracts::ContractError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

fn status_code(err: &ContractError) -> StatusCode {
    match err {
        ContractError::AlreadySubscribed
        | ContractError::NoActiveContract
        | ContractError::RenewalNotAllowed(_) => StatusCode::CONFLICT,
        ContractError::PlanNotFound => StatusCode::NOT_FOUND,
        ContractError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ContractError {
    fn into_response(self) -> Response {
        let status = status_code(&self);

        // Don't leak internal error detail to client
        let message = match self {
            ContractError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}
