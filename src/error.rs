use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::usuarios::repo::RepoError;
use crate::usuarios::validation::ValidationErrors;

/// Request-level failure taxonomy. Everything a handler can return maps to
/// one of these, and each variant owns its HTTP status and JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("dados inválidos")]
    Validation(ValidationErrors),

    #[error("id de usuário inválido")]
    InvalidId,

    #[error("email já cadastrado")]
    DuplicateEmail,

    #[error("usuário não encontrado")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::DuplicateEmail => ApiError::DuplicateEmail,
            RepoError::Unavailable(e) => ApiError::Internal(e.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(erros) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Dados inválidos", "campos": erros.campos }),
            ),
            ApiError::InvalidId => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "ID do usuário inválido" }),
            ),
            ApiError::DuplicateEmail => (
                StatusCode::CONFLICT,
                json!({ "error": "Email já cadastrado no sistema" }),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Usuário não encontrado" }),
            ),
            ApiError::Internal(e) => {
                // Full detail stays in the logs; the client gets an opaque 500.
                error!(error = %e, "unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Erro interno do servidor" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
