use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::model::salary::Period;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid period {mes}/{anio}: month must be between 1 and 12")]
    InvalidPeriod { mes: u8, anio: u16 },

    #[error("Roster fetch for {0} was superseded by a newer request")]
    Superseded(Period),

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidPeriod { .. } | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Superseded(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Persistence(e) => {
                tracing::error!(error = %e, "Persistence failure");
                "Something went wrong, Contact with system admin".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(
            AppError::InvalidPeriod { mes: 13, anio: 2026 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Superseded(Period { mes: 1, anio: 2026 }).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::NotFound("Expense".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Persistence(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(AppError::NotFound("Arreglo".into()).to_string(), "Arreglo not found");
    }
}
