//! Request body extractor that parses JSON and runs `validator` rules.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use streamshelf_core::error::CoreError;
use validator::Validate;

use crate::error::AppError;

/// `Json<T>` that also calls [`Validate::validate`] before the handler runs.
///
/// Malformed or unknown-shaped bodies are rejected with `BAD_REQUEST`; rule
/// violations with `VALIDATION_ERROR`. Both use the standard error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::Core(CoreError::Validation(errors.to_string())))?;

        Ok(ValidatedJson(value))
    }
}
