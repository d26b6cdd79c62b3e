//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use streamshelf_core::error::CoreError;
use streamshelf_core::types::DbId;
use streamshelf_core::watch_progress::Viewer;
use streamshelf_db::repositories::ProfileRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The active profile claimed by the token, not yet checked for ownership.
    pub profile_id: Option<DbId>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            profile_id: claims.profile_id,
        })
    }
}

/// The authenticated user together with an active profile they own.
///
/// Rejects with a precondition failure when the token carries no profile or
/// names a profile belonging to a different account. Handlers that take
/// `CurrentViewer` never see an unverified profile id.
///
/// ```ignore
/// async fn my_handler(CurrentViewer(viewer): CurrentViewer) -> AppResult<Json<()>> {
///     tracing::info!(user_id = viewer.user_id, profile_id = viewer.profile_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentViewer(pub Viewer);

impl FromRequestParts<AppState> for CurrentViewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let profile_id = user.profile_id.ok_or_else(|| {
            AppError::Core(CoreError::PreconditionFailed(
                "No active profile selected".into(),
            ))
        })?;

        if ProfileRepo::find_owned(&state.pool, profile_id, user.user_id)
            .await?
            .is_none()
        {
            tracing::warn!(
                user_id = user.user_id,
                profile_id,
                "Token names a profile the user does not own",
            );
            return Err(AppError::Core(CoreError::PreconditionFailed(
                "Active profile does not belong to the authenticated user".into(),
            )));
        }

        Ok(CurrentViewer(Viewer {
            user_id: user.user_id,
            profile_id,
        }))
    }
}
