use axum::{
    Extension, Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::extract::JsonBody;
use super::{ApiError, AppState, MessageResponse, RedirectResponse};
use crate::constants::{redirects, session as keys};
use crate::domain::SessionContext;
use crate::services::AccountError;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub pass: Option<String>,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub pass: Option<String>,
    #[serde(default)]
    pub pass2: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => ApiError::ValidationError(msg),
            AccountError::Entitlement(e) => ApiError::ValidationError(e.to_string()),
            e @ (AccountError::InvalidCredentials | AccountError::WrongPassword) => {
                ApiError::Unauthorized(e.to_string())
            }
            e @ AccountError::NotFound => ApiError::NotFound(e.to_string()),
            e @ AccountError::UsernameTaken => ApiError::Conflict(e.to_string()),
            AccountError::Database(msg) => ApiError::DatabaseError(msg),
            AccountError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

// ============================================================================
// Session helpers
// ============================================================================

pub async fn current_account(session: &Session) -> Result<Option<SessionContext>, ApiError> {
    Ok(session.get::<SessionContext>(keys::ACCOUNT_KEY).await?)
}

/// Writes the snapshot under a fresh session id.
async fn start_session(session: &Session, context: &SessionContext) -> Result<(), ApiError> {
    session.cycle_id().await?;
    store_account(session, context).await
}

pub async fn store_account(session: &Session, context: &SessionContext) -> Result<(), ApiError> {
    session.insert(keys::ACCOUNT_KEY, context).await?;
    Ok(())
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a logged-in session and hands the snapshot to
/// handlers as `Extension<SessionContext>`.
pub async fn require_login(session: Session, mut request: Request, next: Next) -> Response {
    match current_account(&session).await {
        Ok(Some(context)) => {
            tracing::Span::current().record("account_id", context.account_id.value());
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Ok(None) => ApiError::unauthorized("You must be logged in").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Sends already logged-in clients to the tracker instead of running the handler.
pub async fn require_logout(session: Session, request: Request, next: Next) -> Response {
    match current_account(&session).await {
        Ok(Some(_)) => Redirect::to(redirects::TRACKER).into_response(),
        Ok(None) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<RedirectResponse>, ApiError> {
    let account = state
        .account_service()
        .login(
            payload.username.as_deref().unwrap_or_default(),
            payload.pass.as_deref().unwrap_or_default(),
        )
        .await?;

    start_session(&session, &account.session()).await?;
    tracing::info!(account_id = %account.id, "Logged in: {}", account.username);

    Ok(Json(RedirectResponse {
        redirect: redirects::TRACKER,
    }))
}

/// POST /signup
/// Creates the account and logs it in.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    session: Session,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> Result<Json<RedirectResponse>, ApiError> {
    let account = state
        .account_service()
        .signup(
            payload.username.as_deref().unwrap_or_default(),
            payload.pass.as_deref().unwrap_or_default(),
            payload.pass2.as_deref().unwrap_or_default(),
        )
        .await?;

    start_session(&session, &account.session()).await?;

    Ok(Json(RedirectResponse {
        redirect: redirects::TRACKER,
    }))
}

/// GET /logout
pub async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = session.flush().await {
        tracing::warn!("Failed to destroy session: {e}");
    }
    Redirect::to(redirects::HOME)
}

/// POST /changePassword
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    JsonBody(payload): JsonBody<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .account_service()
        .change_password(
            &context,
            payload.current_password.as_deref().unwrap_or_default(),
            payload.new_password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
