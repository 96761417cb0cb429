use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::store_account;
use super::extract::JsonBody;
use super::{ApiError, AppState, ProfileResponse, PurchaseResponse};
use crate::domain::SessionContext;

#[derive(Deserialize)]
pub struct PurchaseRequest {
    #[serde(default)]
    pub amount: Option<i64>,
}

/// GET /profile
/// Answers from the session snapshot.
pub async fn get_profile(Extension(context): Extension<SessionContext>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        is_premium: context.is_premium(),
        premium_credits: context.premium_credits(),
        username: context.username,
    })
}

/// POST /purchaseCredits
pub async fn purchase_credits(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    session: Session,
    JsonBody(payload): JsonBody<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let updated = state
        .account_service()
        .purchase_credits(&context, payload.amount.unwrap_or(0))
        .await?;

    store_account(&session, &updated).await?;

    Ok(Json(PurchaseResponse {
        message: "Credits purchased successfully".to_string(),
        premium_credits: updated.premium_credits(),
        is_premium: updated.is_premium(),
    }))
}
