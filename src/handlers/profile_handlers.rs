use super::request::ActionInput;
use crate::error::Result;
use crate::services::user_service::ProfileUpdate;
use crate::AppState;
use axum::Json;
use serde_json::{json, Value};
use tower_sessions::Session;

pub(crate) fn profile_update(input: &ActionInput) -> ProfileUpdate {
    ProfileUpdate {
        name: input.text("name"),
        phone: input.text("phone"),
        location: input.text("location"),
        password: input.raw("password"),
    }
}

pub async fn update_profile(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    let current = state.auth_service.require_session(session).await?;

    let user = state
        .user_service
        .update_profile(current.user_id, profile_update(input))
        .await?;
    state.auth_service.refresh_session(session, &user).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully!",
    })))
}

pub async fn delete_account(state: &AppState, session: &Session) -> Result<Json<Value>> {
    let current = state.auth_service.require_session(session).await?;

    state.user_service.delete_account(current.user_id).await?;
    state.auth_service.logout(session).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Account deleted successfully!",
    })))
}
