use super::request::ActionInput;
use crate::error::{AppError, Result};
use crate::services::auth_service::LoginRequest;
use crate::services::user_service::RegisterRequest;
use crate::AppState;
use axum::Json;
use serde_json::{json, Value};
use tower_sessions::Session;

pub async fn register(state: &AppState, input: &ActionInput) -> Result<Json<Value>> {
    let request = RegisterRequest {
        name: input.text("name").unwrap_or_default(),
        email: input.text("email").unwrap_or_default(),
        password: input.raw("password").unwrap_or_default(),
        phone: input.text("phone").unwrap_or_default(),
        location: input.text("location").unwrap_or_default(),
    };

    state.user_service.register(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Registration successful!",
    })))
}

pub async fn login(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    let (Some(email), Some(password)) = (input.text("email"), input.raw("password")) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let user = state
        .auth_service
        .login(session, LoginRequest { email, password })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Login successful!",
        "user": user,
    })))
}

pub async fn logout(state: &AppState, session: &Session) -> Result<Json<Value>> {
    state.auth_service.logout(session).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Logout successful",
    })))
}
