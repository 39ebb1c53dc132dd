use super::profile_handlers::profile_update;
use super::request::ActionInput;
use crate::error::{AppError, Result};
use crate::models::{SortDirection, UserOrder, UserQuery};
use crate::AppState;
use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tower_sessions::Session;

pub async fn get_admin_statistics(state: &AppState, session: &Session) -> Result<Json<Value>> {
    state.auth_service.require_admin(session).await?;
    let stats = state.admin_service.statistics().await?;

    Ok(Json(json!({
        "success": true,
        "statistics": {
            "totalUsers": stats.total_users,
            "totalItems": stats.total_items,
            "availableItems": stats.available_items,
            "tradedItems": stats.traded_items,
        },
        "charts": {
            "byCategory": stats.by_category,
            "byStatus": stats.by_status,
        },
        "activity": {
            "users": stats.recent_users,
            "items": stats.recent_items,
        },
    })))
}

/// Unknown ordering names fall back to name, ascending.
fn user_query(input: &ActionInput) -> UserQuery {
    UserQuery {
        search: input.text("search"),
        order_by: input
            .text("orderBy")
            .and_then(|o| o.parse::<UserOrder>().ok())
            .unwrap_or_default(),
        direction: input
            .text("order")
            .and_then(|d| d.parse::<SortDirection>().ok())
            .unwrap_or(SortDirection::Asc),
    }
}

pub async fn get_users_admin(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    state.auth_service.require_admin(session).await?;
    let overview = state.admin_service.users_overview(user_query(input)).await?;

    Ok(Json(json!({
        "success": true,
        "stats": overview.stats,
        "users": overview.users,
    })))
}

pub async fn get_admin_profile_data(state: &AppState, session: &Session) -> Result<Json<Value>> {
    let admin = state.auth_service.require_admin(session).await?;
    let data = state.admin_service.profile_data(admin.user_id).await?;

    Ok(Json(json!({
        "success": true,
        "profile": data.profile,
        "stats": data.stats,
    })))
}

pub async fn update_admin_profile(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    let admin = state.auth_service.require_admin(session).await?;

    let user = state
        .admin_service
        .update_profile(admin.user_id, profile_update(input))
        .await?;
    state.auth_service.refresh_session(session, &user).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully!",
    })))
}

pub async fn get_user_details(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    state.auth_service.require_admin(session).await?;
    let id = input.require_id("id", "User id is required")?;
    let details = state.admin_service.user_details(id).await?;

    Ok(Json(json!({
        "success": true,
        "user": details,
    })))
}

pub async fn delete_user(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    let admin = state.auth_service.require_admin(session).await?;
    let id = input.require_id("id", "User id is required")?;

    state.user_service.admin_delete_user(admin.user_id, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "User deleted successfully",
    })))
}

pub async fn set_user_active(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    let admin = state.auth_service.require_admin(session).await?;
    let id = input.require_id("id", "User id is required")?;
    let active = input
        .flag("active")
        .ok_or_else(|| AppError::Validation("Active flag is required".to_string()))?;

    if id == admin.user_id && !active {
        return Err(AppError::Validation(
            "You cannot deactivate your own account".to_string(),
        ));
    }

    state.user_service.set_user_active(id, active).await?;

    let message = if active {
        "User activated"
    } else {
        "User deactivated"
    };
    Ok(Json(json!({
        "success": true,
        "message": message,
    })))
}

pub async fn generate_report(state: &AppState, session: &Session) -> Result<Json<Value>> {
    state.auth_service.require_admin(session).await?;
    let report = state.admin_service.generate_report().await?;

    Ok(Json(json!({
        "success": true,
        "data": report,
    })))
}

/// Same JSON envelope, flagged as a download.
pub async fn export_data(state: &AppState, session: &Session) -> Result<Response> {
    let admin = state.auth_service.require_admin(session).await?;
    let bundle = state.admin_service.export_data(&admin.user_email).await?;

    let disposition = format!("attachment; filename=\"{}\"", bundle.filename);
    let body = json!({
        "success": true,
        "data": bundle.data,
        "filename": bundle.filename,
    });

    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(body)).into_response())
}
