use super::catalog_handlers::NO_ITEMS_MESSAGE;
use super::request::ActionInput;
use crate::error::Result;
use crate::AppState;
use axum::Json;
use serde_json::{json, Value};
use tower_sessions::Session;

const DEFAULT_RECENT_ITEMS: i64 = 3;
const MAX_RECENT_ITEMS: i64 = 50;

pub async fn get_user_data(state: &AppState, session: &Session) -> Result<Json<Value>> {
    let current = state.auth_service.require_session(session).await?;
    let user = state.dashboard_service.user_data(current.user_id).await?;

    Ok(Json(json!({
        "success": true,
        "user": {
            "name": user.name,
            "email": user.email,
            "type": user.role,
        },
        "welcomeMessage": "Here you can manage your items and follow your trading activity.",
    })))
}

pub async fn get_user_statistics(state: &AppState, session: &Session) -> Result<Json<Value>> {
    let current = state.auth_service.require_session(session).await?;
    let statistics = state
        .dashboard_service
        .user_statistics(current.user_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "statistics": statistics,
        "labels": {
            "totalItems": "Listed Items",
            "availableItems": "Available",
            "tradedItems": "Traded",
            "daysSinceJoin": "Days on EcoSwap",
        },
    })))
}

pub async fn get_user_recent_items(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    let current = state.auth_service.require_session(session).await?;
    let limit = input
        .id("limit")
        .unwrap_or(DEFAULT_RECENT_ITEMS)
        .clamp(1, MAX_RECENT_ITEMS);

    let items = state
        .item_service
        .recent_user_items(current.user_id, limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "items": items,
        "noItemsMessage": NO_ITEMS_MESSAGE,
    })))
}

pub async fn get_items_page_data(state: &AppState, session: &Session) -> Result<Json<Value>> {
    let current = state.auth_service.require_session(session).await?;
    let page = state
        .dashboard_service
        .items_page_data(current.user_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "user": { "name": page.user_name },
        "pageTitle": page.page_title,
        "pageDescription": page.page_description,
    })))
}
