use super::request::ActionInput;
use crate::error::{AppError, Result};
use crate::models::ItemStatus;
use crate::services::item_service::{AddItemRequest, ItemUpdate, UserItemsQuery};
use crate::AppState;
use axum::Json;
use serde_json::{json, Value};
use tower_sessions::Session;

/// Item titles arrive as `name` from the forms and as `title` from newer clients.
const TITLE_KEYS: &[&str] = &["name", "title"];
const IMAGE_KEYS: &[&str] = &["image", "image_url"];

/// Accepts the external status names and the legacy aliases.
fn status_param(input: &ActionInput) -> Result<Option<ItemStatus>> {
    input
        .text("status")
        .map(|s| s.parse::<ItemStatus>())
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))
}

pub async fn get_user_items(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    let current = state.auth_service.require_session(session).await?;

    let query = UserItemsQuery {
        category: input.text("category"),
        status: status_param(input)?,
        search: input.text("search"),
    };
    let items = state
        .item_service
        .user_items(current.user_id, query)
        .await?;

    Ok(Json(json!({
        "success": true,
        "items": items,
    })))
}

pub async fn get_item_by_id(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    state.auth_service.require_session(session).await?;
    let id = input.require_id("id", "Item id is required")?;
    let item = state.item_service.get_item(id).await?;

    Ok(Json(json!({
        "success": true,
        "item": item,
    })))
}

pub async fn add_item(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    let current = state.auth_service.require_session(session).await?;

    let request = AddItemRequest {
        title: input.text_any(TITLE_KEYS).unwrap_or_default(),
        description: input.text("description").unwrap_or_default(),
        category: input.text("category").unwrap_or_default(),
        condition: input.text("condition").unwrap_or_default(),
        location: input.text("location"),
        image_url: input.text_any(IMAGE_KEYS),
    };
    let item = state.item_service.add_item(current.user_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Item added successfully!",
        "item": item,
    })))
}

pub async fn update_item(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    let current = state.auth_service.require_session(session).await?;
    let id = input.require_id("id", "Item id is required")?;

    let update = ItemUpdate {
        title: input.text_any(TITLE_KEYS),
        description: input.text("description"),
        category: input.text("category"),
        condition: input.text("condition"),
        location: input.text("location"),
        image_url: input.text_any(IMAGE_KEYS),
        status: status_param(input)?,
    };
    state
        .item_service
        .update_item(current.user_id, id, update)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Item updated successfully!",
    })))
}

pub async fn delete_item(
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Json<Value>> {
    let current = state.auth_service.require_session(session).await?;
    let id = input.require_id("id", "Item id is required")?;

    state.item_service.delete_item(current.user_id, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Item deleted successfully!",
    })))
}
