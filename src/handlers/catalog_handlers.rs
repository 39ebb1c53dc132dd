//! Anonymous actions: the public catalog and the static dashboard snippets.

use super::request::ActionInput;
use crate::error::Result;
use crate::models::PublicItemFilter;
use crate::AppState;
use axum::Json;
use serde_json::{json, Value};

pub const CATALOG_TITLE: &str = "Items Available for Trade";
pub const NO_PUBLIC_ITEMS_MESSAGE: &str = "No items available at the moment";
pub const NO_ITEMS_MESSAGE: &str = "You have not listed any items yet";

pub async fn get_categories(state: &AppState) -> Result<Json<Value>> {
    let categories = state.item_service.categories().await;

    Ok(Json(json!({
        "success": true,
        "categories": categories,
    })))
}

pub async fn get_public_items(state: &AppState, input: &ActionInput) -> Result<Json<Value>> {
    let filter = PublicItemFilter {
        category: input.text("category"),
        condition: input.text("condition"),
        search: input.text("search"),
    };

    let items = state.item_service.public_catalog(filter).await?;
    let categories = state.item_service.categories().await;

    Ok(Json(json!({
        "success": true,
        "items": items,
        "categories": categories,
        "catalogTitle": CATALOG_TITLE,
    })))
}

pub async fn get_item_details(state: &AppState, input: &ActionInput) -> Result<Json<Value>> {
    let id = input.require_id("id", "Item id is required")?;
    let item = state.item_service.item_details(id).await?;

    Ok(Json(json!({
        "success": true,
        "item": item,
    })))
}

pub async fn search_items(state: &AppState, input: &ActionInput) -> Result<Json<Value>> {
    let term = input.text("q").unwrap_or_default();
    let items = state.item_service.search(&term).await?;

    Ok(Json(json!({
        "success": true,
        "items": items,
    })))
}

pub fn no_public_items_message() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": NO_PUBLIC_ITEMS_MESSAGE,
    }))
}

pub fn no_items_message() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": NO_ITEMS_MESSAGE,
    }))
}

pub fn sustainability_tip(state: &AppState) -> Json<Value> {
    Json(json!({
        "success": true,
        "tip": state.dashboard_service.sustainability_tip(),
    }))
}
