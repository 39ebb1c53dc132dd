use super::request::{Action, ActionInput};
use super::{admin_handlers, auth_handlers, catalog_handlers, dashboard_handlers};
use super::{item_handlers, profile_handlers};
use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use tower_sessions::Session;

/// `GET|POST /api?action=<name>`. Every outcome is a JSON envelope.
pub async fn api_handler(
    State(state): State<AppState>,
    method: Method,
    session: Session,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let action = match query.get("action").map(|name| name.parse::<Action>()) {
        Some(Ok(action)) => action,
        Some(Err(e)) => return e.into_response(),
        None => return AppError::UnknownAction.into_response(),
    };

    if action.requires_post() && method != Method::POST {
        return AppError::MethodNotAllowed.into_response();
    }

    tracing::debug!("Dispatching action {}", action.as_str());
    let input = ActionInput::new(query, &body);

    match dispatch(action, &state, &session, &input).await {
        Ok(response) => response,
        Err(err) => {
            if err.status().is_client_error() {
                tracing::debug!("Action {} rejected: {}", action.as_str(), err);
            }
            err.into_response()
        }
    }
}

async fn dispatch(
    action: Action,
    state: &AppState,
    session: &Session,
    input: &ActionInput,
) -> Result<Response> {
    let response = match action {
        Action::Register => auth_handlers::register(state, input).await?.into_response(),
        Action::Login => auth_handlers::login(state, session, input)
            .await?
            .into_response(),
        Action::Logout => auth_handlers::logout(state, session).await?.into_response(),

        Action::GetCategories => catalog_handlers::get_categories(state).await?.into_response(),
        Action::GetPublicItems => catalog_handlers::get_public_items(state, input)
            .await?
            .into_response(),
        Action::GetItemDetails => catalog_handlers::get_item_details(state, input)
            .await?
            .into_response(),
        Action::SearchItems => catalog_handlers::search_items(state, input)
            .await?
            .into_response(),
        Action::GetNoPublicItemsMessage => {
            catalog_handlers::no_public_items_message().into_response()
        }
        Action::GetNoItemsMessage => catalog_handlers::no_items_message().into_response(),
        Action::GetSustainabilityTip => catalog_handlers::sustainability_tip(state).into_response(),

        Action::GetUserData => dashboard_handlers::get_user_data(state, session)
            .await?
            .into_response(),
        Action::GetUserStatistics => dashboard_handlers::get_user_statistics(state, session)
            .await?
            .into_response(),
        Action::GetUserRecentItems => {
            dashboard_handlers::get_user_recent_items(state, session, input)
                .await?
                .into_response()
        }
        Action::GetItemsPageData => dashboard_handlers::get_items_page_data(state, session)
            .await?
            .into_response(),

        Action::GetUserItems => item_handlers::get_user_items(state, session, input)
            .await?
            .into_response(),
        Action::GetItemById => item_handlers::get_item_by_id(state, session, input)
            .await?
            .into_response(),
        Action::AddItem => item_handlers::add_item(state, session, input)
            .await?
            .into_response(),
        Action::UpdateItem => item_handlers::update_item(state, session, input)
            .await?
            .into_response(),
        Action::DeleteItem => item_handlers::delete_item(state, session, input)
            .await?
            .into_response(),

        Action::UpdateProfile => profile_handlers::update_profile(state, session, input)
            .await?
            .into_response(),
        Action::DeleteAccount => profile_handlers::delete_account(state, session)
            .await?
            .into_response(),

        Action::GetAdminStatistics => admin_handlers::get_admin_statistics(state, session)
            .await?
            .into_response(),
        Action::GetUsersAdmin => admin_handlers::get_users_admin(state, session, input)
            .await?
            .into_response(),
        Action::GetAdminProfileData => admin_handlers::get_admin_profile_data(state, session)
            .await?
            .into_response(),
        Action::UpdateAdminProfile => {
            admin_handlers::update_admin_profile(state, session, input)
                .await?
                .into_response()
        }
        Action::GetUserDetails => admin_handlers::get_user_details(state, session, input)
            .await?
            .into_response(),
        Action::DeleteUser => admin_handlers::delete_user(state, session, input)
            .await?
            .into_response(),
        Action::SetUserActive => admin_handlers::set_user_active(state, session, input)
            .await?
            .into_response(),
        Action::GenerateReport => admin_handlers::generate_report(state, session)
            .await?
            .into_response(),
        Action::ExportData => admin_handlers::export_data(state, session).await?,
    };

    Ok(response)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "success": true }))
}
