use crate::models::{ItemStatus, User};
use crate::repositories::{ItemRepository, RepositoryError, UserRepository};
use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::Arc;

pub const SUSTAINABILITY_TIPS: &[&str] = &[
    "Every item you trade saves a new product from being made, which shrinks your carbon footprint.",
    "Trading keeps things in use longer. That is the circular economy at work: nothing goes to waste.",
    "Small actions add up. Passing on a single book has a real effect on the environment.",
    "Before buying something new, check whether someone on EcoSwap already has it.",
    "Share the idea of sustainable trading with friends and family.",
    "Giving objects a second life is one of the most effective ways to cut waste.",
    "You are part of a community that cares about the future of the planet.",
    "Your trades contribute directly to UN Sustainable Development Goal 12: responsible consumption.",
];

#[derive(Debug, thiserror::Error)]
pub enum DashboardServiceError {
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub total_items: i64,
    pub available_items: i64,
    pub traded_items: i64,
    pub days_since_join: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPageData {
    pub user_name: String,
    pub page_title: &'static str,
    pub page_description: &'static str,
}

pub struct DashboardService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
}

impl DashboardService {
    pub fn new(users: Arc<dyn UserRepository>, items: Arc<dyn ItemRepository>) -> Self {
        Self { users, items }
    }

    pub async fn user_data(&self, user_id: i64) -> Result<User, DashboardServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DashboardServiceError::UserNotFound)
    }

    pub async fn user_statistics(
        &self,
        user_id: i64,
    ) -> Result<UserStatistics, DashboardServiceError> {
        let user = self.user_data(user_id).await?;

        let total_items = self.items.count_by_owner(user_id, None).await?;
        let available_items = self
            .items
            .count_by_owner(user_id, Some(ItemStatus::Available))
            .await?;
        let traded_items = self
            .items
            .count_by_owner(user_id, Some(ItemStatus::Traded))
            .await?;

        let days_since_join = (Utc::now().naive_utc() - user.created_at).num_days().max(0);

        Ok(UserStatistics {
            total_items,
            available_items,
            traded_items,
            days_since_join,
        })
    }

    pub async fn items_page_data(
        &self,
        user_id: i64,
    ) -> Result<ItemsPageData, DashboardServiceError> {
        let user = self.user_data(user_id).await?;
        Ok(ItemsPageData {
            user_name: user.name,
            page_title: "My Items",
            page_description: "Manage the items you have made available for trade",
        })
    }

    pub fn sustainability_tip(&self) -> &'static str {
        SUSTAINABILITY_TIPS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default()
    }
}
