use crate::models::{
    ItemChanges, ItemDetails, ItemFilter, ItemStats, ItemStatus, ItemView, ListingChanges,
    NewListing, PublicItemFilter, StatusFilter, DEFAULT_CATEGORIES,
};
use crate::repositories::{CategoryRepository, ItemRepository, RepositoryError};
use crate::services::validation::{self, Validator};
use std::sync::Arc;

pub const DEFAULT_LOCATION: &str = "Not informed";

#[derive(Debug, thiserror::Error)]
pub enum ItemServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Item not found")]
    ItemNotFound,
    #[error("Item not found or permission denied")]
    NotOwner,
    #[error("Invalid category")]
    InvalidCategory,
    #[error("Nothing to update")]
    NothingToUpdate,
    #[error("Repository error: {0}")]
    RepositoryError(RepositoryError),
}

impl From<RepositoryError> for ItemServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UnknownCategory(_) => ItemServiceError::InvalidCategory,
            other => ItemServiceError::RepositoryError(other),
        }
    }
}

pub struct AddItemRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// Owner edits; every `None` leaves the stored value alone.
#[derive(Debug, Default)]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<ItemStatus>,
}

#[derive(Debug, Default)]
pub struct UserItemsQuery {
    pub category: Option<String>,
    /// `None` lists every status.
    pub status: Option<ItemStatus>,
    pub search: Option<String>,
}

pub struct ItemService {
    items: Arc<dyn ItemRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { items, categories }
    }

    /// Active category names, or the built-in list when none are stored.
    pub async fn categories(&self) -> Vec<String> {
        match self.categories.list_active().await {
            Ok(stored) if !stored.is_empty() => stored.into_iter().map(|c| c.name).collect(),
            Ok(_) => default_categories(),
            Err(e) => {
                tracing::warn!("Falling back to default categories: {}", e);
                default_categories()
            }
        }
    }

    pub async fn public_catalog(
        &self,
        filter: PublicItemFilter,
    ) -> Result<Vec<ItemView>, ItemServiceError> {
        Ok(self.items.find_public(filter).await?)
    }

    pub async fn search(&self, term: &str) -> Result<Vec<ItemView>, ItemServiceError> {
        let term = term.trim();
        if term.chars().count() < validation::MIN_SEARCH_LENGTH {
            return Err(ItemServiceError::Validation(format!(
                "Search term must be at least {} characters",
                validation::MIN_SEARCH_LENGTH
            )));
        }

        let filter = PublicItemFilter {
            search: Some(term.to_string()),
            ..Default::default()
        };
        Ok(self.items.find_public(filter).await?)
    }

    pub async fn item_details(&self, id: i64) -> Result<ItemDetails, ItemServiceError> {
        self.items
            .find_details(id)
            .await?
            .ok_or(ItemServiceError::ItemNotFound)
    }

    pub async fn get_item(&self, id: i64) -> Result<ItemView, ItemServiceError> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or(ItemServiceError::ItemNotFound)
    }

    pub async fn user_items(
        &self,
        owner_id: i64,
        query: UserItemsQuery,
    ) -> Result<Vec<ItemView>, ItemServiceError> {
        let filter = ItemFilter {
            owner_id: Some(owner_id),
            category_name: query.category,
            status: query.status.map_or(StatusFilter::Any, StatusFilter::Only),
            search: query.search,
            ..Default::default()
        };
        Ok(self.items.find_all(filter).await?)
    }

    pub async fn recent_user_items(
        &self,
        owner_id: i64,
        limit: i64,
    ) -> Result<Vec<ItemView>, ItemServiceError> {
        let filter = ItemFilter {
            owner_id: Some(owner_id),
            status: StatusFilter::Any,
            limit: Some(limit.max(1)),
            ..Default::default()
        };
        Ok(self.items.find_all(filter).await?)
    }

    pub async fn add_item(
        &self,
        owner_id: i64,
        request: AddItemRequest,
    ) -> Result<ItemView, ItemServiceError> {
        let mut validator = Validator::new();
        validator
            .require(&request.title, "Title is required")
            .require(&request.category, "Category is required")
            .require(&request.condition, "Condition is required");
        validator.finish().map_err(ItemServiceError::Validation)?;

        let location = request
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let listing = NewListing {
            owner_id,
            category: request.category.trim().to_string(),
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            condition: request.condition.trim().to_string(),
            location,
            image_url: request.image_url.filter(|url| !url.trim().is_empty()),
        };

        let item = self.items.create_listing(listing).await?;
        tracing::info!("User {} listed item {}", owner_id, item.id);
        Ok(item)
    }

    pub async fn update_item(
        &self,
        owner_id: i64,
        item_id: i64,
        update: ItemUpdate,
    ) -> Result<ItemView, ItemServiceError> {
        self.owned_item(owner_id, item_id).await?;

        let changes = ListingChanges {
            category: update.category,
            fields: ItemChanges {
                category_id: None,
                title: update.title,
                description: update.description,
                condition: update.condition,
                location: update.location,
                image_url: update.image_url,
                status: update.status,
            },
        };
        if changes.is_empty() {
            return Err(ItemServiceError::NothingToUpdate);
        }

        self.items
            .update_listing(item_id, changes)
            .await?
            .ok_or(ItemServiceError::ItemNotFound)
    }

    pub async fn delete_item(&self, owner_id: i64, item_id: i64) -> Result<(), ItemServiceError> {
        self.owned_item(owner_id, item_id).await?;

        if self.items.delete(item_id).await? {
            tracing::info!("User {} deleted item {}", owner_id, item_id);
            Ok(())
        } else {
            Err(ItemServiceError::ItemNotFound)
        }
    }

    pub async fn count_user_items(
        &self,
        owner_id: i64,
        status: Option<ItemStatus>,
    ) -> Result<i64, ItemServiceError> {
        Ok(self.items.count_by_owner(owner_id, status).await?)
    }

    pub async fn stats(&self) -> Result<ItemStats, ItemServiceError> {
        Ok(self.items.get_stats().await?)
    }

    /// Missing and foreign items look the same to the caller.
    async fn owned_item(&self, owner_id: i64, item_id: i64) -> Result<ItemView, ItemServiceError> {
        match self.items.find_by_id(item_id).await? {
            Some(item) if item.owner_id == owner_id => Ok(item),
            _ => Err(ItemServiceError::NotOwner),
        }
    }
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::repositories::category_repository::MockCategoryRepository;
    use crate::repositories::item_repository::MockItemRepository;
    use mockall::predicate::*;

    fn item(id: i64, owner_id: i64) -> ItemView {
        let now = chrono::Utc::now().naive_utc();
        ItemView {
            id,
            owner_id,
            category_id: 1,
            title: "Chair".to_string(),
            description: "Wooden".to_string(),
            condition: "Good".to_string(),
            location: DEFAULT_LOCATION.to_string(),
            image_url: None,
            status: ItemStatus::Available,
            created_at: now,
            updated_at: now,
            category_name: Some("Furniture".to_string()),
            owner_name: Some("Ana".to_string()),
            owner_location: Some("SP".to_string()),
        }
    }

    fn service(items: MockItemRepository, categories: MockCategoryRepository) -> ItemService {
        ItemService::new(Arc::new(items), Arc::new(categories))
    }

    #[tokio::test]
    async fn test_categories_fall_back_to_defaults() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_list_active()
            .times(1)
            .returning(|| Box::pin(async move { Ok(Vec::new()) }));

        let names = service(MockItemRepository::new(), categories)
            .categories()
            .await;
        assert_eq!(names.len(), DEFAULT_CATEGORIES.len());
        assert!(names.contains(&"Furniture".to_string()));
    }

    #[tokio::test]
    async fn test_categories_prefer_stored_names() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_list_active().times(1).returning(|| {
            Box::pin(async move {
                Ok(vec![Category {
                    id: 1,
                    name: "Books".to_string(),
                    active: true,
                }])
            })
        });

        let names = service(MockItemRepository::new(), categories)
            .categories()
            .await;
        assert_eq!(names, vec!["Books".to_string()]);
    }

    #[tokio::test]
    async fn test_search_requires_two_characters() {
        let mut items = MockItemRepository::new();
        items.expect_find_public().times(0);

        let result = service(items, MockCategoryRepository::new())
            .search(" a ")
            .await;
        assert!(matches!(result, Err(ItemServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_runs_on_public_items() {
        let mut items = MockItemRepository::new();
        items
            .expect_find_public()
            .withf(|f| f.search.as_deref() == Some("ab") && f.category.is_none())
            .times(1)
            .returning(|_| Box::pin(async move { Ok(Vec::new()) }));

        let result = service(items, MockCategoryRepository::new())
            .search("ab")
            .await;
        assert!(result.expect("search").is_empty());
    }

    #[tokio::test]
    async fn test_add_item_validates_and_defaults_location() {
        let mut items = MockItemRepository::new();
        items
            .expect_create_listing()
            .withf(|l| l.location == DEFAULT_LOCATION && l.category == "Furniture")
            .times(1)
            .returning(|l| {
                let view = item(10, l.owner_id);
                Box::pin(async move { Ok(view) })
            });

        let service = service(items, MockCategoryRepository::new());

        let missing = AddItemRequest {
            title: "".to_string(),
            description: "".to_string(),
            category: "".to_string(),
            condition: "Good".to_string(),
            location: None,
            image_url: None,
        };
        match service.add_item(1, missing).await {
            Err(ItemServiceError::Validation(msg)) => {
                assert_eq!(msg, "Title is required, Category is required")
            }
            other => panic!("unexpected: {:?}", other.map(|i| i.id)),
        }

        let request = AddItemRequest {
            title: "Chair".to_string(),
            description: "".to_string(),
            category: "Furniture".to_string(),
            condition: "Good".to_string(),
            location: Some("  ".to_string()),
            image_url: Some("http://x/y.jpg".to_string()),
        };
        let created = service.add_item(1, request).await.expect("add");
        assert_eq!(created.owner_id, 1);
    }

    #[tokio::test]
    async fn test_add_item_unknown_category() {
        let mut items = MockItemRepository::new();
        items.expect_create_listing().times(1).returning(|l| {
            let name = l.category.clone();
            Box::pin(async move { Err(RepositoryError::UnknownCategory(name)) })
        });

        let request = AddItemRequest {
            title: "Chair".to_string(),
            description: "Wooden".to_string(),
            category: "Spaceships".to_string(),
            condition: "Good".to_string(),
            location: None,
            image_url: None,
        };
        let result = service(items, MockCategoryRepository::new())
            .add_item(1, request)
            .await;
        assert!(matches!(result, Err(ItemServiceError::InvalidCategory)));
    }

    #[tokio::test]
    async fn test_update_item_rejects_other_owners() {
        let mut items = MockItemRepository::new();
        items
            .expect_find_by_id()
            .with(eq(10))
            .times(1)
            .returning(|id| {
                let view = item(id, 2);
                Box::pin(async move { Ok(Some(view)) })
            });
        items.expect_update_listing().times(0);

        let update = ItemUpdate {
            status: Some(ItemStatus::Traded),
            ..Default::default()
        };
        let result = service(items, MockCategoryRepository::new())
            .update_item(1, 10, update)
            .await;
        assert!(matches!(result, Err(ItemServiceError::NotOwner)));
    }

    #[tokio::test]
    async fn test_update_item_needs_a_field() {
        let mut items = MockItemRepository::new();
        items.expect_find_by_id().times(1).returning(|id| {
            let view = item(id, 1);
            Box::pin(async move { Ok(Some(view)) })
        });

        let result = service(items, MockCategoryRepository::new())
            .update_item(1, 10, ItemUpdate::default())
            .await;
        assert!(matches!(result, Err(ItemServiceError::NothingToUpdate)));
    }

    #[tokio::test]
    async fn test_user_items_without_status_lists_everything() {
        let mut items = MockItemRepository::new();
        items
            .expect_find_all()
            .withf(|f| f.owner_id == Some(3) && f.status == StatusFilter::Any)
            .times(1)
            .returning(|_| Box::pin(async move { Ok(Vec::new()) }));

        let result = service(items, MockCategoryRepository::new())
            .user_items(3, UserItemsQuery::default())
            .await;
        assert!(result.is_ok());
    }
}
