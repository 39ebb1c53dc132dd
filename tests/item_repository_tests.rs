use ecoswap::{
    models::{
        ItemChanges, ItemFilter, ItemOrder, ItemStatus, ListingChanges, NewItem, NewListing,
        PublicItemFilter, SortDirection, StatusFilter,
    },
    repositories::{item_repository::SqliteItemRepository, ItemRepository, RepositoryError},
    test_utils::test_helpers,
};
use sqlx::SqlitePool;

async fn setup() -> (SqlitePool, SqliteItemRepository, i64) {
    let pool = test_helpers::create_test_db().await.unwrap();
    test_helpers::seed_categories(&pool).await.unwrap();
    let owner = test_helpers::insert_test_user(&pool, "Owner", "owner@example.com", "secret123")
        .await
        .unwrap();
    let repo = SqliteItemRepository::new(pool.clone());
    (pool, repo, owner)
}

fn listing(owner_id: i64, title: &str, category: &str) -> NewListing {
    NewListing {
        owner_id,
        category: category.to_string(),
        title: title.to_string(),
        description: format!("A {}", title),
        condition: "Good".to_string(),
        location: "Coimbra".to_string(),
        image_url: None,
    }
}

#[tokio::test]
async fn test_create_then_find_by_id() {
    let (pool, repo, owner) = setup().await;
    let books = test_helpers::category_id(&pool, "Books").await.unwrap();

    let created = repo
        .create(NewItem {
            owner_id: owner,
            category_id: books,
            title: "Dune".to_string(),
            description: "Paperback".to_string(),
            condition: "Used".to_string(),
            location: "Coimbra".to_string(),
            image_url: Some("https://img.example.com/dune.png".to_string()),
        })
        .await
        .unwrap();

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.title, "Dune");
    assert_eq!(found.description, "Paperback");
    assert_eq!(found.condition, "Used");
    assert_eq!(found.image_url.as_deref(), Some("https://img.example.com/dune.png"));
    assert_eq!(found.status, ItemStatus::Available);
    assert_eq!(found.category_name.as_deref(), Some("Books"));
    assert_eq!(found.owner_name.as_deref(), Some("Owner"));

    let details = repo.find_details(created.id).await.unwrap().unwrap();
    assert_eq!(details.owner_email.as_deref(), Some("owner@example.com"));
}

#[tokio::test]
async fn test_create_listing_with_unknown_category_inserts_nothing() {
    let (pool, repo, owner) = setup().await;

    let result = repo.create_listing(listing(owner, "Lamp", "Spaceships")).await;
    assert!(matches!(result, Err(RepositoryError::UnknownCategory(_))));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_inactive_category_is_not_assignable() {
    let (pool, repo, owner) = setup().await;
    test_helpers::insert_category(&pool, "Retired", false)
        .await
        .unwrap();

    let result = repo.create_listing(listing(owner, "Lamp", "Retired")).await;
    assert!(matches!(result, Err(RepositoryError::UnknownCategory(_))));
}

#[tokio::test]
async fn test_update_listing_changes_category_and_status() {
    let (_pool, repo, owner) = setup().await;
    let item = repo
        .create_listing(listing(owner, "Guitar", "Other"))
        .await
        .unwrap();

    let updated = repo
        .update_listing(
            item.id,
            ListingChanges {
                category: Some("Music".to_string()),
                fields: ItemChanges {
                    status: Some(ItemStatus::Traded),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.category_name.as_deref(), Some("Music"));
    assert_eq!(updated.status, ItemStatus::Traded);
    assert_eq!(updated.title, "Guitar");

    let missing = repo
        .update(
            9999,
            ItemChanges {
                title: Some("Ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_find_all_filters_by_owner_and_status() {
    let (pool, repo, owner) = setup().await;
    let other = test_helpers::insert_test_user(&pool, "Other", "other@example.com", "secret123")
        .await
        .unwrap();
    let books = test_helpers::category_id(&pool, "Books").await.unwrap();
    test_helpers::insert_test_item(&pool, owner, books, "Dune", "available")
        .await
        .unwrap();
    test_helpers::insert_test_item(&pool, owner, books, "Emma", "traded")
        .await
        .unwrap();
    test_helpers::insert_test_item(&pool, other, books, "Ulysses", "available")
        .await
        .unwrap();

    let defaults = repo
        .find_all(ItemFilter {
            owner_id: Some(owner),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].title, "Dune");

    let everything = repo
        .find_all(ItemFilter {
            owner_id: Some(owner),
            status: StatusFilter::Any,
            order_by: ItemOrder::Title,
            direction: SortDirection::Asc,
            ..Default::default()
        })
        .await
        .unwrap();
    let titles: Vec<_> = everything.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune", "Emma"]);

    assert_eq!(repo.count_by_owner(owner, None).await.unwrap(), 2);
    assert_eq!(
        repo.count_by_owner(owner, Some(ItemStatus::Traded))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let (pool, repo, owner) = setup().await;
    let other = test_helpers::category_id(&pool, "Other").await.unwrap();
    test_helpers::insert_test_item(&pool, owner, other, "100% cotton shirt", "available")
        .await
        .unwrap();
    test_helpers::insert_test_item(&pool, owner, other, "1000 piece puzzle", "available")
        .await
        .unwrap();

    let found = repo
        .find_public(PublicItemFilter {
            search: Some("100%".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "100% cotton shirt");
}

#[tokio::test]
async fn test_find_public_by_category_and_condition() {
    let (pool, repo, owner) = setup().await;
    let books = test_helpers::category_id(&pool, "Books").await.unwrap();
    let toys = test_helpers::category_id(&pool, "Toys").await.unwrap();
    test_helpers::insert_test_item(&pool, owner, books, "Dune", "available")
        .await
        .unwrap();
    test_helpers::insert_test_item(&pool, owner, books, "Emma", "removed")
        .await
        .unwrap();
    test_helpers::insert_test_item(&pool, owner, toys, "Kite", "available")
        .await
        .unwrap();

    let books_only = repo
        .find_public(PublicItemFilter {
            category: Some("Books".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(books_only.len(), 1);
    assert!(books_only
        .iter()
        .all(|i| i.status == ItemStatus::Available && i.category_name.as_deref() == Some("Books")));

    let none = repo
        .find_public(PublicItemFilter {
            condition: Some("Mint".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_stats_and_delete_by_owner() {
    let (pool, repo, owner) = setup().await;
    let books = test_helpers::category_id(&pool, "Books").await.unwrap();
    test_helpers::insert_test_item(&pool, owner, books, "Dune", "available")
        .await
        .unwrap();
    test_helpers::insert_test_item(&pool, owner, books, "Emma", "traded")
        .await
        .unwrap();

    let stats = repo.get_stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.available, 1);
    assert_eq!(stats.traded, 1);
    assert_eq!(stats.removed, 0);
    assert_eq!(stats.by_category[0].name, "Books");
    assert_eq!(stats.by_category[0].total, 2);

    assert_eq!(repo.delete_by_owner(owner).await.unwrap(), 2);
    assert_eq!(repo.get_stats().await.unwrap().total, 0);
}
