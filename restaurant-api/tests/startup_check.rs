//! Integration tests for the start-up wiring and check.
//!
//! These tests use the real Dependencies and StartupCheck over the
//! in-memory store, so no MongoDB server is needed.

use std::io::Write;
use std::sync::Arc;

use chrono::Duration;
use mongodb::bson::doc;
use restaurant_api::{Dependencies, Settings, StartupCheck, StartupError};
use restaurant_api_repository::{
    ApiError, DocumentStore, JwtCredentials, MemoryStore, NewEvent, NewMenuItem, NewReview,
    RestaurantApi,
};
use tempfile::NamedTempFile;

fn settings_with_secrets(path: &str) -> Settings {
    let path = path.to_string();
    Settings::from_lookup(move |key| (key == "SECRETS_PATH").then(|| path.clone()))
}

fn secrets_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

async fn seed(api: &dyn RestaurantApi) {
    let item = api
        .add_menu_item(NewMenuItem {
            item_type: "Entree".to_string(),
            sub_type: "Pasta".to_string(),
            name: "Carbonara".to_string(),
            price: 14.5,
            img_url: "x".to_string(),
        })
        .await
        .unwrap();

    api.add_event(NewEvent {
        name: "Jazz night".to_string(),
        event_date: "Friday 8pm".to_string(),
        event_description: "Live trio".to_string(),
    })
    .await
    .unwrap();

    api.add_review(NewReview {
        parent_id: item.id,
        user_id: "user-1".to_string(),
        review_title: "Great".to_string(),
        review_content: "Would eat again".to_string(),
        rating: 5,
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_check_reports_counts_and_plugins() {
    let secrets = secrets_file(r#"{"JWT_Secret": "kitchen-secret"}"#);
    let settings = settings_with_secrets(secrets.path().to_str().unwrap());

    let deps = Dependencies::from_store(Arc::new(MemoryStore::new()), &settings).unwrap();
    seed(deps.restaurant.as_ref()).await;

    let report = StartupCheck::new(deps.restaurant.clone()).run().await.unwrap();

    assert_eq!(report.menu_items, 1);
    assert_eq!(report.event_items, 1);
    assert_eq!(report.reviews, 1);
    assert_eq!(report.auth_plugins, vec!["jwt".to_string()]);

    let token = JwtCredentials::new("kitchen-secret")
        .issue("user-1", Some("Alice"), Duration::minutes(5))
        .unwrap();
    let profile = deps.restaurant.credentials().authenticate(&token).unwrap();
    assert_eq!(profile.id, "user-1");
}

#[tokio::test]
async fn test_check_without_secrets_has_no_plugins() {
    let settings = settings_with_secrets("/nonexistent/SecretsList.json");

    let deps = Dependencies::from_store(Arc::new(MemoryStore::new()), &settings).unwrap();
    let report = StartupCheck::new(deps.restaurant.clone()).run().await.unwrap();

    assert_eq!(report.menu_items, 0);
    assert!(report.auth_plugins.is_empty());
    assert!(deps
        .restaurant
        .credentials()
        .authenticate("Bearer anything")
        .unwrap_err()
        .is_auth());
}

#[tokio::test]
async fn test_check_fails_on_undecodable_document() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_one("event_items", doc! { "eventname": "Jazz night" })
        .await
        .unwrap();

    let settings = settings_with_secrets("/nonexistent/SecretsList.json");
    let deps = Dependencies::from_store(store, &settings).unwrap();

    let result = StartupCheck::new(deps.restaurant.clone()).run().await;
    assert!(matches!(
        result,
        Err(StartupError::StoreError(ApiError::ParseError(_)))
    ));
}

#[tokio::test]
async fn test_check_fails_when_store_unavailable() {
    let store = Arc::new(MemoryStore::new());
    store.set_available(false);

    let settings = settings_with_secrets("/nonexistent/SecretsList.json");
    let deps = Dependencies::from_store(store, &settings).unwrap();

    let result = StartupCheck::new(deps.restaurant.clone()).run().await;
    assert!(matches!(
        result,
        Err(StartupError::StoreError(ApiError::DatabaseError(_)))
    ));
}
