//! Restaurant data-access service.
//!
//! This module provides `Restaurant`, the implementation of `RestaurantApi`
//! over any `DocumentStore`. Application code builds one at start-up and
//! shares it behind an `Arc`.
//!
//! # Note on Edits
//!
//! An edit is never a partial update at the database level. The stored
//! document is loaded and decoded, the fields present in the request are
//! overlaid, the date is re-stamped, and the merged document replaces the
//! stored one.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};
use restaurant_api_shared::{EventItem, MenuItem, ReviewItem};
use tracing::{debug, info, warn};

use crate::auth::Credentials;
use crate::clock::{Clock, SystemClock};
use crate::codec::{
    event_item_from_document, menu_item_from_document, review_item_from_document,
    truncate_to_millis, EventFields, MenuItemFields, ReviewFields, DATE, EVENT_ITEMS, ID,
    ITEM_SUB_TYPE, ITEM_TYPE, MENU_ITEMS, PARENT_ID, REVIEWS,
};
use crate::config::RestaurantServiceConfig;
use crate::errors::ApiError;
use crate::interfaces::{DocumentStore, RestaurantApi};
use crate::types::{EventEdit, MenuItemEdit, NewEvent, NewMenuItem, NewReview, ReviewEdit};
use crate::utils::{format_stamp, parse_object_id};

/// The data-access implementation of the restaurant API.
///
/// Every operation is one round trip to the store (two for edits, one plus
/// one per document for clears) and resolves to exactly one `Result`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use restaurant_api_repository::{MemoryStore, NewMenuItem, Restaurant, RestaurantApi};
///
/// # async fn example() -> Result<(), restaurant_api_repository::ApiError> {
/// let restaurant = Restaurant::new(Arc::new(MemoryStore::new()));
///
/// let item = restaurant
///     .add_menu_item(NewMenuItem {
///         item_type: "Entree".to_string(),
///         sub_type: "Pasta".to_string(),
///         name: "Carbonara".to_string(),
///         price: 14.5,
///         img_url: "x".to_string(),
///     })
///     .await?;
///
/// assert_eq!(restaurant.get_menu_item(&item.id).await?, item);
/// # Ok(())
/// # }
/// ```
pub struct Restaurant {
    store: Arc<dyn DocumentStore>,
    credentials: Credentials,
    config: RestaurantServiceConfig,
    clock: Arc<dyn Clock>,
}

impl Restaurant {
    /// Create a new Restaurant with default configuration and no credential
    /// plugins.
    ///
    /// # Arguments
    ///
    /// * `store` - A shared `DocumentStore` (e.g., `MongoStore`)
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(store, RestaurantServiceConfig::default())
    }

    /// Create a new Restaurant with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `store` - A shared `DocumentStore`
    /// * `config` - Custom configuration for the service
    pub fn with_config(store: Arc<dyn DocumentStore>, config: RestaurantServiceConfig) -> Self {
        Self {
            store,
            credentials: Credentials::new(),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source used for date stamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the credential registry handed to the HTTP layer.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Mutable access to the credential registry, for registering plugins
    /// during setup.
    pub fn credentials_mut(&mut self) -> &mut Credentials {
        &mut self.credentials
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Render the date stamp for a menu item or event insert or edit.
    fn stamp(&self) -> Result<String, ApiError> {
        format_stamp(self.clock.now(), &self.config.date_format)
    }

    /// Load the document stored under `id`.
    async fn find_by_id(&self, collection: &str, id: &str) -> Result<(ObjectId, Document), ApiError> {
        let object_id = parse_object_id(id).inspect_err(|e| {
            warn!(collection = %collection, id = %id, error = %e, "Rejected identifier");
        })?;

        match self.store.find_one(collection, doc! { ID: object_id }).await {
            Ok(Some(document)) => Ok((object_id, document)),
            Ok(None) => {
                warn!(collection = %collection, id = %id, "Document not found");
                Err(ApiError::not_found(collection, id))
            }
            Err(e) => {
                warn!(collection = %collection, id = %id, error = %e, "Lookup failed");
                Err(e)
            }
        }
    }

    /// Load and decode every document matching `filter`.
    ///
    /// One undecodable document fails the whole list.
    async fn find_all<T>(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
        decode: fn(&Document) -> Result<T, ApiError>,
    ) -> Result<Vec<T>, ApiError> {
        let documents = self
            .store
            .find(collection, filter, sort)
            .await
            .inspect_err(|e| {
                warn!(collection = %collection, error = %e, "Find failed");
            })?;

        documents
            .iter()
            .map(decode)
            .collect::<Result<Vec<T>, ApiError>>()
            .inspect_err(|e| {
                warn!(collection = %collection, error = %e, "Could not decode document");
            })
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<String, ApiError> {
        let id = self
            .store
            .insert_one(collection, document)
            .await
            .inspect_err(|e| {
                warn!(collection = %collection, error = %e, "Insert failed");
            })?;

        debug!(collection = %collection, id = %id, "Inserted document");
        Ok(id.to_hex())
    }

    async fn replace(&self, collection: &str, id: ObjectId, document: Document) -> Result<(), ApiError> {
        self.store
            .replace_one(collection, id, document)
            .await
            .inspect_err(|e| {
                warn!(collection = %collection, id = %id, error = %e, "Replace failed");
            })
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), ApiError> {
        let object_id = parse_object_id(id).inspect_err(|e| {
            warn!(collection = %collection, id = %id, error = %e, "Rejected identifier");
        })?;

        let deleted = self
            .store
            .delete_one(collection, object_id)
            .await
            .inspect_err(|e| {
                warn!(collection = %collection, id = %id, error = %e, "Delete failed");
            })?;

        if deleted == 0 {
            debug!(collection = %collection, id = %id, "Nothing to delete");
        }
        Ok(())
    }

    /// Delete every document in `collection`, one at a time.
    ///
    /// A failure stops the sweep; documents already deleted stay deleted.
    async fn clear(&self, collection: &str) -> Result<(), ApiError> {
        let documents = self
            .store
            .find(collection, doc! {}, None)
            .await
            .inspect_err(|e| {
                warn!(collection = %collection, error = %e, "Find failed");
            })?;

        let total = documents.len();
        for (deleted, document) in documents.iter().enumerate() {
            let id = document.get_object_id(ID).map_err(|_| {
                warn!(collection = %collection, deleted, total, "Document without ObjectId");
                ApiError::database(format!("Document in {} has no ObjectId", collection))
            })?;

            self.store
                .delete_one(collection, id)
                .await
                .inspect_err(|e| {
                    warn!(
                        collection = %collection,
                        id = %id,
                        deleted,
                        total,
                        error = %e,
                        "Clear stopped"
                    );
                })?;
        }

        info!(collection = %collection, deleted = total, "Cleared collection");
        Ok(())
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, ApiError> {
        self.store
            .count(collection, filter)
            .await
            .inspect_err(|e| {
                warn!(collection = %collection, error = %e, "Count failed");
            })
    }

    /// Decode a stored document for an edit. A document that does not decode
    /// cannot be merged.
    fn decode_for_edit<T>(
        collection: &str,
        id: &str,
        document: &Document,
        decode: fn(&Document) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        decode(document).inspect_err(|e| {
            warn!(collection = %collection, id = %id, error = %e, "Could not decode stored document");
        })
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        warn!(field = %field, "Rejected empty field");
        return Err(ApiError::parse(format!("{} is required", field)));
    }
    Ok(())
}

#[async_trait]
impl RestaurantApi for Restaurant {
    fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    async fn get_menu_items(&self) -> Result<Vec<MenuItem>, ApiError> {
        self.find_all(MENU_ITEMS, doc! {}, None, menu_item_from_document)
            .await
    }

    async fn get_menu_item(&self, id: &str) -> Result<MenuItem, ApiError> {
        let (_, document) = self.find_by_id(MENU_ITEMS, id).await?;
        menu_item_from_document(&document).inspect_err(|e| {
            warn!(collection = MENU_ITEMS, id = %id, error = %e, "Could not decode document");
        })
    }

    async fn add_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, ApiError> {
        let date = self.stamp()?;
        let fields = MenuItemFields {
            name: item.name,
            price: item.price,
            item_type: item.item_type,
            sub_type: item.sub_type,
            img_url: item.img_url,
        };

        let id = self.insert(MENU_ITEMS, fields.to_document(&date)).await?;
        Ok(fields.into_item(id, date))
    }

    async fn edit_menu_item(&self, edit: MenuItemEdit) -> Result<MenuItem, ApiError> {
        let (object_id, document) = self.find_by_id(MENU_ITEMS, &edit.id).await?;
        let stored =
            Self::decode_for_edit(MENU_ITEMS, &edit.id, &document, MenuItemFields::from_document)?;

        let fields = MenuItemFields {
            name: edit.name.unwrap_or(stored.name),
            price: edit.price.unwrap_or(stored.price),
            item_type: edit.item_type.unwrap_or(stored.item_type),
            sub_type: edit.sub_type.unwrap_or(stored.sub_type),
            img_url: edit.img_url.unwrap_or(stored.img_url),
        };
        let date = self.stamp()?;

        self.replace(MENU_ITEMS, object_id, fields.to_document(&date))
            .await?;
        Ok(fields.into_item(object_id.to_hex(), date))
    }

    async fn delete_menu_item(&self, id: &str) -> Result<(), ApiError> {
        self.delete_by_id(MENU_ITEMS, id).await
    }

    async fn clear_menu_items(&self) -> Result<(), ApiError> {
        self.clear(MENU_ITEMS).await
    }

    async fn get_items_by_type(
        &self,
        item_type: &str,
        sub_type: Option<&str>,
    ) -> Result<Vec<MenuItem>, ApiError> {
        let filter = match sub_type {
            Some(sub_type) => doc! { ITEM_SUB_TYPE: sub_type },
            None => doc! { ITEM_TYPE: item_type },
        };

        self.find_all(MENU_ITEMS, filter, None, menu_item_from_document)
            .await
    }

    async fn count_menu_items(&self) -> Result<u64, ApiError> {
        self.count(MENU_ITEMS, doc! {}).await
    }

    async fn get_event_items(&self) -> Result<Vec<EventItem>, ApiError> {
        self.find_all(EVENT_ITEMS, doc! {}, None, event_item_from_document)
            .await
    }

    async fn get_event_item(&self, id: &str) -> Result<EventItem, ApiError> {
        let (_, document) = self.find_by_id(EVENT_ITEMS, id).await?;
        event_item_from_document(&document).inspect_err(|e| {
            warn!(collection = EVENT_ITEMS, id = %id, error = %e, "Could not decode document");
        })
    }

    async fn add_event(&self, event: NewEvent) -> Result<EventItem, ApiError> {
        require_non_empty("name", &event.name)?;
        require_non_empty("event_date", &event.event_date)?;
        require_non_empty("event_description", &event.event_description)?;

        let date = self.stamp()?;
        let fields = EventFields {
            name: event.name,
            event_date: event.event_date,
            event_description: event.event_description,
        };

        let id = self.insert(EVENT_ITEMS, fields.to_document(&date)).await?;
        Ok(fields.into_item(id, date))
    }

    async fn edit_event(&self, edit: EventEdit) -> Result<EventItem, ApiError> {
        let (object_id, document) = self.find_by_id(EVENT_ITEMS, &edit.id).await?;
        let stored =
            Self::decode_for_edit(EVENT_ITEMS, &edit.id, &document, EventFields::from_document)?;

        let fields = EventFields {
            name: edit.name.unwrap_or(stored.name),
            event_date: edit.event_date.unwrap_or(stored.event_date),
            event_description: edit.event_description.unwrap_or(stored.event_description),
        };
        let date = self.stamp()?;

        self.replace(EVENT_ITEMS, object_id, fields.to_document(&date))
            .await?;
        Ok(fields.into_item(object_id.to_hex(), date))
    }

    async fn delete_event(&self, id: &str) -> Result<(), ApiError> {
        self.delete_by_id(EVENT_ITEMS, id).await
    }

    async fn count_event_items(&self) -> Result<u64, ApiError> {
        self.count(EVENT_ITEMS, doc! {}).await
    }

    async fn clear_event_items(&self) -> Result<(), ApiError> {
        self.clear(EVENT_ITEMS).await
    }

    async fn get_reviews(&self) -> Result<Vec<ReviewItem>, ApiError> {
        self.find_all(
            REVIEWS,
            doc! {},
            Some(doc! { DATE: -1 }),
            review_item_from_document,
        )
        .await
    }

    async fn get_all_reviews_for_item(
        &self,
        parent_id: &str,
    ) -> Result<Vec<ReviewItem>, ApiError> {
        self.find_all(
            REVIEWS,
            doc! { PARENT_ID: parent_id },
            Some(doc! { DATE: -1 }),
            review_item_from_document,
        )
        .await
    }

    async fn get_review_by_id(&self, id: &str) -> Result<ReviewItem, ApiError> {
        let (_, document) = self.find_by_id(REVIEWS, id).await?;
        review_item_from_document(&document).inspect_err(|e| {
            warn!(collection = REVIEWS, id = %id, error = %e, "Could not decode document");
        })
    }

    async fn add_review(&self, review: NewReview) -> Result<ReviewItem, ApiError> {
        let post_date = truncate_to_millis(self.clock.now());
        let fields = ReviewFields {
            parent_id: review.parent_id,
            user_id: review.user_id,
            review_title: review.review_title,
            review_content: review.review_content,
            rating: review.rating,
        };

        let id = self.insert(REVIEWS, fields.to_document(post_date)).await?;
        Ok(fields.into_item(id, post_date))
    }

    async fn edit_review(&self, edit: ReviewEdit) -> Result<ReviewItem, ApiError> {
        let (object_id, document) = self.find_by_id(REVIEWS, &edit.id).await?;
        let stored =
            Self::decode_for_edit(REVIEWS, &edit.id, &document, ReviewFields::from_document)?;

        let fields = ReviewFields {
            review_title: edit.review_title.unwrap_or(stored.review_title),
            review_content: edit.review_content.unwrap_or(stored.review_content),
            rating: edit.rating.unwrap_or(stored.rating),
            ..stored
        };
        let post_date = truncate_to_millis(self.clock.now());

        self.replace(REVIEWS, object_id, fields.to_document(post_date))
            .await?;
        Ok(fields.into_item(object_id.to_hex(), post_date))
    }

    async fn delete_review(&self, id: &str) -> Result<(), ApiError> {
        self.delete_by_id(REVIEWS, id).await
    }

    async fn count_reviews(&self, parent_id: &str) -> Result<u64, ApiError> {
        self.count(REVIEWS, doc! { PARENT_ID: parent_id }).await
    }

    async fn clear_reviews(&self) -> Result<(), ApiError> {
        self.clear(REVIEWS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock store for testing
    struct MockStore {
        documents: Vec<Document>,
        calls: Mutex<Vec<String>>,
        should_fail: bool,
        /// The stored document disappears between `find_one` and `replace_one`.
        replace_misses: bool,
    }

    impl MockStore {
        fn new(documents: Vec<Document>) -> Self {
            Self {
                documents,
                calls: Mutex::new(Vec::new()),
                should_fail: false,
                replace_misses: false,
            }
        }

        fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::new(Vec::new())
            }
        }

        fn record(&self, call: String) -> Result<(), ApiError> {
            if self.should_fail {
                return Err(ApiError::database("Mock failure"));
            }
            self.calls.lock().unwrap().push(call);
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        async fn ping(&self) -> Result<(), ApiError> {
            self.record("ping".to_string())
        }

        async fn find(
            &self,
            collection: &str,
            filter: Document,
            sort: Option<Document>,
        ) -> Result<Vec<Document>, ApiError> {
            self.record(format!(
                "find {} {} {}",
                collection,
                filter,
                sort.map(|s| s.to_string()).unwrap_or_default()
            ))?;
            Ok(self.documents.clone())
        }

        async fn find_one(
            &self,
            collection: &str,
            filter: Document,
        ) -> Result<Option<Document>, ApiError> {
            self.record(format!("find_one {} {}", collection, filter))?;
            Ok(self.documents.first().cloned())
        }

        async fn insert_one(
            &self,
            collection: &str,
            _document: Document,
        ) -> Result<ObjectId, ApiError> {
            self.record(format!("insert_one {}", collection))?;
            Ok(ObjectId::new())
        }

        async fn replace_one(
            &self,
            collection: &str,
            id: ObjectId,
            _document: Document,
        ) -> Result<(), ApiError> {
            self.record(format!("replace_one {} {}", collection, id))?;
            if self.replace_misses {
                return Err(ApiError::not_found(collection, &id.to_hex()));
            }
            Ok(())
        }

        async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<u64, ApiError> {
            self.record(format!("delete_one {} {}", collection, id))?;
            Ok(1)
        }

        async fn count(&self, collection: &str, filter: Document) -> Result<u64, ApiError> {
            self.record(format!("count {} {}", collection, filter))?;
            Ok(self.documents.len() as u64)
        }
    }

    fn new_menu_item() -> NewMenuItem {
        NewMenuItem {
            item_type: "Entree".to_string(),
            sub_type: "Pasta".to_string(),
            name: "Carbonara".to_string(),
            price: 14.5,
            img_url: "x".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_menu_item_returns_assigned_id() {
        let store = Arc::new(MockStore::new(Vec::new()));
        let restaurant = Restaurant::new(store.clone());

        let item = restaurant.add_menu_item(new_menu_item()).await.unwrap();

        assert_eq!(item.id.len(), 24);
        assert!(!item.date.is_empty());
        assert_eq!(store.calls(), vec!["insert_one menu_items".to_string()]);
    }

    #[tokio::test]
    async fn test_sub_type_filter_ignores_type() {
        let store = Arc::new(MockStore::new(Vec::new()));
        let restaurant = Restaurant::new(store.clone());

        restaurant
            .get_items_by_type("Entree", Some("Pasta"))
            .await
            .unwrap();
        restaurant.get_items_by_type("Entree", None).await.unwrap();

        let calls = store.calls();
        assert!(calls[0].contains("itemsubtype"));
        assert!(!calls[0].contains("itemtype\""));
        assert!(calls[1].contains("itemtype"));
        assert!(!calls[1].contains("itemsubtype"));
    }

    #[tokio::test]
    async fn test_reviews_for_item_are_sorted_newest_first() {
        let store = Arc::new(MockStore::new(Vec::new()));
        let restaurant = Restaurant::new(store.clone());

        restaurant
            .get_all_reviews_for_item("64a1f0c2e4b0a1b2c3d4e5f6")
            .await
            .unwrap();

        let calls = store.calls();
        assert!(calls[0].contains("parentid"));
        assert!(calls[0].contains("\"date\": -1"));
    }

    #[tokio::test]
    async fn test_invalid_id_never_reaches_store() {
        let store = Arc::new(MockStore::new(Vec::new()));
        let restaurant = Restaurant::new(store.clone());

        let result = restaurant.get_menu_item("not-an-id").await;
        assert!(matches!(result, Err(ApiError::DatabaseError(_))));

        let result = restaurant.delete_event("not-an-id").await;
        assert!(matches!(result, Err(ApiError::DatabaseError(_))));

        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_event_field_never_reaches_store() {
        let store = Arc::new(MockStore::new(Vec::new()));
        let restaurant = Restaurant::new(store.clone());

        let result = restaurant
            .add_event(NewEvent {
                name: "Jazz night".to_string(),
                event_date: String::new(),
                event_description: "Live trio".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ApiError::ParseError(_))));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_database_error() {
        let restaurant = Restaurant::new(Arc::new(MockStore::failing()));

        assert!(restaurant.get_menu_items().await.unwrap_err().is_database());
        assert!(restaurant.count_event_items().await.unwrap_err().is_database());
        assert!(restaurant.clear_reviews().await.unwrap_err().is_database());
        assert!(restaurant
            .add_menu_item(new_menu_item())
            .await
            .unwrap_err()
            .is_database());
    }

    #[tokio::test]
    async fn test_clear_deletes_each_document() {
        let documents = vec![
            doc! { ID: ObjectId::new() },
            doc! { ID: ObjectId::new() },
            doc! { ID: ObjectId::new() },
        ];
        let store = Arc::new(MockStore::new(documents));
        let restaurant = Restaurant::new(store.clone());

        restaurant.clear_event_items().await.unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[1..]
            .iter()
            .all(|call| call.starts_with("delete_one event_items")));
    }

    #[tokio::test]
    async fn test_edit_of_undecodable_document_is_parse_error() {
        let id = ObjectId::new();
        let store = Arc::new(MockStore::new(vec![
            doc! { ID: id, "itemname": "Carbonara" },
        ]));
        let restaurant = Restaurant::new(store.clone());

        let mut edit = MenuItemEdit::new(id.to_hex());
        edit.price = Some(16.0);
        let result = restaurant.edit_menu_item(edit).await;

        assert!(matches!(result, Err(ApiError::ParseError(_))));
        assert!(!store
            .calls()
            .iter()
            .any(|call| call.starts_with("replace_one")));
    }

    #[tokio::test]
    async fn test_edit_of_document_deleted_before_replace_is_database_error() {
        let id = ObjectId::new();
        let store = Arc::new(MockStore {
            replace_misses: true,
            ..MockStore::new(vec![doc! {
                ID: id,
                "eventname": "Jazz night",
                "eventdate": "Friday 8pm",
                "eventdescription": "Live trio",
                "date": "Jul 4, 2017, 3:04:05 PM",
            }])
        });
        let restaurant = Restaurant::new(store.clone());

        let mut edit = EventEdit::new(id.to_hex());
        edit.name = Some("Blues night".to_string());
        let result = restaurant.edit_event(edit).await;

        assert_eq!(result, Err(ApiError::not_found(EVENT_ITEMS, &id.to_hex())));
    }
}
