//! In-memory store implementation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::codec::ID;
use crate::errors::ApiError;
use crate::interfaces::DocumentStore;

/// Document store backed by process memory.
///
/// Collections are created on first insert. Documents keep insertion order,
/// which is also the order of unsorted `find` results.
///
/// The store can be switched unavailable to simulate a lost connection, and
/// can be limited to a number of further deletions to simulate a failure
/// part-way through a multi-document operation.
///
/// # Example
///
/// ```
/// use mongodb::bson::doc;
/// use restaurant_api_repository::{DocumentStore, MemoryStore};
///
/// # async fn example() -> Result<(), restaurant_api_repository::ApiError> {
/// let store = MemoryStore::new();
/// store.insert_one("menu_items", doc! { "itemtype": "Entree" }).await?;
/// assert_eq!(store.count("menu_items", doc! {}).await?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unavailable: AtomicBool,
    delete_budget: Mutex<Option<u64>>,
}

impl MemoryStore {
    /// Create a new, empty, available store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call succeed (`true`) or fail with a database
    /// error (`false`).
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, AtomicOrdering::SeqCst);
    }

    /// Allow only `budget` more successful deletions; later ones fail with a
    /// database error. `None` removes the limit.
    pub fn set_delete_budget(&self, budget: Option<u64>) {
        if let Ok(mut current) = self.delete_budget.lock() {
            *current = budget;
        }
    }

    fn ensure_available(&self) -> Result<(), ApiError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(ApiError::database("Could not connect to database"));
        }
        Ok(())
    }

    fn take_delete(&self) -> Result<(), ApiError> {
        let mut budget = self
            .delete_budget
            .lock()
            .map_err(|_| ApiError::database("Store lock poisoned"))?;

        match budget.as_mut() {
            Some(0) => Err(ApiError::database("Could not remove document")),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Vec<Document>>>, ApiError> {
        self.ensure_available()?;
        self.collections
            .read()
            .map_err(|_| ApiError::database("Store lock poisoned"))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<Document>>>, ApiError> {
        self.ensure_available()?;
        self.collections
            .write()
            .map_err(|_| ApiError::database("Store lock poisoned"))
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::Null => 0,
        Bson::Double(_) | Bson::Int32(_) | Bson::Int64(_) => 1,
        Bson::String(_) => 2,
        Bson::ObjectId(_) => 3,
        Bson::Boolean(_) => 4,
        Bson::DateTime(_) => 5,
        _ => 6,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}

/// Order two field values. Missing fields sort like `null`, before anything else.
fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let a = a.unwrap_or(&Bson::Null);
    let b = b.unwrap_or(&Bson::Null);

    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => x.cmp(y),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
        _ => match (as_f64(a), as_f64(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => type_rank(a).cmp(&type_rank(b)),
        },
    }
}

fn descending(direction: &Bson) -> bool {
    as_f64(direction).is_some_and(|d| d < 0.0)
}

fn sort_documents(documents: &mut [Document], sort: &Document) {
    documents.sort_by(|a, b| {
        for (key, direction) in sort {
            let ordering = compare_values(a.get(key), b.get(key));
            let ordering = if descending(direction) {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), ApiError> {
        self.ensure_available()
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Vec<Document>, ApiError> {
        let collections = self.read()?;
        let mut documents: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|document| matches(document, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = sort {
            sort_documents(&mut documents, &sort);
        }

        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, ApiError> {
        let collections = self.read()?;
        Ok(collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|document| matches(document, &filter))
                .cloned()
        }))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<ObjectId, ApiError> {
        let mut collections = self.write()?;

        let given_id = match document.get(ID) {
            Some(Bson::ObjectId(id)) => Some(*id),
            Some(other) => {
                return Err(ApiError::database(format!(
                    "Unsupported _id value {}",
                    other
                )))
            }
            None => None,
        };

        let (id, stored) = match given_id {
            Some(id) => (id, document),
            None => {
                let id = ObjectId::new();
                let mut stored = Document::new();
                stored.insert(ID, id);
                for (key, value) in document {
                    stored.insert(key, value);
                }
                (id, stored)
            }
        };

        let documents = collections.entry(collection.to_string()).or_default();
        if documents
            .iter()
            .any(|existing| existing.get_object_id(ID).ok() == Some(id))
        {
            return Err(ApiError::database(format!("Duplicate key {}", id)));
        }
        documents.push(stored);

        Ok(id)
    }

    async fn replace_one(
        &self,
        collection: &str,
        id: ObjectId,
        document: Document,
    ) -> Result<(), ApiError> {
        let mut collections = self.write()?;

        let Some(existing) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.get_object_id(ID).ok() == Some(id)))
        else {
            return Err(ApiError::not_found(collection, &id.to_hex()));
        };

        let mut replacement = Document::new();
        replacement.insert(ID, id);
        for (key, value) in document {
            if key != ID {
                replacement.insert(key, value);
            }
        }
        *existing = replacement;

        Ok(())
    }

    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<u64, ApiError> {
        let mut collections = self.write()?;
        self.take_delete()?;

        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match documents
            .iter()
            .position(|d| d.get_object_id(ID).ok() == Some(id))
        {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, ApiError> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).count() as u64)
            .unwrap_or(0))
    }
}
