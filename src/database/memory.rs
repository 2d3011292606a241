use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use super::{DocumentStore, ListOptions, Resource, StoreError, StoreResult, UpdateOutcome};

/// In-process document store with the same observable behaviour as
/// [`MongoStore`](super::MongoStore). Documents keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Resource, Vec<Document>>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    pub fn count(&self, resource: Resource) -> usize {
        self.collections
            .read()
            .map(|guard| guard.get(&resource).map(Vec::len).unwrap_or_default())
            .unwrap_or_default()
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<Resource, Vec<Document>>>> {
        self.check_online()?;
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<Resource, Vec<Document>>>> {
        self.check_online()?;
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn has_id(document: &Document, id: &ObjectId) -> bool {
    matches!(document.get("_id"), Some(Bson::ObjectId(existing)) if existing == id)
}

/// Rank of a BSON type in the server's comparison order.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => 0,
        Some(Bson::Int32(_)) | Some(Bson::Int64(_)) | Some(Bson::Double(_)) | Some(Bson::Decimal128(_)) => 1,
        Some(Bson::String(_)) | Some(Bson::Symbol(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::Binary(_)) => 5,
        Some(Bson::ObjectId(_)) => 6,
        Some(Bson::Boolean(_)) => 7,
        Some(Bson::DateTime(_)) => 8,
        Some(Bson::Timestamp(_)) => 9,
        Some(_) => 10,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

/// Ascending comparison of two field values, mongo style: missing and null
/// sort before numbers, numbers before strings, and so on.
fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (Some(x), Some(y)) => {
            if let (Some(x), Some(y)) = (as_number(x), as_number(y)) {
                return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            }
            match (x, y) {
                (Bson::String(x), Bson::String(y)) => x.cmp(y),
                (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
                (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
                (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
                _ => Ordering::Equal,
            }
        }
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }

    async fn find_all(&self, resource: Resource, options: &ListOptions) -> StoreResult<Vec<Document>> {
        let collections = self.read()?;
        let mut documents = collections.get(&resource).cloned().unwrap_or_default();
        drop(collections);

        if let Some(sort) = options.sort {
            documents.sort_by(|a, b| {
                let ordering = compare_values(a.get(sort.field), b.get(sort.field));
                if sort.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        for document in &mut documents {
            for field in options.hidden {
                document.remove(*field);
            }
        }

        Ok(documents)
    }

    async fn find_by_id(&self, resource: Resource, id: &ObjectId) -> StoreResult<Option<Document>> {
        let collections = self.read()?;
        Ok(collections
            .get(&resource)
            .and_then(|documents| documents.iter().find(|d| has_id(d, id)))
            .cloned())
    }

    async fn find_one_by(&self, resource: Resource, field: &str, value: Bson) -> StoreResult<Option<Document>> {
        let collections = self.read()?;
        Ok(collections
            .get(&resource)
            .and_then(|documents| documents.iter().find(|d| d.get(field) == Some(&value)))
            .cloned())
    }

    async fn insert(&self, resource: Resource, document: Document) -> StoreResult<Bson> {
        let mut collections = self.write()?;
        let documents = collections.entry(resource).or_default();

        for field in resource.unique_fields() {
            if let Some(value) = document.get(*field) {
                if documents.iter().any(|d| d.get(*field) == Some(value)) {
                    return Err(StoreError::DuplicateKey(field.to_string()));
                }
            }
        }

        let id = match document.get("_id") {
            Some(existing) => existing.clone(),
            None => Bson::ObjectId(ObjectId::new()),
        };

        // _id always comes first, as the server stores it
        let mut stored = Document::new();
        stored.insert("_id", id.clone());
        for (key, value) in document {
            if key != "_id" {
                stored.insert(key, value);
            }
        }
        documents.push(stored);

        Ok(id)
    }

    async fn update_fields(&self, resource: Resource, id: &ObjectId, changes: Document) -> StoreResult<UpdateOutcome> {
        let mut collections = self.write()?;
        let Some(document) = collections
            .get_mut(&resource)
            .and_then(|documents| documents.iter_mut().find(|d| has_id(d, id)))
        else {
            return Ok(UpdateOutcome { matched: 0, modified: 0 });
        };

        let mut modified = false;
        for (key, value) in changes {
            if document.get(&key) != Some(&value) {
                document.insert(key, value);
                modified = true;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete(&self, resource: Resource, id: &ObjectId) -> StoreResult<u64> {
        let mut collections = self.write()?;
        let Some(documents) = collections.get_mut(&resource) else {
            return Ok(0);
        };

        match documents.iter().position(|d| has_id(d, id)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
