use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use super::{DocumentStore, ListOptions, Resource, StoreError, StoreResult, UpdateOutcome};

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoStore {
    accounts: Database,
    data: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, accounts_db: &str, data_db: &str) -> StoreResult<Self> {
        let mut client_options = ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        let store = Self {
            accounts: client.database(accounts_db),
            data: client.database(data_db),
        };

        store.ping().await?;
        store.ensure_indexes().await;

        Ok(store)
    }

    fn collection(&self, resource: Resource) -> Collection<Document> {
        let db = if resource.is_account_data() {
            &self.accounts
        } else {
            &self.data
        };
        db.collection(resource.collection_name())
    }

    /// Creates the unique and ordering indexes. Failures are logged and ignored
    /// so the service still starts against a restricted account.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        for resource in Resource::ALL {
            for field in resource.unique_fields() {
                let index = IndexModel::builder()
                    .keys(single_field(field, 1))
                    .options(IndexOptions::builder().unique(true).build())
                    .build();

                match self.collection(resource).create_index(index).await {
                    Ok(_) => log::info!("   ✅ Unique index: {}({})", resource.collection_name(), field),
                    Err(e) => log::warn!(
                        "   ⚠️  Could not create unique index {}({}): {}",
                        resource.collection_name(),
                        field,
                        e
                    ),
                }
            }

            if let Some(sort) = resource.list_options().sort {
                let direction = if sort.descending { -1 } else { 1 };
                let index = IndexModel::builder()
                    .keys(single_field(sort.field, direction))
                    .build();

                match self.collection(resource).create_index(index).await {
                    Ok(_) => log::info!("   ✅ Index: {}({})", resource.collection_name(), sort.field),
                    Err(e) => log::debug!("   ℹ️  Index not created: {}", e),
                }
            }
        }

        log::info!("✅ Database indexes ready");
    }
}

fn single_field(field: &str, value: impl Into<Bson>) -> Document {
    let mut document = Document::new();
    document.insert(field, value.into());
    document
}

fn duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> StoreResult<()> {
        self.data.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find_all(&self, resource: Resource, options: &ListOptions) -> StoreResult<Vec<Document>> {
        let collection = self.collection(resource);
        let mut find = collection.find(doc! {});

        if let Some(sort) = options.sort {
            find = find.sort(single_field(sort.field, if sort.descending { -1 } else { 1 }));
        }

        if !options.hidden.is_empty() {
            let mut projection = Document::new();
            for field in options.hidden {
                projection.insert(*field, 0);
            }
            find = find.projection(projection);
        }

        let cursor = find.await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_by_id(&self, resource: Resource, id: &ObjectId) -> StoreResult<Option<Document>> {
        let document = self.collection(resource).find_one(doc! { "_id": *id }).await?;
        Ok(document)
    }

    async fn find_one_by(&self, resource: Resource, field: &str, value: Bson) -> StoreResult<Option<Document>> {
        let document = self
            .collection(resource)
            .find_one(single_field(field, value))
            .await?;
        Ok(document)
    }

    async fn insert(&self, resource: Resource, document: Document) -> StoreResult<Bson> {
        match self.collection(resource).insert_one(document).await {
            Ok(result) => Ok(result.inserted_id),
            Err(e) if duplicate_key(&e) => {
                let field = resource.unique_fields().first().copied().unwrap_or("_id");
                Err(StoreError::DuplicateKey(field.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_fields(&self, resource: Resource, id: &ObjectId, changes: Document) -> StoreResult<UpdateOutcome> {
        let result = self
            .collection(resource)
            .update_one(doc! { "_id": *id }, doc! { "$set": changes })
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete(&self, resource: Resource, id: &ObjectId) -> StoreResult<u64> {
        let result = self.collection(resource).delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();

        let uri = std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let store = MongoStore::connect(&uri, "relief_test_accounts", "relief_test_data").await;
        assert!(store.is_ok());

        let store = store.unwrap();
        let id = store
            .insert(Resource::Donations, doc! { "title": "Smoke test" })
            .await
            .unwrap();
        let id = id.as_object_id().unwrap();
        assert_eq!(store.delete(Resource::Donations, &id).await.unwrap(), 1);
    }
}
