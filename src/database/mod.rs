pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

/// Erros da camada de persistência
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("document encoding error: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("document decoding error: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    #[error("duplicate value for unique field '{0}'")]
    DuplicateKey(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The six collections served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Donations,
    Donors,
    Community,
    Volunteers,
    Testimonials,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Users,
        Resource::Donations,
        Resource::Donors,
        Resource::Community,
        Resource::Volunteers,
        Resource::Testimonials,
    ];

    pub fn collection_name(self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Donations => "all-disaster",
            Resource::Donors => "donars",
            Resource::Community => "community",
            Resource::Volunteers => "volunteers",
            Resource::Testimonials => "testimonials",
        }
    }

    /// Users live in the accounts database, everything else in the data database.
    pub fn is_account_data(self) -> bool {
        matches!(self, Resource::Users)
    }

    /// Singular, lower-case name used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Resource::Users => "user",
            Resource::Donations => "donation",
            Resource::Donors => "donor",
            Resource::Community => "community post",
            Resource::Volunteers => "volunteer",
            Resource::Testimonials => "testimonial",
        }
    }

    pub fn plural_label(self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Donations => "donations",
            Resource::Donors => "donors",
            Resource::Community => "community posts",
            Resource::Volunteers => "volunteers",
            Resource::Testimonials => "testimonials",
        }
    }

    /// Label with the first letter capitalised ("Donation", "Community post").
    pub fn title(self) -> String {
        let label = self.label();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Ordering and projection applied when listing the collection.
    pub fn list_options(self) -> ListOptions {
        match self {
            Resource::Users => ListOptions {
                sort: None,
                hidden: &["password"],
            },
            Resource::Donors => ListOptions {
                sort: Some(SortKey::descending("amount")),
                hidden: &[],
            },
            Resource::Community => ListOptions {
                sort: Some(SortKey::descending("timestamp")),
                hidden: &[],
            },
            _ => ListOptions::default(),
        }
    }

    /// Fields that must hold distinct values across the collection.
    pub fn unique_fields(self) -> &'static [&'static str] {
        match self {
            Resource::Users => &["email"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static str,
    pub descending: bool,
}

impl SortKey {
    pub fn ascending(field: &'static str) -> Self {
        Self { field, descending: false }
    }

    pub fn descending(field: &'static str) -> Self {
        Self { field, descending: true }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub sort: Option<SortKey>,
    /// Fields removed from every returned document.
    pub hidden: &'static [&'static str],
}

/// Result of a `$set` style update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Storage backend consulted by the handlers.
///
/// Every operation touches a single collection and at most one document,
/// except `find_all`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Checks that the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    async fn find_all(&self, resource: Resource, options: &ListOptions) -> StoreResult<Vec<Document>>;

    async fn find_by_id(&self, resource: Resource, id: &ObjectId) -> StoreResult<Option<Document>>;

    /// First document whose `field` equals `value`.
    async fn find_one_by(&self, resource: Resource, field: &str, value: Bson) -> StoreResult<Option<Document>>;

    /// Inserts the document and returns the generated identifier.
    async fn insert(&self, resource: Resource, document: Document) -> StoreResult<Bson>;

    /// Overwrites only the fields present in `changes`.
    async fn update_fields(&self, resource: Resource, id: &ObjectId, changes: Document) -> StoreResult<UpdateOutcome>;

    /// Returns the number of removed documents.
    async fn delete(&self, resource: Resource, id: &ObjectId) -> StoreResult<u64>;
}
