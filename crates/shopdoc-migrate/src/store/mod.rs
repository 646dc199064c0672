//! Document store access

pub mod mongo;

use async_trait::async_trait;
use bson::Document;

use crate::error::Result;
use crate::indexes::IndexSpec;

pub use mongo::MongoStore;

/// Write side of the destination document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Remove the collection and everything in it. Dropping a missing collection succeeds.
    async fn drop_collection(&self, collection: &str) -> Result<()>;

    /// Insert the batch in one operation, returning how many documents were stored
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<usize>;

    /// Declare an index; an identical existing index is left alone
    async fn create_index(&self, index: &IndexSpec) -> Result<()>;

    async fn count_documents(&self, collection: &str) -> Result<u64>;

    /// Any one document from the collection
    async fn find_one(&self, collection: &str) -> Result<Option<Document>>;

    /// Release the client. Safe to call on every exit path.
    async fn close(&self);
}
