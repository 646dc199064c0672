//! Collection loader: drop, then bulk insert

use bson::Document;
use tracing::{info, instrument};

use crate::collection::Collection;
use crate::error::Result;
use crate::store::DocumentStore;

/// Replace the destination collection with `documents`.
///
/// The drop always happens, so an empty batch still leaves an empty collection.
/// Returns the number of documents inserted.
#[instrument(skip_all, fields(collection = %collection, documents = documents.len()))]
pub async fn load_collection(
    store: &dyn DocumentStore,
    collection: Collection,
    documents: Vec<Document>,
) -> Result<usize> {
    store.drop_collection(collection.name()).await?;

    if documents.is_empty() {
        info!("No documents to insert; collection cleared");
        return Ok(0);
    }

    let inserted = store.insert_many(collection.name(), documents).await?;
    info!(inserted, "Collection loaded");
    Ok(inserted)
}
