// pagesmith-core/src/repositories/mongo/mod.rs

use futures_util::TryStreamExt;
use mongodb::bson::Document;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::results::{InsertOneResult, UpdateResult};
use mongodb::IndexModel;
use serde::de::DeserializeOwned;

use pagesmith_common::models::{DocId, IndexSpec};
use pagesmith_common::traits::repository_traits::UpdateReport;
use pagesmith_common::Error;

pub mod analysis;
pub mod business_info;
pub mod notification;
pub mod post;
pub mod recommendation;
pub mod schedule;
pub mod user;

pub const COLLECTION_USERS: &str = "users";
pub const COLLECTION_BUSINESS_INFO: &str = "business_info";
pub const COLLECTION_POSTS: &str = "posts";
pub const COLLECTION_SCHEDULES: &str = "schedules";
pub const COLLECTION_NOTIFICATIONS: &str = "notifications";
pub const COLLECTION_RECOMMENDATIONS: &str = "recommendations";
pub const COLLECTION_ANALYSES: &str = "analyses";

/// Ensure the collection's declared indexes exist. `create_index` implicitly
/// creates the collection, and re-creating an identical index is a no-op, so
/// this is safe to call on every repository construction.
pub(crate) async fn ensure_collection(
    db: &mongodb::Database,
    name: &str,
    indexes: Vec<IndexSpec>,
) -> Result<(), Error> {
    let collection = db.collection::<Document>(name);
    for spec in indexes {
        let options = IndexOptions::builder()
            .name(spec.name.to_string())
            .unique(spec.unique)
            .sparse(spec.sparse)
            .build();
        let model = IndexModel::builder()
            .keys(spec.keys)
            .options(options)
            .build();
        collection.create_index(model).await?;
    }
    Ok(())
}

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

/// Turn a unique-index violation into [`Error::Duplicate`] so callers can
/// answer "already exists"; every other store error passes through.
pub(crate) fn classify_duplicate(err: mongodb::error::Error, what: &str) -> Error {
    if is_duplicate_key(&err) {
        Error::Duplicate(what.to_string())
    } else {
        Error::Database(err)
    }
}

pub(crate) fn inserted_doc_id(result: &InsertOneResult) -> Result<DocId, Error> {
    result
        .inserted_id
        .as_object_id()
        .map(DocId::from)
        .ok_or_else(|| Error::InvalidIdentifier(format!("unexpected inserted id: {}", result.inserted_id)))
}

pub(crate) fn report(result: UpdateResult) -> UpdateReport {
    UpdateReport {
        matched: result.matched_count,
        modified: result.modified_count,
    }
}

pub(crate) async fn drain<T>(mut cursor: mongodb::Cursor<T>) -> Result<Vec<T>, Error>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    let mut items = Vec::new();
    while let Some(item) = cursor.try_next().await? {
        items.push(item);
    }
    Ok(items)
}
