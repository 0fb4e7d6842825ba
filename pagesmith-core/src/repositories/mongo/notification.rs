use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::Collection;

use pagesmith_common::models::{DocId, Notification};
use pagesmith_common::traits::repository_traits::{NotificationRepo, UpdateReport};
use pagesmith_common::Error;

use crate::db::Database;
use crate::repositories::mongo::{
    drain, ensure_collection, inserted_doc_id, report, COLLECTION_NOTIFICATIONS,
};

pub struct NotificationRepository {
    collection: Collection<Notification>,
}

impl NotificationRepository {
    pub async fn connect(db: &Database) -> Result<Self, Error> {
        ensure_collection(
            db.handle(),
            COLLECTION_NOTIFICATIONS,
            Notification::indexes(),
        )
        .await?;
        Ok(Self {
            collection: db.handle().collection(COLLECTION_NOTIFICATIONS),
        })
    }
}

#[async_trait]
impl NotificationRepo for NotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<DocId, Error> {
        notification.validate()?;
        let result = self.collection.insert_one(notification).await?;
        inserted_doc_id(&result)
    }

    async fn list_for_user(&self, user_id: DocId, limit: i64) -> Result<Vec<Notification>, Error> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id.as_object_id() })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?;
        drain(cursor).await
    }

    async fn mark_seen(&self, id: DocId) -> Result<UpdateReport, Error> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": { "seen": true } },
            )
            .await?;
        Ok(report(result))
    }

    async fn delete_by_user(&self, user_id: DocId) -> Result<u64, Error> {
        let result = self
            .collection
            .delete_many(doc! { "user_id": user_id.as_object_id() })
            .await?;
        Ok(result.deleted_count)
    }
}
