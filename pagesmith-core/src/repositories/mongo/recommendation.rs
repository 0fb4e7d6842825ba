use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::Collection;

use pagesmith_common::models::{DocId, Recommendation};
use pagesmith_common::traits::repository_traits::RecommendationRepo;
use pagesmith_common::Error;

use crate::db::Database;
use crate::repositories::mongo::{
    drain, ensure_collection, inserted_doc_id, COLLECTION_RECOMMENDATIONS,
};

pub struct RecommendationRepository {
    collection: Collection<Recommendation>,
}

impl RecommendationRepository {
    pub async fn connect(db: &Database) -> Result<Self, Error> {
        ensure_collection(
            db.handle(),
            COLLECTION_RECOMMENDATIONS,
            Recommendation::indexes(),
        )
        .await?;
        Ok(Self {
            collection: db.handle().collection(COLLECTION_RECOMMENDATIONS),
        })
    }
}

#[async_trait]
impl RecommendationRepo for RecommendationRepository {
    async fn create(&self, recommendation: &Recommendation) -> Result<DocId, Error> {
        recommendation.validate()?;
        let result = self.collection.insert_one(recommendation).await?;
        inserted_doc_id(&result)
    }

    async fn get(&self, id: DocId) -> Result<Option<Recommendation>, Error> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id.as_object_id() })
            .await?)
    }

    async fn list_for_user(
        &self,
        user_id: DocId,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Recommendation>, Error> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id.as_object_id() })
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        drain(cursor).await
    }

    async fn delete_by_user(&self, user_id: DocId) -> Result<u64, Error> {
        let result = self
            .collection
            .delete_many(doc! { "user_id": user_id.as_object_id() })
            .await?;
        Ok(result.deleted_count)
    }
}
