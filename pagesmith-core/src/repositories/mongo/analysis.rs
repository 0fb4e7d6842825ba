use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::Collection;

use pagesmith_common::models::{Analysis, DocId};
use pagesmith_common::traits::repository_traits::AnalysisRepo;
use pagesmith_common::Error;

use crate::db::Database;
use crate::repositories::mongo::{drain, ensure_collection, inserted_doc_id, COLLECTION_ANALYSES};

pub struct AnalysisRepository {
    collection: Collection<Analysis>,
}

impl AnalysisRepository {
    pub async fn connect(db: &Database) -> Result<Self, Error> {
        ensure_collection(db.handle(), COLLECTION_ANALYSES, Analysis::indexes()).await?;
        Ok(Self {
            collection: db.handle().collection(COLLECTION_ANALYSES),
        })
    }
}

#[async_trait]
impl AnalysisRepo for AnalysisRepository {
    async fn create(&self, analysis: &Analysis) -> Result<DocId, Error> {
        analysis.validate()?;
        let result = self.collection.insert_one(analysis).await?;
        inserted_doc_id(&result)
    }

    async fn list_for_post(&self, post_id: DocId) -> Result<Vec<Analysis>, Error> {
        let cursor = self
            .collection
            .find(doc! { "post_id": post_id.as_object_id() })
            .await?;
        drain(cursor).await
    }

    async fn list_for_user(
        &self,
        user_id: DocId,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Analysis>, Error> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id.as_object_id() })
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
