// src/repositories/mongo/post.rs

use async_trait::async_trait;
use mongodb::bson::{doc, to_bson, DateTime};
use mongodb::Collection;

use pagesmith_common::models::{DocId, Post, PostStatus};
use pagesmith_common::traits::repository_traits::{PostRepo, UpdateReport};
use pagesmith_common::Error;

use crate::db::Database;
use crate::repositories::mongo::{drain, ensure_collection, inserted_doc_id, report, COLLECTION_POSTS};

pub struct PostRepository {
    collection: Collection<Post>,
}

impl PostRepository {
    pub async fn connect(db: &Database) -> Result<Self, Error> {
        ensure_collection(db.handle(), COLLECTION_POSTS, Post::indexes()).await?;
        Ok(Self {
            collection: db.handle().collection(COLLECTION_POSTS),
        })
    }

    /// Transition a draft to a terminal status. The filter requires the post
    /// to still be a draft, so terminal posts yield matched = 0.
    async fn transition(&self, id: DocId, to: PostStatus) -> Result<UpdateReport, Error> {
        let result = self
            .collection
            .update_one(
                doc! {
                    "_id": id.as_object_id(),
                    "status": to_bson(&PostStatus::Draft)?,
                },
                doc! { "$set": {
                    "status": to_bson(&to)?,
                    "updated_at": DateTime::now(),
                } },
            )
            .await?;
        Ok(report(result))
    }
}

#[async_trait]
impl PostRepo for PostRepository {
    async fn create(&self, post: &Post) -> Result<DocId, Error> {
        post.validate()?;
        let result = self.collection.insert_one(post).await?;
        inserted_doc_id(&result)
    }

    async fn get(&self, id: DocId) -> Result<Option<Post>, Error> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id.as_object_id() })
            .await?)
    }

    async fn update_content(
        &self,
        id: DocId,
        title: &str,
        content: &str,
    ) -> Result<UpdateReport, Error> {
        let content_len = content.chars().count();
        if !(100..=1000).contains(&content_len) {
            return Err(Error::Validation(
                "content must be 100-1000 characters".to_string(),
            ));
        }
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": {
                    "title": title,
                    "content": content,
                    "updated_at": DateTime::now(),
                } },
            )
            .await?;
        Ok(report(result))
    }

    async fn accept(&self, id: DocId) -> Result<UpdateReport, Error> {
        self.transition(id, PostStatus::Accepted).await
    }

    async fn reject(&self, id: DocId) -> Result<UpdateReport, Error> {
        self.transition(id, PostStatus::Rejected).await
    }

    async fn delete(&self, id: DocId) -> Result<u64, Error> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn delete_by_user(&self, user_id: DocId) -> Result<u64, Error> {
        let result = self
            .collection
            .delete_many(doc! { "user_id": user_id.as_object_id() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn list_by_user(
        &self,
        user_id: DocId,
        status: Option<PostStatus>,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Post>, Error> {
        let mut filter = doc! { "user_id": user_id.as_object_id() };
        if let Some(status) = status {
            filter.insert("status", to_bson(&status)?);
        }
        let cursor = self.collection.find(filter).skip(skip).limit(limit).await?;
        drain(cursor).await
    }
}
