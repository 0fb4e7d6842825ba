// src/repositories/mongo/user.rs

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::Collection;

use pagesmith_common::models::{DocId, User};
use pagesmith_common::traits::repository_traits::{UpdateReport, UserRepo};
use pagesmith_common::Error;

use crate::db::Database;
use crate::repositories::mongo::{
    classify_duplicate, drain, ensure_collection, inserted_doc_id, report, COLLECTION_USERS,
};

pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub async fn connect(db: &Database) -> Result<Self, Error> {
        ensure_collection(db.handle(), COLLECTION_USERS, User::indexes()).await?;
        Ok(Self {
            collection: db.handle().collection(COLLECTION_USERS),
        })
    }
}

#[async_trait]
impl UserRepo for UserRepository {
    async fn create(&self, user: &User) -> Result<DocId, Error> {
        user.validate()?;
        let result = self
            .collection
            .insert_one(user)
            .await
            .map_err(|e| classify_duplicate(e, "a user with this username or email already exists"))?;
        inserted_doc_id(&result)
    }

    async fn get(&self, id: DocId) -> Result<Option<User>, Error> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id.as_object_id() })
            .await?)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        Ok(self
            .collection
            .find_one(doc! { "username": username })
            .await?)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, Error> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .await?;
        Ok(count > 0)
    }

    async fn update_fields(&self, id: DocId, fields: Document) -> Result<UpdateReport, Error> {
        let result = self
            .collection
            .update_one(doc! { "_id": id.as_object_id() }, doc! { "$set": fields })
            .await
            .map_err(|e| classify_duplicate(e, "another user already has this value"))?;
        Ok(report(result))
    }

    async fn delete(&self, id: DocId) -> Result<u64, Error> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn list_all(&self, limit: i64, skip: u64) -> Result<Vec<User>, Error> {
        let cursor = self
            .collection
            .find(doc! {})
            .skip(skip)
            .limit(limit)
            .await?;
        drain(cursor).await
    }
}
