use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::Collection;

use pagesmith_common::models::{BusinessInfo, DocId};
use pagesmith_common::traits::repository_traits::{BusinessInfoRepo, UpdateReport};
use pagesmith_common::Error;

use crate::crypto::Encryptor;
use crate::db::Database;
use crate::repositories::mongo::{
    classify_duplicate, ensure_collection, inserted_doc_id, report, COLLECTION_BUSINESS_INFO,
};

const DUPLICATE_MSG: &str = "business info for this user already exists";

/// BusinessInfo repository. The page access token is encrypted before any
/// write and decrypted on read; plaintext never reaches the collection.
#[derive(Clone)]
pub struct BusinessInfoRepository {
    collection: Collection<BusinessInfo>,
    encryptor: Encryptor,
}

impl BusinessInfoRepository {
    pub async fn connect(db: &Database, encryptor: Encryptor) -> Result<Self, Error> {
        ensure_collection(db.handle(), COLLECTION_BUSINESS_INFO, BusinessInfo::indexes()).await?;
        Ok(Self {
            collection: db.handle().collection(COLLECTION_BUSINESS_INFO),
            encryptor,
        })
    }

    fn seal(&self, info: &BusinessInfo) -> Result<BusinessInfo, Error> {
        let mut sealed = info.clone();
        if let Some(token) = &info.facebook_page_access_token {
            sealed.facebook_page_access_token = Some(self.encryptor.encrypt(token)?);
        }
        Ok(sealed)
    }

    fn open(&self, mut info: BusinessInfo) -> Result<BusinessInfo, Error> {
        if let Some(token) = &info.facebook_page_access_token {
            info.facebook_page_access_token = Some(self.encryptor.decrypt(token)?);
        }
        Ok(info)
    }
}

#[async_trait]
impl BusinessInfoRepo for BusinessInfoRepository {
    async fn create(&self, info: &BusinessInfo) -> Result<DocId, Error> {
        info.validate()?;
        let sealed = self.seal(info)?;
        let result = self
            .collection
            .insert_one(&sealed)
            .await
            .map_err(|e| classify_duplicate(e, DUPLICATE_MSG))?;
        inserted_doc_id(&result)
    }

    async fn get_by_user(&self, user_id: DocId) -> Result<Option<BusinessInfo>, Error> {
        let found = self
            .collection
            .find_one(doc! { "user_id": user_id.as_object_id() })
            .await?;
        found.map(|info| self.open(info)).transpose()
    }

    async fn replace_by_user(
        &self,
        user_id: DocId,
        info: &BusinessInfo,
    ) -> Result<UpdateReport, Error> {
        info.validate()?;
        let mut sealed = self.seal(info)?;
        sealed.id = None;
        sealed.user_id = user_id.as_object_id();
        let result = self
            .collection
            .replace_one(doc! { "user_id": user_id.as_object_id() }, &sealed)
            .await
            .map_err(|e| classify_duplicate(e, DUPLICATE_MSG))?;
        Ok(report(result))
    }

    async fn update_fields_by_user(
        &self,
        user_id: DocId,
        fields: Document,
    ) -> Result<UpdateReport, Error> {
        let result = self
            .collection
            .update_one(
                doc! { "user_id": user_id.as_object_id() },
                doc! { "$set": fields },
            )
            .await
            .map_err(|e| classify_duplicate(e, "another business already uses this page"))?;
        Ok(report(result))
    }

    async fn set_page_credentials(
        &self,
        user_id: DocId,
        page_id: &str,
        access_token: &str,
    ) -> Result<UpdateReport, Error> {
        let sealed_token = self.encryptor.encrypt(access_token)?;
        self.update_fields_by_user(
            user_id,
            doc! {
                "facebook_page_id": page_id,
                "facebook_page_access_token": sealed_token,
            },
        )
        .await
    }

    async fn delete_by_user(&self, user_id: DocId) -> Result<u64, Error> {
        let result = self
            .collection
            .delete_many(doc! { "user_id": user_id.as_object_id() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn exists_for_user(&self, user_id: DocId) -> Result<bool, Error> {
        let count = self
            .collection
            .count_documents(doc! { "user_id": user_id.as_object_id() })
            .await?;
        Ok(count > 0)
    }
}
