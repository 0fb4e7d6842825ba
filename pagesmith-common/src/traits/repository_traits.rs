use async_trait::async_trait;
use mongodb::bson::Document;
use serde::Serialize;

use crate::error::Error;
use crate::models::{
    Analysis, BusinessInfo, CompetitorAnalysisSlot, CompetitorAnalysisSlotUpdate, DocId,
    InteractionCheck, InteractionCheckUpdate, Notification, Post, PostStatus, Recommendation,
    Schedule, ScheduledPost, ScheduledPostUpdate, User,
};

/// Matched/modified counts from a partial update.
///
/// `matched == 0` means the target was not found; `modified == 0` with
/// `matched > 0` means the update was a no-op (values already equal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
}

impl UpdateReport {
    pub fn found(&self) -> bool {
        self.matched > 0
    }
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, user: &User) -> Result<DocId, Error>;
    async fn get(&self, id: DocId) -> Result<Option<User>, Error>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, Error>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, Error>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, Error>;
    async fn update_fields(&self, id: DocId, fields: Document) -> Result<UpdateReport, Error>;
    async fn delete(&self, id: DocId) -> Result<u64, Error>;
    async fn list_all(&self, limit: i64, skip: u64) -> Result<Vec<User>, Error>;
}

#[async_trait]
pub trait BusinessInfoRepo: Send + Sync {
    async fn create(&self, info: &BusinessInfo) -> Result<DocId, Error>;
    async fn get_by_user(&self, user_id: DocId) -> Result<Option<BusinessInfo>, Error>;
    async fn replace_by_user(
        &self,
        user_id: DocId,
        info: &BusinessInfo,
    ) -> Result<UpdateReport, Error>;
    async fn update_fields_by_user(
        &self,
        user_id: DocId,
        fields: Document,
    ) -> Result<UpdateReport, Error>;
    /// Stores the page id and the access token, encrypting the token at rest.
    async fn set_page_credentials(
        &self,
        user_id: DocId,
        page_id: &str,
        access_token: &str,
    ) -> Result<UpdateReport, Error>;
    async fn delete_by_user(&self, user_id: DocId) -> Result<u64, Error>;
    async fn exists_for_user(&self, user_id: DocId) -> Result<bool, Error>;
}

#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn create(&self, post: &Post) -> Result<DocId, Error>;
    async fn get(&self, id: DocId) -> Result<Option<Post>, Error>;
    async fn update_content(
        &self,
        id: DocId,
        title: &str,
        content: &str,
    ) -> Result<UpdateReport, Error>;
    /// DRAFT -> ACCEPTED; matched = 0 when the post is not a draft anymore.
    async fn accept(&self, id: DocId) -> Result<UpdateReport, Error>;
    /// DRAFT -> REJECTED; matched = 0 when the post is not a draft anymore.
    async fn reject(&self, id: DocId) -> Result<UpdateReport, Error>;
    async fn delete(&self, id: DocId) -> Result<u64, Error>;
    async fn delete_by_user(&self, user_id: DocId) -> Result<u64, Error>;
    async fn list_by_user(
        &self,
        user_id: DocId,
        status: Option<PostStatus>,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Post>, Error>;
}

#[async_trait]
pub trait ScheduleRepo: Send + Sync {
    /// Inserts the document, assigning ids to every embedded item.
    async fn create(&self, schedule: Schedule) -> Result<Schedule, Error>;
    async fn get_by_user(&self, user_id: DocId) -> Result<Option<Schedule>, Error>;
    async fn replace_by_user(
        &self,
        user_id: DocId,
        schedule: Schedule,
    ) -> Result<(UpdateReport, Schedule), Error>;
    async fn delete_by_user(&self, user_id: DocId) -> Result<u64, Error>;
    async fn exists_for_user(&self, user_id: DocId) -> Result<bool, Error>;

    async fn add_post(
        &self,
        user_id: DocId,
        item: ScheduledPost,
    ) -> Result<(UpdateReport, ScheduledPost), Error>;
    async fn update_post(
        &self,
        user_id: DocId,
        item_id: &str,
        update: ScheduledPostUpdate,
    ) -> Result<UpdateReport, Error>;
    async fn remove_post(&self, user_id: DocId, item_id: &str) -> Result<UpdateReport, Error>;

    async fn add_competitor_analysis(
        &self,
        user_id: DocId,
        item: CompetitorAnalysisSlot,
    ) -> Result<(UpdateReport, CompetitorAnalysisSlot), Error>;
    async fn update_competitor_analysis(
        &self,
        user_id: DocId,
        item_id: &str,
        update: CompetitorAnalysisSlotUpdate,
    ) -> Result<UpdateReport, Error>;
    async fn remove_competitor_analysis(
        &self,
        user_id: DocId,
        item_id: &str,
    ) -> Result<UpdateReport, Error>;

    async fn add_interaction_check(
        &self,
        user_id: DocId,
        item: InteractionCheck,
    ) -> Result<(UpdateReport, InteractionCheck), Error>;
    async fn update_interaction_check(
        &self,
        user_id: DocId,
        item_id: &str,
        update: InteractionCheckUpdate,
    ) -> Result<UpdateReport, Error>;
    async fn remove_interaction_check(
        &self,
        user_id: DocId,
        item_id: &str,
    ) -> Result<UpdateReport, Error>;
}

#[async_trait]
pub trait NotificationRepo: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<DocId, Error>;
    /// Newest first.
    async fn list_for_user(&self, user_id: DocId, limit: i64) -> Result<Vec<Notification>, Error>;
    async fn mark_seen(&self, id: DocId) -> Result<UpdateReport, Error>;
    async fn delete_by_user(&self, user_id: DocId) -> Result<u64, Error>;
}

#[async_trait]
pub trait RecommendationRepo: Send + Sync {
    async fn create(&self, recommendation: &Recommendation) -> Result<DocId, Error>;
    async fn get(&self, id: DocId) -> Result<Option<Recommendation>, Error>;
    /// Newest first.
    async fn list_for_user(
        &self,
        user_id: DocId,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Recommendation>, Error>;
    async fn delete_by_user(&self, user_id: DocId) -> Result<u64, Error>;
}

#[async_trait]
pub trait AnalysisRepo: Send + Sync {
    async fn create(&self, analysis: &Analysis) -> Result<DocId, Error>;
    async fn list_for_post(&self, post_id: DocId) -> Result<Vec<Analysis>, Error>;
    async fn list_for_user(
        &self,
        user_id: DocId,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Analysis>, Error>;
    async fn delete_by_user(&self, user_id: DocId) -> Result<u64, Error>;
}
