// src/repositories/mongo/schedule.rs

use async_trait::async_trait;
use chrono::NaiveTime;
use mongodb::bson::{doc, to_bson, Document};
use mongodb::Collection;
use uuid::Uuid;

use pagesmith_common::models::schedule::{COMPETITOR_LIST, INTERACTION_LIST, POSTS_LIST};
use pagesmith_common::models::{
    CompetitorAnalysisSlot, CompetitorAnalysisSlotUpdate, DayOfWeek, DocId, InteractionCheck,
    InteractionCheckUpdate, Schedule, ScheduledPost, ScheduledPostUpdate,
};
use pagesmith_common::traits::repository_traits::{ScheduleRepo, UpdateReport};
use pagesmith_common::Error;

use crate::db::Database;
use crate::repositories::mongo::{
    classify_duplicate, ensure_collection, inserted_doc_id, report, COLLECTION_SCHEDULES,
};

const DUPLICATE_MSG: &str = "a schedule for this user already exists";

pub struct ScheduleRepository {
    collection: Collection<Schedule>,
}

fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

fn assign_item_ids(mut schedule: Schedule) -> Schedule {
    for post in &mut schedule.posts {
        post.id = Some(new_item_id());
    }
    for slot in &mut schedule.competitor_analysis {
        slot.id = Some(new_item_id());
    }
    for check in &mut schedule.interaction_checks {
        check.id = Some(new_item_id());
    }
    schedule
}

fn validate_prompt_len(text: &str, what: &str) -> Result<(), Error> {
    let len = text.chars().count();
    if !(10..=1000).contains(&len) {
        return Err(Error::Validation(format!("{} must be 10-1000 characters", what)));
    }
    Ok(())
}

impl ScheduleRepository {
    pub async fn connect(db: &Database) -> Result<Self, Error> {
        ensure_collection(db.handle(), COLLECTION_SCHEDULES, Schedule::indexes()).await?;
        Ok(Self {
            collection: db.handle().collection(COLLECTION_SCHEDULES),
        })
    }

    /// Fail with `SchedulingConflict` if any other item in `list` occupies
    /// the candidate slot. The check runs store-side via `$elemMatch` on the
    /// exact serialized (day, time) pair.
    async fn check_conflict(
        &self,
        user_id: DocId,
        list: &str,
        day: DayOfWeek,
        time: NaiveTime,
        exclude_id: Option<&str>,
    ) -> Result<(), Error> {
        let mut element = doc! {
            "day_of_week": to_bson(&day)?,
            "time_of_day": to_bson(&time)?,
        };
        if let Some(exclude) = exclude_id {
            element.insert("id", doc! { "$ne": exclude });
        }
        let mut filter = doc! { "user_id": user_id.as_object_id() };
        filter.insert(list, doc! { "$elemMatch": element });

        if self.collection.find_one(filter).await?.is_some() {
            return Err(Error::SchedulingConflict {
                list: list.to_string(),
                day: day.to_string(),
                time: time.to_string(),
            });
        }
        Ok(())
    }

    async fn require_schedule(&self, user_id: DocId) -> Result<Schedule, Error> {
        self.get_by_user(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("schedule for user {} not found", user_id)))
    }

    async fn push_item(
        &self,
        user_id: DocId,
        list: &str,
        item: mongodb::bson::Bson,
    ) -> Result<UpdateReport, Error> {
        let mut push = Document::new();
        push.insert(list, item);
        let result = self
            .collection
            .update_one(
                doc! { "user_id": user_id.as_object_id() },
                doc! { "$push": push },
            )
            .await?;
        Ok(report(result))
    }

    async fn set_item_fields(
        &self,
        user_id: DocId,
        list: &str,
        item_id: &str,
        set: Document,
    ) -> Result<UpdateReport, Error> {
        if set.is_empty() {
            return Err(Error::Validation("no fields to update".to_string()));
        }
        let mut filter = doc! { "user_id": user_id.as_object_id() };
        filter.insert(format!("{}.id", list), item_id);
        let result = self
            .collection
            .update_one(filter, doc! { "$set": set })
            .await?;
        Ok(report(result))
    }

    async fn pull_item(
        &self,
        user_id: DocId,
        list: &str,
        item_id: &str,
    ) -> Result<UpdateReport, Error> {
        let mut pull = Document::new();
        pull.insert(list, doc! { "id": item_id });
        let result = self
            .collection
            .update_one(
                doc! { "user_id": user_id.as_object_id() },
                doc! { "$pull": pull },
            )
            .await?;
        Ok(report(result))
    }
}

#[async_trait]
impl ScheduleRepo for ScheduleRepository {
    async fn create(&self, schedule: Schedule) -> Result<Schedule, Error> {
        schedule.validate()?;
        let mut schedule = assign_item_ids(schedule);
        let result = self
            .collection
            .insert_one(&schedule)
            .await
            .map_err(|e| classify_duplicate(e, DUPLICATE_MSG))?;
        schedule.id = Some(inserted_doc_id(&result)?.as_object_id());
        Ok(schedule)
    }

    async fn get_by_user(&self, user_id: DocId) -> Result<Option<Schedule>, Error> {
        Ok(self
            .collection
            .find_one(doc! { "user_id": user_id.as_object_id() })
            .await?)
    }

    async fn replace_by_user(
        &self,
        user_id: DocId,
        schedule: Schedule,
    ) -> Result<(UpdateReport, Schedule), Error> {
        schedule.validate()?;
        let mut schedule = assign_item_ids(schedule);
        schedule.id = None;
        schedule.user_id = user_id.as_object_id();
        let result = self
            .collection
            .replace_one(doc! { "user_id": user_id.as_object_id() }, &schedule)
            .await?;
        Ok((report(result), schedule))
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

    async fn add_post(
        &self,
        user_id: DocId,
        mut item: ScheduledPost,
    ) -> Result<(UpdateReport, ScheduledPost), Error> {
        item.validate()?;
        item.id = Some(new_item_id());
        self.check_conflict(user_id, POSTS_LIST, item.day_of_week, item.time_of_day, None)
            .await?;
        let report = self
            .push_item(user_id, POSTS_LIST, to_bson(&item)?)
            .await?;
        Ok((report, item))
    }

    async fn update_post(
        &self,
        user_id: DocId,
        item_id: &str,
        update: ScheduledPostUpdate,
    ) -> Result<UpdateReport, Error> {
        if let Some(content) = &update.content {
            validate_prompt_len(content, "scheduled post content")?;
        }
        if update.day_of_week.is_some() || update.time_of_day.is_some() {
            let schedule = self.require_schedule(user_id).await?;
            let existing = schedule
                .posts
                .iter()
                .find(|p| p.id.as_deref() == Some(item_id))
                .ok_or_else(|| Error::NotFound(format!("scheduled post {} not found", item_id)))?;
            let day = update.day_of_week.unwrap_or(existing.day_of_week);
            let time = update.time_of_day.unwrap_or(existing.time_of_day);
            self.check_conflict(user_id, POSTS_LIST, day, time, Some(item_id))
                .await?;
        }

        let mut set = Document::new();
        if let Some(day) = update.day_of_week {
            set.insert("posts.$.day_of_week", to_bson(&day)?);
        }
        if let Some(time) = update.time_of_day {
            set.insert("posts.$.time_of_day", to_bson(&time)?);
        }
        if let Some(content) = update.content {
            set.insert("posts.$.content", content);
        }
        if let Some(media_urls) = update.media_urls {
            set.insert("posts.$.media_urls", to_bson(&media_urls)?);
        }
        self.set_item_fields(user_id, POSTS_LIST, item_id, set).await
    }

    async fn remove_post(&self, user_id: DocId, item_id: &str) -> Result<UpdateReport, Error> {
        self.pull_item(user_id, POSTS_LIST, item_id).await
    }

    async fn add_competitor_analysis(
        &self,
        user_id: DocId,
        mut item: CompetitorAnalysisSlot,
    ) -> Result<(UpdateReport, CompetitorAnalysisSlot), Error> {
        item.validate()?;
        item.id = Some(new_item_id());
        self.check_conflict(
            user_id,
            COMPETITOR_LIST,
            item.day_of_week,
            item.time_of_day,
            None,
        )
        .await?;
        let report = self
            .push_item(user_id, COMPETITOR_LIST, to_bson(&item)?)
            .await?;
        Ok((report, item))
    }

    async fn update_competitor_analysis(
        &self,
        user_id: DocId,
        item_id: &str,
        update: CompetitorAnalysisSlotUpdate,
    ) -> Result<UpdateReport, Error> {
        if let Some(focus) = &update.analysis_focus {
            validate_prompt_len(focus, "analysis focus")?;
        }
        if update.day_of_week.is_some() || update.time_of_day.is_some() {
            let schedule = self.require_schedule(user_id).await?;
            let existing = schedule
                .competitor_analysis
                .iter()
                .find(|a| a.id.as_deref() == Some(item_id))
                .ok_or_else(|| {
                    Error::NotFound(format!("competitor analysis {} not found", item_id))
                })?;
            let day = update.day_of_week.unwrap_or(existing.day_of_week);
            let time = update.time_of_day.unwrap_or(existing.time_of_day);
            self.check_conflict(user_id, COMPETITOR_LIST, day, time, Some(item_id))
                .await?;
        }

        let mut set = Document::new();
        if let Some(day) = update.day_of_week {
            set.insert("competitor_analysis.$.day_of_week", to_bson(&day)?);
        }
        if let Some(time) = update.time_of_day {
            set.insert("competitor_analysis.$.time_of_day", to_bson(&time)?);
        }
        if let Some(focus) = update.analysis_focus {
            set.insert("competitor_analysis.$.analysis_focus", focus);
        }
        if let Some(keywords) = update.keywords {
            set.insert("competitor_analysis.$.keywords", to_bson(&keywords)?);
        }
        self.set_item_fields(user_id, COMPETITOR_LIST, item_id, set)
            .await
    }

    async fn remove_competitor_analysis(
        &self,
        user_id: DocId,
        item_id: &str,
    ) -> Result<UpdateReport, Error> {
        self.pull_item(user_id, COMPETITOR_LIST, item_id).await
    }

    async fn add_interaction_check(
        &self,
        user_id: DocId,
        mut item: InteractionCheck,
    ) -> Result<(UpdateReport, InteractionCheck), Error> {
        item.id = Some(new_item_id());
        self.check_conflict(
            user_id,
            INTERACTION_LIST,
            item.day_of_week,
            item.time_of_day,
            None,
        )
        .await?;
        let report = self
            .push_item(user_id, INTERACTION_LIST, to_bson(&item)?)
            .await?;
        Ok((report, item))
    }

    async fn update_interaction_check(
        &self,
        user_id: DocId,
        item_id: &str,
        update: InteractionCheckUpdate,
    ) -> Result<UpdateReport, Error> {
        if update.day_of_week.is_some() || update.time_of_day.is_some() {
            let schedule = self.require_schedule(user_id).await?;
            let existing = schedule
                .interaction_checks
                .iter()
                .find(|c| c.id.as_deref() == Some(item_id))
                .ok_or_else(|| {
                    Error::NotFound(format!("interaction check {} not found", item_id))
                })?;
            let day = update.day_of_week.unwrap_or(existing.day_of_week);
            let time = update.time_of_day.unwrap_or(existing.time_of_day);
            self.check_conflict(user_id, INTERACTION_LIST, day, time, Some(item_id))
                .await?;
        }

        let mut set = Document::new();
        if let Some(day) = update.day_of_week {
            set.insert("interaction_checks.$.day_of_week", to_bson(&day)?);
        }
        if let Some(time) = update.time_of_day {
            set.insert("interaction_checks.$.time_of_day", to_bson(&time)?);
        }
        self.set_item_fields(user_id, INTERACTION_LIST, item_id, set)
            .await
    }

    async fn remove_interaction_check(
        &self,
        user_id: DocId,
        item_id: &str,
    ) -> Result<UpdateReport, Error> {
        self.pull_item(user_id, INTERACTION_LIST, item_id).await
    }
}
