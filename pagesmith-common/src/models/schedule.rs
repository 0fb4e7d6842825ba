use chrono::NaiveTime;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::Error;
use crate::models::IndexSpec;

/// Recurring weekly slot day. Slots are compared by exact
/// (day_of_week, time_of_day) equality everywhere; there is no wall-clock
/// arithmetic on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        };
        f.write_str(s)
    }
}

/// A scheduled AI post generation slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledPost {
    /// Assigned by the repository on insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub day_of_week: DayOfWeek,
    pub time_of_day: NaiveTime,
    pub content: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
}

/// A scheduled competitor-analysis slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorAnalysisSlot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub day_of_week: DayOfWeek,
    pub time_of_day: NaiveTime,
    pub analysis_focus: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A scheduled interaction-analysis check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub day_of_week: DayOfWeek,
    pub time_of_day: NaiveTime,
}

/// Per-user schedule document, 1:1 with the owning user. Items live embedded
/// in three sub-lists; within one sub-list no two items may share a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    #[serde(default)]
    pub posts: Vec<ScheduledPost>,
    #[serde(default)]
    pub competitor_analysis: Vec<CompetitorAnalysisSlot>,
    #[serde(default)]
    pub interaction_checks: Vec<InteractionCheck>,
}

pub const POSTS_LIST: &str = "posts";
pub const COMPETITOR_LIST: &str = "competitor_analysis";
pub const INTERACTION_LIST: &str = "interaction_checks";

fn ensure_unique_slots<I>(slots: I, list: &str) -> Result<(), Error>
where
    I: Iterator<Item = (DayOfWeek, NaiveTime)>,
{
    let mut seen = HashSet::new();
    for (day, time) in slots {
        if !seen.insert((day, time)) {
            return Err(Error::SchedulingConflict {
                list: list.to_string(),
                day: day.to_string(),
                time: time.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_prompt(text: &str, what: &str) -> Result<(), Error> {
    let len = text.chars().count();
    if !(10..=1000).contains(&len) {
        return Err(Error::Validation(format!(
            "{} must be 10-1000 characters",
            what
        )));
    }
    Ok(())
}

impl ScheduledPost {
    pub fn validate(&self) -> Result<(), Error> {
        validate_prompt(&self.content, "scheduled post content")
    }
}

impl CompetitorAnalysisSlot {
    pub fn validate(&self) -> Result<(), Error> {
        validate_prompt(&self.analysis_focus, "analysis focus")
    }
}

impl Schedule {
    /// Whole-document validation: item constraints plus internal slot
    /// uniqueness per sub-list.
    pub fn validate(&self) -> Result<(), Error> {
        for post in &self.posts {
            post.validate()?;
        }
        for slot in &self.competitor_analysis {
            slot.validate()?;
        }
        ensure_unique_slots(
            self.posts.iter().map(|p| (p.day_of_week, p.time_of_day)),
            POSTS_LIST,
        )?;
        ensure_unique_slots(
            self.competitor_analysis
                .iter()
                .map(|a| (a.day_of_week, a.time_of_day)),
            COMPETITOR_LIST,
        )?;
        ensure_unique_slots(
            self.interaction_checks
                .iter()
                .map(|c| (c.day_of_week, c.time_of_day)),
            INTERACTION_LIST,
        )?;
        Ok(())
    }

    pub fn indexes() -> Vec<IndexSpec> {
        vec![IndexSpec {
            keys: doc! { "user_id": 1 },
            name: "user_index",
            unique: true,
            sparse: false,
        }]
    }
}

/// Partial update for an embedded scheduled post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduledPostUpdate {
    pub day_of_week: Option<DayOfWeek>,
    pub time_of_day: Option<NaiveTime>,
    pub content: Option<String>,
    pub media_urls: Option<Vec<String>>,
}

/// Partial update for an embedded competitor-analysis slot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompetitorAnalysisSlotUpdate {
    pub day_of_week: Option<DayOfWeek>,
    pub time_of_day: Option<NaiveTime>,
    pub analysis_focus: Option<String>,
    pub keywords: Option<Vec<String>>,
}

/// Partial update for an embedded interaction check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionCheckUpdate {
    pub day_of_week: Option<DayOfWeek>,
    pub time_of_day: Option<NaiveTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: DayOfWeek, hms: (u32, u32, u32)) -> (DayOfWeek, NaiveTime) {
        (day, NaiveTime::from_hms_opt(hms.0, hms.1, hms.2).unwrap())
    }

    fn post(day: DayOfWeek, hms: (u32, u32, u32)) -> ScheduledPost {
        let (day_of_week, time_of_day) = at(day, hms);
        ScheduledPost {
            id: None,
            day_of_week,
            time_of_day,
            content: "Write a post about our weekly roast special.".to_string(),
            media_urls: vec![],
        }
    }

    fn schedule_with(posts: Vec<ScheduledPost>) -> Schedule {
        Schedule {
            id: None,
            user_id: ObjectId::new(),
            posts,
            competitor_analysis: vec![],
            interaction_checks: vec![],
        }
    }

    #[test]
    fn distinct_slots_pass() {
        let schedule = schedule_with(vec![
            post(DayOfWeek::Monday, (9, 0, 0)),
            post(DayOfWeek::Monday, (9, 1, 0)),
            post(DayOfWeek::Tuesday, (9, 0, 0)),
        ]);
        schedule.validate().unwrap();
    }

    #[test]
    fn duplicate_slot_in_same_list_rejected() {
        let schedule = schedule_with(vec![
            post(DayOfWeek::Monday, (9, 0, 0)),
            post(DayOfWeek::Monday, (9, 0, 0)),
        ]);
        match schedule.validate() {
            Err(Error::SchedulingConflict { list, day, time }) => {
                assert_eq!(list, POSTS_LIST);
                assert_eq!(day, "monday");
                assert_eq!(time, "09:00:00");
            }
            other => panic!("expected SchedulingConflict, got {:?}", other),
        }
    }

    #[test]
    fn same_slot_across_lists_is_allowed() {
        let mut schedule = schedule_with(vec![post(DayOfWeek::Monday, (9, 0, 0))]);
        let (day_of_week, time_of_day) = at(DayOfWeek::Monday, (9, 0, 0));
        schedule.interaction_checks.push(InteractionCheck {
            id: None,
            day_of_week,
            time_of_day,
        });
        schedule.validate().unwrap();
    }

    #[test]
    fn short_slot_prompt_rejected() {
        let mut schedule = schedule_with(vec![post(DayOfWeek::Monday, (9, 0, 0))]);
        schedule.posts[0].content = "too short".to_string();
        assert!(matches!(schedule.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn time_of_day_serializes_to_plain_string() {
        let (_, time) = at(DayOfWeek::Monday, (9, 0, 0));
        let bson = mongodb::bson::to_bson(&time).unwrap();
        assert_eq!(bson, mongodb::bson::Bson::String("09:00:00".to_string()));
    }
}
