use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;
use crate::models::IndexSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Accepted,
    Rejected,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PostStatus::Draft => "draft",
            PostStatus::Accepted => "accepted",
            PostStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A generated draft post. Drafts leave DRAFT exactly once, to ACCEPTED or
/// REJECTED, and are terminal afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub title: String,
    pub category: String,
    pub content: String,
    pub status: PostStatus,
    pub user_rate: f64,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new_draft(
        user_id: ObjectId,
        title: &str,
        category: &str,
        content: &str,
    ) -> Result<Self, Error> {
        let now = Utc::now();
        let post = Self {
            id: None,
            user_id,
            title: title.to_string(),
            category: category.to_string(),
            content: content.to_string(),
            status: PostStatus::Draft,
            user_rate: 0.0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        post.validate()?;
        Ok(post)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("title must not be empty".to_string()));
        }
        let len = self.content.chars().count();
        if !(100..=1000).contains(&len) {
            return Err(Error::Validation(
                "content must be 100-1000 characters".to_string(),
            ));
        }
        Ok(())
    }

    pub fn indexes() -> Vec<IndexSpec> {
        vec![
            IndexSpec {
                keys: doc! { "user_id": 1 },
                name: "user_index",
                unique: false,
                sparse: false,
            },
            IndexSpec {
                keys: doc! { "user_id": 1, "status": 1 },
                name: "user_status_index",
                unique: false,
                sparse: false,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_content() -> String {
        "An announcement about our new seasonal menu, available from next week \
         in all three locations, with discounts for early birds and loyal customers."
            .to_string()
    }

    #[test]
    fn new_draft_starts_in_draft() {
        let post = Post::new_draft(ObjectId::new(), "Launch", "announcement", &long_content())
            .unwrap();
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.user_rate, 0.0);
        assert!(post.comments.is_empty());
    }

    #[test]
    fn short_content_rejected() {
        let result = Post::new_draft(ObjectId::new(), "Launch", "announcement", "too short");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn status_serializes_lowercase() {
        let bson = mongodb::bson::to_bson(&PostStatus::Accepted).unwrap();
        assert_eq!(bson, mongodb::bson::Bson::String("accepted".to_string()));
    }
}
