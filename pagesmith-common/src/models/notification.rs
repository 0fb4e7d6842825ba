use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::IndexSpec;

/// User-facing notification. Immutable after creation except the seen flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub seen: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: ObjectId, title: &str, content: &str) -> Result<Self, Error> {
        let notification = Self {
            id: None,
            user_id,
            title: title.to_string(),
            content: content.to_string(),
            seen: false,
            created_at: Utc::now(),
        };
        notification.validate()?;
        Ok(notification)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let title_len = self.title.chars().count();
        if !(10..=100).contains(&title_len) {
            return Err(Error::Validation(
                "title must be 10-100 characters".to_string(),
            ));
        }
        if self.content.chars().count() < 10 {
            return Err(Error::Validation(
                "content must be at least 10 characters".to_string(),
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
                keys: doc! { "created_at": -1 },
                name: "created_at_index",
                unique: false,
                sparse: false,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notification_is_unseen() {
        let n = Notification::new(
            ObjectId::new(),
            "New recommendation",
            "We found a great new resource for you.",
        )
        .unwrap();
        assert!(!n.seen);
    }

    #[test]
    fn short_title_rejected() {
        let result = Notification::new(ObjectId::new(), "short", "long enough content");
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
