use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::IndexSpec;

/// AI recommendation: the prompt that produced it plus its result payload.
/// Append-only, query-only after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub title: String,
    pub content: String,
    pub result: Document,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn new(
        user_id: ObjectId,
        title: &str,
        content: &str,
        result: Document,
    ) -> Result<Self, Error> {
        let recommendation = Self {
            id: None,
            user_id,
            title: title.to_string(),
            content: content.to_string(),
            result,
            created_at: Utc::now(),
        };
        recommendation.validate()?;
        Ok(recommendation)
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
    fn round_trips_result_payload() {
        let r = Recommendation::new(
            ObjectId::new(),
            "Grow weekend engagement",
            "Suggest three post ideas for the weekend.",
            doc! { "ideas": ["a", "b", "c"] },
        )
        .unwrap();
        let document = mongodb::bson::to_document(&r).unwrap();
        let back: Recommendation = mongodb::bson::from_document(document).unwrap();
        assert_eq!(back.result.get_array("ideas").unwrap().len(), 3);
    }
}
