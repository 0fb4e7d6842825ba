use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::IndexSpec;

/// Append-only record of an analysis run against a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub post_id: ObjectId,
    pub user_id: ObjectId,
    pub analysis_type: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    pub fn new(post_id: ObjectId, user_id: ObjectId, analysis_type: &str) -> Result<Self, Error> {
        let analysis = Self {
            id: None,
            post_id,
            user_id,
            analysis_type: analysis_type.to_string(),
            created_at: Utc::now(),
        };
        analysis.validate()?;
        Ok(analysis)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.analysis_type.trim().is_empty() {
            return Err(Error::Validation(
                "analysis_type must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn indexes() -> Vec<IndexSpec> {
        vec![
            IndexSpec {
                keys: doc! { "post_id": 1 },
                name: "post_index",
                unique: false,
                sparse: false,
            },
            IndexSpec {
                keys: doc! { "user_id": 1 },
                name: "user_index",
                unique: false,
                sparse: false,
            },
        ]
    }
}
