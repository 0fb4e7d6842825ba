use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::IndexSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessResource {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Per-user business profile, 1:1 with the owning user.
///
/// `facebook_page_access_token` is always stored encrypted; the repository is
/// the only place that sees the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessInfo {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub business_name: String,
    pub field: String,
    pub description: String,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub business_keywords: Vec<String>,
    #[serde(default)]
    pub long_term_goals: Vec<String>,
    #[serde(default)]
    pub short_term_goals: Vec<String>,
    #[serde(default)]
    pub target_audience: Vec<String>,
    #[serde(default)]
    pub differentiators: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<BusinessResource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_page_access_token: Option<String>,
}

impl BusinessInfo {
    pub fn validate(&self) -> Result<(), Error> {
        if self.business_name.trim().is_empty() {
            return Err(Error::Validation("business_name must not be empty".to_string()));
        }
        if self.field.trim().is_empty() {
            return Err(Error::Validation("field must not be empty".to_string()));
        }
        let len = self.description.chars().count();
        if !(50..=1000).contains(&len) {
            return Err(Error::Validation(
                "description must be 50-1000 characters".to_string(),
            ));
        }
        Ok(())
    }

    pub fn indexes() -> Vec<IndexSpec> {
        vec![
            IndexSpec {
                keys: doc! { "user_id": 1 },
                name: "user_index",
                unique: true,
                sparse: false,
            },
            IndexSpec {
                keys: doc! { "facebook_page_id": 1 },
                name: "facebook_page_id_index",
                unique: true,
                sparse: true,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BusinessInfo {
        BusinessInfo {
            id: None,
            user_id: ObjectId::new(),
            business_name: "Acme Coffee".to_string(),
            field: "food & beverage".to_string(),
            description: "A neighbourhood coffee roastery serving single-origin \
                          beans and training home baristas."
                .to_string(),
            themes: vec!["coffee".to_string()],
            business_keywords: vec![],
            long_term_goals: vec![],
            short_term_goals: vec![],
            target_audience: vec![],
            differentiators: vec![],
            resources: None,
            facebook_page_id: None,
            facebook_page_access_token: None,
        }
    }

    #[test]
    fn valid_profile_passes() {
        sample().validate().unwrap();
    }

    #[test]
    fn short_description_rejected() {
        let mut info = sample();
        info.description = "too short".to_string();
        assert!(matches!(info.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn resource_type_field_renamed() {
        let resource = BusinessResource {
            kind: "budget".to_string(),
            description: None,
        };
        let document = mongodb::bson::to_document(&resource).unwrap();
        assert_eq!(document.get_str("type").unwrap(), "budget");
    }
}
