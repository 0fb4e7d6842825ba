use mongodb::bson::{doc, oid::ObjectId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;
use crate::models::IndexSpec;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Banned,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Banned => "banned",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    pub hash_password: String,
    pub account_status: AccountStatus,
    /// Facebook page linked through the Graph API, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_page_id: Option<String>,
}

impl User {
    pub fn new(username: &str, email: &str, hash_password: &str) -> Result<Self, Error> {
        let user = Self {
            id: None,
            username: username.to_string(),
            email: email.to_string(),
            hash_password: hash_password.to_string(),
            account_status: AccountStatus::Active,
            facebook_page_id: None,
        };
        user.validate()?;
        Ok(user)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let len = self.username.chars().count();
        if !(3..=30).contains(&len) {
            return Err(Error::Validation(
                "username must be 3-30 characters".to_string(),
            ));
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(Error::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        if self.hash_password.is_empty() {
            return Err(Error::Validation("password hash must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn indexes() -> Vec<IndexSpec> {
        vec![
            IndexSpec {
                keys: doc! { "username": 1 },
                name: "username_index",
                unique: true,
                sparse: false,
            },
            IndexSpec {
                keys: doc! { "email": 1 },
                name: "email_index",
                unique: true,
                sparse: false,
            },
            IndexSpec {
                keys: doc! { "account_status": 1 },
                name: "account_status_index",
                unique: false,
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

    #[test]
    fn valid_user_passes() {
        let user = User::new("alice", "a@example.com", "$argon2id$stub").unwrap();
        assert_eq!(user.account_status, AccountStatus::Active);
        assert!(user.id.is_none());
        assert!(user.facebook_page_id.is_none());
    }

    #[test]
    fn short_username_rejected() {
        assert!(matches!(
            User::new("ab", "a@example.com", "h"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn bad_email_rejected() {
        for email in ["plainaddress", "a@b", "a b@example.com", "@example.com"] {
            assert!(
                matches!(User::new("alice", email, "h"), Err(Error::Validation(_))),
                "{} should be rejected",
                email
            );
        }
    }

    #[test]
    fn unset_id_is_skipped_in_bson() {
        let user = User::new("alice", "a@example.com", "h").unwrap();
        let document = mongodb::bson::to_document(&user).unwrap();
        assert!(!document.contains_key("_id"));
        assert!(!document.contains_key("facebook_page_id"));
        assert_eq!(document.get_str("account_status").unwrap(), "active");
    }
}
