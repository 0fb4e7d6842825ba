//! Environment-backed application settings, read once at startup.

use pagesmith_common::Error;

#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub bind_addr: String,
    pub mongodb_url: String,
    pub mongodb_database: String,
    pub graph_api_version: String,
    pub facebook_app_id: String,
    pub facebook_app_secret: String,
    /// Base64-encoded 32-byte AES key for token storage.
    pub encryption_key: String,
    pub webhook_verify_token: String,
    pub jwt_secret: String,
    pub jwt_expire_days: i64,
}

impl Settings {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let required = |key: &str| -> Result<String, Error> {
            lookup(key).ok_or_else(|| Error::Config(format!("missing environment variable {}", key)))
        };

        let jwt_expire_days = match lookup("ACCESS_TOKEN_EXPIRE_DAYS") {
            Some(raw) => raw.parse().map_err(|_| {
                Error::Config(format!(
                    "ACCESS_TOKEN_EXPIRE_DAYS must be an integer, got '{}'",
                    raw
                ))
            })?,
            None => 7,
        };

        Ok(Self {
            app_name: lookup("APP_NAME").unwrap_or_else(|| "pagesmith".to_string()),
            app_version: lookup("APP_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            mongodb_url: required("MONGODB_URL")?,
            mongodb_database: required("MONGODB_DATABASE")?,
            graph_api_version: lookup("GRAPH_API_VERSION").unwrap_or_else(|| "v23.0".to_string()),
            facebook_app_id: required("FACEBOOK_APP_ID")?,
            facebook_app_secret: required("FACEBOOK_APP_SECRET")?,
            encryption_key: required("ENCRYPTION_KEY")?,
            webhook_verify_token: required("WEB_HOOK_VERIFY_TOKEN")?,
            jwt_secret: required("SECRET_KEY")?,
            jwt_expire_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("MONGODB_URL", "mongodb://localhost:27017"),
            ("MONGODB_DATABASE", "pagesmith"),
            ("FACEBOOK_APP_ID", "app-id"),
            ("FACEBOOK_APP_SECRET", "app-secret"),
            ("ENCRYPTION_KEY", "a2V5"),
            ("WEB_HOOK_VERIFY_TOKEN", "verify-me"),
            ("SECRET_KEY", "jwt-secret"),
        ])
    }

    fn from_map(map: &HashMap<&str, &str>) -> Result<Settings, Error> {
        Settings::from_lookup(|key| map.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_are_applied() {
        let settings = from_map(&full_env()).unwrap();
        assert_eq!(settings.app_name, "pagesmith");
        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.graph_api_version, "v23.0");
        assert_eq!(settings.jwt_expire_days, 7);
    }

    #[test]
    fn missing_required_key_fails() {
        let mut env = full_env();
        env.remove("SECRET_KEY");
        assert!(matches!(from_map(&env), Err(Error::Config(_))));
    }

    #[test]
    fn malformed_expiry_fails() {
        let mut env = full_env();
        env.insert("ACCESS_TOKEN_EXPIRE_DAYS", "soon");
        assert!(matches!(from_map(&env), Err(Error::Config(_))));
    }

    #[test]
    fn expiry_override_parses() {
        let mut env = full_env();
        env.insert("ACCESS_TOKEN_EXPIRE_DAYS", "30");
        assert_eq!(from_map(&env).unwrap().jwt_expire_days, 30);
    }
}
