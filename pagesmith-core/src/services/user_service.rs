use std::sync::Arc;

use tracing::info;

use pagesmith_common::models::{DocId, User};
use pagesmith_common::traits::repository_traits::{
    AnalysisRepo, BusinessInfoRepo, NotificationRepo, PostRepo, RecommendationRepo, ScheduleRepo,
    UserRepo,
};

use crate::auth::{hash_password, verify_password};
use crate::Error;

/// Account-level flows that span repositories: registration, login, and the
/// cascade delete of everything a user owns. Repositories stay single-
/// collection; this service is the one place that knows the ownership graph.
pub struct UserService {
    users: Arc<dyn UserRepo>,
    business_info: Arc<dyn BusinessInfoRepo>,
    posts: Arc<dyn PostRepo>,
    schedules: Arc<dyn ScheduleRepo>,
    notifications: Arc<dyn NotificationRepo>,
    recommendations: Arc<dyn RecommendationRepo>,
    analyses: Arc<dyn AnalysisRepo>,
}

impl UserService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepo>,
        business_info: Arc<dyn BusinessInfoRepo>,
        posts: Arc<dyn PostRepo>,
        schedules: Arc<dyn ScheduleRepo>,
        notifications: Arc<dyn NotificationRepo>,
        recommendations: Arc<dyn RecommendationRepo>,
        analyses: Arc<dyn AnalysisRepo>,
    ) -> Self {
        Self {
            users,
            business_info,
            posts,
            schedules,
            notifications,
            recommendations,
            analyses,
        }
    }

    /// Register a new account. The email pre-check only produces a friendly
    /// error; the unique index behind `create` is the authoritative guard.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<DocId, Error> {
        if self.users.exists_by_email(email).await? {
            return Err(Error::Duplicate(format!(
                "a user with email '{}' already exists",
                email
            )));
        }
        let hash = hash_password(password)?;
        let user = User::new(username, email, &hash)?;
        let id = self.users.create(&user).await?;
        info!("registered user '{}' ({})", username, id);
        Ok(id)
    }

    /// Verify credentials and return the account.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, Error> {
        let user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| Error::Auth("invalid username or password".to_string()))?;
        if !verify_password(password, &user.hash_password)? {
            return Err(Error::Auth("invalid username or password".to_string()));
        }
        Ok(user)
    }

    /// Delete the user and cascade over every user-scoped collection.
    pub async fn delete_user(&self, user_id: DocId) -> Result<u64, Error> {
        let deleted = self.users.delete(user_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("user {} not found", user_id)));
        }
        self.business_info.delete_by_user(user_id).await?;
        self.schedules.delete_by_user(user_id).await?;
        self.posts.delete_by_user(user_id).await?;
        self.notifications.delete_by_user(user_id).await?;
        self.recommendations.delete_by_user(user_id).await?;
        self.analyses.delete_by_user(user_id).await?;
        info!("deleted user {} and owned records", user_id);
        Ok(deleted)
    }
}
