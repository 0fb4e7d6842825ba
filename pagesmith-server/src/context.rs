//! pagesmith-server/src/context.rs
//!
//! The global server context: store handle, repositories, gateway, auth.

use std::sync::Arc;

use pagesmith_common::traits::repository_traits::{
    AnalysisRepo, BusinessInfoRepo, NotificationRepo, PostRepo, RecommendationRepo, ScheduleRepo,
    UserRepo,
};
use pagesmith_core::auth::JwtManager;
use pagesmith_core::crypto::Encryptor;
use pagesmith_core::platforms::facebook::FacebookClient;
use pagesmith_core::repositories::{
    AnalysisRepository, BusinessInfoRepository, NotificationRepository, PostRepository,
    RecommendationRepository, ScheduleRepository, UserRepository,
};
use pagesmith_core::services::UserService;
use pagesmith_core::{Database, Error};

use crate::config::Settings;

/// A bag of references handed to every route handler through axum state.
pub struct ServerContext {
    pub settings: Settings,
    pub db: Database,

    pub users: Arc<dyn UserRepo>,
    pub business_info: Arc<dyn BusinessInfoRepo>,
    pub posts: Arc<dyn PostRepo>,
    pub schedules: Arc<dyn ScheduleRepo>,
    pub notifications: Arc<dyn NotificationRepo>,
    pub recommendations: Arc<dyn RecommendationRepo>,
    pub analyses: Arc<dyn AnalysisRepo>,

    pub user_service: UserService,
    pub facebook: FacebookClient,
    pub jwt: JwtManager,
}

impl ServerContext {
    pub async fn new(settings: Settings) -> Result<Self, Error> {
        let db = Database::new(&settings.mongodb_url, &settings.mongodb_database).await?;
        let encryptor = Encryptor::from_base64(&settings.encryption_key)?;

        let users: Arc<dyn UserRepo> = Arc::new(UserRepository::connect(&db).await?);
        let business_info: Arc<dyn BusinessInfoRepo> =
            Arc::new(BusinessInfoRepository::connect(&db, encryptor).await?);
        let posts: Arc<dyn PostRepo> = Arc::new(PostRepository::connect(&db).await?);
        let schedules: Arc<dyn ScheduleRepo> = Arc::new(ScheduleRepository::connect(&db).await?);
        let notifications: Arc<dyn NotificationRepo> =
            Arc::new(NotificationRepository::connect(&db).await?);
        let recommendations: Arc<dyn RecommendationRepo> =
            Arc::new(RecommendationRepository::connect(&db).await?);
        let analyses: Arc<dyn AnalysisRepo> = Arc::new(AnalysisRepository::connect(&db).await?);

        let user_service = UserService::new(
            users.clone(),
            business_info.clone(),
            posts.clone(),
            schedules.clone(),
            notifications.clone(),
            recommendations.clone(),
            analyses.clone(),
        );

        let facebook = FacebookClient::new(&settings.graph_api_version);
        let jwt = JwtManager::new(settings.jwt_secret.as_bytes(), settings.jwt_expire_days);

        Ok(Self {
            settings,
            db,
            users,
            business_info,
            posts,
            schedules,
            notifications,
            recommendations,
            analyses,
            user_service,
            facebook,
            jwt,
        })
    }
}
