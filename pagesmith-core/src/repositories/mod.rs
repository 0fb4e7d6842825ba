// pagesmith-core/src/repositories/mod.rs

pub mod mongo;

pub use mongo::analysis::AnalysisRepository;
pub use mongo::business_info::BusinessInfoRepository;
pub use mongo::notification::NotificationRepository;
pub use mongo::post::PostRepository;
pub use mongo::recommendation::RecommendationRepository;
pub use mongo::schedule::ScheduleRepository;
pub use mongo::user::UserRepository;
