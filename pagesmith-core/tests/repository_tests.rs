// File: pagesmith-core/tests/repository_tests.rs
//
// Live-store integration tests. Each test provisions its own throwaway
// database and drops it at the end. Run against a local MongoDB with
//
//     TEST_MONGODB_URL=mongodb://localhost:27017 cargo test -- --ignored

use std::sync::Arc;

use chrono::NaiveTime;
use mongodb::bson::{doc, oid::ObjectId};

use pagesmith_common::models::{
    BusinessInfo, DayOfWeek, DocId, Notification, PostStatus, Schedule, ScheduledPost, User,
};
use pagesmith_common::traits::repository_traits::{
    BusinessInfoRepo, NotificationRepo, PostRepo, ScheduleRepo, UserRepo,
};
use pagesmith_core::crypto::Encryptor;
use pagesmith_core::repositories::{
    AnalysisRepository, BusinessInfoRepository, NotificationRepository, PostRepository,
    RecommendationRepository, ScheduleRepository, UserRepository,
};
use pagesmith_core::services::UserService;
use pagesmith_core::{Database, Error};

fn test_url() -> String {
    std::env::var("TEST_MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

async fn setup_test_database() -> Result<Database, Error> {
    let name = format!("pagesmith_test_{}", ObjectId::new().to_hex());
    Database::new(&test_url(), &name).await
}

fn sample_user(tag: &str) -> User {
    User::new(
        &format!("user_{}", tag),
        &format!("{}@example.com", tag),
        "$argon2id$stub",
    )
    .unwrap()
}

fn draft_content() -> String {
    "An announcement about our new seasonal menu, available from next week in \
     all three locations, with discounts for early birds and loyal customers."
        .to_string()
}

fn slot(day: DayOfWeek, hour: u32, minute: u32) -> ScheduledPost {
    ScheduledPost {
        id: None,
        day_of_week: day,
        time_of_day: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        content: "Write a post about our weekly roast special.".to_string(),
        media_urls: vec![],
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set TEST_MONGODB_URL)"]
async fn user_round_trip_and_duplicate_email() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let repo = UserRepository::connect(&db).await?;

    let user = sample_user("alice");
    let id = repo.create(&user).await?;

    let retrieved = repo.get(id).await?.expect("user should exist");
    assert_eq!(retrieved.username, user.username);
    assert_eq!(retrieved.email, user.email);

    // Same email, different username: the unique index rejects it.
    let dup = User::new("user_alice2", &user.email, "h").unwrap();
    assert!(matches!(repo.create(&dup).await, Err(Error::Duplicate(_))));

    // A different email succeeds.
    let other = sample_user("bob");
    repo.create(&other).await?;

    db.handle().drop().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set TEST_MONGODB_URL)"]
async fn update_fields_touches_only_named_fields() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let repo = UserRepository::connect(&db).await?;

    let id = repo.create(&sample_user("carol")).await?;
    let report = repo
        .update_fields(id, doc! { "facebook_page_id": "page-77" })
        .await?;
    assert_eq!(report.matched, 1);
    assert_eq!(report.modified, 1);

    let updated = repo.get(id).await?.unwrap();
    assert_eq!(updated.facebook_page_id.as_deref(), Some("page-77"));
    assert_eq!(updated.username, "user_carol");
    assert_eq!(updated.email, "carol@example.com");

    // No-op update: matched but nothing modified.
    let report = repo
        .update_fields(id, doc! { "facebook_page_id": "page-77" })
        .await?;
    assert_eq!(report.matched, 1);
    assert_eq!(report.modified, 0);

    db.handle().drop().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set TEST_MONGODB_URL)"]
async fn draft_transitions_are_terminal() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let repo = PostRepository::connect(&db).await?;

    let post = pagesmith_common::models::Post::new_draft(
        ObjectId::new(),
        "Launch",
        "announcement",
        &draft_content(),
    )
    .unwrap();
    let id = repo.create(&post).await?;

    let report = repo.accept(id).await?;
    assert_eq!(report.matched, 1);
    assert_eq!(repo.get(id).await?.unwrap().status, PostStatus::Accepted);

    // Rejecting an accepted post is a no-op: the filter requires DRAFT.
    let report = repo.reject(id).await?;
    assert_eq!(report.matched, 0);
    assert_eq!(repo.get(id).await?.unwrap().status, PostStatus::Accepted);

    db.handle().drop().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set TEST_MONGODB_URL)"]
async fn schedule_slot_conflicts() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let repo = ScheduleRepository::connect(&db).await?;

    let owner = DocId::from(ObjectId::new());
    let schedule = Schedule {
        id: None,
        user_id: owner.as_object_id(),
        posts: vec![slot(DayOfWeek::Monday, 9, 0)],
        competitor_analysis: vec![],
        interaction_checks: vec![],
    };
    let created = repo.create(schedule).await?;
    assert!(created.posts[0].id.is_some());

    // Same (day, time) in the same list: conflict.
    let result = repo.add_post(owner, slot(DayOfWeek::Monday, 9, 0)).await;
    assert!(matches!(result, Err(Error::SchedulingConflict { .. })));

    // One minute later: fine.
    let (report, added) = repo.add_post(owner, slot(DayOfWeek::Monday, 9, 1)).await?;
    assert_eq!(report.matched, 1);
    let added_id = added.id.clone().unwrap();

    // Moving the new item onto the occupied slot: conflict.
    let update = pagesmith_common::models::ScheduledPostUpdate {
        time_of_day: Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
        ..Default::default()
    };
    let result = repo.update_post(owner, &added_id, update).await;
    assert!(matches!(result, Err(Error::SchedulingConflict { .. })));

    // Updating the item in place (same slot, new content) is allowed: the
    // conflict check excludes the item's own id.
    let update = pagesmith_common::models::ScheduledPostUpdate {
        time_of_day: Some(NaiveTime::from_hms_opt(9, 1, 0).unwrap()),
        content: Some("Write a post about our new espresso machine.".to_string()),
        ..Default::default()
    };
    let report = repo.update_post(owner, &added_id, update).await?;
    assert_eq!(report.matched, 1);

    db.handle().drop().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set TEST_MONGODB_URL)"]
async fn one_schedule_per_user() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let repo = ScheduleRepository::connect(&db).await?;

    let owner = ObjectId::new();
    let schedule = Schedule {
        id: None,
        user_id: owner,
        posts: vec![],
        competitor_analysis: vec![],
        interaction_checks: vec![],
    };
    repo.create(schedule.clone()).await?;
    assert!(repo.exists_for_user(DocId::from(owner)).await?);
    assert!(matches!(
        repo.create(schedule).await,
        Err(Error::Duplicate(_))
    ));

    db.handle().drop().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set TEST_MONGODB_URL)"]
async fn business_token_is_encrypted_at_rest() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let encryptor = Encryptor::new(&[5u8; 32])?;
    let repo = BusinessInfoRepository::connect(&db, encryptor).await?;

    let owner = ObjectId::new();
    let info = BusinessInfo {
        id: None,
        user_id: owner,
        business_name: "Acme Coffee".to_string(),
        field: "food & beverage".to_string(),
        description: "A neighbourhood coffee roastery serving single-origin beans \
                      and training home baristas."
            .to_string(),
        themes: vec![],
        business_keywords: vec![],
        long_term_goals: vec![],
        short_term_goals: vec![],
        target_audience: vec![],
        differentiators: vec![],
        resources: None,
        facebook_page_id: Some("page-1".to_string()),
        facebook_page_access_token: Some("EAAB-plaintext-token".to_string()),
    };
    repo.create(&info).await?;

    // Read through the repo: plaintext comes back.
    let through_repo = repo.get_by_user(DocId::from(owner)).await?.unwrap();
    assert_eq!(
        through_repo.facebook_page_access_token.as_deref(),
        Some("EAAB-plaintext-token")
    );

    // Read the raw document: only ciphertext is stored.
    let raw = db
        .handle()
        .collection::<mongodb::bson::Document>("business_info")
        .find_one(doc! { "user_id": owner })
        .await?
        .unwrap();
    let stored = raw.get_str("facebook_page_access_token").unwrap();
    assert_ne!(stored, "EAAB-plaintext-token");

    db.handle().drop().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set TEST_MONGODB_URL)"]
async fn deleting_a_user_cascades() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let encryptor = Encryptor::new(&[5u8; 32])?;

    let users = Arc::new(UserRepository::connect(&db).await?);
    let business = Arc::new(BusinessInfoRepository::connect(&db, encryptor).await?);
    let posts = Arc::new(PostRepository::connect(&db).await?);
    let schedules = Arc::new(ScheduleRepository::connect(&db).await?);
    let notifications = Arc::new(NotificationRepository::connect(&db).await?);
    let recommendations = Arc::new(RecommendationRepository::connect(&db).await?);
    let analyses = Arc::new(AnalysisRepository::connect(&db).await?);

    let service = UserService::new(
        users.clone(),
        business.clone(),
        posts.clone(),
        schedules.clone(),
        notifications.clone(),
        recommendations.clone(),
        analyses.clone(),
    );

    let user_id = users.create(&sample_user("dave")).await?;
    let owner = user_id.as_object_id();

    schedules
        .create(Schedule {
            id: None,
            user_id: owner,
            posts: vec![slot(DayOfWeek::Friday, 18, 30)],
            competitor_analysis: vec![],
            interaction_checks: vec![],
        })
        .await?;
    notifications
        .create(&Notification::new(owner, "Weekly summary ready", "Your weekly page summary is ready.").unwrap())
        .await?;

    service.delete_user(user_id).await?;

    assert!(users.get(user_id).await?.is_none());
    assert!(schedules.get_by_user(user_id).await?.is_none());
    assert!(notifications.list_for_user(user_id, 50).await?.is_empty());

    // Deleting again: not found.
    assert!(matches!(
        service.delete_user(user_id).await,
        Err(Error::NotFound(_))
    ));

    db.handle().drop().await?;
    Ok(())
}
