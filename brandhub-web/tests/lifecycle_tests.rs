//! Integration tests for the brand, asset and launch lifecycles
//!
//! Tests cover:
//! - Tenant isolation of listings and mutations
//! - Brand delete cascading over assets and launches, tolerating storage failures
//! - Asset upload/delete ordering between object store and database
//! - Launch save/delete with task progress and calendar bucketing
//! - Subscription access predicate and style check validation

mod helpers;

use brandhub_common::db::{LaunchStatus, LaunchTask};
use brandhub_common::Error;
use brandhub_web::db;
use brandhub_web::services::access::has_active_access;
use brandhub_web::services::assets::AssetUpload;
use brandhub_web::services::brands::{BrandFields, DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR};
use brandhub_web::services::calendar::MonthRef;
use brandhub_web::services::launches::LaunchDraft;
use brandhub_web::services::style_check::{run_style_check, StyleCheckInput};
use brandhub_web::services::UploadedFile;
use brandhub_web::storage::Bucket;
use chrono::{FixedOffset, NaiveDate};
use helpers::{grant_subscription, TestContext};
use uuid::Uuid;

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn named(name: &str) -> BrandFields {
    BrandFields {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn png(name: &str) -> UploadedFile {
    UploadedFile::new(name, "image/png", b"\x89PNG fake image bytes".to_vec())
}

fn upload(name: &str, campaign: Option<&str>) -> AssetUpload {
    AssetUpload {
        file: png(name),
        name: None,
        campaign: campaign.map(str::to_string),
    }
}

fn launch_draft(brand_id: Uuid, start: &str) -> LaunchDraft {
    LaunchDraft {
        brand_id: Some(brand_id.to_string()),
        title: "Summer drop".to_string(),
        start_date: start.to_string(),
        ..Default::default()
    }
}

// =============================================================================
// Brands
// =============================================================================

#[tokio::test]
async fn test_brand_listing_is_per_user() {
    let ctx = TestContext::new().await;
    let brands = ctx.state.brands();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let acme = brands.create(a, named("Acme"), None).await.unwrap();
    let globex = brands.create(b, named("Globex"), None).await.unwrap();

    let listed_a = brands.list(a).await.unwrap();
    assert_eq!(listed_a.len(), 1);
    assert_eq!(listed_a[0].id, acme.id);

    let listed_b = brands.list(b).await.unwrap();
    assert!(listed_b.iter().all(|brand| brand.id != acme.id));
    assert_eq!(listed_b[0].id, globex.id);
}

#[tokio::test]
async fn test_brand_list_newest_first() {
    let ctx = TestContext::new().await;
    let brands = ctx.state.brands();
    let user = Uuid::new_v4();

    brands.create(user, named("First"), None).await.unwrap();
    brands.create(user, named("Second"), None).await.unwrap();

    let names: Vec<_> = brands
        .list(user)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[tokio::test]
async fn test_create_applies_default_colors() {
    let ctx = TestContext::new().await;
    let brand = ctx
        .state
        .brands()
        .create(Uuid::new_v4(), named("Acme"), None)
        .await
        .unwrap();

    assert_eq!(brand.primary_color.as_deref(), Some(DEFAULT_PRIMARY_COLOR));
    assert_eq!(brand.secondary_color.as_deref(), Some(DEFAULT_SECONDARY_COLOR));
    assert!(brand.logo_url.is_none());
}

#[tokio::test]
async fn test_create_without_name_writes_nothing() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();

    let err = ctx
        .state
        .brands()
        .create(user, named("   "), Some(png("logo.png")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(ctx.state.brands().list(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_logo_sets_public_url() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();

    let brand = ctx
        .state
        .brands()
        .create(user, named("Acme"), Some(png("Acme Logo.png")))
        .await
        .unwrap();

    let path = brand.logo_path.clone().unwrap();
    assert!(path.starts_with(&format!("{}/", user)));
    assert!(path.ends_with("_Acme_Logo.png"));
    assert_eq!(
        brand.logo_url.as_deref(),
        Some(format!("http://localhost:5740/storage/brand_logos/{}", path).as_str())
    );
    assert!(ctx.store.exists(Bucket::BrandLogos, &path).await);
}

#[tokio::test]
async fn test_logo_upload_failure_writes_no_brand() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    ctx.store.set_fail_uploads(true);

    let err = ctx
        .state
        .brands()
        .create(user, named("Acme"), Some(png("logo.png")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Storage(_)));
    assert!(ctx.state.brands().list(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_owner_can_rename() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brands = ctx.state.brands();

    let acme = brands
        .create(
            user,
            BrandFields {
                name: Some("Acme".to_string()),
                primary_color: Some("#123456".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    let renamed = brands
        .update(acme.id, user, named("Acme Inc"), None)
        .await
        .unwrap();
    assert_eq!(renamed.name, "Acme Inc");
    assert_eq!(renamed.primary_color.as_deref(), Some("#123456"));

    let stored = brands.get(acme.id, user).await.unwrap();
    assert_eq!(stored.name, "Acme Inc");
}

#[tokio::test]
async fn test_other_user_cannot_update_or_delete() {
    let ctx = TestContext::new().await;
    let brands = ctx.state.brands();
    let (owner, intruder) = (Uuid::new_v4(), Uuid::new_v4());

    let acme = brands.create(owner, named("Acme"), None).await.unwrap();

    let err = brands
        .update(acme.id, intruder, named("Hijacked"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));

    let err = brands.delete(acme.id, intruder).await.unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));

    let stored = brands.get(acme.id, owner).await.unwrap();
    assert_eq!(stored.name, "Acme");
}

#[tokio::test]
async fn test_delete_brand_cascades_despite_storage_failure() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    grant_subscription(&ctx.db, user, "active").await;

    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();
    let first = ctx
        .state
        .assets()
        .upload(brand.id, user, upload("a.png", Some("Summer")))
        .await
        .unwrap();
    let second = ctx
        .state
        .assets()
        .upload(brand.id, user, upload("b.png", None))
        .await
        .unwrap();
    let launch = ctx
        .state
        .launches()
        .save(None, user, launch_draft(brand.id, "2024-06-01"), utc())
        .await
        .unwrap();

    ctx.store.set_fail_removes(true);
    let deletion = ctx.state.brands().delete(brand.id, user).await.unwrap();

    assert_eq!(deletion.assets_removed, 2);
    assert!(!deletion.storage_cleaned);

    let attempted = ctx.store.removed_paths(Bucket::BrandAssets);
    assert!(attempted.contains(&first.file_path));
    assert!(attempted.contains(&second.file_path));

    assert!(db::brands::get_brand(&ctx.db, brand.id).await.unwrap().is_none());
    assert!(db::assets::list_assets_for_brand(&ctx.db, brand.id)
        .await
        .unwrap()
        .is_empty());
    assert!(db::launches::get_launch(&ctx.db, launch.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_brand_removes_objects() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();

    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();
    let asset = ctx
        .state
        .assets()
        .upload(brand.id, user, upload("a.png", None))
        .await
        .unwrap();

    let deletion = ctx.state.brands().delete(brand.id, user).await.unwrap();
    assert!(deletion.storage_cleaned);
    assert!(!ctx.store.exists(Bucket::BrandAssets, &asset.file_path).await);
}

// =============================================================================
// Assets
// =============================================================================

#[tokio::test]
async fn test_uploaded_asset_is_listed() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();

    let asset = ctx
        .state
        .assets()
        .upload(
            brand.id,
            user,
            AssetUpload {
                file: png("hero.png"),
                name: Some("Hero banner".to_string()),
                campaign: Some("Summer".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(asset.name, "Hero banner");
    assert_eq!(asset.file_type, "image/png");
    assert!(asset
        .file_path
        .starts_with(&format!("{}/{}/", user, brand.id)));
    assert!(ctx.store.exists(Bucket::BrandAssets, &asset.file_path).await);

    let listed = ctx.state.assets().list(brand.id, user).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, asset.id);
    assert_eq!(listed[0].campaign.as_deref(), Some("Summer"));
}

#[tokio::test]
async fn test_asset_name_defaults_to_file_name() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();

    let asset = ctx
        .state
        .assets()
        .upload(brand.id, user, upload("brochure.pdf", None))
        .await
        .unwrap();
    assert_eq!(asset.name, "brochure.pdf");
    assert!(asset.file_path.ends_with(".pdf"));
}

#[tokio::test]
async fn test_empty_upload_rejected() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();

    let err = ctx
        .state
        .assets()
        .upload(
            brand.id,
            user,
            AssetUpload {
                file: UploadedFile::new("empty.png", "image/png", Vec::new()),
                name: None,
                campaign: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(ctx.state.assets().list(brand.id, user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_asset_upload_failure_writes_no_row() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();
    ctx.store.set_fail_uploads(true);

    let err = ctx
        .state
        .assets()
        .upload(brand.id, user, upload("banner.png", Some("Summer")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Storage(_)));
    assert!(ctx.state.assets().list(brand.id, user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_to_foreign_brand_rejected() {
    let ctx = TestContext::new().await;
    let (owner, intruder) = (Uuid::new_v4(), Uuid::new_v4());
    let brand = ctx.state.brands().create(owner, named("Acme"), None).await.unwrap();

    let err = ctx
        .state
        .assets()
        .upload(brand.id, intruder, upload("x.png", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));
}

#[tokio::test]
async fn test_asset_delete_keeps_row_when_storage_fails() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();
    let asset = ctx
        .state
        .assets()
        .upload(brand.id, user, upload("a.png", None))
        .await
        .unwrap();

    ctx.store.set_fail_removes(true);
    let err = ctx
        .state
        .assets()
        .delete(asset.id, &asset.file_path, brand.id, user)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert!(db::assets::get_asset(&ctx.db, asset.id).await.unwrap().is_some());

    // Retry once storage recovers
    ctx.store.set_fail_removes(false);
    ctx.state
        .assets()
        .delete(asset.id, &asset.file_path, brand.id, user)
        .await
        .unwrap();
    assert!(db::assets::get_asset(&ctx.db, asset.id).await.unwrap().is_none());
    assert!(!ctx.store.exists(Bucket::BrandAssets, &asset.file_path).await);
}

#[tokio::test]
async fn test_asset_delete_by_other_user_rejected() {
    let ctx = TestContext::new().await;
    let (owner, intruder) = (Uuid::new_v4(), Uuid::new_v4());
    let brand = ctx.state.brands().create(owner, named("Acme"), None).await.unwrap();
    let asset = ctx
        .state
        .assets()
        .upload(brand.id, owner, upload("a.png", None))
        .await
        .unwrap();

    let err = ctx.state.assets().delete_by_id(asset.id, intruder).await.unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));
    assert!(ctx.store.removed_paths(Bucket::BrandAssets).is_empty());
}

#[tokio::test]
async fn test_asset_delete_with_mismatched_path_rejected() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();
    let asset = ctx
        .state
        .assets()
        .upload(brand.id, user, upload("a.png", None))
        .await
        .unwrap();

    let err = ctx
        .state
        .assets()
        .delete(asset.id, "someone/else.png", brand.id, user)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(ctx.store.exists(Bucket::BrandAssets, &asset.file_path).await);
}

// =============================================================================
// Launches
// =============================================================================

#[tokio::test]
async fn test_launch_save_replaces_tasks() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();
    let launches = ctx.state.launches();

    let mut draft = launch_draft(brand.id, "2024-06-01T09:30");
    draft.tasks = vec![
        LaunchTask { text: "Write copy".into(), completed: false },
        LaunchTask { text: "Design banner".into(), completed: false },
        LaunchTask { text: "Schedule posts".into(), completed: false },
    ];
    let created = launches.save(None, user, draft, utc()).await.unwrap();
    assert_eq!(created.status, LaunchStatus::Planned);
    assert_eq!(created.progress(), Some(0));

    let mut edit = launch_draft(brand.id, "2024-06-01T09:30");
    edit.status = LaunchStatus::InProgress;
    edit.tasks = vec![
        LaunchTask { text: "Write copy".into(), completed: true },
        LaunchTask { text: "Design banner".into(), completed: false },
        LaunchTask { text: "Schedule posts".into(), completed: false },
    ];
    let updated = launches.save(Some(created.id), user, edit, utc()).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.progress(), Some(33));

    let stored = db::launches::get_launch(&ctx.db, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, LaunchStatus::InProgress);
    assert!(stored.tasks[0].completed);
    assert_eq!(stored.tasks.len(), 3);
}

#[tokio::test]
async fn test_launch_without_tasks_has_no_progress() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();

    let launch = ctx
        .state
        .launches()
        .save(None, user, launch_draft(brand.id, "2024-06-01"), utc())
        .await
        .unwrap();
    assert_eq!(launch.progress(), None);
}

#[tokio::test]
async fn test_unstorable_launch_dates_rejected() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();
    let launches = ctx.state.launches();

    launches
        .save(None, user, launch_draft(brand.id, "2024-06-01"), utc())
        .await
        .unwrap();

    for start in ["+10000-01-01", "-0001-01-01"] {
        let err = launches
            .save(None, user, launch_draft(brand.id, start), utc())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{} accepted", start);
    }

    let listed = launches.list(user).await.unwrap();
    assert_eq!(listed.len(), 1);
    let month = launches.calendar(user, MonthRef::new(2024, 6).unwrap(), utc()).await.unwrap();
    assert!(month.days.iter().any(|d| !d.events.is_empty()));
}

#[tokio::test]
async fn test_launch_for_foreign_brand_rejected() {
    let ctx = TestContext::new().await;
    let (owner, intruder) = (Uuid::new_v4(), Uuid::new_v4());
    let brand = ctx.state.brands().create(owner, named("Acme"), None).await.unwrap();

    let err = ctx
        .state
        .launches()
        .save(None, intruder, launch_draft(brand.id, "2024-06-01"), utc())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));
    assert!(ctx.state.launches().list(intruder).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_launch_edit_and_delete_by_other_user_rejected() {
    let ctx = TestContext::new().await;
    let (owner, intruder) = (Uuid::new_v4(), Uuid::new_v4());
    let brand = ctx.state.brands().create(owner, named("Acme"), None).await.unwrap();
    let theirs = ctx.state.brands().create(intruder, named("Globex"), None).await.unwrap();
    let launch = ctx
        .state
        .launches()
        .save(None, owner, launch_draft(brand.id, "2024-06-01"), utc())
        .await
        .unwrap();

    let err = ctx
        .state
        .launches()
        .save(Some(launch.id), intruder, launch_draft(theirs.id, "2024-07-01"), utc())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));

    let err = ctx.state.launches().delete(launch.id, intruder).await.unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));

    ctx.state.launches().delete(launch.id, owner).await.unwrap();
    assert!(ctx.state.launches().list(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_calendar_buckets_by_local_day() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx
        .state
        .brands()
        .create(
            user,
            BrandFields {
                name: Some("Acme".to_string()),
                primary_color: Some("#ff0000".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    let launches = ctx.state.launches();
    let new_york = FixedOffset::west_opt(4 * 3600).unwrap();

    launches
        .save(None, user, launch_draft(brand.id, "2024-06-01T08:00"), new_york)
        .await
        .unwrap();
    launches
        .save(None, user, launch_draft(brand.id, "2024-06-01T20:00"), new_york)
        .await
        .unwrap();
    launches
        .save(None, user, launch_draft(brand.id, "2024-06-30T23:30"), new_york)
        .await
        .unwrap();
    launches
        .save(None, user, launch_draft(brand.id, "2024-07-01T10:00"), new_york)
        .await
        .unwrap();

    let june = launches
        .calendar(user, MonthRef::new(2024, 6).unwrap(), new_york)
        .await
        .unwrap();
    let day = |d: u32| {
        june.days
            .iter()
            .find(|cell| cell.date == NaiveDate::from_ymd_opt(2024, 6, d).unwrap())
            .unwrap()
    };

    assert_eq!(day(1).events.len(), 2);
    assert_eq!(day(30).events.len(), 1);
    assert_eq!(day(1).events[0].color, "#ff0000");

    let july_first = june
        .days
        .iter()
        .find(|cell| cell.date == NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
        .unwrap();
    assert!(!july_first.in_month);
    assert_eq!(july_first.events.len(), 1);
}

// =============================================================================
// Access and style check
// =============================================================================

#[tokio::test]
async fn test_access_predicate() {
    let ctx = TestContext::new().await;
    let (active, trialing, lapsed, none) = (
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
    );
    grant_subscription(&ctx.db, active, "active").await;
    grant_subscription(&ctx.db, trialing, "trialing").await;
    grant_subscription(&ctx.db, lapsed, "cancelled").await;

    assert!(has_active_access(&ctx.db, active).await);
    assert!(has_active_access(&ctx.db, trialing).await);
    assert!(!has_active_access(&ctx.db, lapsed).await);
    assert!(!has_active_access(&ctx.db, none).await);
}

#[tokio::test]
async fn test_access_denied_when_lookup_fails() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    grant_subscription(&ctx.db, user, "active").await;

    ctx.db.close().await;
    assert!(!has_active_access(&ctx.db, user).await);
}

#[tokio::test]
async fn test_style_check_without_content_never_calls_analyzer() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();

    let err = run_style_check(
        ctx.analyzer.as_ref(),
        &brand,
        StyleCheckInput {
            text: Some("  ".to_string()),
            image: None,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(ctx.analyzer.calls(), 0);
}

#[tokio::test]
async fn test_style_check_calls_analyzer_once() {
    let ctx = TestContext::new().await;
    let user = Uuid::new_v4();
    let brand = ctx.state.brands().create(user, named("Acme"), None).await.unwrap();

    let result = run_style_check(
        ctx.analyzer.as_ref(),
        &brand,
        StyleCheckInput {
            text: Some("Introducing our boldest tools yet".to_string()),
            image: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(result.alignment_score, 87.0);
    assert_eq!(ctx.analyzer.calls(), 1);
    assert!(ctx.analyzer.last_prompt().unwrap().contains("- Brand Name: Acme"));

    ctx.analyzer.set_fail(true);
    let err = run_style_check(
        ctx.analyzer.as_ref(),
        &brand,
        StyleCheckInput {
            text: Some("Again".to_string()),
            image: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::RemoteService(_)));
}
