//! Targeted profile updates: tokens, logins and live location.

use marketplace_accounts::error::AppError;
use marketplace_accounts::models::UserProfileFields;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::test_helpers::{create_test_pool, create_user};

#[tokio::test]
async fn test_set_refresh_token() {
    let pool = create_test_pool().await;
    let profile = create_user(&pool, "token@example.com", UserProfileFields::default()).await;
    assert!(profile.refresh_token.is_none());

    let updated = pool
        .set_refresh_token(profile.id, Some("refresh-abc"))
        .await
        .unwrap();
    assert_eq!(updated.refresh_token.as_deref(), Some("refresh-abc"));
    assert!(updated.token_updated_at >= profile.token_updated_at);
    assert_eq!(updated.token_created_at, profile.token_created_at);

    let cleared = pool.set_refresh_token(profile.id, None).await.unwrap();
    assert!(cleared.refresh_token.is_none());
}

#[tokio::test]
async fn test_record_login() {
    let pool = create_test_pool().await;
    let profile = create_user(&pool, "login@example.com", UserProfileFields::default()).await;
    assert!(profile.last_login.is_none());

    let updated = pool.record_login(profile.id).await.unwrap();
    assert!(updated.last_login.is_some());
}

#[tokio::test]
async fn test_update_current_location() {
    let pool = create_test_pool().await;
    let profile = create_user(&pool, "valet@example.com", UserProfileFields::default()).await;

    let lat = Decimal::new(302672, 4);
    let lng = Decimal::new(-977431, 4);
    let updated = pool
        .update_current_location(profile.id, lat, lng)
        .await
        .unwrap();

    assert!(updated.last_location_update.is_some());
    let tolerance = Decimal::new(1, 6);
    let stored_lat = updated.current_latitude.expect("latitude stored");
    let stored_lng = updated.current_longitude.expect("longitude stored");
    assert!((stored_lat - lat).abs() < tolerance);
    assert!((stored_lng - lng).abs() < tolerance);
}

#[tokio::test]
async fn test_updates_on_missing_profile() {
    let pool = create_test_pool().await;
    let missing = Uuid::new_v4();

    assert!(matches!(
        pool.record_login(missing).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        pool.set_refresh_token(missing, Some("t")).await,
        Err(AppError::NotFound(_))
    ));
    assert!(!pool.delete_user_profile(missing).await.unwrap());
}
