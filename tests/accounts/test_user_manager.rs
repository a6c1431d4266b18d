//! Account creation through the user profile manager.

use marketplace_accounts::error::AppError;
use marketplace_accounts::models::{SettingsKind, UserProfileFields, UserType};
use marketplace_accounts::services::{UserProfileManager, check_password};
use uuid::Uuid;

use crate::test_helpers::{create_test_pool, create_user};

#[tokio::test]
async fn test_create_user_requires_email() {
    let pool = create_test_pool().await;
    let manager = UserProfileManager::new(&pool);

    for email in [None, Some(""), Some("   ")] {
        let result = manager
            .create_user(email, Some("pw-123456"), None, UserProfileFields::default())
            .await;
        assert!(
            matches!(result, Err(AppError::InvalidInput(ref msg)) if msg == "The Email field must be set"),
            "email {:?} should be rejected",
            email
        );
    }
}

#[tokio::test]
async fn test_create_user_normalizes_email_and_hashes_password() {
    let pool = create_test_pool().await;
    let manager = UserProfileManager::new(&pool);

    let profile = manager
        .create_user(
            Some("Rider.One@Example.COM"),
            Some("correct horse battery"),
            Some("rider1"),
            UserProfileFields::default(),
        )
        .await
        .unwrap();

    assert_eq!(profile.email, "Rider.One@example.com");
    assert_eq!(profile.username.as_deref(), Some("rider1"));
    assert_ne!(profile.password, "correct horse battery");
    assert!(check_password(&profile, "correct horse battery"));
    assert!(!check_password(&profile, "wrong"));

    let stored = pool
        .get_user_profile_by_email("Rider.One@example.com")
        .await
        .unwrap()
        .expect("profile should be stored");
    assert_eq!(stored.id, profile.id);
    assert!(check_password(&stored, "correct horse battery"));
}

#[tokio::test]
async fn test_create_user_applies_model_defaults() {
    let pool = create_test_pool().await;
    let profile = UserProfileManager::new(&pool)
        .create_user(Some("plain@example.com"), None, None, UserProfileFields::default())
        .await
        .unwrap();

    assert_eq!(profile.user_type, UserType::Customer);
    assert_eq!(profile.country.as_deref(), Some("US"));
    assert!(profile.is_active);
    assert!(!profile.is_staff);
    assert!(!profile.is_superuser);
    assert!(!profile.email_verified);
    assert!(profile.rating.is_none());
    assert!(profile.username.is_none());
    assert!(!profile.has_usable_password());
    assert!(profile.created_at <= profile.updated_at);
}

#[tokio::test]
async fn test_create_user_applies_extra_fields() {
    let pool = create_test_pool().await;
    let profile = create_user(
        &pool,
        "driver@example.com",
        UserProfileFields {
            first_name: Some("Dana".to_string()),
            last_name: Some("Reyes".to_string()),
            user_type: Some(UserType::Driver),
            city: Some("Austin".to_string()),
            phone_number: Some("".to_string()),
            ..Default::default()
        },
    )
    .await;

    assert_eq!(profile.full_name(), "Dana Reyes");
    assert_eq!(profile.user_type, UserType::Driver);
    assert_eq!(profile.city.as_deref(), Some("Austin"));
    // Blank optional strings are stored as NULL
    assert!(profile.phone_number.is_none());
}

#[tokio::test]
async fn test_create_superuser_sets_flags() {
    let pool = create_test_pool().await;
    let manager = UserProfileManager::new(&pool);

    let admin = manager
        .create_superuser(
            Some("admin@example.com"),
            Some("admin-pass-123"),
            None,
            UserProfileFields::default(),
        )
        .await
        .unwrap();
    assert!(admin.is_staff);
    assert!(admin.is_superuser);
    assert!(admin.is_active);

    let explicit = manager
        .create_superuser(
            Some("auditor@example.com"),
            Some("auditor-pass-123"),
            None,
            UserProfileFields {
                is_staff: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!explicit.is_staff);
    assert!(explicit.is_superuser);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let pool = create_test_pool().await;
    create_user(&pool, "taken@example.com", UserProfileFields::default()).await;

    // Domain case is normalized before the uniqueness check
    let result = UserProfileManager::new(&pool)
        .create_user(
            Some("taken@EXAMPLE.com"),
            Some("pw-123456"),
            None,
            UserProfileFields::default(),
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_phone_numbers_unique_but_blanks_allowed() {
    let pool = create_test_pool().await;
    let with_phone = |phone: &str| UserProfileFields {
        phone_number: Some(phone.to_string()),
        ..Default::default()
    };

    create_user(&pool, "a@example.com", with_phone("")).await;
    create_user(&pool, "b@example.com", with_phone("")).await;
    create_user(&pool, "c@example.com", with_phone("+15125550100")).await;

    let result = UserProfileManager::new(&pool)
        .create_user(
            Some("d@example.com"),
            Some("pw-123456"),
            None,
            with_phone("+15125550100"),
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_field_validation_collects_errors() {
    let pool = create_test_pool().await;
    let result = UserProfileManager::new(&pool)
        .create_user(
            Some("not-an-email"),
            Some("pw-123456"),
            None,
            UserProfileFields {
                zip_code: Some("12345-67890".to_string()),
                ..Default::default()
            },
        )
        .await;

    let Err(AppError::Validation(errors)) = result else {
        panic!("expected validation errors");
    };
    assert!(errors.contains("email"));
    assert!(errors.contains("zip_code"));
    assert!(
        pool.get_user_profile_by_email("not-an-email")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_settings_references_must_exist() {
    let pool = create_test_pool().await;
    let manager = UserProfileManager::new(&pool);

    let result = manager
        .create_user(
            Some("ghost@example.com"),
            Some("pw-123456"),
            None,
            UserProfileFields {
                notification_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await;
    let Err(AppError::Validation(errors)) = result else {
        panic!("expected validation errors");
    };
    assert!(errors.contains("notification_id"));

    let notification = pool.create_settings(SettingsKind::Notification).await.unwrap();
    let profile = manager
        .create_user(
            Some("ghost@example.com"),
            Some("pw-123456"),
            None,
            UserProfileFields {
                notification_id: Some(notification.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.notification_id, Some(notification.id));
}

#[tokio::test]
async fn test_save_validates_and_refreshes_timestamps() {
    let pool = create_test_pool().await;
    let manager = UserProfileManager::new(&pool);
    let mut profile = create_user(&pool, "saver@example.com", UserProfileFields::default()).await;
    let before = profile.updated_at;

    profile.city = Some("Denver".to_string());
    let saved = manager.save(&profile).await.unwrap();
    assert_eq!(saved.city.as_deref(), Some("Denver"));
    assert!(saved.updated_at >= before);

    profile.state = Some("x".repeat(101));
    let Err(AppError::Validation(errors)) = manager.save(&profile).await else {
        panic!("expected validation errors");
    };
    assert!(errors.contains("state"));
}
