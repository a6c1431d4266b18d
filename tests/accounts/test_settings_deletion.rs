//! Deleting a settings record clears the reference on profiles.

use marketplace_accounts::models::{SettingsKind, UserProfileFields};

use crate::test_helpers::{create_test_pool, create_user};

#[tokio::test]
async fn test_deleting_settings_keeps_profile() {
    let pool = create_test_pool().await;

    for (i, kind) in SettingsKind::ALL.into_iter().enumerate() {
        let record = pool.create_settings(kind).await.unwrap();
        let mut extra = UserProfileFields::default();
        match kind {
            SettingsKind::EmergencyContact => extra.emergency_contact_id = Some(record.id),
            SettingsKind::Notification => extra.notification_id = Some(record.id),
            SettingsKind::WorkPreference => extra.work_preference_id = Some(record.id),
        }
        let profile = create_user(&pool, &format!("user{}@example.com", i), extra).await;

        assert!(pool.delete_settings(kind, record.id).await.unwrap());

        let reloaded = pool
            .get_user_profile(profile.id)
            .await
            .unwrap()
            .expect("profile should survive settings deletion");
        let reference = match kind {
            SettingsKind::EmergencyContact => reloaded.emergency_contact_id,
            SettingsKind::Notification => reloaded.notification_id,
            SettingsKind::WorkPreference => reloaded.work_preference_id,
        };
        assert!(reference.is_none(), "{} reference should be cleared", kind);
    }
}

#[tokio::test]
async fn test_deleting_missing_settings_reports_false() {
    let pool = create_test_pool().await;
    let record = pool.create_settings(SettingsKind::WorkPreference).await.unwrap();

    assert!(pool.delete_settings(SettingsKind::WorkPreference, record.id).await.unwrap());
    assert!(!pool.delete_settings(SettingsKind::WorkPreference, record.id).await.unwrap());
}

#[tokio::test]
async fn test_list_settings_per_kind() {
    let pool = create_test_pool().await;
    let first = pool.create_settings(SettingsKind::EmergencyContact).await.unwrap();
    let second = pool.create_settings(SettingsKind::EmergencyContact).await.unwrap();
    pool.create_settings(SettingsKind::Notification).await.unwrap();

    let records = pool.list_settings(SettingsKind::EmergencyContact).await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().any(|r| r.id == first.id));
    assert!(records.iter().any(|r| r.id == second.id));
    assert!(records.iter().all(|r| r.kind == SettingsKind::EmergencyContact));

    let fetched = pool
        .get_settings(SettingsKind::EmergencyContact, first.id)
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(fetched.to_string(), format!("EmergencyContact object ({})", first.id));
    assert!(
        pool.get_settings(SettingsKind::Notification, first.id)
            .await
            .unwrap()
            .is_none()
    );
}
