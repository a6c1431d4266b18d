//! Staff admin API over the accounts and settings registrations.

use std::sync::Arc;

use actix_web::test;
use marketplace_accounts::models::{
    StripeCustomer, StripePaymentMethod, UserProfileFields, UserType,
};
use marketplace_accounts::services::{InMemoryStripeCustomers, check_password};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_helpers::{
    admin_request, create_test_app, create_test_app_with_stripe, create_test_pool, create_user,
};

const PROFILES: &str = "/api/v1/admin/accounts/userprofile/";

fn profile_url(id: Uuid) -> String {
    format!("{}{}/", PROFILES, id)
}

fn emails(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|row| row["display"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[actix_rt::test]
async fn test_admin_requires_key() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri(PROFILES).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/")
        .insert_header(("X-Admin-Key", "wrong-key"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[actix_rt::test]
async fn test_admin_index_lists_registrations() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = admin_request(&app, test::TestRequest::get().uri("/api/v1/admin/")).await;
    assert_eq!(status, 200);

    let models = body["models"].as_array().expect("models array");
    assert_eq!(models.len(), 4);
    let names: Vec<&str> = models
        .iter()
        .filter_map(|m| m["model_name"].as_str())
        .collect();
    assert!(names.contains(&"userprofile"));
    assert!(names.contains(&"emergencycontact"));
    assert!(names.contains(&"notification"));
    assert!(names.contains(&"workpreference"));
}

#[actix_rt::test]
async fn test_change_list_search_filter_order() {
    let pool = create_test_pool().await;
    create_user(
        &pool,
        "carol@example.com",
        UserProfileFields {
            last_name: Some("Zimmer".to_string()),
            city: Some("Austin".to_string()),
            ..Default::default()
        },
    )
    .await;
    create_user(
        &pool,
        "dave@example.com",
        UserProfileFields {
            last_name: Some("Adams".to_string()),
            user_type: Some(UserType::Driver),
            is_staff: Some(true),
            ..Default::default()
        },
    )
    .await;
    create_user(
        &pool,
        "vera@example.com",
        UserProfileFields {
            last_name: Some("Moss".to_string()),
            user_type: Some(UserType::Valet),
            ..Default::default()
        },
    )
    .await;
    let app = create_test_app(&pool).await;

    let (status, body) = admin_request(&app, test::TestRequest::get().uri(PROFILES)).await;
    assert_eq!(status, 200);
    assert_eq!(body["model"], "accounts.userprofile");
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["columns"].as_array().map(Vec::len), Some(9));
    let first = &body["results"][0]["values"];
    assert!(first.get("email").is_some());
    assert!(first.get("password").is_none());

    let uri = format!("{}?q=Austin", PROFILES);
    let (_, body) = admin_request(&app, test::TestRequest::get().uri(&uri)).await;
    assert_eq!(emails(&body), vec!["carol@example.com"]);

    let uri = format!("{}?user_type=driver", PROFILES);
    let (_, body) = admin_request(&app, test::TestRequest::get().uri(&uri)).await;
    assert_eq!(emails(&body), vec!["dave@example.com"]);

    let uri = format!("{}?is_staff=false&o=last_name", PROFILES);
    let (_, body) = admin_request(&app, test::TestRequest::get().uri(&uri)).await;
    assert_eq!(emails(&body), vec!["vera@example.com", "carol@example.com"]);

    let uri = format!("{}?o=-last_name", PROFILES);
    let (_, body) = admin_request(&app, test::TestRequest::get().uri(&uri)).await;
    assert_eq!(
        emails(&body),
        vec!["carol@example.com", "vera@example.com", "dave@example.com"]
    );
}

#[actix_rt::test]
async fn test_change_list_rejects_bad_params() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    for query in ["?city=Austin", "?o=phone_number", "?user_type=pilot", "?p=0"] {
        let uri = format!("{}{}", PROFILES, query);
        let (status, body) = admin_request(&app, test::TestRequest::get().uri(&uri)).await;
        assert_eq!(status, 400, "query {} should be rejected", query);
        assert_eq!(body["error"], "INVALID_INPUT");
    }
}

#[actix_rt::test]
async fn test_add_form() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = admin_request(
        &app,
        test::TestRequest::post().uri(PROFILES).set_json(json!({
            "email": "new@example.com",
            "password1": "first-pass-123",
            "password2": "second-pass-123"
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["fields"]["password2"].is_array());

    let (status, body) = admin_request(
        &app,
        test::TestRequest::post().uri(PROFILES).set_json(json!({
            "email": "New.Valet@EXAMPLE.com",
            "first_name": "Nia",
            "password1": "valet-pass-123",
            "password2": "valet-pass-123",
            "user_type": "valet"
        })),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["email"], "New.Valet@example.com");
    assert_eq!(body["user_type"], "valet");
    assert!(body.get("password").is_none());

    let stored = pool
        .get_user_profile_by_email("New.Valet@example.com")
        .await
        .unwrap()
        .expect("profile stored");
    assert!(check_password(&stored, "valet-pass-123"));

    let (status, _) = admin_request(
        &app,
        test::TestRequest::post().uri(PROFILES).set_json(json!({
            "email": "new.valet@example.com",
            "password1": "valet-pass-123",
            "password2": "valet-pass-123"
        })),
    )
    .await;
    // Local part case is preserved, so this is a different account
    assert_eq!(status, 201);

    let (status, body) = admin_request(
        &app,
        test::TestRequest::post().uri(PROFILES).set_json(json!({
            "email": "new.valet@EXAMPLE.COM",
            "password1": "valet-pass-123",
            "password2": "valet-pass-123"
        })),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "CONFLICT");
}

#[actix_rt::test]
async fn test_change_form_groups_fieldsets() {
    let pool = create_test_pool().await;
    let profile = create_user(&pool, "form@example.com", UserProfileFields::default()).await;
    let app = create_test_app(&pool).await;

    let (status, body) =
        admin_request(&app, test::TestRequest::get().uri(&profile_url(profile.id))).await;
    assert_eq!(status, 200);
    assert_eq!(body["display"], "form@example.com");

    let fieldsets = body["fieldsets"].as_array().expect("fieldsets array");
    assert_eq!(fieldsets.len(), 10);
    assert!(fieldsets[0]["name"].is_null());
    let password = &fieldsets[0]["fields"][1];
    assert_eq!(password["name"], "password");
    let summary = password["value"].as_str().unwrap_or_default();
    assert!(summary.starts_with("algorithm: argon2"));
    assert!(!summary.contains(&profile.password));

    let dates = fieldsets
        .iter()
        .find(|fs| fs["name"] == "Important Dates")
        .expect("Important Dates fieldset");
    let created = dates["fields"]
        .as_array()
        .and_then(|f| f.iter().find(|f| f["name"] == "created_at"))
        .expect("created_at field");
    assert_eq!(created["readonly"], true);

    assert_eq!(body["payments"]["primary_payment_method"], "No payment method set");
    assert_eq!(body["payments"]["has_payment_method"], false);
    assert_eq!(body["payments"]["has_external_account"], false);
    assert_eq!(body["payments"]["payment_methods"], json!([]));

    let (status, _) =
        admin_request(&app, test::TestRequest::get().uri(&profile_url(Uuid::new_v4()))).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_change_form_shows_linked_customer() {
    let pool = create_test_pool().await;
    let profile = create_user(&pool, "payer@example.com", UserProfileFields::default()).await;

    let stripe = Arc::new(InMemoryStripeCustomers::new());
    stripe
        .link(StripeCustomer {
            user_id: profile.id,
            stripe_customer_id: "cus_123".to_string(),
            default_payment_method: None,
            payment_methods: vec![
                StripePaymentMethod {
                    id: "pm_old".to_string(),
                    display_name: "Amex ending in 0005".to_string(),
                    is_active: false,
                },
                StripePaymentMethod {
                    id: "pm_visa".to_string(),
                    display_name: "Visa ending in 4242".to_string(),
                    is_active: true,
                },
            ],
            external_accounts: Vec::new(),
        })
        .unwrap();
    let app = create_test_app_with_stripe(&pool, stripe).await;

    let (status, body) =
        admin_request(&app, test::TestRequest::get().uri(&profile_url(profile.id))).await;
    assert_eq!(status, 200);
    assert_eq!(body["payments"]["primary_payment_method"], "Visa ending in 4242");
    assert_eq!(body["payments"]["has_payment_method"], true);
    assert_eq!(body["payments"]["has_external_account"], false);
    assert_eq!(body["payments"]["payment_methods"].as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn test_change_form_edits() {
    let pool = create_test_pool().await;
    let profile = create_user(&pool, "edit@example.com", UserProfileFields::default()).await;
    let app = create_test_app(&pool).await;
    let url = profile_url(profile.id);

    let (status, body) = admin_request(
        &app,
        test::TestRequest::patch()
            .uri(&url)
            .set_json(json!({"created_at": "2020-01-01T00:00:00Z", "favorite_color": "blue"})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["fields"]["created_at"][0], "This field is read-only.");
    assert_eq!(body["fields"]["favorite_color"][0], "Unknown field.");

    let (status, body) = admin_request(
        &app,
        test::TestRequest::patch()
            .uri(&url)
            .set_json(json!({"password": "sneaky"})),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["fields"]["password"].is_array());

    let (status, _) = admin_request(
        &app,
        test::TestRequest::patch()
            .uri(&url)
            .set_json(json!({"rating": 7.5})),
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = admin_request(
        &app,
        test::TestRequest::patch().uri(&url).set_json(json!({
            "city": "Denver",
            "user_type": "driver",
            "email_verified": true
        })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["city"], "Denver");
    assert_eq!(body["user_type"], "driver");
    assert_eq!(body["email_verified"], true);

    let stored = pool.get_user_profile(profile.id).await.unwrap().unwrap();
    assert_eq!(stored.city.as_deref(), Some("Denver"));
    assert_eq!(stored.user_type, UserType::Driver);
    assert_eq!(stored.password, profile.password);
}

#[actix_rt::test]
async fn test_password_change() {
    let pool = create_test_pool().await;
    let profile = create_user(&pool, "pw@example.com", UserProfileFields::default()).await;
    let app = create_test_app(&pool).await;
    let url = format!("{}password/", profile_url(profile.id));

    let (status, body) = admin_request(
        &app,
        test::TestRequest::post()
            .uri(&url)
            .set_json(json!({"password1": "fresh-pass-1", "password2": "fresh-pass-2"})),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["fields"]["password2"].is_array());

    let (status, _) = admin_request(
        &app,
        test::TestRequest::post()
            .uri(&url)
            .set_json(json!({"password1": "fresh-pass-1", "password2": "fresh-pass-1"})),
    )
    .await;
    assert_eq!(status, 204);

    let stored = pool.get_user_profile(profile.id).await.unwrap().unwrap();
    assert!(check_password(&stored, "fresh-pass-1"));
    assert!(!check_password(&stored, "test-password-123"));
}

#[actix_rt::test]
async fn test_delete_profile() {
    let pool = create_test_pool().await;
    let profile = create_user(&pool, "gone@example.com", UserProfileFields::default()).await;
    let app = create_test_app(&pool).await;
    let url = profile_url(profile.id);

    let (status, _) = admin_request(&app, test::TestRequest::delete().uri(&url)).await;
    assert_eq!(status, 204);

    let (status, _) = admin_request(&app, test::TestRequest::delete().uri(&url)).await;
    assert_eq!(status, 404);

    let (status, _) = admin_request(&app, test::TestRequest::get().uri(&url)).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_settings_admin() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let base = "/api/v1/admin/settings/workpreference/";

    let (status, created) = admin_request(&app, test::TestRequest::post().uri(base)).await;
    assert_eq!(status, 201);
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(created["kind"], "workpreference");
    assert_eq!(created["display"], format!("WorkPreference object ({})", id));

    let (status, list) = admin_request(&app, test::TestRequest::get().uri(base)).await;
    assert_eq!(status, 200);
    assert_eq!(list["model"], "settings.workpreference");
    assert_eq!(list["results"].as_array().map(Vec::len), Some(1));

    let record_url = format!("{}{}/", base, id);
    let (status, _) = admin_request(&app, test::TestRequest::get().uri(&record_url)).await;
    assert_eq!(status, 200);

    let (status, _) = admin_request(&app, test::TestRequest::delete().uri(&record_url)).await;
    assert_eq!(status, 204);
    let (status, _) = admin_request(&app, test::TestRequest::get().uri(&record_url)).await;
    assert_eq!(status, 404);

    let (status, _) = admin_request(
        &app,
        test::TestRequest::get().uri("/api/v1/admin/settings/paymentprofile/"),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_change_list_search_ignores_case() {
    let pool = create_test_pool().await;
    create_user(
        &pool,
        "lisbon@example.com",
        UserProfileFields {
            city: Some("ÉVORA".to_string()),
            ..Default::default()
        },
    )
    .await;
    create_user(
        &pool,
        "texas@example.com",
        UserProfileFields {
            first_name: Some("Maria".to_string()),
            city: Some("Austin".to_string()),
            ..Default::default()
        },
    )
    .await;
    create_user(
        &pool,
        "percent@example.com",
        UserProfileFields {
            last_name: Some("Hundred".to_string()),
            ..Default::default()
        },
    )
    .await;
    let app = create_test_app(&pool).await;

    let cases = [
        ("%C3%A9vora", vec!["lisbon@example.com"]),
        ("AUSTIN", vec!["texas@example.com"]),
        ("maria%20austin", vec!["texas@example.com"]),
        ("TEXAS@EXAMPLE", vec!["texas@example.com"]),
        // LIKE wildcards in the term are literal
        ("100%25", vec![]),
        ("_", vec![]),
    ];
    for (q, expected) in cases {
        let uri = format!("{}?q={}", PROFILES, q);
        let (status, body) = admin_request(&app, test::TestRequest::get().uri(&uri)).await;
        assert_eq!(status, 200, "search {}", q);
        assert_eq!(emails(&body), expected, "search {}", q);
        assert_eq!(body["pagination"]["total"], expected.len(), "search {}", q);
    }
}

#[actix_rt::test]
async fn test_change_list_rejects_huge_page() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let uri = format!("{}?p=184467440737095518", PROFILES);
    let (status, body) = admin_request(&app, test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_change_form_rejects_null_for_required_fields() {
    let pool = create_test_pool().await;
    let profile = create_user(
        &pool,
        "nulls@example.com",
        UserProfileFields {
            first_name: Some("Nia".to_string()),
            city: Some("Austin".to_string()),
            ..Default::default()
        },
    )
    .await;
    let app = create_test_app(&pool).await;
    let url = profile_url(profile.id);

    let (status, body) = admin_request(
        &app,
        test::TestRequest::patch().uri(&url).set_json(json!({
            "email": null,
            "first_name": null,
            "is_active": null,
            "user_type": null
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    for field in ["email", "first_name", "is_active", "user_type"] {
        assert!(body["fields"][field].is_array(), "{} should be rejected", field);
    }

    let stored = pool.get_user_profile(profile.id).await.unwrap().unwrap();
    assert_eq!(stored.email, "nulls@example.com");
    assert_eq!(stored.first_name, "Nia");
    assert!(stored.is_active);

    // Nullable fields still clear
    let (status, body) = admin_request(
        &app,
        test::TestRequest::patch()
            .uri(&url)
            .set_json(json!({"city": null})),
    )
    .await;
    assert_eq!(status, 200);
    assert!(body["city"].is_null());
}
