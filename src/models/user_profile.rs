//! User profile domain model, choice enums and field validation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::payments::{PaymentSummary, StripeCustomer, StripeExternalAccount, StripePaymentMethod};
use super::validation::{
    blank_to_none, check_decimal, check_max_length, check_optional_max_length, double_option,
    is_valid_email, normalize_email, Rating,
};
use crate::error::FieldErrors;

/// Fallback label when no payment method is available.
pub const NO_PAYMENT_METHOD: &str = "No payment method set";

/// Default country for new profiles.
pub const DEFAULT_COUNTRY: &str = "US";

/// Marketplace role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Customer,
    Driver,
    Valet,
}

impl UserType {
    pub const ALL: [UserType; 3] = [Self::Customer, Self::Driver, Self::Valet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Driver => "driver",
            Self::Valet => "valet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Driver => "Driver",
            Self::Valet => "Valet",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "customer" => Some(Self::Customer),
            "driver" => Some(Self::Driver),
            "valet" => Some(Self::Valet),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Preferred way of paying or being paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPreference {
    #[default]
    Card,
    Bank,
    ApplePay,
    GooglePay,
}

impl PaymentPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Bank => "bank",
            Self::ApplePay => "apple_pay",
            Self::GooglePay => "google_pay",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Card => "Credit/Debit Card",
            Self::Bank => "Bank Account",
            Self::ApplePay => "Apple Pay",
            Self::GooglePay => "Google Pay",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "card" => Some(Self::Card),
            "bank" => Some(Self::Bank),
            "apple_pay" => Some(Self::ApplePay),
            "google_pay" => Some(Self::GooglePay),
            _ => None,
        }
    }
}

/// How often earnings are paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Instant,
    Weekly,
    Biweekly,
    Monthly,
}

impl PaymentFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instant => "instant",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Instant => "Instant",
            Self::Weekly => "Weekly",
            Self::Biweekly => "Bi-weekly",
            Self::Monthly => "Monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "instant" => Some(Self::Instant),
            "weekly" => Some(Self::Weekly),
            "biweekly" => Some(Self::Biweekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

/// A marketplace account. Email is the login identifier.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub password: String,
    pub last_login: Option<DateTime<Utc>>,
    pub is_superuser: bool,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub user_type: UserType,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub token_created_at: DateTime<Utc>,
    pub token_updated_at: DateTime<Utc>,
    pub about_me: Option<String>,
    pub started_at: DateTime<Utc>,
    pub payment_method: PaymentPreference,
    pub payment_frequency: PaymentFrequency,
    pub google_id: Option<String>,
    pub apple_id: Option<String>,
    pub facebook_id: Option<String>,
    /// Storage key under `profile_images/`
    pub profile_image: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    /// Geocoded from the street address
    pub address_latitude: Option<Decimal>,
    pub address_longitude: Option<Decimal>,
    /// Live GPS position
    pub current_latitude: Option<Decimal>,
    pub current_longitude: Option<Decimal>,
    pub last_location_update: Option<DateTime<Utc>>,
    pub work_preference_id: Option<Uuid>,
    pub notification_id: Option<Uuid>,
    pub emergency_contact_id: Option<Uuid>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub identity_verified: bool,
    pub rating: Option<Rating>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Payments-app relation, loaded on demand
    #[serde(skip)]
    pub stripe_customer: Option<StripeCustomer>,
}

impl UserProfile {
    pub const VERBOSE_NAME: &'static str = "User Profile";
    pub const VERBOSE_NAME_PLURAL: &'static str = "User Profiles";

    /// A profile with model defaults for everything but the identity fields.
    pub fn new(email: String, username: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            password: String::new(),
            last_login: None,
            is_superuser: false,
            username,
            first_name: String::new(),
            last_name: String::new(),
            email,
            is_staff: false,
            is_active: true,
            date_joined: now,
            user_type: UserType::default(),
            refresh_token: None,
            token_created_at: now,
            token_updated_at: now,
            about_me: None,
            started_at: now,
            payment_method: PaymentPreference::default(),
            payment_frequency: PaymentFrequency::default(),
            google_id: None,
            apple_id: None,
            facebook_id: None,
            profile_image: None,
            phone_number: None,
            date_of_birth: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            country: Some(DEFAULT_COUNTRY.to_string()),
            address_latitude: None,
            address_longitude: None,
            current_latitude: None,
            current_longitude: None,
            last_location_update: None,
            work_preference_id: None,
            notification_id: None,
            emergency_contact_id: None,
            email_verified: false,
            phone_verified: false,
            identity_verified: false,
            rating: None,
            created_at: now,
            updated_at: now,
            stripe_customer: None,
        }
    }

    /// Attach the payments-app relation.
    pub fn with_stripe_customer(mut self, customer: Option<StripeCustomer>) -> Self {
        self.stripe_customer = customer;
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Unusable passwords start with `!` and never verify.
    pub fn has_usable_password(&self) -> bool {
        !self.password.is_empty() && !self.password.starts_with('!')
    }

    /// Label of the default payment method, else the first active one.
    pub fn primary_payment_method(&self) -> String {
        let Some(customer) = &self.stripe_customer else {
            return NO_PAYMENT_METHOD.to_string();
        };
        customer
            .default_payment_method
            .as_ref()
            .or_else(|| customer.active_payment_methods().next())
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| NO_PAYMENT_METHOD.to_string())
    }

    pub fn has_payment_method(&self) -> bool {
        self.stripe_customer
            .as_ref()
            .is_some_and(StripeCustomer::has_payment_methods)
    }

    /// Whether a payout destination is configured.
    pub fn has_external_account(&self) -> bool {
        self.stripe_customer
            .as_ref()
            .is_some_and(StripeCustomer::has_external_accounts)
    }

    pub fn payment_methods(&self) -> Vec<StripePaymentMethod> {
        self.stripe_customer
            .as_ref()
            .map(|c| c.active_payment_methods().cloned().collect())
            .unwrap_or_default()
    }

    pub fn external_accounts(&self) -> Vec<StripeExternalAccount> {
        self.stripe_customer
            .as_ref()
            .map(|c| c.active_external_accounts().cloned().collect())
            .unwrap_or_default()
    }

    pub fn payment_summary(&self) -> PaymentSummary {
        PaymentSummary {
            primary_payment_method: self.primary_payment_method(),
            has_payment_method: self.has_payment_method(),
            has_external_account: self.has_external_account(),
            payment_methods: self.payment_methods(),
            external_accounts: self.external_accounts(),
        }
    }

    /// Check every field constraint, collecting all failures.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.email.is_empty() {
            errors.add("email", "This field is required.");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "Enter a valid email address.");
        }
        check_max_length(&mut errors, "email", &self.email, 254);
        check_optional_max_length(&mut errors, "username", self.username.as_deref(), 150);
        check_max_length(&mut errors, "first_name", &self.first_name, 150);
        check_max_length(&mut errors, "last_name", &self.last_name, 150);
        check_optional_max_length(&mut errors, "google_id", self.google_id.as_deref(), 255);
        check_optional_max_length(&mut errors, "apple_id", self.apple_id.as_deref(), 255);
        check_optional_max_length(&mut errors, "facebook_id", self.facebook_id.as_deref(), 255);
        check_optional_max_length(
            &mut errors,
            "profile_image",
            self.profile_image.as_deref(),
            100,
        );
        check_optional_max_length(&mut errors, "phone_number", self.phone_number.as_deref(), 20);
        check_optional_max_length(&mut errors, "city", self.city.as_deref(), 100);
        check_optional_max_length(&mut errors, "state", self.state.as_deref(), 100);
        check_optional_max_length(&mut errors, "zip_code", self.zip_code.as_deref(), 10);
        check_optional_max_length(&mut errors, "country", self.country.as_deref(), 100);

        let coordinates = [
            ("address_latitude", self.address_latitude, 9, 6),
            ("address_longitude", self.address_longitude, 9, 6),
            ("current_latitude", self.current_latitude, 10, 7),
            ("current_longitude", self.current_longitude, 10, 7),
        ];
        for (field, value, max_digits, decimal_places) in coordinates {
            if let Some(v) = value {
                check_decimal(&mut errors, field, v, max_digits, decimal_places);
            }
        }

        if let Some(rating) = self.rating
            && let Err(e) = Rating::new(rating.value())
        {
            errors.merge(e);
        }

        errors
    }

    /// Drop blank optional strings so they are stored as NULL.
    pub fn normalize_blanks(&mut self) {
        self.username = blank_to_none(self.username.take());
        self.phone_number = blank_to_none(self.phone_number.take());
        self.google_id = blank_to_none(self.google_id.take());
        self.apple_id = blank_to_none(self.apple_id.take());
        self.facebook_id = blank_to_none(self.facebook_id.take());
        self.profile_image = blank_to_none(self.profile_image.take());
        self.about_me = blank_to_none(self.about_me.take());
        self.address = blank_to_none(self.address.take());
        self.city = blank_to_none(self.city.take());
        self.state = blank_to_none(self.state.take());
        self.zip_code = blank_to_none(self.zip_code.take());
        self.country = blank_to_none(self.country.take());
        self.refresh_token = blank_to_none(self.refresh_token.take());
    }
}

impl std::fmt::Display for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.email)
    }
}

/// Optional fields accepted when creating a profile through the manager.
///
/// Anything left `None` takes the model default.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UserProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_type: Option<UserType>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub about_me: Option<String>,
    pub payment_method: Option<PaymentPreference>,
    pub payment_frequency: Option<PaymentFrequency>,
    pub google_id: Option<String>,
    pub apple_id: Option<String>,
    pub facebook_id: Option<String>,
    pub profile_image: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub address_latitude: Option<Decimal>,
    pub address_longitude: Option<Decimal>,
    pub current_latitude: Option<Decimal>,
    pub current_longitude: Option<Decimal>,
    pub work_preference_id: Option<Uuid>,
    pub notification_id: Option<Uuid>,
    pub emergency_contact_id: Option<Uuid>,
    pub email_verified: Option<bool>,
    pub phone_verified: Option<bool>,
    pub identity_verified: Option<bool>,
    pub rating: Option<Rating>,
}

impl UserProfileFields {
    /// Copy every provided field onto the profile.
    pub fn apply_to(self, profile: &mut UserProfile) {
        if let Some(v) = self.first_name {
            profile.first_name = v;
        }
        if let Some(v) = self.last_name {
            profile.last_name = v;
        }
        if let Some(v) = self.user_type {
            profile.user_type = v;
        }
        if let Some(v) = self.is_active {
            profile.is_active = v;
        }
        if let Some(v) = self.is_staff {
            profile.is_staff = v;
        }
        if let Some(v) = self.is_superuser {
            profile.is_superuser = v;
        }
        if let Some(v) = self.payment_method {
            profile.payment_method = v;
        }
        if let Some(v) = self.payment_frequency {
            profile.payment_frequency = v;
        }
        if self.country.is_some() {
            profile.country = self.country;
        }
        if let Some(v) = self.email_verified {
            profile.email_verified = v;
        }
        if let Some(v) = self.phone_verified {
            profile.phone_verified = v;
        }
        if let Some(v) = self.identity_verified {
            profile.identity_verified = v;
        }
        profile.about_me = self.about_me;
        profile.google_id = self.google_id;
        profile.apple_id = self.apple_id;
        profile.facebook_id = self.facebook_id;
        profile.profile_image = self.profile_image;
        profile.phone_number = self.phone_number;
        profile.date_of_birth = self.date_of_birth;
        profile.address = self.address;
        profile.city = self.city;
        profile.state = self.state;
        profile.zip_code = self.zip_code;
        profile.address_latitude = self.address_latitude;
        profile.address_longitude = self.address_longitude;
        profile.current_latitude = self.current_latitude;
        profile.current_longitude = self.current_longitude;
        profile.work_preference_id = self.work_preference_id;
        profile.notification_id = self.notification_id;
        profile.emergency_contact_id = self.emergency_contact_id;
        profile.rating = self.rating;
    }
}

/// Edits accepted by the admin change form.
///
/// Absent keys are left untouched; an explicit `null` clears a nullable field.
/// Read-only and unknown keys are rejected at deserialization.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UserProfileChange {
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub username: Option<Option<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub profile_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub about_me: Option<Option<String>>,
    pub user_type: Option<UserType>,
    #[serde(default, deserialize_with = "double_option")]
    pub rating: Option<Option<Rating>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub zip_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address_latitude: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address_longitude: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_latitude: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_longitude: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_location_update: Option<Option<DateTime<Utc>>>,
    pub payment_method: Option<PaymentPreference>,
    pub payment_frequency: Option<PaymentFrequency>,
    #[serde(default, deserialize_with = "double_option")]
    pub google_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub apple_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub facebook_id: Option<Option<String>>,
    pub email_verified: Option<bool>,
    pub phone_verified: Option<bool>,
    pub identity_verified: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub work_preference_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notification_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub emergency_contact_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_login: Option<Option<DateTime<Utc>>>,
}

macro_rules! apply_fields {
    ($change:expr, $profile:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $change.$field {
                $profile.$field = value;
            }
        )+
    };
}

impl UserProfileChange {
    /// Fields that must hold a value; `null` is rejected rather than ignored.
    pub const NON_NULLABLE: &'static [&'static str] = &[
        "email",
        "first_name",
        "last_name",
        "user_type",
        "payment_method",
        "payment_frequency",
        "email_verified",
        "phone_verified",
        "identity_verified",
        "is_active",
        "is_staff",
        "is_superuser",
        "started_at",
    ];

    /// Field errors for explicit `null`s sent to non-nullable fields.
    pub fn null_errors(body: &serde_json::Map<String, serde_json::Value>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for (key, value) in body {
            if value.is_null() && Self::NON_NULLABLE.contains(&key.as_str()) {
                errors.add(key, "This field may not be null.");
            }
        }
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.touched_fields().is_empty()
    }

    /// Names of the fields this change sets, for audit logging.
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        macro_rules! touched {
            ($($field:ident),+ $(,)?) => {
                $(
                    if self.$field.is_some() {
                        fields.push(stringify!($field));
                    }
                )+
            };
        }
        touched!(
            email, username, first_name, last_name, phone_number, date_of_birth,
            profile_image, about_me, user_type, rating, address, city, state, zip_code,
            country, address_latitude, address_longitude, current_latitude,
            current_longitude, last_location_update, payment_method, payment_frequency,
            google_id, apple_id, facebook_id, email_verified, phone_verified,
            identity_verified, work_preference_id, notification_id, emergency_contact_id,
            is_active, is_staff, is_superuser, started_at, last_login,
        );
        fields
    }

    /// Apply the change. The email, when present, is normalized.
    pub fn apply_to(self, profile: &mut UserProfile) {
        if let Some(email) = &self.email {
            profile.email = normalize_email(email);
        }
        apply_fields!(self, profile;
            username, first_name, last_name, phone_number, date_of_birth,
            profile_image, about_me, user_type, rating, address, city, state, zip_code,
            country, address_latitude, address_longitude, current_latitude,
            current_longitude, last_location_update, payment_method, payment_frequency,
            google_id, apple_id, facebook_id, email_verified, phone_verified,
            identity_verified, work_preference_id, notification_id, emergency_contact_id,
            is_active, is_staff, is_superuser, started_at, last_login,
        );
        profile.normalize_blanks();
    }
}
