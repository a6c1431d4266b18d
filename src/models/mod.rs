//! Domain models for the marketplace accounts service.

use utoipa::ToSchema;

pub mod payments;
pub mod settings;
pub mod user_profile;
pub mod validation;

// Re-export commonly used types
pub use payments::{PaymentSummary, StripeCustomer, StripeExternalAccount, StripePaymentMethod};
pub use settings::{SettingsKind, SettingsRecord};
pub use user_profile::{
    PaymentFrequency, PaymentPreference, UserProfile, UserProfileChange, UserProfileFields,
    UserType,
};
pub use validation::Rating;

/// Pagination metadata for responses.
#[derive(Debug, Clone, serde::Serialize, ToSchema)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Create pagination metadata.
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if total == 0 || per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };

        Pagination {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}
