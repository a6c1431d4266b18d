//! Payment-processor collaborator types.
//!
//! The stripe customer record and its payment methods and payout accounts are
//! owned by the payments app; this service only reads them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored card, bank debit or wallet attached to a stripe customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StripePaymentMethod {
    pub id: String,
    /// Human-readable label, e.g. "Visa ending in 4242".
    pub display_name: String,
    pub is_active: bool,
}

/// A payout destination (bank account or debit card) for drivers and valets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StripeExternalAccount {
    pub id: String,
    pub display_name: String,
    pub is_active: bool,
}

/// Payment-processor customer linked one-to-one with a user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StripeCustomer {
    pub user_id: Uuid,
    pub stripe_customer_id: String,
    pub default_payment_method: Option<StripePaymentMethod>,
    pub payment_methods: Vec<StripePaymentMethod>,
    pub external_accounts: Vec<StripeExternalAccount>,
}

impl StripeCustomer {
    pub fn active_payment_methods(&self) -> impl Iterator<Item = &StripePaymentMethod> {
        self.payment_methods.iter().filter(|m| m.is_active)
    }

    pub fn active_external_accounts(&self) -> impl Iterator<Item = &StripeExternalAccount> {
        self.external_accounts.iter().filter(|a| a.is_active)
    }

    /// An active default method counts even when it is missing from
    /// `payment_methods`.
    pub fn has_payment_methods(&self) -> bool {
        self.default_payment_method
            .as_ref()
            .is_some_and(|m| m.is_active)
            || self.active_payment_methods().next().is_some()
    }

    pub fn has_external_accounts(&self) -> bool {
        self.active_external_accounts().next().is_some()
    }
}

/// Payment summary shown on the admin change form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentSummary {
    pub primary_payment_method: String,
    pub has_payment_method: bool,
    pub has_external_account: bool,
    pub payment_methods: Vec<StripePaymentMethod>,
    pub external_accounts: Vec<StripeExternalAccount>,
}
