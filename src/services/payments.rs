//! Lookup of the payments-app customer linked to a profile.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{StripeCustomer, UserProfile};

/// Source of stripe customer records, keyed by profile id.
#[async_trait]
pub trait StripeCustomerSource: Send + Sync {
    /// The customer linked to `user_id`, if any.
    async fn customer_for(&self, user_id: Uuid) -> AppResult<Option<StripeCustomer>>;
}

/// Source used when no payments app is wired in: nobody has a customer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStripeCustomers;

#[async_trait]
impl StripeCustomerSource for NoStripeCustomers {
    async fn customer_for(&self, _user_id: Uuid) -> AppResult<Option<StripeCustomer>> {
        Ok(None)
    }
}

/// Customers held in memory.
#[derive(Debug, Default)]
pub struct InMemoryStripeCustomers {
    customers: RwLock<HashMap<Uuid, StripeCustomer>>,
}

impl InMemoryStripeCustomers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&self, customer: StripeCustomer) -> AppResult<()> {
        let mut customers = self
            .customers
            .write()
            .map_err(|_| AppError::Database("Stripe customer store poisoned".to_string()))?;
        customers.insert(customer.user_id, customer);
        Ok(())
    }
}

#[async_trait]
impl StripeCustomerSource for InMemoryStripeCustomers {
    async fn customer_for(&self, user_id: Uuid) -> AppResult<Option<StripeCustomer>> {
        let customers = self
            .customers
            .read()
            .map_err(|_| AppError::Database("Stripe customer store poisoned".to_string()))?;
        Ok(customers.get(&user_id).cloned())
    }
}

/// Attach the linked customer, if any, to a loaded profile.
pub async fn load_stripe_customer(
    source: &dyn StripeCustomerSource,
    profile: UserProfile,
) -> AppResult<UserProfile> {
    let customer = source.customer_for(profile.id).await?;
    Ok(profile.with_stripe_customer(customer))
}
