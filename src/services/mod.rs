//! Business logic services.

pub mod password;
pub mod payments;
pub mod user_manager;

pub use payments::{InMemoryStripeCustomers, NoStripeCustomers, StripeCustomerSource};
pub use user_manager::{check_password, UserProfileManager};
