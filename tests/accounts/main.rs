//! Accounts integration test suite.
//!
//! Runs against an in-memory SQLite database migrated fresh for every test.
//!
//! Run with: cargo test --test accounts

mod test_helpers;

mod test_admin_api;
mod test_profile_mutations;
mod test_settings_deletion;
mod test_user_manager;
