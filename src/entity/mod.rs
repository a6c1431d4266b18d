//! SeaORM entity definitions.

pub mod emergency_contact;
pub mod notification;
pub mod user_profile;
pub mod work_preference;
