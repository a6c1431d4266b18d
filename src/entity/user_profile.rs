//! User profile entity: login identity plus marketplace profile data.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Argon2 PHC string, or `!`-prefixed unusable marker
    #[sea_orm(column_type = "Text")]
    pub password: String,
    pub last_login: Option<DateTimeUtc>,
    pub is_superuser: bool,
    #[sea_orm(unique)]
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTimeUtc,
    /// customer, driver, valet
    pub user_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub refresh_token: Option<String>,
    pub token_created_at: DateTimeUtc,
    pub token_updated_at: DateTimeUtc,
    #[sea_orm(column_type = "Text", nullable)]
    pub about_me: Option<String>,
    pub started_at: DateTimeUtc,
    /// card, bank, apple_pay, google_pay
    pub payment_method: String,
    /// instant, weekly, biweekly, monthly
    pub payment_frequency: String,
    pub google_id: Option<String>,
    pub apple_id: Option<String>,
    pub facebook_id: Option<String>,
    pub profile_image: Option<String>,
    #[sea_orm(unique)]
    pub phone_number: Option<String>,
    pub date_of_birth: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((9, 6)))", nullable)]
    pub address_latitude: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((9, 6)))", nullable)]
    pub address_longitude: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 7)))", nullable)]
    pub current_latitude: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 7)))", nullable)]
    pub current_longitude: Option<Decimal>,
    pub last_location_update: Option<DateTimeUtc>,
    pub work_preference_id: Option<Uuid>,
    pub notification_id: Option<Uuid>,
    pub emergency_contact_id: Option<Uuid>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub identity_verified: bool,
    #[sea_orm(column_type = "Decimal(Some((3, 1)))", nullable)]
    pub rating: Option<Decimal>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_preference::Entity",
        from = "Column::WorkPreferenceId",
        to = "super::work_preference::Column::Id",
        on_delete = "SetNull"
    )]
    WorkPreference,
    #[sea_orm(
        belongs_to = "super::notification::Entity",
        from = "Column::NotificationId",
        to = "super::notification::Column::Id",
        on_delete = "SetNull"
    )]
    Notification,
    #[sea_orm(
        belongs_to = "super::emergency_contact::Entity",
        from = "Column::EmergencyContactId",
        to = "super::emergency_contact::Column::Id",
        on_delete = "SetNull"
    )]
    EmergencyContact,
}

impl Related<super::work_preference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkPreference.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl Related<super::emergency_contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmergencyContact.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
