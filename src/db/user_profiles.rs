//! Database queries for user profiles.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, UpdateMany,
};
use uuid::Uuid;

use crate::entity::user_profile::{self, ActiveModel, Column, Entity as UserProfileEntity};
use crate::error::{AppError, AppResult};
use crate::models::{PaymentFrequency, PaymentPreference, Rating, UserProfile, UserType};

use super::DbPool;

/// A single change-list filter.
#[derive(Debug, Clone)]
pub enum ProfileFilter {
    /// Boolean column equals value
    Flag(Column, bool),
    UserType(UserType),
    /// `created_at` at or after the instant
    CreatedSince(DateTime<Utc>),
}

/// Search, filter, ordering and paging for a profile listing.
#[derive(Debug, Clone)]
pub struct ProfileListQuery {
    /// Whitespace-separated terms; each must match one of `search_columns`
    pub search: Option<String>,
    pub search_columns: Vec<Column>,
    pub filters: Vec<ProfileFilter>,
    pub ordering: Vec<(Column, Order)>,
    pub offset: u64,
    pub limit: u64,
}

impl Default for ProfileListQuery {
    fn default() -> Self {
        Self {
            search: None,
            search_columns: Vec::new(),
            filters: Vec::new(),
            ordering: vec![(Column::CreatedAt, Order::Desc)],
            offset: 0,
            limit: 100,
        }
    }
}

impl DbPool {
    /// Insert a new profile. Unique violations surface as `AppError::Conflict`.
    pub async fn insert_user_profile(&self, profile: &UserProfile) -> AppResult<UserProfile> {
        UserProfileEntity::insert(profile_to_active(profile))
            .exec(self.connection())
            .await?;

        self.get_user_profile(profile.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to fetch newly inserted profile".to_string()))
    }

    /// Find a profile by ID.
    pub async fn get_user_profile(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        let result = UserProfileEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user profile: {}", e)))?;

        Ok(result.map(model_to_profile))
    }

    /// Find a profile by its (already normalized) email.
    pub async fn get_user_profile_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        let result = UserProfileEntity::find()
            .filter(Column::Email.eq(email))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user profile: {}", e)))?;

        Ok(result.map(model_to_profile))
    }

    /// Save every field of an existing profile.
    ///
    /// `updated_at` and `token_updated_at` are refreshed on each save.
    pub async fn save_user_profile(&self, profile: &UserProfile) -> AppResult<UserProfile> {
        let now = Utc::now();
        let mut active = profile_to_active(profile);
        active.updated_at = Set(now);
        active.token_updated_at = Set(now);

        match active.update(self.connection()).await {
            Ok(model) => Ok(model_to_profile(model)),
            Err(DbErr::RecordNotUpdated) => {
                Err(AppError::NotFound(format!("User profile {}", profile.id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a profile. Returns false if it did not exist.
    pub async fn delete_user_profile(&self, id: Uuid) -> AppResult<bool> {
        let result = UserProfileEntity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user profile: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// List profiles matching a query, with the total count before paging.
    pub async fn list_user_profiles(
        &self,
        query: &ProfileListQuery,
    ) -> AppResult<(Vec<UserProfile>, u64)> {
        let mut select = UserProfileEntity::find();

        if let Some(search) = &query.search
            && !query.search_columns.is_empty()
        {
            for term in search.split_whitespace() {
                let mut any = Condition::any();
                for column in &query.search_columns {
                    any = any.add(icontains(*column, term));
                }
                select = select.filter(any);
            }
        }

        for filter in &query.filters {
            select = match filter {
                ProfileFilter::Flag(column, value) => select.filter(column.eq(*value)),
                ProfileFilter::UserType(user_type) => {
                    select.filter(Column::UserType.eq(user_type.as_str()))
                }
                ProfileFilter::CreatedSince(since) => select.filter(Column::CreatedAt.gte(*since)),
            };
        }

        // Count total before pagination
        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count user profiles: {}", e)))?;

        for (column, order) in &query.ordering {
            select = select.order_by(*column, order.clone());
        }

        let profiles = select
            .order_by_asc(Column::Id)
            .offset(query.offset)
            .limit(query.limit.clamp(1, 500))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list user profiles: {}", e)))?;

        Ok((profiles.into_iter().map(model_to_profile).collect(), total))
    }

    /// Store a new refresh token.
    pub async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> AppResult<UserProfile> {
        let now = Utc::now();
        let update = UserProfileEntity::update_many()
            .col_expr(Column::RefreshToken, Expr::value(token.map(str::to_string)))
            .col_expr(Column::TokenUpdatedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now));

        self.exec_profile_update(id, update).await
    }

    /// Record the live GPS position.
    pub async fn update_current_location(
        &self,
        id: Uuid,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<UserProfile> {
        let now = Utc::now();
        let update = UserProfileEntity::update_many()
            .col_expr(Column::CurrentLatitude, Expr::value(Some(latitude)))
            .col_expr(Column::CurrentLongitude, Expr::value(Some(longitude)))
            .col_expr(Column::LastLocationUpdate, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now));

        self.exec_profile_update(id, update).await
    }

    /// Stamp `last_login` with the current time.
    pub async fn record_login(&self, id: Uuid) -> AppResult<UserProfile> {
        let update = UserProfileEntity::update_many()
            .col_expr(Column::LastLogin, Expr::value(Some(Utc::now())));

        self.exec_profile_update(id, update).await
    }

    async fn exec_profile_update(
        &self,
        id: Uuid,
        update: UpdateMany<UserProfileEntity>,
    ) -> AppResult<UserProfile> {
        let result = update
            .filter(Column::Id.eq(id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update user profile: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("User profile {}", id)));
        }

        self.get_user_profile(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User profile {}", id)))
    }
}

/// Case-insensitive substring match.
///
/// `LOWER(col) LIKE` covers PostgreSQL. SQLite folds only ASCII in both
/// `LOWER` and `LIKE`, so the upper-cased term is tried as well.
fn icontains(column: Column, term: &str) -> Condition {
    let lower = like_pattern(&term.to_lowercase());
    let upper = like_pattern(&term.to_uppercase());
    Condition::any()
        .add(Expr::expr(Func::lower(Expr::col(column))).like(lower))
        .add(Expr::col(column).like(upper))
}

/// `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    LikeExpr::new(format!("%{}%", escaped)).escape('\\')
}

fn profile_to_active(p: &UserProfile) -> ActiveModel {
    ActiveModel {
        id: Set(p.id),
        password: Set(p.password.clone()),
        last_login: Set(p.last_login),
        is_superuser: Set(p.is_superuser),
        username: Set(p.username.clone()),
        first_name: Set(p.first_name.clone()),
        last_name: Set(p.last_name.clone()),
        email: Set(p.email.clone()),
        is_staff: Set(p.is_staff),
        is_active: Set(p.is_active),
        date_joined: Set(p.date_joined),
        user_type: Set(p.user_type.as_str().to_string()),
        refresh_token: Set(p.refresh_token.clone()),
        token_created_at: Set(p.token_created_at),
        token_updated_at: Set(p.token_updated_at),
        about_me: Set(p.about_me.clone()),
        started_at: Set(p.started_at),
        payment_method: Set(p.payment_method.as_str().to_string()),
        payment_frequency: Set(p.payment_frequency.as_str().to_string()),
        google_id: Set(p.google_id.clone()),
        apple_id: Set(p.apple_id.clone()),
        facebook_id: Set(p.facebook_id.clone()),
        profile_image: Set(p.profile_image.clone()),
        phone_number: Set(p.phone_number.clone()),
        date_of_birth: Set(p.date_of_birth),
        address: Set(p.address.clone()),
        city: Set(p.city.clone()),
        state: Set(p.state.clone()),
        zip_code: Set(p.zip_code.clone()),
        country: Set(p.country.clone()),
        address_latitude: Set(p.address_latitude),
        address_longitude: Set(p.address_longitude),
        current_latitude: Set(p.current_latitude),
        current_longitude: Set(p.current_longitude),
        last_location_update: Set(p.last_location_update),
        work_preference_id: Set(p.work_preference_id),
        notification_id: Set(p.notification_id),
        emergency_contact_id: Set(p.emergency_contact_id),
        email_verified: Set(p.email_verified),
        phone_verified: Set(p.phone_verified),
        identity_verified: Set(p.identity_verified),
        rating: Set(p.rating.map(|r| r.value())),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

fn model_to_profile(m: user_profile::Model) -> UserProfile {
    let user_type = UserType::parse(&m.user_type).unwrap_or_else(|| {
        tracing::warn!("Unknown user_type '{}' on profile {}", m.user_type, m.id);
        UserType::default()
    });
    let payment_method = PaymentPreference::parse(&m.payment_method).unwrap_or_default();
    let payment_frequency = PaymentFrequency::parse(&m.payment_frequency).unwrap_or_default();
    let rating = m.rating.and_then(|r| match Rating::new(r.round_dp(1)) {
        Ok(rating) => Some(rating),
        Err(e) => {
            tracing::warn!("Ignoring stored rating {} on profile {}: {}", r, m.id, e);
            None
        }
    });

    UserProfile {
        id: m.id,
        password: m.password,
        last_login: m.last_login,
        is_superuser: m.is_superuser,
        username: m.username,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        is_staff: m.is_staff,
        is_active: m.is_active,
        date_joined: m.date_joined,
        user_type,
        refresh_token: m.refresh_token,
        token_created_at: m.token_created_at,
        token_updated_at: m.token_updated_at,
        about_me: m.about_me,
        started_at: m.started_at,
        payment_method,
        payment_frequency,
        google_id: m.google_id,
        apple_id: m.apple_id,
        facebook_id: m.facebook_id,
        profile_image: m.profile_image,
        phone_number: m.phone_number,
        date_of_birth: m.date_of_birth,
        address: m.address,
        city: m.city,
        state: m.state,
        zip_code: m.zip_code,
        country: m.country,
        address_latitude: m.address_latitude,
        address_longitude: m.address_longitude,
        current_latitude: m.current_latitude,
        current_longitude: m.current_longitude,
        last_location_update: m.last_location_update,
        work_preference_id: m.work_preference_id,
        notification_id: m.notification_id,
        emergency_contact_id: m.emergency_contact_id,
        email_verified: m.email_verified,
        phone_verified: m.phone_verified,
        identity_verified: m.identity_verified,
        rating,
        created_at: m.created_at,
        updated_at: m.updated_at,
        stripe_customer: None,
    }
}
