//! Change-list query parameters for the user profile admin.
//!
//! `q` searches, `o` orders (comma separated, `-` for descending), `p` picks
//! the 1-based page, and every `list_filter` field may appear as its own
//! parameter: booleans take `true`/`false`/`1`/`0`, `user_type` takes a type
//! slug and `created_at` takes one of `today`, `past_7_days`, `this_month`,
//! `this_year`.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use sea_orm::Order;

use crate::db::user_profiles::{ProfileFilter, ProfileListQuery};
use crate::entity::user_profile::Column;
use crate::error::{AppError, AppResult};
use crate::models::UserType;

use super::ModelAdmin;

pub const SEARCH_PARAM: &str = "q";
pub const ORDER_PARAM: &str = "o";
pub const PAGE_PARAM: &str = "p";

/// Relative windows offered by the `created_at` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Today,
    PastSevenDays,
    ThisMonth,
    ThisYear,
}

impl DateRange {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "today" => Some(Self::Today),
            "past_7_days" => Some(Self::PastSevenDays),
            "this_month" => Some(Self::ThisMonth),
            "this_year" => Some(Self::ThisYear),
            _ => None,
        }
    }

    /// Start of the window, at midnight UTC.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let start = match self {
            Self::Today => today,
            Self::PastSevenDays => today - Duration::days(7),
            Self::ThisMonth => today.with_day(1).unwrap_or(today),
            Self::ThisYear => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        };
        start.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}

/// A parsed change-list request.
#[derive(Debug, Clone)]
pub struct ChangeListQuery {
    pub page: u64,
    pub per_page: u64,
    pub list: ProfileListQuery,
}

impl ChangeListQuery {
    /// Interpret raw query parameters against a registration.
    pub fn parse(
        admin: &ModelAdmin,
        params: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        for key in params.keys() {
            let known = [SEARCH_PARAM, ORDER_PARAM, PAGE_PARAM].contains(&key.as_str())
                || admin.list_filter.contains(&key.as_str());
            if !known {
                return Err(AppError::InvalidInput(format!(
                    "Unknown change-list parameter '{}'",
                    key
                )));
            }
        }

        let page = match params.get(PAGE_PARAM) {
            Some(p) => p
                .parse::<u64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| AppError::InvalidInput(format!("Invalid page '{}'", p)))?,
            None => 1,
        };
        let per_page = admin.list_per_page;
        let offset = (page - 1)
            .checked_mul(per_page)
            // SQL OFFSET is a signed 64-bit integer
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid page '{}'", page)))?;

        let search = params
            .get(SEARCH_PARAM)
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        let search_columns = admin
            .search_fields
            .iter()
            .map(|f| column(f))
            .collect::<AppResult<Vec<_>>>()?;

        let mut filters = Vec::new();
        for field in &admin.list_filter {
            if let Some(value) = params.get(*field) {
                filters.push(parse_filter(field, value, now)?);
            }
        }

        let ordering = match params.get(ORDER_PARAM) {
            Some(o) => parse_ordering(admin, o)?,
            None => admin
                .ordering
                .iter()
                .map(|o| ordering_term(o))
                .collect::<AppResult<Vec<_>>>()?,
        };

        Ok(Self {
            page,
            per_page,
            list: ProfileListQuery {
                search,
                search_columns,
                filters,
                ordering,
                offset,
                limit: per_page,
            },
        })
    }
}

fn column(field: &str) -> AppResult<Column> {
    Column::from_str(field)
        .map_err(|_| AppError::InvalidInput(format!("Unknown field '{}'", field)))
}

fn parse_filter(field: &str, value: &str, now: DateTime<Utc>) -> AppResult<ProfileFilter> {
    let invalid = || {
        AppError::InvalidInput(format!("Invalid value '{}' for filter '{}'", value, field))
    };

    match column(field)? {
        Column::UserType => UserType::parse(value)
            .map(ProfileFilter::UserType)
            .ok_or_else(invalid),
        Column::CreatedAt => DateRange::parse(value)
            .map(|range| ProfileFilter::CreatedSince(range.since(now)))
            .ok_or_else(invalid),
        col => {
            let flag = match value.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => return Err(invalid()),
            };
            Ok(ProfileFilter::Flag(col, flag))
        }
    }
}

fn ordering_term(term: &str) -> AppResult<(Column, Order)> {
    match term.strip_prefix('-') {
        Some(field) => Ok((column(field)?, Order::Desc)),
        None => Ok((column(term)?, Order::Asc)),
    }
}

fn parse_ordering(admin: &ModelAdmin, raw: &str) -> AppResult<Vec<(Column, Order)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|term| {
            let field = term.trim_start_matches('-');
            if !admin.is_sortable(field) {
                return Err(AppError::InvalidInput(format!(
                    "Cannot order by '{}'",
                    field
                )));
            }
            ordering_term(term)
        })
        .collect()
}
