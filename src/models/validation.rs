//! Field-level validation shared by the profile models.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::error::FieldErrors;

/// Normalize an email address by lower-casing the domain part.
///
/// The local part is left untouched; only the text after the last `@` is
/// case-folded. Surrounding whitespace is trimmed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Domains accepted without a dot.
const DOMAIN_ALLOWLIST: &[&str] = &["localhost"];

/// Loose structural check for an email address: a non-empty local part and
/// a dotted domain with no empty labels, or an allowlisted host.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if DOMAIN_ALLOWLIST
        .iter()
        .any(|allowed| domain.eq_ignore_ascii_case(allowed))
    {
        return true;
    }
    if domain.starts_with('[') && domain.ends_with(']') {
        return domain.len() > 2;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

/// Map blank strings to `None` so optional unique columns never collide on "".
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn check_max_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max, len
            ),
        );
    }
}

pub fn check_optional_max_length(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(v) = value {
        check_max_length(errors, field, v, max);
    }
}

/// Check a decimal against a column's precision and scale.
///
/// Trailing zeros do not count toward the decimal places, so `1.50` fits a
/// scale of 1.
pub fn check_decimal(
    errors: &mut FieldErrors,
    field: &str,
    value: Decimal,
    max_digits: u32,
    decimal_places: u32,
) {
    let normalized = value.normalize();
    let decimals = normalized.scale();
    let whole = normalized.trunc().abs();
    let whole_digits = if whole.is_zero() {
        0
    } else {
        whole.to_string().len() as u32
    };

    if decimals > decimal_places {
        errors.add(
            field,
            format!(
                "Ensure that there are no more than {} decimal places.",
                decimal_places
            ),
        );
    }
    if whole_digits > max_digits - decimal_places {
        errors.add(
            field,
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                max_digits - decimal_places
            ),
        );
    }
}

/// Star rating from 1.0 to 5.0 with one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Rating(Decimal);

impl Rating {
    pub fn min_value() -> Decimal {
        Decimal::new(10, 1)
    }

    pub fn max_value() -> Decimal {
        Decimal::new(50, 1)
    }

    /// Validate a rating value.
    pub fn new(value: Decimal) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        Self::check(&mut errors, "rating", value);
        if errors.is_empty() {
            Ok(Self(value))
        } else {
            Err(errors)
        }
    }

    fn check(errors: &mut FieldErrors, field: &str, value: Decimal) {
        check_decimal(errors, field, value, 3, 1);
        if value < Self::min_value() {
            errors.add(
                field,
                format!(
                    "Ensure this value is greater than or equal to {}.",
                    Self::min_value()
                ),
            );
        }
        if value > Self::max_value() {
            errors.add(
                field,
                format!(
                    "Ensure this value is less than or equal to {}.",
                    Self::max_value()
                ),
            );
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Rating::new(value).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<Decimal> for Rating {
    type Error = FieldErrors;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Used with `#[serde(default, deserialize_with = "double_option")]`: a
/// missing key stays `None`, `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
