//! Validated value types shared by the administration entities.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum length of an entity name, in characters.
pub const NAME_MAX: usize = 120;
/// Maximum length of a user display name, in characters.
pub const DISPLAY_NAME_MAX: usize = 80;
/// Maximum length of a normalised email address, in characters.
pub const EMAIL_MAX: usize = 320;

/// Validation failures for the value types in this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    EmptyName,
    NameTooLong { max: usize },
    InvalidEmail,
    EmailTooLong { max: usize },
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    UnknownLocationKind(String),
    UnknownRole(String),
    EndBeforeStart,
}

impl ValueError {
    /// Stable machine-readable code reported in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyDisplayName => "empty",
            Self::NameTooLong { .. }
            | Self::EmailTooLong { .. }
            | Self::DisplayNameTooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::UnknownLocationKind(_) | Self::UnknownRole(_) => "unknown_variant",
            Self::EndBeforeStart => "end_before_start",
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::UnknownLocationKind(raw) => write!(f, "unknown location kind: {raw}"),
            Self::UnknownRole(raw) => write!(f, "unknown role: {raw}"),
            Self::EndBeforeStart => write!(f, "end date must not precede start date"),
        }
    }
}

impl std::error::Error for ValueError {}

/// Name of an organization, hospital, department, location or team.
///
/// Names are stored trimmed. Uniqueness is decided on [`EntityName::key`],
/// which folds case and collapses inner whitespace.
///
/// # Examples
/// ```
/// use hospadmin::domain::EntityName;
///
/// let name = EntityName::new("  Intensive  Care ").expect("valid name");
/// assert_eq!(name.as_ref(), "Intensive  Care");
/// assert_eq!(name.key(), "intensive care");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityName(String);

impl EntityName {
    /// Validate and construct a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValueError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValueError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(ValueError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Normalised comparison key.
    #[must_use]
    pub fn key(&self) -> String {
        self.0
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EntityName> for String {
    fn from(value: EntityName) -> Self {
        value.0
    }
}

impl TryFrom<String> for EntityName {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// The length limit applies after lower-casing.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValueError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.chars().count() > EMAIL_MAX {
            return Err(ValueError::EmailTooLong { max: EMAIL_MAX });
        }
        let mut parts = normalised.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ValueError::InvalidEmail);
        };
        let domain_ok = domain.contains('.') && domain.split('.').all(|label| !label.is_empty());
        if local.is_empty() || !domain_ok || normalised.chars().any(char::is_whitespace) {
            return Err(ValueError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable name for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a display name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValueError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValueError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(ValueError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Kind of hospital location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Ward,
    Clinic,
    Theatre,
    Other,
}

impl LocationKind {
    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ward => "ward",
            Self::Clinic => "clinic",
            Self::Theatre => "theatre",
            Self::Other => "other",
        }
    }
}

impl FromStr for LocationKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ward" => Ok(Self::Ward),
            "clinic" => Ok(Self::Clinic),
            "theatre" => Ok(Self::Theatre),
            "other" => Ok(Self::Other),
            other => Err(ValueError::UnknownLocationKind(other.to_owned())),
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role held by a user within their organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform operator; may act on every organization.
    SuperAdmin,
    /// Manages everything inside one organization.
    OrgAdmin,
    /// Read-only access to one organization.
    Staff,
}

impl UserRole {
    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::OrgAdmin => "org_admin",
            Self::Staff => "staff",
        }
    }
}

impl FromStr for UserRole {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "org_admin" => Ok(Self::OrgAdmin),
            "staff" => Ok(Self::Staff),
            other => Err(ValueError::UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date period with an optional open end.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use hospadmin::domain::DateRange;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date");
/// let range = DateRange::new(day(1), Some(day(7))).expect("ordered");
/// assert!(range.covers(day(7)));
/// assert!(!range.covers(day(8)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(rename = "startDate")]
    start: NaiveDate,
    #[serde(rename = "endDate")]
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Build a range, rejecting an end that precedes the start.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, ValueError> {
        if end.is_some_and(|end| end < start) {
            return Err(ValueError::EndBeforeStart);
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Whether `day` falls inside the range.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start <= day && self.end.is_none_or(|end| day <= end)
    }

    /// Whether the two ranges share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        let self_starts_before_other_ends = other.end.is_none_or(|end| self.start <= end);
        let other_starts_before_self_ends = self.end.is_none_or(|end| other.start <= end);
        self_starts_before_other_ends && other_starts_before_self_ends
    }
}
