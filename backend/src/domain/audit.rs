//! Creation and modification stamps carried by every entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::UserId;

/// Who touched a record, and when.
///
/// Actor ids are `None` for bootstrap and system writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub created_by: Option<UserId>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<UserId>,
}

impl Audit {
    /// Stamp a newly created record.
    pub fn created(at: DateTime<Utc>, by: Option<UserId>) -> Self {
        Self {
            created_at: at,
            created_by: by,
            updated_at: at,
            updated_by: by,
        }
    }

    /// Record a modification, keeping the creation stamp.
    pub fn touch(&mut self, at: DateTime<Utc>, by: Option<UserId>) {
        self.updated_at = at;
        self.updated_by = by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn touch_keeps_creation_stamp() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).single().expect("valid");
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).single().expect("valid");
        let editor = UserId::random();
        let mut audit = Audit::created(created, None);
        audit.touch(later, Some(editor));
        assert_eq!(audit.created_at, created);
        assert_eq!(audit.created_by, None);
        assert_eq!(audit.updated_at, later);
        assert_eq!(audit.updated_by, Some(editor));
    }
}
