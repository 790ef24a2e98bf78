//! Typed entity identifiers.
//!
//! Each entity gets its own UUID newtype so an organization id cannot be passed
//! where a hospital id is expected. All of them serialise as plain UUID
//! strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Failure to parse an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError {
    entity: &'static str,
}

impl IdParseError {
    /// Entity label for the identifier that failed to parse.
    pub fn entity(&self) -> &'static str {
        self.entity
    }
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} id must be a valid UUID", self.entity)
    }
}

impl std::error::Error for IdParseError {}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its canonical string form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdParseError> {
                let raw = raw.as_ref();
                if raw.trim() != raw {
                    return Err(IdParseError { entity: $label });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdParseError { entity: $label })
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

entity_id!(
    /// Identifier of an [`crate::domain::Organization`].
    OrganizationId,
    "organization"
);
entity_id!(
    /// Identifier of a [`crate::domain::Hospital`].
    HospitalId,
    "hospital"
);
entity_id!(
    /// Identifier of a [`crate::domain::Department`].
    DepartmentId,
    "department"
);
entity_id!(
    /// Identifier of a [`crate::domain::Location`].
    LocationId,
    "location"
);
entity_id!(
    /// Identifier of a [`crate::domain::Team`].
    TeamId,
    "team"
);
entity_id!(
    /// Identifier of a [`crate::domain::User`].
    UserId,
    "user"
);
entity_id!(
    /// Identifier of an [`crate::domain::Assignment`].
    AssignmentId,
    "assignment"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn rejects_malformed_ids(#[case] raw: &str) {
        let err = TeamId::new(raw).expect_err("malformed id");
        assert_eq!(err.entity(), "team");
        assert_eq!(err.to_string(), "team id must be a valid UUID");
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
        let back: UserId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, id);
    }
}
