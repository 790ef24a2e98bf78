//! Date-bounded assignments linking departments, locations, teams and users.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use super::{
    AssignmentId, Audit, DateRange, DepartmentId, LocationId, OrganizationId, TeamId, UserId,
};

/// Discriminant of an [`AssignmentLink`], used for storage and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    DepartmentLocation,
    DepartmentTeam,
    TeamLocation,
    UserTeam,
    WardDepartment,
}

impl AssignmentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DepartmentLocation => "department_location",
            Self::DepartmentTeam => "department_team",
            Self::TeamLocation => "team_location",
            Self::UserTeam => "user_team",
            Self::WardDepartment => "ward_department",
        }
    }
}

/// Unknown assignment kind text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAssignmentKind(pub String);

impl fmt::Display for UnknownAssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown assignment kind: {}", self.0)
    }
}

impl std::error::Error for UnknownAssignmentKind {}

impl FromStr for AssignmentKind {
    type Err = UnknownAssignmentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "department_location" => Ok(Self::DepartmentLocation),
            "department_team" => Ok(Self::DepartmentTeam),
            "team_location" => Ok(Self::TeamLocation),
            "user_team" => Ok(Self::UserTeam),
            "ward_department" => Ok(Self::WardDepartment),
            other => Err(UnknownAssignmentKind(other.to_owned())),
        }
    }
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two endpoints joined by an assignment.
///
/// Serialised with a `kind` tag, e.g.
/// `{"kind":"user_team","userId":"…","teamId":"…"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum AssignmentLink {
    DepartmentLocation {
        department_id: DepartmentId,
        location_id: LocationId,
    },
    DepartmentTeam {
        department_id: DepartmentId,
        team_id: TeamId,
    },
    TeamLocation {
        team_id: TeamId,
        location_id: LocationId,
    },
    UserTeam {
        user_id: UserId,
        team_id: TeamId,
    },
    /// `location_id` must reference a location of kind ward.
    WardDepartment {
        location_id: LocationId,
        department_id: DepartmentId,
    },
}

/// Loose endpoint columns as stored, before the kind is checked against them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkColumns {
    pub department_id: Option<DepartmentId>,
    pub location_id: Option<LocationId>,
    pub team_id: Option<TeamId>,
    pub user_id: Option<UserId>,
}

impl AssignmentLink {
    pub const fn kind(&self) -> AssignmentKind {
        match self {
            Self::DepartmentLocation { .. } => AssignmentKind::DepartmentLocation,
            Self::DepartmentTeam { .. } => AssignmentKind::DepartmentTeam,
            Self::TeamLocation { .. } => AssignmentKind::TeamLocation,
            Self::UserTeam { .. } => AssignmentKind::UserTeam,
            Self::WardDepartment { .. } => AssignmentKind::WardDepartment,
        }
    }

    /// Rebuild a link from its kind and endpoint columns.
    ///
    /// Returns `None` when a column the kind needs is missing.
    pub fn from_columns(kind: AssignmentKind, columns: LinkColumns) -> Option<Self> {
        let LinkColumns {
            department_id,
            location_id,
            team_id,
            user_id,
        } = columns;
        Some(match kind {
            AssignmentKind::DepartmentLocation => Self::DepartmentLocation {
                department_id: department_id?,
                location_id: location_id?,
            },
            AssignmentKind::DepartmentTeam => Self::DepartmentTeam {
                department_id: department_id?,
                team_id: team_id?,
            },
            AssignmentKind::TeamLocation => Self::TeamLocation {
                team_id: team_id?,
                location_id: location_id?,
            },
            AssignmentKind::UserTeam => Self::UserTeam {
                user_id: user_id?,
                team_id: team_id?,
            },
            AssignmentKind::WardDepartment => Self::WardDepartment {
                location_id: location_id?,
                department_id: department_id?,
            },
        })
    }

    /// Flatten the endpoints into storage columns.
    pub fn columns(&self) -> LinkColumns {
        LinkColumns {
            department_id: self.department_id(),
            location_id: self.location_id(),
            team_id: self.team_id(),
            user_id: self.user_id(),
        }
    }

    pub fn department_id(&self) -> Option<DepartmentId> {
        match *self {
            Self::DepartmentLocation { department_id, .. }
            | Self::DepartmentTeam { department_id, .. }
            | Self::WardDepartment { department_id, .. } => Some(department_id),
            Self::TeamLocation { .. } | Self::UserTeam { .. } => None,
        }
    }

    pub fn location_id(&self) -> Option<LocationId> {
        match *self {
            Self::DepartmentLocation { location_id, .. }
            | Self::TeamLocation { location_id, .. }
            | Self::WardDepartment { location_id, .. } => Some(location_id),
            Self::DepartmentTeam { .. } | Self::UserTeam { .. } => None,
        }
    }

    pub fn team_id(&self) -> Option<TeamId> {
        match *self {
            Self::DepartmentTeam { team_id, .. }
            | Self::TeamLocation { team_id, .. }
            | Self::UserTeam { team_id, .. } => Some(team_id),
            Self::DepartmentLocation { .. } | Self::WardDepartment { .. } => None,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match *self {
            Self::UserTeam { user_id, .. } => Some(user_id),
            _ => None,
        }
    }
}

/// A dated link between two organization records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub org_id: OrganizationId,
    pub link: AssignmentLink,
    #[serde(flatten)]
    pub period: DateRange,
    pub active: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Narrowing applied when listing assignments. Empty fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    pub kind: Option<AssignmentKind>,
    pub department_id: Option<DepartmentId>,
    pub location_id: Option<LocationId>,
    pub team_id: Option<TeamId>,
    pub user_id: Option<UserId>,
    pub active_on: Option<NaiveDate>,
    pub include_inactive: bool,
}

impl AssignmentFilter {
    /// Whether `assignment` passes every populated criterion.
    pub fn matches(&self, assignment: &Assignment) -> bool {
        let link = &assignment.link;
        self.kind.is_none_or(|kind| link.kind() == kind)
            && endpoint_matches(self.department_id, link.department_id())
            && endpoint_matches(self.location_id, link.location_id())
            && endpoint_matches(self.team_id, link.team_id())
            && endpoint_matches(self.user_id, link.user_id())
            && self.active_on.is_none_or(|day| assignment.period.covers(day))
            && (self.include_inactive || assignment.active)
    }
}

fn endpoint_matches<T: PartialEq>(wanted: Option<T>, actual: Option<T>) -> bool {
    match wanted {
        Some(wanted) => actual.is_some_and(|actual| actual == wanted),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).expect("valid date")
    }

    #[fixture]
    fn rota_entry() -> Assignment {
        Assignment {
            id: AssignmentId::random(),
            org_id: OrganizationId::random(),
            link: AssignmentLink::UserTeam {
                user_id: UserId::random(),
                team_id: TeamId::random(),
            },
            period: DateRange::new(day(1), Some(day(10))).expect("ordered"),
            active: true,
            audit: Audit::created(Utc::now(), None),
        }
    }

    #[rstest]
    fn columns_round_trip_through_kind(rota_entry: Assignment) {
        let link = rota_entry.link;
        assert_eq!(
            AssignmentLink::from_columns(link.kind(), link.columns()),
            Some(link)
        );
    }

    #[rstest]
    fn missing_columns_are_rejected() {
        let columns = LinkColumns {
            department_id: Some(DepartmentId::random()),
            ..LinkColumns::default()
        };
        assert_eq!(
            AssignmentLink::from_columns(AssignmentKind::WardDepartment, columns),
            None
        );
    }

    #[rstest]
    fn filter_by_team_and_day(rota_entry: Assignment) {
        let team_id = rota_entry.link.team_id();
        let on_day = AssignmentFilter {
            team_id,
            active_on: Some(day(10)),
            ..AssignmentFilter::default()
        };
        let after = AssignmentFilter {
            active_on: Some(day(11)),
            ..on_day
        };
        let other_team = AssignmentFilter {
            team_id: Some(TeamId::random()),
            ..AssignmentFilter::default()
        };
        assert!(on_day.matches(&rota_entry));
        assert!(!after.matches(&rota_entry));
        assert!(!other_team.matches(&rota_entry));
    }

    #[rstest]
    fn inactive_rows_need_opt_in(mut rota_entry: Assignment) {
        rota_entry.active = false;
        assert!(!AssignmentFilter::default().matches(&rota_entry));
        let opted_in = AssignmentFilter {
            include_inactive: true,
            ..AssignmentFilter::default()
        };
        assert!(opted_in.matches(&rota_entry));
    }

    #[rstest]
    fn serialises_tagged_link(rota_entry: Assignment) {
        let value = serde_json::to_value(&rota_entry).expect("serialise");
        assert_eq!(value["link"]["kind"], "user_team");
        assert!(value["link"]["userId"].is_string());
        assert_eq!(value["startDate"], "2024-05-01");
        assert_eq!(value["endDate"], "2024-05-10");
    }
}
