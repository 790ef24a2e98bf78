//! Builders shared by the domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use super::{
    Actor, Audit, DateRange, Department, DepartmentId, DisplayName, EmailAddress, EntityName,
    Hospital, HospitalId, Location, LocationId, LocationKind, Organization, OrganizationId, Team,
    TeamId, User, UserId, UserRole,
};

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixed_now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixed_now()
    }
}

pub(crate) fn clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock)
}

pub(crate) fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
}

pub(crate) fn name(raw: &str) -> EntityName {
    EntityName::new(raw).expect("valid name")
}

pub(crate) fn actor(role: UserRole, org_id: OrganizationId) -> Actor {
    Actor {
        user_id: UserId::random(),
        org_id,
        role,
    }
}

pub(crate) fn organization(raw_name: &str) -> Organization {
    Organization {
        id: OrganizationId::random(),
        name: name(raw_name),
        active: true,
        audit: Audit::created(fixed_now(), None),
    }
}

pub(crate) fn hospital(org_id: OrganizationId, raw_name: &str) -> Hospital {
    Hospital {
        id: HospitalId::random(),
        org_id,
        name: name(raw_name),
        address: None,
        active: true,
        audit: Audit::created(fixed_now(), None),
    }
}

pub(crate) fn location(hospital: &Hospital, raw_name: &str, kind: LocationKind) -> Location {
    Location {
        id: LocationId::random(),
        org_id: hospital.org_id,
        hospital_id: hospital.id,
        name: name(raw_name),
        kind,
        active: true,
        audit: Audit::created(fixed_now(), None),
    }
}

pub(crate) fn department(org_id: OrganizationId, raw_name: &str) -> Department {
    Department {
        id: DepartmentId::random(),
        org_id,
        name: name(raw_name),
        description: None,
        active: true,
        audit: Audit::created(fixed_now(), None),
    }
}

pub(crate) fn team(department: &Department, raw_name: &str) -> Team {
    Team {
        id: TeamId::random(),
        org_id: department.org_id,
        department_id: department.id,
        name: name(raw_name),
        active: true,
        audit: Audit::created(fixed_now(), None),
    }
}

pub(crate) fn user(org_id: OrganizationId, email: &str, role: UserRole) -> User {
    User {
        id: UserId::random(),
        org_id,
        email: EmailAddress::new(email).expect("valid email"),
        display_name: DisplayName::new(email.split('@').next().unwrap_or(email))
            .expect("valid display name"),
        role,
        active: true,
        audit: Audit::created(fixed_now(), None),
    }
}

pub(crate) fn period(start: NaiveDate, end: Option<NaiveDate>) -> DateRange {
    DateRange::new(start, end).expect("ordered range")
}
