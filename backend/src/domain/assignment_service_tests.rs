//! Tests for the assignment service.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockAssignmentRepository, MockDepartmentRepository, MockLocationRepository,
    MockTeamRepository, MockUserRepository,
};
use crate::domain::test_support::{
    actor, clock, day, department, fixed_now, hospital, location, period, team, user,
};
use crate::domain::{ErrorCode, LocationKind, UserRole};

type Service = AssignmentService<
    MockDepartmentRepository,
    MockLocationRepository,
    MockTeamRepository,
    MockUserRepository,
    MockAssignmentRepository,
>;

#[derive(Default)]
struct Mocks {
    departments: MockDepartmentRepository,
    locations: MockLocationRepository,
    teams: MockTeamRepository,
    users: MockUserRepository,
    assignments: MockAssignmentRepository,
}

impl Mocks {
    fn into_service(self) -> Service {
        AssignmentService::new(
            AssignmentEndpoints {
                departments: Arc::new(self.departments),
                locations: Arc::new(self.locations),
                teams: Arc::new(self.teams),
                users: Arc::new(self.users),
            },
            Arc::new(self.assignments),
            clock(),
        )
    }
}

fn existing(org_id: OrganizationId, link: AssignmentLink, range: DateRange) -> Assignment {
    Assignment {
        id: AssignmentId::random(),
        org_id,
        link,
        period: range,
        active: true,
        audit: Audit::created(fixed_now(), None),
    }
}

#[rstest]
#[tokio::test]
async fn ward_department_requires_a_ward() {
    let org_id = OrganizationId::random();
    let site = hospital(org_id, "General");
    let clinic = location(&site, "Clinic 3", LocationKind::Clinic);
    let clinic_id = clinic.id;
    let mut mocks = Mocks::default();
    mocks
        .locations
        .expect_find_by_id()
        .return_once(move |_, _| Ok(Some(clinic)));
    mocks.assignments.expect_insert().times(0);

    let err = mocks
        .into_service()
        .create(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            NewAssignment {
                link: AssignmentLink::WardDepartment {
                    location_id: clinic_id,
                    department_id: DepartmentId::random(),
                },
                period: period(day(1, 1), None),
                active: true,
            },
        )
        .await
        .expect_err("not a ward");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().expect("details")["code"], "not_a_ward");
}

#[rstest]
#[tokio::test]
async fn user_from_another_org_cannot_join_a_team() {
    let org_id = OrganizationId::random();
    let outsider = user(OrganizationId::random(), "out@example.org", UserRole::Staff);
    let outsider_id = outsider.id;
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(outsider)));

    let err = mocks
        .into_service()
        .create(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            NewAssignment {
                link: AssignmentLink::UserTeam {
                    user_id: outsider_id,
                    team_id: TeamId::random(),
                },
                period: period(day(1, 1), None),
                active: true,
            },
        )
        .await
        .expect_err("not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn overlapping_active_period_is_a_conflict() {
    let org_id = OrganizationId::random();
    let member = user(org_id, "nurse@example.org", UserRole::Staff);
    let crew = team(&department(org_id, "Surgery"), "Day");
    let link = AssignmentLink::UserTeam {
        user_id: member.id,
        team_id: crew.id,
    };
    let current = existing(org_id, link, period(day(3, 1), Some(day(3, 31))));
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(member)));
    mocks
        .teams
        .expect_find_by_id()
        .return_once(move |_, _| Ok(Some(crew)));
    mocks
        .assignments
        .expect_list_for_link()
        .withf(move |candidate| *candidate == link)
        .return_once(move |_| Ok(vec![current]));
    mocks.assignments.expect_insert().times(0);

    let err = mocks
        .into_service()
        .create(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            NewAssignment {
                link,
                period: period(day(3, 31), None),
                active: true,
            },
        )
        .await
        .expect_err("overlap");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn adjacent_period_is_accepted() {
    let org_id = OrganizationId::random();
    let dept = department(org_id, "Surgery");
    let crew = team(&dept, "Cover");
    let link = AssignmentLink::DepartmentTeam {
        department_id: dept.id,
        team_id: crew.id,
    };
    let current = existing(org_id, link, period(day(3, 1), Some(day(3, 31))));
    let mut mocks = Mocks::default();
    mocks
        .departments
        .expect_find_by_id()
        .return_once(move |_, _| Ok(Some(dept)));
    mocks
        .teams
        .expect_find_by_id()
        .return_once(move |_, _| Ok(Some(crew)));
    mocks
        .assignments
        .expect_list_for_link()
        .return_once(move |_| Ok(vec![current]));
    mocks.assignments.expect_insert().times(1).return_once(|_| Ok(()));

    let created = mocks
        .into_service()
        .create(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            NewAssignment {
                link,
                period: period(day(4, 1), None),
                active: true,
            },
        )
        .await
        .expect("create succeeds");
    assert_eq!(created.period.start(), day(4, 1));
}

#[rstest]
#[case::end_before_start(None, Some(Some(day(5, 1))), "endDate")]
#[case::start_after_end(Some(day(5, 25)), None, "startDate")]
#[case::both_patched(Some(day(5, 25)), Some(Some(day(5, 21))), "endDate")]
#[tokio::test]
async fn update_revalidates_the_period(
    #[case] start_date: Option<NaiveDate>,
    #[case] end_date: Option<Option<NaiveDate>>,
    #[case] field: &str,
) {
    let org_id = OrganizationId::random();
    let link = AssignmentLink::TeamLocation {
        team_id: TeamId::random(),
        location_id: LocationId::random(),
    };
    let row = existing(org_id, link, period(day(5, 10), Some(day(5, 20))));
    let id = row.id;
    let mut mocks = Mocks::default();
    mocks
        .assignments
        .expect_find_by_id()
        .return_once(move |_, _| Ok(Some(row)));
    mocks.assignments.expect_update().times(0);

    let err = mocks
        .into_service()
        .update(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            id,
            AssignmentPatch {
                start_date,
                end_date,
                ..AssignmentPatch::default()
            },
        )
        .await
        .expect_err("inverted");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().expect("details")["field"], field);
}

#[rstest]
#[tokio::test]
async fn update_ignores_its_own_period_when_checking_overlap() {
    let org_id = OrganizationId::random();
    let link = AssignmentLink::TeamLocation {
        team_id: TeamId::random(),
        location_id: LocationId::random(),
    };
    let row = existing(org_id, link, period(day(5, 10), None));
    let id = row.id;
    let listed = row.clone();
    let mut mocks = Mocks::default();
    mocks
        .assignments
        .expect_find_by_id()
        .return_once(move |_, _| Ok(Some(row)));
    mocks
        .assignments
        .expect_list_for_link()
        .return_once(move |_| Ok(vec![listed]));
    mocks.assignments.expect_update().times(1).return_once(|_| Ok(()));

    let updated = mocks
        .into_service()
        .update(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            id,
            AssignmentPatch {
                end_date: Some(Some(day(6, 30))),
                ..AssignmentPatch::default()
            },
        )
        .await
        .expect("update succeeds");
    assert_eq!(updated.period.end(), Some(day(6, 30)));
}

#[rstest]
#[tokio::test]
async fn staff_cannot_delete() {
    let org_id = OrganizationId::random();
    let err = Mocks::default()
        .into_service()
        .delete(&actor(UserRole::Staff, org_id), org_id, AssignmentId::random())
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
