//! Tests for the user service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockOrganizationRepository, MockUserChangePublisher, MockUserRepository,
};
use crate::domain::test_support::{actor, clock, organization, user};
use crate::domain::{DisplayName, ErrorCode};

type Service = UserService<MockOrganizationRepository, MockUserRepository>;

fn service(
    orgs: MockOrganizationRepository,
    users: MockUserRepository,
    publisher: MockUserChangePublisher,
) -> Service {
    UserService::new(Arc::new(orgs), Arc::new(users), Arc::new(publisher), clock())
}

fn new_user(email: &str, role: UserRole) -> NewUser {
    NewUser {
        email: EmailAddress::new(email).expect("valid email"),
        display_name: DisplayName::new("New Person").expect("valid name"),
        role,
        active: true,
    }
}

#[rstest]
#[tokio::test]
async fn create_publishes_created_event() {
    let org = organization("Trust");
    let org_id = org.id;
    let mut orgs = MockOrganizationRepository::new();
    orgs.expect_find_by_id().return_once(move |_| Ok(Some(org)));
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_, _| Ok(None));
    users.expect_insert().times(1).return_once(|_| Ok(()));
    let mut publisher = MockUserChangePublisher::new();
    publisher
        .expect_publish()
        .withf(|change| matches!(change, UserChange::Created(user) if user.email.as_ref() == "new@example.org"))
        .times(1)
        .return_const(());

    let created = service(orgs, users, publisher)
        .create(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            new_user("New@Example.org", UserRole::Staff),
        )
        .await
        .expect("create succeeds");
    assert_eq!(created.org_id, org_id);
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_a_conflict_and_publishes_nothing() {
    let org = organization("Trust");
    let org_id = org.id;
    let existing = user(org_id, "taken@example.org", UserRole::Staff);
    let mut orgs = MockOrganizationRepository::new();
    orgs.expect_find_by_id().return_once(move |_| Ok(Some(org)));
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_, _| Ok(Some(existing)));
    users.expect_insert().times(0);
    let mut publisher = MockUserChangePublisher::new();
    publisher.expect_publish().times(0);

    let err = service(orgs, users, publisher)
        .create(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            new_user("taken@example.org", UserRole::Staff),
        )
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.details().expect("details")["field"], "email");
}

#[rstest]
#[tokio::test]
async fn org_admins_cannot_grant_super_admin() {
    let org_id = OrganizationId::random();
    let err = service(
        MockOrganizationRepository::new(),
        MockUserRepository::new(),
        MockUserChangePublisher::new(),
    )
    .create(
        &actor(UserRole::OrgAdmin, org_id),
        org_id,
        new_user("boss@example.org", UserRole::SuperAdmin),
    )
    .await
    .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn update_publishes_before_and_after() {
    let org_id = OrganizationId::random();
    let existing = user(org_id, "old@example.org", UserRole::Staff);
    let id = existing.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    users.expect_find_by_email().return_once(|_, _| Ok(None));
    users.expect_update().times(1).return_once(|_| Ok(()));
    let mut publisher = MockUserChangePublisher::new();
    publisher
        .expect_publish()
        .withf(|change| match change {
            UserChange::Updated { before, after } => {
                before.email.as_ref() == "old@example.org"
                    && after.email.as_ref() == "new@example.org"
            }
            _ => false,
        })
        .times(1)
        .return_const(());

    service(MockOrganizationRepository::new(), users, publisher)
        .update(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            id,
            UserPatch {
                email: Some(EmailAddress::new("new@example.org").expect("email")),
                ..UserPatch::default()
            },
        )
        .await
        .expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn listing_an_unknown_org_is_not_found() {
    let org_id = OrganizationId::random();
    let mut orgs = MockOrganizationRepository::new();
    orgs.expect_find_by_id()
        .withf(move |id| *id == org_id)
        .return_once(|_| Ok(None));
    let mut users = MockUserRepository::new();
    users.expect_list().times(0);

    let err = service(orgs, users, MockUserChangePublisher::new())
        .list(&actor(UserRole::SuperAdmin, org_id), org_id, false)
        .await
        .expect_err("unknown org");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn listing_hides_inactive_users_by_default() {
    let org = organization("Trust");
    let org_id = org.id;
    let mut orgs = MockOrganizationRepository::new();
    orgs.expect_find_by_id().return_once(move |_| Ok(Some(org)));
    let active = user(org_id, "on@example.org", UserRole::Staff);
    let mut inactive = user(org_id, "off@example.org", UserRole::Staff);
    inactive.active = false;
    let mut users = MockUserRepository::new();
    users
        .expect_list()
        .return_once(move |_| Ok(vec![active, inactive]));

    let listed = service(orgs, users, MockUserChangePublisher::new())
        .list(&actor(UserRole::Staff, org_id), org_id, false)
        .await
        .expect("list succeeds");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].email.as_ref(), "on@example.org");
}

#[rstest]
#[tokio::test]
async fn users_in_other_orgs_are_not_found() {
    let org_id = OrganizationId::random();
    let stranger = user(OrganizationId::random(), "x@example.org", UserRole::Staff);
    let id = stranger.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stranger)));

    let err = service(
        MockOrganizationRepository::new(),
        users,
        MockUserChangePublisher::new(),
    )
    .get(&actor(UserRole::SuperAdmin, org_id), org_id, id)
    .await
    .expect_err("not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn self_delete_is_refused() {
    let org_id = OrganizationId::random();
    let me = actor(UserRole::OrgAdmin, org_id);
    let mut users = MockUserRepository::new();
    users.expect_delete_with_assignments().times(0);

    let err = service(
        MockOrganizationRepository::new(),
        users,
        MockUserChangePublisher::new(),
    )
    .delete(&me, org_id, me.user_id)
    .await
    .expect_err("refused");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn delete_cascades_and_publishes_deleted_event() {
    let org_id = OrganizationId::random();
    let target = user(org_id, "leaver@example.org", UserRole::Staff);
    let id = target.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(target)));
    users
        .expect_delete_with_assignments()
        .return_once(|_| Ok(2));
    let mut publisher = MockUserChangePublisher::new();
    publisher
        .expect_publish()
        .withf(move |change| matches!(change, UserChange::Deleted(user) if user.id == id))
        .times(1)
        .return_const(());

    let report = service(MockOrganizationRepository::new(), users, publisher)
        .delete(&actor(UserRole::OrgAdmin, org_id), org_id, id)
        .await
        .expect("delete succeeds");
    assert_eq!(report.assignments, 2);
}

#[rstest]
#[tokio::test]
async fn resolve_rejects_inactive_users() {
    let mut sleeper = user(OrganizationId::random(), "zz@example.org", UserRole::Staff);
    sleeper.active = false;
    let id = sleeper.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(sleeper)));

    let err = service(
        MockOrganizationRepository::new(),
        users,
        MockUserChangePublisher::new(),
    )
    .resolve(id)
    .await
    .expect_err("inactive");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn resolve_rejects_unknown_users() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(
        MockOrganizationRepository::new(),
        users,
        MockUserChangePublisher::new(),
    )
    .resolve(UserId::random())
    .await
    .expect_err("unknown");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}
